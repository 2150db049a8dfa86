//! Codec tuning for ledgerwire
//!
//! ```toml
//! [codec]
//! max_nesting_depth = 16
//!
//! [merkle]
//! parallel_threshold = 1024
//! ```
//!
//! Both sections and every key are optional. None of these knobs change
//! encoded bytes or hashes; they bound decoding work and pick when Merkle
//! layers fan out across threads.

use crate::error::{ChainError, Result};
use crate::rlp::{DEFAULT_MAX_DEPTH, MAX_DEPTH_CEILING};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Layers with at least this many nodes are hashed in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct CodecConfig {
    #[serde(default)]
    pub codec: DecodeLimits,
    #[serde(default)]
    pub merkle: MerkleConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DecodeLimits {
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MerkleConfig {
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_nesting_depth: default_max_nesting_depth(),
        }
    }
}

impl Default for MerkleConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

fn default_max_nesting_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_parallel_threshold() -> usize {
    DEFAULT_PARALLEL_THRESHOLD
}

impl CodecConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: CodecConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&config_str)
    }

    /// Like [`CodecConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No codec config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Rejects depth bounds that would make every decode fail or that are
    /// far beyond anything the wire format nests.
    pub fn validate(&self) -> Result<()> {
        // the outermost entity is already one level of nesting
        if self.codec.max_nesting_depth == 0 {
            return Err(ChainError::Config(
                "codec.max_nesting_depth must be at least 1".to_string(),
            ));
        }
        if self.codec.max_nesting_depth > MAX_DEPTH_CEILING {
            return Err(ChainError::Config(format!(
                "codec.max_nesting_depth must be at most {}, got {}",
                MAX_DEPTH_CEILING, self.codec.max_nesting_depth
            )));
        }
        Ok(())
    }
}
