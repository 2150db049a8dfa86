//! Merkle roots binding a block's ordered transactions into its header.
//!
//! Behavior:
//! - An empty list of leaves yields [`Hash::ZERO`].
//! - A single leaf is its own root.
//! - Each pair is reduced to `keccak(left ++ right)`.
//! - Odd layers pair the last node with itself.
//! - Large layers are hashed on the rayon pool. Chunks are collected in
//!   order, so the root is identical to the sequential reduction.

use crate::config::{CodecConfig, DEFAULT_PARALLEL_THRESHOLD};
use crate::transaction::Tx;
use crate::types::Hash;
use rayon::prelude::*;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MerkleTree {
    parallel_threshold: usize,
}

impl Default for MerkleTree {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl MerkleTree {
    /// Layers with at least `threshold` nodes are hashed in parallel.
    pub fn with_parallel_threshold(threshold: usize) -> Self {
        Self {
            parallel_threshold: threshold,
        }
    }

    pub fn from_config(config: &CodecConfig) -> Self {
        Self::with_parallel_threshold(config.merkle.parallel_threshold)
    }

    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    /// Root over `leaves` with the default parallel threshold.
    pub fn root(leaves: &[Hash]) -> Hash {
        Self::default().compute_root(leaves)
    }

    /// Root over the canonical hashes of `txs`, in block order.
    pub fn tx_root(txs: &[Tx]) -> Hash {
        Self::default().compute_tx_root(txs)
    }

    pub fn compute_tx_root(&self, txs: &[Tx]) -> Hash {
        let leaves: Vec<Hash> = txs.iter().map(Tx::hash).collect();
        self.compute_root(&leaves)
    }

    pub fn compute_root(&self, leaves: &[Hash]) -> Hash {
        match leaves {
            [] => Hash::ZERO,
            [single] => *single,
            _ => {
                let mut layer = self.reduce_layer(leaves);
                while layer.len() > 1 {
                    layer = self.reduce_layer(&layer);
                }
                layer[0]
            }
        }
    }

    fn reduce_layer(&self, layer: &[Hash]) -> Vec<Hash> {
        if layer.len() >= self.parallel_threshold {
            trace!(
                "Hashing Merkle layer of {} nodes in parallel",
                layer.len()
            );
            layer.par_chunks(2).map(hash_chunk).collect()
        } else {
            layer.chunks(2).map(hash_chunk).collect()
        }
    }
}

/// Hashes a pair, or a lone trailing node with itself.
fn hash_chunk(chunk: &[Hash]) -> Hash {
    let left = &chunk[0];
    let right = chunk.get(1).unwrap_or(left);
    Hash::of_pair(left, right)
}
