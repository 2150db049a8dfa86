//! ledgerwire - canonical wire format for blockchain transactions and blocks
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Encoding
//! - [`rlp`] - Recursive length-prefixed encoding with strict canonical decoding
//! - [`types`] - Hashes, addresses, signatures and wire code enums
//!
//! ## Entities
//! - [`transaction`] - Transactions, their versioned codec and the builder
//! - [`payload`] - Typed governance and token payloads
//! - [`block`] - Block headers, blocks and Merkle roots
//!
//! ## Cryptography
//! - [`crypto`] - Keccak-256 and secp256k1 signing/recovery
//!
//! ## Configuration & Utilities
//! - [`amounts`] - Token unit conversions
//! - [`config`] - Codec configuration
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Encoding
// ============================================================================
pub mod rlp;
pub mod types;

// ============================================================================
// Entities
// ============================================================================
pub mod block;
pub mod payload;
pub mod transaction;

// ============================================================================
// Cryptography
// ============================================================================
pub mod crypto;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod amounts;
pub mod config;
pub mod error;

pub use block::{Block, BlockHeader, HeaderData, MerkleTree};
pub use error::{ChainError, DecodeError, Result};
pub use transaction::{Tx, TxBuilder, TxData};
pub use types::{Address, Hash, Signature};
