//! 32-byte Keccak-256 digest.

use crate::error::{ChainError, DecodeError};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

/// Digest length in bytes.
pub const HASH_LEN: usize = 32;

/// Identifier used for transaction ids, block ids, Merkle nodes and root pointers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Hash([u8; HASH_LEN]);

impl Hash {
    /// All-zero sentinel. Root of an empty transaction list.
    pub const ZERO: Hash = Hash([0u8; HASH_LEN]);

    /// Keccak-256 of `data`.
    pub fn of(data: &[u8]) -> Hash {
        Hash(Keccak256::digest(data).into())
    }

    /// Keccak-256 over two inputs, fed one after the other.
    pub fn of_pair(left: &Hash, right: &Hash) -> Hash {
        let mut hasher = Keccak256::new();
        hasher.update(left.0);
        hasher.update(right.0);
        Hash(hasher.finalize().into())
    }

    pub const fn wrap(bytes: [u8; HASH_LEN]) -> Hash {
        Hash(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Hash, ChainError> {
        let array: [u8; HASH_LEN] = bytes.try_into().map_err(|_| DecodeError::InvalidLength {
            field: "hash",
            expected: HASH_LEN,
            actual: bytes.len(),
        })?;
        Ok(Hash(array))
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; HASH_LEN]
    }

    /// First four bytes in hex, for log lines.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; HASH_LEN]> for Hash {
    fn from(bytes: [u8; HASH_LEN]) -> Self {
        Hash(bytes)
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self)
    }
}

impl FromStr for Hash {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits)
            .map_err(|e| ChainError::Validation(format!("Invalid hex hash: {}", e)))?;
        Hash::from_slice(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak_of_empty_input() {
        let hash = Hash::of(&[]);
        assert_eq!(
            hash.to_string(),
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_of_pair_matches_concatenation() {
        let a = Hash::of(b"a");
        let b = Hash::of(b"b");
        let mut joined = a.as_bytes().to_vec();
        joined.extend_from_slice(b.as_bytes());
        assert_eq!(Hash::of_pair(&a, &b), Hash::of(&joined));
        assert_ne!(Hash::of_pair(&a, &b), Hash::of_pair(&b, &a));
    }

    #[test]
    fn test_from_slice_checks_length() {
        assert!(Hash::from_slice(&[1u8; 32]).is_ok());
        let err = Hash::from_slice(&[1u8; 31]).unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("hash must be 32 bytes, got 31"));
    }

    #[test]
    fn test_hex_parse_and_display() {
        let hash = Hash::of(b"ledger");
        let parsed: Hash = hash.to_string().parse().unwrap();
        assert_eq!(parsed, hash);

        let bare: Hash = hex::encode(hash.as_bytes()).parse().unwrap();
        assert_eq!(bare, hash);

        assert!("0xzz".parse::<Hash>().is_err());
    }

    #[test]
    fn test_zero_sentinel() {
        assert!(Hash::ZERO.is_zero());
        assert!(!Hash::of(b"x").is_zero());
        assert_eq!(Hash::default(), Hash::ZERO);
        assert_eq!(Hash::ZERO.short(), "00000000");
    }
}
