//! 20-byte account and contract identities.

use super::hash::Hash;
use crate::error::{ChainError, DecodeError};
use crate::rlp::RlpWriter;
use secp256k1::PublicKey;
use std::fmt;
use std::str::FromStr;

pub const ADDRESS_LEN: usize = 20;

/// Account, token or contract identity: the low 20 bytes of a Keccak digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    /// Reserved identity of the chain's native coin.
    pub const NATIVE_TOKEN: Address = Address::ZERO;

    pub const fn wrap(bytes: [u8; ADDRESS_LEN]) -> Address {
        Address(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Address, ChainError> {
        let array: [u8; ADDRESS_LEN] =
            bytes.try_into().map_err(|_| DecodeError::InvalidLength {
                field: "address",
                expected: ADDRESS_LEN,
                actual: bytes.len(),
            })?;
        Ok(Address(array))
    }

    /// Low 20 bytes of `hash`.
    pub fn extract(hash: &Hash) -> Address {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes.copy_from_slice(&hash.as_bytes()[12..]);
        Address(bytes)
    }

    /// Keccak of the uncompressed point, minus its `0x04` tag byte.
    pub fn from_public_key(public_key: &PublicKey) -> Address {
        let uncompressed = public_key.serialize_uncompressed();
        Address::extract(&Hash::of(&uncompressed[1..]))
    }

    /// Deterministic address for a token created by `creator` at `nonce`.
    pub fn token_address(creator: &Address, nonce: u64) -> Address {
        let encoded = RlpWriter::encode(|w| {
            w.write_list(|w| {
                w.write_bytes(creator.as_bytes());
                w.write_u64_scalar(nonce);
            })
        });
        Address::extract(&Hash::of(&encoded))
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    pub fn is_native_token(&self) -> bool {
        *self == Address::NATIVE_TOKEN
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits)
            .map_err(|e| ChainError::Validation(format!("Invalid hex address: {}", e)))?;
        Address::from_slice(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_takes_low_bytes() {
        let hash = Hash::of(b"identity");
        let address = Address::extract(&hash);
        assert_eq!(address.as_bytes(), &hash.as_bytes()[12..]);
    }

    #[test]
    fn test_native_token_is_zero() {
        assert!(Address::NATIVE_TOKEN.is_native_token());
        assert_eq!(Address::NATIVE_TOKEN, Address::ZERO);
        assert_eq!(
            Address::ZERO.to_string(),
            "0x0000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn test_token_address_is_deterministic_per_nonce() {
        let creator: Address = "0x1234567890123456789012345678901234567890".parse().unwrap();
        let first = Address::token_address(&creator, 0);
        assert_eq!(first, Address::token_address(&creator, 0));
        assert_ne!(first, Address::token_address(&creator, 1));
        assert_ne!(first, Address::token_address(&Address::ZERO, 0));
    }

    #[test]
    fn test_token_address_hashes_rlp_pair() {
        let creator = Address::wrap([0xaa; 20]);
        // [0x94 ++ creator, 0x05] wrapped in a 0xd6 list prefix
        let mut expected = vec![0xd6, 0x94];
        expected.extend_from_slice(&[0xaa; 20]);
        expected.push(0x05);
        assert_eq!(
            Address::token_address(&creator, 5),
            Address::extract(&Hash::of(&expected))
        );
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!("0x1234".parse::<Address>().is_err());
        assert!("not hex".parse::<Address>().is_err());
    }
}
