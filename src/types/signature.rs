//! 65-byte recoverable ECDSA signature in `[r][s][v]` layout.

use crate::error::{ChainError, DecodeError};
use once_cell::sync::Lazy;
use primitive_types::U256;
use secp256k1::constants::CURVE_ORDER;
use std::fmt;

pub const SIGNATURE_LEN: usize = 65;

static ORDER: Lazy<U256> = Lazy::new(|| U256::from_big_endian(&CURVE_ORDER));
static HALF_ORDER: Lazy<U256> = Lazy::new(|| *ORDER >> 1usize);

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; SIGNATURE_LEN]);

impl Signature {
    /// Placeholder used before a real signature exists. Never structurally valid.
    pub const ZERO: Signature = Signature([0u8; SIGNATURE_LEN]);

    /// Wraps 65 bytes that must be structurally valid or the zero placeholder.
    pub fn wrap(bytes: &[u8]) -> Result<Signature, ChainError> {
        let array: [u8; SIGNATURE_LEN] =
            bytes.try_into().map_err(|_| DecodeError::InvalidLength {
                field: "signature",
                expected: SIGNATURE_LEN,
                actual: bytes.len(),
            })?;
        let signature = Signature(array);
        if signature.is_zero() || signature.is_structurally_valid() {
            Ok(signature)
        } else {
            Err(ChainError::Crypto(format!(
                "Signature is not structurally valid (v = {})",
                signature.v()
            )))
        }
    }

    /// Assembles a signature without checking it.
    pub fn from_parts(r: [u8; 32], s: [u8; 32], v: u8) -> Signature {
        let mut bytes = [0u8; SIGNATURE_LEN];
        bytes[..32].copy_from_slice(&r);
        bytes[32..64].copy_from_slice(&s);
        bytes[64] = v;
        Signature(bytes)
    }

    pub fn r(&self) -> U256 {
        U256::from_big_endian(&self.0[..32])
    }

    pub fn s(&self) -> U256 {
        U256::from_big_endian(&self.0[32..64])
    }

    pub fn v(&self) -> u8 {
        self.0[64]
    }

    /// Recovery id derived from `v` (0 or 1), if `v` is 27 or 28.
    pub fn recovery_id(&self) -> Option<i32> {
        match self.v() {
            27 => Some(0),
            28 => Some(1),
            _ => None,
        }
    }

    /// Range check: `v` in {27, 28}, `0 < r < n`, `0 < s <= n/2`.
    pub fn is_structurally_valid(&self) -> bool {
        if self.recovery_id().is_none() {
            return false;
        }
        let r = self.r();
        let s = self.s();
        !r.is_zero() && r < *ORDER && !s.is_zero() && s <= *HALF_ORDER
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; SIGNATURE_LEN]
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    /// `r` and `s` back to back, as the secp256k1 compact form expects.
    pub fn compact(&self) -> &[u8] {
        &self.0[..64]
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self)
    }
}
