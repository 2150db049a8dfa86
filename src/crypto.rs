//! Cryptographic primitives for ledgerwire
//!
//! Everything the wire layer needs from secp256k1 sits behind four calls:
//! [`keccak`], [`PrivateKey::sign_hash`], [`recover_address`] and
//! [`address_from_public_key`].

use crate::error::ChainError;
use crate::types::{Address, Hash, Signature};
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use secp256k1::{
    constants::SECRET_KEY_SIZE,
    ecdsa::{RecoverableSignature, RecoveryId},
    All, Message, PublicKey, Secp256k1, SecretKey,
};

/// A thread-safe, lazily initialized Secp256k1 context.
static SECP256K1_CONTEXT: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

/// Offset added to the recovery id to form `v`.
const V_OFFSET: u8 = 27;

/// Keccak-256 digest of `data`.
pub fn keccak(data: &[u8]) -> Hash {
    Hash::of(data)
}

pub fn address_from_public_key(public_key: &PublicKey) -> Address {
    Address::from_public_key(public_key)
}

/// Recovers the signer's address from a signature over `hash`.
///
/// Fails with a cryptographic error if the signature is not structurally
/// valid or recovery does not produce a point.
pub fn recover_address(hash: &Hash, signature: &Signature) -> Result<Address, ChainError> {
    if !signature.is_structurally_valid() {
        return Err(ChainError::Crypto(
            "Signature is not structurally valid".to_string(),
        ));
    }
    let recid = signature
        .recovery_id()
        .ok_or_else(|| ChainError::Crypto(format!("Invalid v value: {}", signature.v())))?;
    let recid = RecoveryId::from_i32(recid)
        .map_err(|e| ChainError::Crypto(format!("Invalid recovery id: {}", e)))?;
    let recoverable = RecoverableSignature::from_compact(signature.compact(), recid)
        .map_err(|e| ChainError::Crypto(format!("Invalid signature: {}", e)))?;

    let message = Message::from_digest(*hash.as_bytes());
    let public_key = SECP256K1_CONTEXT
        .recover_ecdsa(&message, &recoverable)
        .map_err(|e| ChainError::Crypto(format!("Signature recovery failed: {}", e)))?;

    Ok(Address::from_public_key(&public_key))
}

/// The signing seam used by the transaction builder.
///
/// Anything that can name its address and sign a 32-byte digest can sign
/// transactions: an in-memory key, a hardware wallet or a remote signer.
pub trait TxSigner {
    fn address(&self) -> Address;

    fn sign_hash(&self, hash: &Hash) -> Result<Signature, ChainError>;
}

#[derive(Clone)]
pub struct PrivateKey {
    secret_key: SecretKey,
    public_key: PublicKey,
}

impl PrivateKey {
    /// Generates a new random key using the OS random number generator.
    pub fn generate() -> Self {
        let secret_key = SecretKey::new(&mut OsRng);
        Self::from_secret_key(secret_key)
    }

    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let public_key = PublicKey::from_secret_key(&SECP256K1_CONTEXT, &secret_key);
        PrivateKey {
            secret_key,
            public_key,
        }
    }

    /// Creates a key from raw secret key bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ChainError> {
        let secret_key = SecretKey::from_slice(bytes).map_err(|e| {
            if bytes.len() != SECRET_KEY_SIZE {
                ChainError::Crypto(format!(
                    "Secret key must be {} bytes, got {}",
                    SECRET_KEY_SIZE,
                    bytes.len()
                ))
            } else {
                ChainError::Crypto(format!("Invalid secret key bytes: {}", e))
            }
        })?;
        Ok(Self::from_secret_key(secret_key))
    }

    /// Parses a hex-encoded secret key, with or without `0x`.
    pub fn from_hex(s: &str) -> Result<Self, ChainError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits)
            .map_err(|e| ChainError::Crypto(format!("Invalid hex secret key: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn address(&self) -> Address {
        Address::from_public_key(&self.public_key)
    }

    /// Signs a 32-byte digest as-is; no further hashing happens here.
    ///
    /// secp256k1 always produces low-S signatures, so the result is
    /// structurally valid.
    pub fn sign_hash(&self, hash: &Hash) -> Signature {
        let message = Message::from_digest(*hash.as_bytes());
        let recoverable = SECP256K1_CONTEXT.sign_ecdsa_recoverable(&message, &self.secret_key);
        let (recid, compact) = recoverable.serialize_compact();

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&compact[..32]);
        s.copy_from_slice(&compact[32..]);
        Signature::from_parts(r, s, V_OFFSET + recid.to_i32() as u8)
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

impl TxSigner for PrivateKey {
    fn address(&self) -> Address {
        PrivateKey::address(self)
    }

    fn sign_hash(&self, hash: &Hash) -> Result<Signature, ChainError> {
        Ok(PrivateKey::sign_hash(self, hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> PrivateKey {
        PrivateKey::from_bytes(&[byte; 32]).unwrap()
    }

    #[test]
    fn test_sign_and_recover() {
        let key = PrivateKey::generate();
        let hash = keccak(b"Hello, ledgerwire!");

        let signature = key.sign_hash(&hash);
        assert!(signature.is_structurally_valid());
        assert!(signature.v() == 27 || signature.v() == 28);

        let recovered = recover_address(&hash, &signature).unwrap();
        assert_eq!(recovered, key.address());
    }

    #[test]
    fn test_recover_against_other_hash_gives_other_address() {
        let key = key(7);
        let signature = key.sign_hash(&keccak(b"original"));

        // recovery still succeeds, but yields an unrelated identity
        let recovered = recover_address(&keccak(b"tampered"), &signature).unwrap();
        assert_ne!(recovered, key.address());
    }

    #[test]
    fn test_known_address() {
        // secret key 0x...01 is the generator point
        let mut secret = [0u8; 32];
        secret[31] = 1;
        let key = PrivateKey::from_bytes(&secret).unwrap();
        assert_eq!(
            key.address().to_string(),
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
    }

    #[test]
    fn test_signing_is_deterministic() {
        let key = key(3);
        let hash = keccak(b"same input");
        assert_eq!(key.sign_hash(&hash), key.sign_hash(&hash));
    }

    #[test]
    fn test_recover_rejects_zero_signature() {
        let result = recover_address(&keccak(b"x"), &Signature::ZERO);
        assert!(result.is_err());
        assert!(result.unwrap_err().is_crypto());
    }

    #[test]
    fn test_from_bytes_invalid_length() {
        let result = PrivateKey::from_bytes(&[1u8; SECRET_KEY_SIZE - 1]);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Secret key must be"));
    }

    #[test]
    fn test_from_bytes_rejects_zero_key() {
        let result = PrivateKey::from_bytes(&[0u8; SECRET_KEY_SIZE]);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Invalid secret key bytes"));
    }

    #[test]
    fn test_from_hex_matches_from_bytes() {
        let hex_key = format!("0x{}", hex::encode([9u8; 32]));
        assert_eq!(
            PrivateKey::from_hex(&hex_key).unwrap().address(),
            key(9).address()
        );
    }

    #[test]
    fn test_signer_trait_object() {
        let key = key(5);
        let signer: &dyn TxSigner = &key;
        let hash = keccak(b"via trait");
        let signature = signer.sign_hash(&hash).unwrap();
        assert_eq!(recover_address(&hash, &signature).unwrap(), signer.address());
    }
}
