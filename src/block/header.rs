/// Block header value types
use crate::block::codec;
use crate::crypto;
use crate::error::{ChainError, Result};
use crate::types::{Address, BlockVersion, Hash, Signature};
use once_cell::sync::OnceCell;
use primitive_types::U256;
use std::ops::Deref;

/// Wire fields of a block header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderData {
    pub version: BlockVersion,
    pub height: u64,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub previous_hash: Hash,
    pub tx_root: Hash,
    pub state_root: Hash,
    pub difficulty: U256,
    pub coinbase: Address,
    /// Mining nonce; always written as 8 big-endian bytes.
    pub nonce: u64,
    /// Present only under signature-based consensus.
    pub signature: Option<Signature>,
}

impl HeaderData {
    /// Unsigned genesis-style header with zeroed links and roots.
    pub fn genesis(timestamp: u64, coinbase: Address) -> Self {
        HeaderData {
            version: BlockVersion::V1,
            height: 0,
            timestamp,
            previous_hash: Hash::ZERO,
            tx_root: Hash::ZERO,
            state_root: Hash::ZERO,
            difficulty: U256::one(),
            coinbase,
            nonce: 0,
            signature: None,
        }
    }
}

/// Immutable header with memoized hashes, size and signer.
#[derive(Debug, Clone)]
pub struct BlockHeader {
    data: HeaderData,
    hash: OnceCell<Hash>,
    signing_hash: OnceCell<Hash>,
    size: OnceCell<usize>,
    signer: OnceCell<Address>,
}

impl BlockHeader {
    pub fn new(data: HeaderData) -> Self {
        BlockHeader {
            data,
            hash: OnceCell::new(),
            signing_hash: OnceCell::new(),
            size: OnceCell::new(),
            signer: OnceCell::new(),
        }
    }

    pub fn data(&self) -> &HeaderData {
        &self.data
    }

    pub fn into_data(self) -> HeaderData {
        self.data
    }

    pub fn with_signature(&self, signature: Signature) -> BlockHeader {
        let mut data = self.data.clone();
        data.signature = Some(signature);
        let header = BlockHeader::new(data);
        if let Some(signing_hash) = self.signing_hash.get() {
            let _ = header.signing_hash.set(*signing_hash);
        }
        header
    }

    /// Same header with a different mining nonce. All caches start empty.
    pub fn with_nonce(&self, nonce: u64) -> BlockHeader {
        let mut data = self.data.clone();
        data.nonce = nonce;
        BlockHeader::new(data)
    }

    pub fn is_signed(&self) -> bool {
        self.data.signature.is_some()
    }

    pub fn encode(&self) -> Vec<u8> {
        codec::encode_header(&self.data, true)
    }

    pub fn encode_unsigned(&self) -> Vec<u8> {
        codec::encode_header(&self.data, false)
    }

    pub fn decode(bytes: &[u8]) -> Result<BlockHeader> {
        codec::decode_header(bytes)
    }

    /// Canonical hash: the block's identifier and the next block's
    /// `previous_hash`.
    pub fn hash(&self) -> Hash {
        *self
            .hash
            .get_or_init(|| codec::header_canonical_hash(&self.data))
    }

    pub fn signing_hash(&self) -> Hash {
        *self
            .signing_hash
            .get_or_init(|| codec::header_signing_hash(&self.data))
    }

    pub fn size(&self) -> usize {
        *self.size.get_or_init(|| self.encode().len())
    }

    /// Authority that signed this header, recovered against the signing hash.
    pub fn signer(&self) -> Result<Address> {
        self.signer
            .get_or_try_init(|| {
                let signature = self
                    .data
                    .signature
                    .as_ref()
                    .ok_or_else(|| ChainError::Crypto("Block header is not signed".to_string()))?;
                crypto::recover_address(&self.signing_hash(), signature)
            })
            .copied()
    }

    /// Bytes fed to the proof-of-work function: the unsigned encoding.
    /// Its hash is the signing hash.
    pub fn pow_input(&self) -> Vec<u8> {
        self.encode_unsigned()
    }
}

impl Deref for BlockHeader {
    type Target = HeaderData;

    fn deref(&self) -> &HeaderData {
        &self.data
    }
}

impl PartialEq for BlockHeader {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Eq for BlockHeader {}

impl From<HeaderData> for BlockHeader {
    fn from(data: HeaderData) -> Self {
        BlockHeader::new(data)
    }
}
