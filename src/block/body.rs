/// Block value type and exact sizing
use super::codec;
use super::header::BlockHeader;
use super::merkle::MerkleTree;
use crate::error::{ChainError, Result};
use crate::rlp::encoded_list_len;
use crate::transaction::Tx;
use crate::types::Hash;
use once_cell::sync::OnceCell;

/// A header and its ordered transactions.
///
/// `txs` is `None` for blocks decoded in headers-only mode; a block that
/// genuinely has no transactions carries `Some(vec![])`.
#[derive(Debug, Clone)]
pub struct Block {
    header: BlockHeader,
    txs: Option<Vec<Tx>>,
    size: OnceCell<usize>,
}

impl Block {
    pub fn new(header: BlockHeader, txs: Option<Vec<Tx>>) -> Self {
        Block {
            header,
            txs,
            size: OnceCell::new(),
        }
    }

    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    pub fn txs(&self) -> Option<&[Tx]> {
        self.txs.as_deref()
    }

    pub fn into_parts(self) -> (BlockHeader, Option<Vec<Tx>>) {
        (self.header, self.txs)
    }

    pub fn is_headers_only(&self) -> bool {
        self.txs.is_none()
    }

    /// The header's canonical hash.
    pub fn hash(&self) -> Hash {
        self.header.hash()
    }

    pub fn height(&self) -> u64 {
        self.header.height
    }

    pub fn encode(&self) -> Vec<u8> {
        codec::encode_block(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Block> {
        codec::decode_block(bytes)
    }

    /// Exact encoded size, equal to `self.encode().len()`.
    ///
    /// The transaction list and the outer list each add a prefix whose width
    /// depends on the payload it wraps, so child sizes cannot just be summed.
    pub fn size(&self) -> usize {
        *self.size.get_or_init(|| {
            let txs_payload: usize = self.txs().unwrap_or(&[]).iter().map(Tx::size).sum();
            encoded_list_len(self.header.size() + encoded_list_len(txs_payload))
        })
    }

    /// Merkle root of the transactions, or `None` for a headers-only block.
    pub fn computed_tx_root(&self) -> Option<Hash> {
        self.txs().map(MerkleTree::tx_root)
    }

    /// Checks that the header's `tx_root` commits to this block's transactions.
    pub fn verify_tx_root(&self) -> Result<()> {
        let computed = self.computed_tx_root().ok_or_else(|| {
            ChainError::Validation(format!(
                "Block {} was decoded without transactions",
                self.height()
            ))
        })?;
        if computed != self.header.tx_root {
            return Err(ChainError::Validation(format!(
                "Merkle root mismatch. Expected {}, but got {}.",
                computed, self.header.tx_root
            )));
        }
        Ok(())
    }
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.header == other.header && self.txs == other.txs
    }
}

impl Eq for Block {}
