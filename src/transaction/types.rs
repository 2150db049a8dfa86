/// Transaction value types for ledgerwire
use crate::crypto;
use crate::error::{ChainError, Result};
use crate::payload::types::nonzero_u256;
use crate::payload::TxPayload;
use crate::transaction::codec;
use crate::types::{Address, Hash, Network, Signature, TxType, TxVersion, SIGNATURE_LEN};
use once_cell::sync::OnceCell;
use primitive_types::U256;
use std::ops::Deref;

/// Wire fields of a transaction.
///
/// The sender is not a field: it is recovered from the signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxData {
    pub version: TxVersion,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub tx_type: TxType,
    pub network: Network,
    pub nonce: Option<u64>,
    pub recipient: Option<Address>,
    pub token: Option<Address>,
    /// Must be `None`, not zero, on proposal and vote transactions.
    pub amount: Option<U256>,
    pub fee: U256,
    pub message: Option<Vec<u8>>,
    pub payload: Option<TxPayload>,
    pub reference_hash: Option<Hash>,
    pub signature: Option<Signature>,
}

impl TxData {
    /// Collapses present-but-zero optionals to `None`.
    ///
    /// Absent optionals are written as the empty string, which is also how
    /// zero and empty values encode, so a decoded transaction can only ever
    /// hold the collapsed form.
    pub fn normalized(self) -> Self {
        TxData {
            nonce: self.nonce.filter(|n| *n != 0),
            amount: nonzero_u256(self.amount),
            message: self.message.filter(|m| !m.is_empty()),
            payload: self.payload.map(TxPayload::normalized),
            ..self
        }
    }
}

/// Immutable transaction with memoized hashes, size and sender.
///
/// Cells are filled on first use and never invalidated; changing any field
/// goes through [`Tx::with_signature`] or [`Tx::into_data`], both of which
/// produce a fresh instance.
#[derive(Debug, Clone)]
pub struct Tx {
    data: TxData,
    hash: OnceCell<Hash>,
    signing_hash: OnceCell<Hash>,
    size: OnceCell<usize>,
    sender: OnceCell<Address>,
}

impl Tx {
    /// Wraps `data` after [`TxData::normalized`], so equality with a decoded
    /// copy holds.
    pub fn new(data: TxData) -> Self {
        Tx {
            data: data.normalized(),
            hash: OnceCell::new(),
            signing_hash: OnceCell::new(),
            size: OnceCell::new(),
            sender: OnceCell::new(),
        }
    }

    pub fn data(&self) -> &TxData {
        &self.data
    }

    pub fn into_data(self) -> TxData {
        self.data
    }

    /// Returns a copy carrying `signature`. The signing hash is kept, since
    /// it does not depend on the signature.
    pub fn with_signature(&self, signature: Signature) -> Tx {
        let mut data = self.data.clone();
        data.signature = Some(signature);
        let tx = Tx::new(data);
        if let Some(signing_hash) = self.signing_hash.get() {
            let _ = tx.signing_hash.set(*signing_hash);
        }
        tx
    }

    pub fn is_signed(&self) -> bool {
        self.data.signature.is_some()
    }

    /// Canonical encoding, signature included when present.
    pub fn encode(&self) -> Vec<u8> {
        codec::encode_tx(&self.data, true)
    }

    /// Encoding without the signature element; the bytes that get signed.
    pub fn encode_unsigned(&self) -> Vec<u8> {
        codec::encode_tx(&self.data, false)
    }

    pub fn decode(bytes: &[u8]) -> Result<Tx> {
        codec::decode_tx(bytes)
    }

    /// Canonical hash: the transaction's identifier.
    pub fn hash(&self) -> Hash {
        *self.hash.get_or_init(|| codec::canonical_hash(&self.data))
    }

    /// Hash of the unsigned encoding; what the sender signs.
    pub fn signing_hash(&self) -> Hash {
        *self
            .signing_hash
            .get_or_init(|| codec::signing_hash(&self.data))
    }

    /// Exact encoded size in bytes.
    pub fn size(&self) -> usize {
        *self.size.get_or_init(|| self.encode().len())
    }

    /// Unsigned size plus the raw signature length.
    ///
    /// Quick and usually a little low: it ignores the signature's own length
    /// prefix and any growth of the outer list prefix. Use [`Tx::size`] when
    /// the number matters.
    pub fn estimated_size(&self) -> usize {
        self.encode_unsigned().len() + SIGNATURE_LEN
    }

    /// Sender recovered from the signature over the signing hash.
    pub fn sender(&self) -> Result<Address> {
        self.sender
            .get_or_try_init(|| {
                let signature = self
                    .data
                    .signature
                    .as_ref()
                    .ok_or_else(|| ChainError::Crypto("Transaction is not signed".to_string()))?;
                crypto::recover_address(&self.signing_hash(), signature)
            })
            .copied()
    }
}

impl Deref for Tx {
    type Target = TxData;

    fn deref(&self) -> &TxData {
        &self.data
    }
}

impl PartialEq for Tx {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Eq for Tx {}

impl From<TxData> for Tx {
    fn from(data: TxData) -> Self {
        Tx::new(data)
    }
}
