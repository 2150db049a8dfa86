//! Versioned transaction encoding.
//!
//! The outer layout is always `[versionCode, ...fields]`. The version code
//! picks a [`TxCodecStrategy`]; a new layout means a new strategy and a new
//! [`TxVersion`] variant, with V1's code path left alone.

use super::types::{Tx, TxData};
use crate::config::CodecConfig;
use crate::error::{ChainError, DecodeError, Result};
use crate::payload::codec::{read_optional_address, read_payload, write_payload};
use crate::rlp::{self, RlpReader, RlpWriter};
use crate::types::{Hash, Network, Signature, TxType, TxVersion};
use tracing::debug;

/// Field layout for one transaction version.
///
/// `encode_fields` and `decode_fields` see only what follows the version
/// code; the surrounding list is handled by the caller.
pub trait TxCodecStrategy: Sync {
    fn encode_fields(&self, w: &mut RlpWriter, tx: &TxData, include_signature: bool);

    fn decode_fields(&self, r: &mut RlpReader<'_>) -> Result<TxData>;
}

/// `[1, timestamp, type, network, nonce?, recipient?, token?, amount?, fee,
/// message?, payload?, reference?, (signature)]`
pub struct TxV1Codec;

impl TxCodecStrategy for TxV1Codec {
    fn encode_fields(&self, w: &mut RlpWriter, tx: &TxData, include_signature: bool) {
        w.write_u64_scalar(tx.timestamp);
        w.write_u64_scalar(tx.tx_type.code());
        w.write_u64_scalar(tx.network.code());
        w.write_optional_u64(tx.nonce);
        w.write_optional_bytes(tx.recipient.as_ref().map(|a| &a.as_bytes()[..]));
        w.write_optional_bytes(tx.token.as_ref().map(|a| &a.as_bytes()[..]));
        w.write_optional_u256(tx.amount.as_ref());
        w.write_u256_scalar(&tx.fee);
        w.write_optional_bytes(tx.message.as_deref());
        match &tx.payload {
            Some(payload) => write_payload(w, payload, TxVersion::V1),
            None => w.write_empty(),
        }
        w.write_optional_bytes(tx.reference_hash.as_ref().map(|h| &h.as_bytes()[..]));
        if include_signature {
            if let Some(signature) = &tx.signature {
                w.write_bytes(signature.as_bytes());
            }
        }
    }

    fn decode_fields(&self, r: &mut RlpReader<'_>) -> Result<TxData> {
        let timestamp = r.read_u64_scalar()?;
        let tx_type = TxType::from_code(r.read_u64_scalar()?)?;
        let network = Network::from_code(r.read_u64_scalar()?)?;
        let nonce = r.read_optional_u64()?;
        let recipient = read_optional_address(r, "recipient")?;
        let token = read_optional_address(r, "token")?;
        let amount = r.read_optional_u256()?;
        let fee = r.read_u256_scalar()?;
        let message = r.read_optional_bytes()?.map(<[u8]>::to_vec);
        let payload = if r.next_is_empty() {
            r.skip_next()?;
            None
        } else {
            Some(read_payload(r, TxVersion::V1)?)
        };
        let reference_hash = r.read_optional_bytes32()?.map(Hash::wrap);
        let signature = if r.is_end_of_list() {
            None
        } else {
            Some(Signature::wrap(r.read_bytes()?)?)
        };

        Ok(TxData {
            version: TxVersion::V1,
            timestamp,
            tx_type,
            network,
            nonce,
            recipient,
            token,
            amount,
            fee,
            message,
            payload,
            reference_hash,
            signature,
        })
    }
}

/// Strategy registered for `version`.
pub fn strategy(version: TxVersion) -> &'static dyn TxCodecStrategy {
    match version {
        TxVersion::V1 => &TxV1Codec,
    }
}

pub(crate) fn write_tx(w: &mut RlpWriter, tx: &TxData, include_signature: bool) {
    w.write_list(|w| {
        w.write_u64_scalar(tx.version.code());
        strategy(tx.version).encode_fields(w, tx, include_signature);
    });
}

/// Reads one transaction list at the reader's cursor.
pub(crate) fn read_tx(r: &mut RlpReader<'_>) -> Result<TxData> {
    r.enter_list()?;
    let version = TxVersion::from_code(r.read_u64_scalar()?)?;
    let data = strategy(version).decode_fields(r)?;
    r.leave_list()?;
    Ok(data)
}

/// Encodes `tx`, with or without its signature element.
pub fn encode_tx(tx: &TxData, include_signature: bool) -> Vec<u8> {
    RlpWriter::encode(|w| write_tx(w, tx, include_signature))
}

pub fn decode_tx(bytes: &[u8]) -> Result<Tx> {
    decode_tx_with(bytes, &CodecConfig::default())
}

/// Decodes a transaction, bounding list nesting by `config.codec.max_nesting_depth`.
pub fn decode_tx_with(bytes: &[u8], config: &CodecConfig) -> Result<Tx> {
    let result = rlp::validate_with_depth(bytes, config.codec.max_nesting_depth)
        .map_err(ChainError::from)
        .and_then(|_| {
            let mut reader = RlpReader::new(bytes);
            read_tx(&mut reader)
        });
    match result {
        Ok(data) => Ok(Tx::new(data)),
        Err(e) => {
            debug!("Rejected transaction ({} bytes): {}", bytes.len(), e);
            Err(e)
        }
    }
}

pub fn signing_hash(tx: &TxData) -> Hash {
    Hash::of(&encode_tx(tx, false))
}

pub fn canonical_hash(tx: &TxData) -> Hash {
    Hash::of(&encode_tx(tx, true))
}

/// Fails if `bytes` does not start with a known transaction version.
pub fn peek_version(bytes: &[u8]) -> std::result::Result<TxVersion, DecodeError> {
    let mut reader = RlpReader::new(bytes);
    reader.enter_list()?;
    TxVersion::from_code(reader.read_u64_scalar()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{TxPayload, Vote};
    use crate::types::{Address, VoteType};
    use primitive_types::U256;

    fn vote_tx() -> TxData {
        TxData {
            version: TxVersion::V1,
            timestamp: 1_700_000_000_123,
            tx_type: TxType::BipVote,
            network: Network::Mainnet,
            nonce: Some(2),
            recipient: None,
            token: None,
            amount: None,
            fee: U256::zero(),
            message: None,
            payload: Some(TxPayload::Vote(Vote {
                vote_type: VoteType::Approval,
            })),
            reference_hash: Some(Hash::of(b"proposal")),
            signature: None,
        }
    }

    #[test]
    fn test_signing_encoding_omits_signature_element() {
        let mut data = vote_tx();
        data.signature = Some(Signature::ZERO);
        let with_sig = encode_tx(&data, true);
        let without_sig = encode_tx(&data, false);

        // 67 for the signature item (0xb8 0x41 + 65 bytes) and one more
        // because the outer list crosses the 56-byte long-form boundary
        assert_eq!(without_sig.len(), 53);
        assert_eq!(with_sig.len() - without_sig.len(), 68);

        let mut reader = RlpReader::new(&without_sig);
        assert_eq!(reader.enter_list().unwrap(), 12);
        let mut reader = RlpReader::new(&with_sig);
        assert_eq!(reader.enter_list().unwrap(), 13);
    }

    #[test]
    fn test_layout_starts_with_version_and_timestamp() {
        let bytes = encode_tx(&vote_tx(), true);
        let mut reader = RlpReader::new(&bytes);
        assert_eq!(reader.enter_list().unwrap(), 12);
        assert_eq!(reader.read_u64_scalar().unwrap(), 1);
        assert_eq!(reader.read_u64_scalar().unwrap(), 1_700_000_000_123);
        assert_eq!(reader.read_u64_scalar().unwrap(), TxType::BipVote.code());
        assert_eq!(peek_version(&bytes).unwrap(), TxVersion::V1);
    }

    #[test]
    fn test_round_trip_with_placeholder_signature() {
        let mut data = vote_tx();
        data.signature = Some(Signature::ZERO);
        let decoded = decode_tx(&encode_tx(&data, true)).unwrap();
        assert_eq!(decoded.data(), &data);
    }

    #[test]
    fn test_unknown_version_is_malformed() {
        let bytes = RlpWriter::encode(|w| {
            w.write_list(|w| {
                w.write_u64_scalar(7);
                w.write_u64_scalar(0);
            })
        });
        let err = decode_tx(&bytes).unwrap_err();
        assert_eq!(
            err,
            ChainError::Malformed(DecodeError::UnknownCode {
                kind: "transaction version",
                code: 7
            })
        );
    }

    #[test]
    fn test_short_signature_is_malformed() {
        let mut bytes = encode_tx(&vote_tx(), false);
        // re-wrap the unsigned fields with a 64-byte trailing element
        let mut reader = RlpReader::new(&bytes);
        reader.enter_list().unwrap();
        let mut items = Vec::new();
        while !reader.is_end_of_list() {
            items.push(reader.read_raw().unwrap().to_vec());
        }
        bytes = RlpWriter::encode(|w| {
            w.write_list(|w| {
                for item in &items {
                    w.write_raw(item);
                }
                w.write_bytes(&[1u8; 64]);
            })
        });
        let err = decode_tx(&bytes).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_trailing_garbage_is_rejected() {
        let mut bytes = encode_tx(&vote_tx(), true);
        bytes.push(0x00);
        assert!(decode_tx(&bytes).unwrap_err().is_malformed());
    }

    #[test]
    fn test_truncated_input_is_rejected() {
        let bytes = encode_tx(&vote_tx(), true);
        for cut in [1, bytes.len() / 2, bytes.len() - 1] {
            assert!(decode_tx(&bytes[..cut]).is_err(), "cut at {}", cut);
        }
    }

    #[test]
    fn test_wrong_width_recipient_is_rejected() {
        let mut data = vote_tx();
        data.tx_type = TxType::Transfer;
        data.recipient = Some(Address::wrap([3u8; 20]));
        let good = encode_tx(&data, true);
        assert!(decode_tx(&good).is_ok());

        let bad = RlpWriter::encode(|w| {
            w.write_list(|w| {
                w.write_u64_scalar(1);
                w.write_u64_scalar(data.timestamp);
                w.write_u64_scalar(0);
                w.write_u64_scalar(0);
                w.write_u64_scalar(1);
                w.write_bytes(&[3u8; 19]);
                w.write_empty();
                w.write_empty();
                w.write_empty();
                w.write_empty();
                w.write_empty();
                w.write_empty();
            })
        });
        assert!(matches!(
            decode_tx(&bad),
            Err(ChainError::Malformed(DecodeError::InvalidLength {
                field: "recipient",
                ..
            }))
        ));
    }

    #[test]
    fn test_depth_bound_applies() {
        let bytes = encode_tx(&vote_tx(), true);
        let mut config = CodecConfig::default();
        // tx list plus nested payload list
        config.codec.max_nesting_depth = 2;
        assert!(decode_tx_with(&bytes, &config).is_ok());
        config.codec.max_nesting_depth = 1;
        assert_eq!(
            decode_tx_with(&bytes, &config),
            Err(ChainError::Malformed(DecodeError::TooDeep(1)))
        );
    }
}
