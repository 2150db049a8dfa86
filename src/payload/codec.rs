//! Payload encoding, dispatched on `(payload kind, transaction version)`.
//!
//! Every variant is written as `[kindCode, fields...]`. The dispatch is an
//! exhaustive match, so adding a transaction version forces every payload
//! kind to declare its layout for that version.

use super::types::*;
use crate::error::DecodeError;
use crate::rlp::{self, RlpReader, RlpWriter};
use crate::types::{Address, PayloadKind, TxVersion, VoteType};
use tracing::debug;

/// Encodes `payload` as a standalone RLP list.
pub fn encode_payload(payload: &TxPayload, version: TxVersion) -> Vec<u8> {
    RlpWriter::encode(|w| write_payload(w, payload, version))
}

/// Decodes a standalone payload list, validating its structure first.
pub fn decode_payload(bytes: &[u8], version: TxVersion) -> Result<TxPayload, DecodeError> {
    rlp::validate(bytes)?;
    let mut reader = RlpReader::new(bytes);
    read_payload(&mut reader, version)
}

pub(crate) fn write_payload(w: &mut RlpWriter, payload: &TxPayload, version: TxVersion) {
    w.write_list(|w| {
        w.write_u64_scalar(payload.kind().code());
        match version {
            TxVersion::V1 => write_fields_v1(w, payload),
        }
    });
}

pub(crate) fn read_payload(
    r: &mut RlpReader<'_>,
    version: TxVersion,
) -> Result<TxPayload, DecodeError> {
    let fields = r.enter_list()?;
    if fields < 1 {
        return Err(DecodeError::MissingPayloadKind);
    }
    let kind = PayloadKind::from_code(r.read_u64_scalar()?)?;
    let payload = match version {
        TxVersion::V1 => read_fields_v1(r, kind),
    }
    .map_err(|e| {
        debug!("Rejected {:?} payload for {:?}: {}", kind, version, e);
        e
    })?;
    r.leave_list()?;
    Ok(payload)
}

fn write_fields_v1(w: &mut RlpWriter, payload: &TxPayload) {
    match payload {
        TxPayload::AddressAliasAdd(p) => {
            w.write_bytes(p.address.as_bytes());
            w.write_string(&p.alias);
        }
        TxPayload::AddressAliasRemove(p) => {
            w.write_string(&p.alias);
        }
        TxPayload::AuthorityAdd(p) => {
            w.write_bytes(p.address.as_bytes());
        }
        TxPayload::AuthorityRemove(p) => {
            w.write_bytes(p.address.as_bytes());
        }
        TxPayload::NetworkParamsSet(p) => {
            w.write_optional_u256(p.block_reward.as_ref());
            w.write_optional_bytes(p.block_reward_pool_address.as_ref().map(|a| &a.as_bytes()[..]));
            w.write_optional_u64(p.target_mining_time_ms);
            w.write_optional_u64(p.asert_half_life_blocks);
            w.write_optional_u256(p.min_difficulty.as_ref());
            w.write_optional_u256(p.min_tx_base_fee.as_ref());
            w.write_optional_u256(p.min_tx_byte_fee.as_ref());
        }
        TxPayload::TokenBurn(p) => {
            w.write_bytes(p.token.as_bytes());
            w.write_bytes(p.holder.as_bytes());
            w.write_u256_scalar(&p.amount);
        }
        TxPayload::TokenCreate(p) => {
            w.write_string(&p.name);
            w.write_string(&p.symbol);
            w.write_u64_scalar(u64::from(p.decimals));
            w.write_optional_string(p.website.as_deref());
            w.write_optional_string(p.logo.as_deref());
            w.write_optional_u256(p.max_supply.as_ref());
            w.write_bool(p.user_burnable);
        }
        TxPayload::TokenMint(p) => {
            w.write_bytes(p.token.as_bytes());
            w.write_bytes(p.recipient.as_bytes());
            w.write_u256_scalar(&p.amount);
        }
        TxPayload::TokenUpdate(p) => {
            w.write_bytes(p.token.as_bytes());
            w.write_optional_string(p.name.as_deref());
            w.write_optional_string(p.symbol.as_deref());
            w.write_optional_string(p.website.as_deref());
            w.write_optional_string(p.logo.as_deref());
        }
        TxPayload::Vote(p) => {
            w.write_u64_scalar(p.vote_type.code());
        }
    }
}

fn read_fields_v1(r: &mut RlpReader<'_>, kind: PayloadKind) -> Result<TxPayload, DecodeError> {
    let payload = match kind {
        PayloadKind::AddressAliasAdd => TxPayload::AddressAliasAdd(AddressAliasAdd {
            address: read_address(r, "alias address")?,
            alias: r.read_string("alias")?,
        }),
        PayloadKind::AddressAliasRemove => TxPayload::AddressAliasRemove(AddressAliasRemove {
            alias: r.read_string("alias")?,
        }),
        PayloadKind::AuthorityAdd => TxPayload::AuthorityAdd(AuthorityAdd {
            address: read_address(r, "authority address")?,
        }),
        PayloadKind::AuthorityRemove => TxPayload::AuthorityRemove(AuthorityRemove {
            address: read_address(r, "authority address")?,
        }),
        PayloadKind::NetworkParamsSet => TxPayload::NetworkParamsSet(NetworkParamsSet {
            block_reward: r.read_optional_u256()?,
            block_reward_pool_address: read_optional_address(r, "reward pool address")?,
            target_mining_time_ms: r.read_optional_u64()?,
            asert_half_life_blocks: r.read_optional_u64()?,
            min_difficulty: r.read_optional_u256()?,
            min_tx_base_fee: r.read_optional_u256()?,
            min_tx_byte_fee: r.read_optional_u256()?,
        }),
        PayloadKind::TokenBurn => TxPayload::TokenBurn(TokenBurn {
            token: read_address(r, "token")?,
            holder: read_address(r, "holder")?,
            amount: r.read_u256_scalar()?,
        }),
        PayloadKind::TokenCreate => TxPayload::TokenCreate(TokenCreate {
            name: r.read_string("token name")?,
            symbol: r.read_string("token symbol")?,
            decimals: read_u8(r)?,
            website: r.read_optional_string("token website")?,
            logo: r.read_optional_string("token logo")?,
            max_supply: r.read_optional_u256()?,
            user_burnable: r.read_bool("user burnable")?,
        }),
        PayloadKind::TokenMint => TxPayload::TokenMint(TokenMint {
            token: read_address(r, "token")?,
            recipient: read_address(r, "mint recipient")?,
            amount: r.read_u256_scalar()?,
        }),
        PayloadKind::TokenUpdate => TxPayload::TokenUpdate(TokenUpdate {
            token: read_address(r, "token")?,
            name: r.read_optional_string("token name")?,
            symbol: r.read_optional_string("token symbol")?,
            website: r.read_optional_string("token website")?,
            logo: r.read_optional_string("token logo")?,
        }),
        PayloadKind::Vote => TxPayload::Vote(Vote {
            vote_type: VoteType::from_code(r.read_u64_scalar()?)?,
        }),
    };
    Ok(payload)
}

pub(crate) fn read_address(r: &mut RlpReader<'_>, field: &'static str) -> Result<Address, DecodeError> {
    Ok(Address::wrap(r.read_exact::<20>(field)?))
}

/// Empty means absent; anything else must be a full 20-byte address.
pub(crate) fn read_optional_address(
    r: &mut RlpReader<'_>,
    field: &'static str,
) -> Result<Option<Address>, DecodeError> {
    match r.read_optional_bytes()? {
        None => Ok(None),
        Some(bytes) => {
            let array: [u8; 20] = bytes.try_into().map_err(|_| DecodeError::InvalidLength {
                field,
                expected: 20,
                actual: bytes.len(),
            })?;
            Ok(Some(Address::wrap(array)))
        }
    }
}

fn read_u8(r: &mut RlpReader<'_>) -> Result<u8, DecodeError> {
    let offset = r.position();
    let value = r.read_u64_scalar()?;
    u8::try_from(value).map_err(|_| DecodeError::ScalarOverflow { offset, target: "u8" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitive_types::U256;

    fn addr(byte: u8) -> Address {
        Address::wrap([byte; 20])
    }

    fn round_trip(payload: TxPayload) {
        let bytes = encode_payload(&payload, TxVersion::V1);
        let decoded = decode_payload(&bytes, TxVersion::V1).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn test_every_kind_round_trips() {
        let payloads = vec![
            TxPayload::AddressAliasAdd(AddressAliasAdd {
                address: addr(1),
                alias: "treasury".to_string(),
            }),
            TxPayload::AddressAliasRemove(AddressAliasRemove {
                alias: "treasury".to_string(),
            }),
            TxPayload::AuthorityAdd(AuthorityAdd { address: addr(2) }),
            TxPayload::AuthorityRemove(AuthorityRemove { address: addr(3) }),
            TxPayload::NetworkParamsSet(NetworkParamsSet {
                block_reward: Some(U256::from(5_000_000_000u64)),
                block_reward_pool_address: Some(addr(4)),
                target_mining_time_ms: Some(15_000),
                asert_half_life_blocks: None,
                min_difficulty: Some(U256::from(1u64) << 200usize),
                min_tx_base_fee: None,
                min_tx_byte_fee: Some(U256::from(10u64)),
            }),
            TxPayload::TokenBurn(TokenBurn {
                token: addr(5),
                holder: addr(6),
                amount: U256::from(77u64),
            }),
            TxPayload::TokenCreate(TokenCreate {
                name: "Gold".to_string(),
                symbol: "nugget".to_string(),
                decimals: 18,
                website: Some("https://example.org".to_string()),
                logo: None,
                max_supply: Some(U256::MAX),
                user_burnable: true,
            }),
            TxPayload::TokenMint(TokenMint {
                token: addr(7),
                recipient: addr(8),
                amount: U256::from(1u64),
            }),
            TxPayload::TokenUpdate(TokenUpdate {
                token: addr(9),
                name: None,
                symbol: Some("grain".to_string()),
                website: None,
                logo: Some("ipfs://logo".to_string()),
            }),
            TxPayload::Vote(Vote {
                vote_type: VoteType::Disapproval,
            }),
        ];
        assert_eq!(payloads.len(), PayloadKind::ALL.len());
        for payload in payloads {
            round_trip(payload);
        }
    }

    #[test]
    fn test_kind_code_leads_the_list() {
        let bytes = encode_payload(
            &TxPayload::Vote(Vote {
                vote_type: VoteType::Approval,
            }),
            TxVersion::V1,
        );
        // [9, 0] -> c2 09 80
        assert_eq!(bytes, vec![0xc2, 0x09, 0x80]);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let bytes = RlpWriter::encode(|w| {
            w.write_list(|w| {
                w.write_u64_scalar(42);
                w.write_u64_scalar(0);
            })
        });
        assert_eq!(
            decode_payload(&bytes, TxVersion::V1),
            Err(DecodeError::UnknownCode {
                kind: "payload kind",
                code: 42
            })
        );
    }

    #[test]
    fn test_empty_list_has_no_kind() {
        let bytes = RlpWriter::encode(|w| w.write_list(|_| {}));
        assert_eq!(
            decode_payload(&bytes, TxVersion::V1),
            Err(DecodeError::MissingPayloadKind)
        );
    }

    #[test]
    fn test_extra_fields_are_rejected() {
        let bytes = RlpWriter::encode(|w| {
            w.write_list(|w| {
                w.write_u64_scalar(PayloadKind::AuthorityAdd.code());
                w.write_bytes(&[1u8; 20]);
                w.write_u64_scalar(1);
            })
        });
        assert!(matches!(
            decode_payload(&bytes, TxVersion::V1),
            Err(DecodeError::UnconsumedItems(_))
        ));
    }

    #[test]
    fn test_short_address_is_rejected() {
        let bytes = RlpWriter::encode(|w| {
            w.write_list(|w| {
                w.write_u64_scalar(PayloadKind::AuthorityRemove.code());
                w.write_bytes(&[1u8; 19]);
            })
        });
        assert!(matches!(
            decode_payload(&bytes, TxVersion::V1),
            Err(DecodeError::InvalidLength { expected: 20, actual: 19, .. })
        ));
    }

    #[test]
    fn test_decimals_must_fit_a_byte() {
        let bytes = RlpWriter::encode(|w| {
            w.write_list(|w| {
                w.write_u64_scalar(PayloadKind::TokenCreate.code());
                w.write_string("Gold");
                w.write_string("nugget");
                w.write_u64_scalar(300);
                w.write_empty();
                w.write_empty();
                w.write_empty();
                w.write_bool(false);
            })
        });
        assert!(matches!(
            decode_payload(&bytes, TxVersion::V1),
            Err(DecodeError::ScalarOverflow { target: "u8", .. })
        ));
    }

    #[test]
    fn test_user_burnable_flag_must_be_binary() {
        let bytes = RlpWriter::encode(|w| {
            w.write_list(|w| {
                w.write_u64_scalar(PayloadKind::TokenCreate.code());
                w.write_string("Gold");
                w.write_string("nugget");
                w.write_u64_scalar(9);
                w.write_empty();
                w.write_empty();
                w.write_empty();
                w.write_u64_scalar(2);
            })
        });
        assert!(matches!(
            decode_payload(&bytes, TxVersion::V1),
            Err(DecodeError::InvalidFlag { value: 2, .. })
        ));
    }

    #[test]
    fn test_payload_must_be_a_list() {
        let bytes = RlpWriter::encode(|w| w.write_bytes(b"not a list"));
        assert!(matches!(
            decode_payload(&bytes, TxVersion::V1),
            Err(DecodeError::ExpectedList(0))
        ));
    }
}
