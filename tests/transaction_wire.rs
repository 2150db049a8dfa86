//! Integration tests for transaction encoding, hashing and signing

use ledgerwire::amounts;
use ledgerwire::crypto::{self, PrivateKey};
use ledgerwire::error::{ChainError, DecodeError};
use ledgerwire::payload::{decode_payload, TxPayload};
use ledgerwire::rlp::RlpWriter;
use ledgerwire::transaction::{decode_tx, Tx, TxBuilder};
use ledgerwire::types::{Address, Hash, Network, PayloadKind, TxType, TxVersion, VoteType};
use primitive_types::U256;

type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Deterministic key so encodings are stable across runs
fn alice() -> PrivateKey {
    PrivateKey::from_bytes(&[0xa1; 32]).expect("valid key")
}

fn bob() -> Address {
    Address::wrap([0xb0; 20])
}

/// Draft with every required field except the type-specific ones
fn draft(key: &PrivateKey, nonce: u64) -> TxBuilder {
    TxBuilder::new()
        .timestamp(1_700_000_000_000 + nonce)
        .network(Network::Mainnet)
        .sender(key.address())
        .nonce(nonce)
        .fee(amounts::tokens_decimal("0.005").expect("valid amount"))
}

fn signed_transfer() -> Result<Tx, ChainError> {
    let key = alice();
    draft(&key, 1)
        .tx_type(TxType::Transfer)
        .recipient(bob())
        .amount(amounts::tokens(25))
        .message("invoice 7")
        .sign(&key)
}

#[test]
fn test_signed_transfer_round_trip() -> TestResult {
    let tx = signed_transfer()?;
    let bytes = tx.encode();

    let decoded = decode_tx(&bytes)?;
    assert_eq!(decoded, tx);
    assert_eq!(decoded.encode(), bytes);
    assert_eq!(decoded.hash(), tx.hash());
    assert_eq!(decoded.size(), bytes.len());
    assert_eq!(decoded.token, Some(Address::NATIVE_TOKEN));
    Ok(())
}

#[test]
fn test_encoding_is_deterministic() -> TestResult {
    let a = signed_transfer()?;
    let b = signed_transfer()?;
    // RFC 6979 nonces make the signature itself deterministic
    assert_eq!(a.encode(), b.encode());
    assert_eq!(a.hash(), b.hash());
    Ok(())
}

#[test]
fn test_sender_is_recovered_from_signing_hash() -> TestResult {
    let key = alice();
    let tx = signed_transfer()?;
    let signature = tx.signature.expect("signed");

    assert_ne!(tx.hash(), tx.signing_hash());
    assert_eq!(tx.hash(), Hash::of(&tx.encode()));
    assert_eq!(tx.signing_hash(), Hash::of(&tx.encode_unsigned()));
    assert_eq!(tx.sender()?, key.address());
    assert_eq!(crypto::recover_address(&tx.signing_hash(), &signature)?, key.address());

    // recovering against the canonical hash yields some other identity
    match crypto::recover_address(&tx.hash(), &signature) {
        Ok(other) => assert_ne!(other, key.address()),
        Err(e) => assert!(e.is_crypto()),
    }
    Ok(())
}

#[test]
fn test_decoded_sender_matches_after_round_trip() -> TestResult {
    let tx = signed_transfer()?;
    let decoded = decode_tx(&tx.encode())?;
    assert_eq!(decoded.sender()?, alice().address());
    Ok(())
}

#[test]
fn test_every_payload_kind_survives_signing_and_decoding() -> TestResult {
    let key = alice();
    let token = Address::token_address(&key.address(), 1);
    let proposal = Hash::of(b"proposal");

    let drafts = vec![
        draft(&key, 1)
            .token_create()
            .name("Gold")
            .symbol("nugget")
            .decimals(9)
            .website("https://example.org")
            .max_supply(amounts::tokens(21_000_000))
            .user_burnable(true)
            .done()?,
        draft(&key, 2)
            .token_update()
            .token(token)
            .logo("https://example.org/logo.png")
            .done()?,
        draft(&key, 3)
            .token_mint()
            .token(token)
            .recipient(bob())
            .amount(U256::from(500u64))
            .done()?,
        draft(&key, 4).token_burn().token(token).holder(bob()).done()?,
        draft(&key, 5).add_authority().address(bob()).done()?,
        draft(&key, 6).remove_authority().address(bob()).done()?,
        draft(&key, 7)
            .add_address_alias()
            .address(bob())
            .alias("bob")
            .done()?,
        draft(&key, 8).remove_address_alias().alias("bob").done()?,
        draft(&key, 9)
            .set_network_params()
            .block_reward(amounts::tokens(5))
            .target_mining_time_ms(60_000)
            .min_tx_byte_fee(U256::from(10u64))
            .done()?,
        draft(&key, 10).vote().disapprove(proposal).done()?,
    ];

    let mut kinds = Vec::new();
    for builder in drafts {
        let tx = builder.sign(&key)?;
        let decoded = decode_tx(&tx.encode())?;
        assert_eq!(decoded, tx);
        assert_eq!(decoded.sender()?, key.address());

        let payload = decoded.payload.clone().expect("payload");
        kinds.push(payload.kind());
        if payload.is_vote() {
            assert_eq!(decoded.tx_type, TxType::BipVote);
            assert_eq!(decoded.reference_hash, Some(proposal));
        } else {
            assert_eq!(decoded.tx_type, TxType::BipCreate);
            assert!(decoded.amount.is_none());
        }
    }
    kinds.sort_by_key(|k| k.code());
    assert_eq!(kinds, PayloadKind::ALL.to_vec());
    Ok(())
}

#[test]
fn test_vote_payload_carries_vote_type() -> TestResult {
    let key = alice();
    let tx = draft(&key, 3)
        .vote()
        .approve(Hash::of(b"bip-12"))
        .done()?
        .sign(&key)?;
    match tx.payload.as_ref() {
        Some(TxPayload::Vote(vote)) => assert_eq!(vote.vote_type, VoteType::Approval),
        other => panic!("unexpected payload {:?}", other),
    }
    Ok(())
}

#[test]
fn test_builder_rejects_foreign_signer() -> TestResult {
    let key = alice();
    let stranger = PrivateKey::from_bytes(&[0x5e; 32])?;
    let err = draft(&key, 1)
        .tx_type(TxType::Transfer)
        .recipient(bob())
        .sign(&stranger)
        .unwrap_err();
    assert!(matches!(err, ChainError::Signing(_)));
    Ok(())
}

#[test]
fn test_builder_rejects_amount_on_governance() -> TestResult {
    let key = alice();
    let err = draft(&key, 1)
        .add_authority()
        .address(bob())
        .done()?
        .amount(U256::zero())
        .sign(&key)
        .unwrap_err();
    assert!(matches!(err, ChainError::Validation(_)));
    Ok(())
}

#[test]
fn test_builder_reports_missing_payload_field() {
    let key = alice();
    let err = draft(&key, 1).token_mint().token(bob()).done().unwrap_err();
    assert_eq!(err, ChainError::MissingField("mint recipient"));
}

#[test]
fn test_unknown_payload_kind_is_malformed() {
    let bytes = RlpWriter::encode(|w| {
        w.write_list(|w| {
            w.write_u64_scalar(10);
        })
    });
    assert_eq!(
        decode_payload(&bytes, TxVersion::V1),
        Err(DecodeError::UnknownCode {
            kind: "payload kind",
            code: 10
        })
    );
}

#[test]
fn test_unknown_transaction_type_is_malformed() -> TestResult {
    let tx = signed_transfer()?;
    let mut bytes = tx.encode();
    // two-byte list prefix, one-byte version, 7-byte timestamp item
    let type_offset = 2 + 1 + 7;
    // Transfer is code zero, written as the empty string
    assert_eq!(bytes[type_offset], ledgerwire::rlp::EMPTY_STRING);
    bytes[type_offset] = 0x03;

    let err = decode_tx(&bytes).unwrap_err();
    assert_eq!(
        err,
        ChainError::Malformed(DecodeError::UnknownCode {
            kind: "transaction type",
            code: 3
        })
    );
    Ok(())
}

#[test]
fn test_estimate_stays_close_to_exact_size() -> TestResult {
    let key = alice();
    let builder = draft(&key, 4).tx_type(TxType::Transfer).recipient(bob());
    let estimate = builder.estimate_size()?;
    let exact = builder.sign(&key)?.size();
    assert!(estimate <= exact && exact - estimate <= 3);
    Ok(())
}

#[test]
fn test_zero_nonce_and_empty_optionals_round_trip() -> TestResult {
    let key = alice();
    let tx = draft(&key, 0)
        .tx_type(TxType::Transfer)
        .recipient(bob())
        .amount(U256::zero())
        .message("")
        .sign(&key)?;
    assert_eq!(tx.nonce, None);

    let decoded = decode_tx(&tx.encode())?;
    assert_eq!(decoded, tx);
    assert_eq!(decoded.hash(), tx.hash());
    assert_eq!(decoded.sender()?, key.address());
    Ok(())
}

#[test]
fn test_empty_token_update_fields_round_trip() -> TestResult {
    let key = alice();
    let tx = draft(&key, 2)
        .token_update()
        .token(Address::token_address(&key.address(), 1))
        .name("")
        .logo("https://example.org/logo.png")
        .done()?
        .sign(&key)?;
    match tx.payload.as_ref() {
        Some(TxPayload::TokenUpdate(update)) => assert_eq!(update.name, None),
        other => panic!("unexpected payload {:?}", other),
    }
    assert_eq!(decode_tx(&tx.encode())?, tx);
    Ok(())
}
