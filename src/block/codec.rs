//! Versioned header and block encoding.
//!
//! A block is `[headerItem, [txItem...]]`. There is no separate block
//! version: the header's version code selects both the header layout and
//! the body strategy.

use super::body::Block;
use super::header::{BlockHeader, HeaderData};
use crate::config::CodecConfig;
use crate::error::{ChainError, Result};
use crate::payload::codec::read_address;
use crate::rlp::{self, RlpReader, RlpWriter};
use crate::transaction::codec::{read_tx, write_tx};
use crate::transaction::Tx;
use crate::types::{BlockVersion, Hash, Signature};
use tracing::debug;

/// What to materialize when decoding a block body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    #[default]
    Full,
    /// Steps over every transaction item without decoding it and leaves the
    /// block's transaction list unset.
    HeadersOnly,
}

/// Header field layout and body strategy for one block version.
pub trait BlockCodecStrategy: Sync {
    fn encode_header_fields(&self, w: &mut RlpWriter, header: &HeaderData, include_signature: bool);

    fn decode_header_fields(&self, r: &mut RlpReader<'_>) -> Result<HeaderData>;

    /// Reads the transaction list at the reader's cursor.
    fn decode_body(&self, r: &mut RlpReader<'_>, mode: DecodeMode) -> Result<Option<Vec<Tx>>>;
}

/// `[1, height, timestamp, previousHash, txRoot, stateRoot, difficulty,
/// coinbase, nonce, (signature)]`
pub struct BlockV1Codec;

impl BlockCodecStrategy for BlockV1Codec {
    fn encode_header_fields(&self, w: &mut RlpWriter, header: &HeaderData, include_signature: bool) {
        w.write_u64_scalar(header.height);
        w.write_u64_scalar(header.timestamp);
        w.write_bytes(header.previous_hash.as_bytes());
        w.write_bytes(header.tx_root.as_bytes());
        w.write_bytes(header.state_root.as_bytes());
        w.write_u256_scalar(&header.difficulty);
        w.write_bytes(header.coinbase.as_bytes());
        w.write_fixed_u64(header.nonce);
        if include_signature {
            if let Some(signature) = &header.signature {
                w.write_bytes(signature.as_bytes());
            }
        }
    }

    fn decode_header_fields(&self, r: &mut RlpReader<'_>) -> Result<HeaderData> {
        let height = r.read_u64_scalar()?;
        let timestamp = r.read_u64_scalar()?;
        let previous_hash = Hash::wrap(r.read_bytes32("previous hash")?);
        let tx_root = Hash::wrap(r.read_bytes32("tx root")?);
        let state_root = Hash::wrap(r.read_bytes32("state root")?);
        let difficulty = r.read_u256_scalar()?;
        let coinbase = read_address(r, "coinbase")?;
        let nonce = r.read_fixed_u64("block nonce")?;
        let signature = if r.is_end_of_list() {
            None
        } else {
            Some(Signature::wrap(r.read_bytes()?)?)
        };

        Ok(HeaderData {
            version: BlockVersion::V1,
            height,
            timestamp,
            previous_hash,
            tx_root,
            state_root,
            difficulty,
            coinbase,
            nonce,
            signature,
        })
    }

    fn decode_body(&self, r: &mut RlpReader<'_>, mode: DecodeMode) -> Result<Option<Vec<Tx>>> {
        let count = r.enter_list()?;
        let txs = match mode {
            DecodeMode::Full => {
                let mut txs = Vec::with_capacity(count);
                while !r.is_end_of_list() {
                    txs.push(Tx::new(read_tx(r)?));
                }
                Some(txs)
            }
            DecodeMode::HeadersOnly => {
                while !r.is_end_of_list() {
                    r.skip_next()?;
                }
                None
            }
        };
        r.leave_list()?;
        Ok(txs)
    }
}

/// Strategy registered for `version`.
pub fn strategy(version: BlockVersion) -> &'static dyn BlockCodecStrategy {
    match version {
        BlockVersion::V1 => &BlockV1Codec,
    }
}

fn write_header(w: &mut RlpWriter, header: &HeaderData, include_signature: bool) {
    w.write_list(|w| {
        w.write_u64_scalar(header.version.code());
        strategy(header.version).encode_header_fields(w, header, include_signature);
    });
}

fn read_header(r: &mut RlpReader<'_>) -> Result<HeaderData> {
    r.enter_list()?;
    let version = BlockVersion::from_code(r.read_u64_scalar()?)?;
    let data = strategy(version).decode_header_fields(r)?;
    r.leave_list()?;
    Ok(data)
}

pub fn encode_header(header: &HeaderData, include_signature: bool) -> Vec<u8> {
    RlpWriter::encode(|w| write_header(w, header, include_signature))
}

pub fn decode_header(bytes: &[u8]) -> Result<BlockHeader> {
    decode_header_with(bytes, &CodecConfig::default())
}

pub fn decode_header_with(bytes: &[u8], config: &CodecConfig) -> Result<BlockHeader> {
    let result = rlp::validate_with_depth(bytes, config.codec.max_nesting_depth)
        .map_err(ChainError::from)
        .and_then(|_| read_header(&mut RlpReader::new(bytes)));
    match result {
        Ok(data) => Ok(BlockHeader::new(data)),
        Err(e) => {
            debug!("Rejected block header ({} bytes): {}", bytes.len(), e);
            Err(e)
        }
    }
}

pub fn header_signing_hash(header: &HeaderData) -> Hash {
    Hash::of(&encode_header(header, false))
}

pub fn header_canonical_hash(header: &HeaderData) -> Hash {
    Hash::of(&encode_header(header, true))
}

/// Encodes a block. A headers-only block is written with an empty
/// transaction list.
pub fn encode_block(block: &Block) -> Vec<u8> {
    let header = block.header();
    RlpWriter::encode(|w| {
        w.write_list(|w| {
            write_header(w, header.data(), true);
            w.write_list(|w| {
                for tx in block.txs().unwrap_or(&[]) {
                    write_tx(w, tx.data(), true);
                }
            });
        });
    })
}

pub fn decode_block(bytes: &[u8]) -> Result<Block> {
    decode_block_with(bytes, DecodeMode::Full, &CodecConfig::default())
}

/// Decodes only the header, skipping transaction bytes without parsing them.
pub fn decode_block_header_only(bytes: &[u8]) -> Result<Block> {
    decode_block_with(bytes, DecodeMode::HeadersOnly, &CodecConfig::default())
}

pub fn decode_block_with(bytes: &[u8], mode: DecodeMode, config: &CodecConfig) -> Result<Block> {
    let result = rlp::validate_with_depth(bytes, config.codec.max_nesting_depth)
        .map_err(ChainError::from)
        .and_then(|_| read_block(&mut RlpReader::new(bytes), mode));
    result.map_err(|e| {
        debug!(
            "Rejected block ({} bytes, {:?}): {}",
            bytes.len(),
            mode,
            e
        );
        e
    })
}

fn read_block(r: &mut RlpReader<'_>, mode: DecodeMode) -> Result<Block> {
    r.enter_list()?;
    let header_bytes = r.read_raw()?;
    let header = read_header(&mut RlpReader::new(header_bytes))?;
    let txs = strategy(header.version).decode_body(r, mode)?;
    r.leave_list()?;
    Ok(Block::new(BlockHeader::new(header), txs))
}
