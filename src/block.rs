//! Blocks: headers, bodies, the versioned block codec and Merkle roots

pub mod body;
pub mod codec;
pub mod header;
pub mod merkle;

pub use body::Block;
pub use codec::{
    decode_block, decode_block_header_only, decode_block_with, decode_header, decode_header_with,
    encode_block, encode_header, header_canonical_hash, header_signing_hash, BlockCodecStrategy,
    BlockV1Codec, DecodeMode,
};
pub use header::{BlockHeader, HeaderData};
pub use merkle::MerkleTree;
