//! Transactions: value type, versioned codec, builder and draft validation

pub mod builder;
pub mod codec;
pub mod types;
pub mod validation;

pub use builder::{
    AddressAliasAddBuilder, AddressAliasRemoveBuilder, AuthorityBuilder, NetworkParamsBuilder,
    TokenBurnBuilder, TokenCreateBuilder, TokenMintBuilder, TokenUpdateBuilder, TxBuilder,
    VoteBuilder, MAX_TOKEN_DECIMALS,
};
pub use codec::{
    canonical_hash, decode_tx, decode_tx_with, encode_tx, signing_hash, TxCodecStrategy, TxV1Codec,
};
pub use types::{Tx, TxData};
