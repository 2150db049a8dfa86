//! Typed payloads embedded in governance transactions.
//!
//! A payload travels inside the transaction's optional payload field as its
//! own nested list. Its layout is chosen by the payload kind together with
//! the enclosing transaction's version, so the payload catalogue can change
//! without touching the outer transaction layout.

pub mod codec;
pub mod types;

pub use codec::{decode_payload, encode_payload};
pub use types::{
    AddressAliasAdd, AddressAliasRemove, AuthorityAdd, AuthorityRemove, NetworkParamsSet,
    TokenBurn, TokenCreate, TokenMint, TokenUpdate, TxPayload, Vote,
};
