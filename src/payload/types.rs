//! Payload variants carried by proposal and vote transactions.

use crate::types::{Address, PayloadKind, VoteType};
use primitive_types::U256;

/// Closed set of typed payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxPayload {
    AddressAliasAdd(AddressAliasAdd),
    AddressAliasRemove(AddressAliasRemove),
    AuthorityAdd(AuthorityAdd),
    AuthorityRemove(AuthorityRemove),
    NetworkParamsSet(NetworkParamsSet),
    TokenBurn(TokenBurn),
    TokenCreate(TokenCreate),
    TokenMint(TokenMint),
    TokenUpdate(TokenUpdate),
    Vote(Vote),
}

impl TxPayload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            TxPayload::AddressAliasAdd(_) => PayloadKind::AddressAliasAdd,
            TxPayload::AddressAliasRemove(_) => PayloadKind::AddressAliasRemove,
            TxPayload::AuthorityAdd(_) => PayloadKind::AuthorityAdd,
            TxPayload::AuthorityRemove(_) => PayloadKind::AuthorityRemove,
            TxPayload::NetworkParamsSet(_) => PayloadKind::NetworkParamsSet,
            TxPayload::TokenBurn(_) => PayloadKind::TokenBurn,
            TxPayload::TokenCreate(_) => PayloadKind::TokenCreate,
            TxPayload::TokenMint(_) => PayloadKind::TokenMint,
            TxPayload::TokenUpdate(_) => PayloadKind::TokenUpdate,
            TxPayload::Vote(_) => PayloadKind::Vote,
        }
    }

    pub fn is_vote(&self) -> bool {
        matches!(self, TxPayload::Vote(_))
    }

    /// Collapses optional fields holding zero or an empty string to `None`,
    /// the only form in which they survive a decode.
    pub fn normalized(self) -> Self {
        match self {
            TxPayload::NetworkParamsSet(params) => TxPayload::NetworkParamsSet(NetworkParamsSet {
                block_reward: nonzero_u256(params.block_reward),
                block_reward_pool_address: params.block_reward_pool_address,
                target_mining_time_ms: params.target_mining_time_ms.filter(|v| *v != 0),
                asert_half_life_blocks: params.asert_half_life_blocks.filter(|v| *v != 0),
                min_difficulty: nonzero_u256(params.min_difficulty),
                min_tx_base_fee: nonzero_u256(params.min_tx_base_fee),
                min_tx_byte_fee: nonzero_u256(params.min_tx_byte_fee),
            }),
            TxPayload::TokenCreate(create) => TxPayload::TokenCreate(TokenCreate {
                website: non_empty(create.website),
                logo: non_empty(create.logo),
                max_supply: nonzero_u256(create.max_supply),
                ..create
            }),
            TxPayload::TokenUpdate(update) => TxPayload::TokenUpdate(TokenUpdate {
                token: update.token,
                name: non_empty(update.name),
                symbol: non_empty(update.symbol),
                website: non_empty(update.website),
                logo: non_empty(update.logo),
            }),
            other => other,
        }
    }
}

pub(crate) fn nonzero_u256(value: Option<U256>) -> Option<U256> {
    value.filter(|v| !v.is_zero())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Binds a human-readable alias to an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressAliasAdd {
    pub address: Address,
    pub alias: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressAliasRemove {
    pub alias: String,
}

/// Adds a block-signing authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityAdd {
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityRemove {
    pub address: Address,
}

/// Proposed changes to network parameters. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkParamsSet {
    pub block_reward: Option<U256>,
    pub block_reward_pool_address: Option<Address>,
    pub target_mining_time_ms: Option<u64>,
    pub asert_half_life_blocks: Option<u64>,
    pub min_difficulty: Option<U256>,
    pub min_tx_base_fee: Option<U256>,
    pub min_tx_byte_fee: Option<U256>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBurn {
    pub token: Address,
    pub holder: Address,
    pub amount: U256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCreate {
    pub name: String,
    /// Name of the smallest unit, e.g. "wei".
    pub symbol: String,
    pub decimals: u8,
    pub website: Option<String>,
    pub logo: Option<String>,
    pub max_supply: Option<U256>,
    pub user_burnable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMint {
    pub token: Address,
    pub recipient: Address,
    pub amount: U256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenUpdate {
    pub token: Address,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub website: Option<String>,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vote {
    pub vote_type: VoteType,
}
