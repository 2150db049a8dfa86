//! Fluent transaction builder and its payload sub-builders.
//!
//! ```
//! use ledgerwire::crypto::PrivateKey;
//! use ledgerwire::transaction::TxBuilder;
//! use ledgerwire::types::{Address, Network, TxType};
//! use primitive_types::U256;
//!
//! let key = PrivateKey::from_bytes(&[7u8; 32]).unwrap();
//! let tx = TxBuilder::new()
//!     .tx_type(TxType::Transfer)
//!     .network(Network::Testnet)
//!     .sender(key.address())
//!     .nonce(1)
//!     .recipient(Address::wrap([0x22; 20]))
//!     .amount(U256::from(1_000u64))
//!     .sign(&key)
//!     .unwrap();
//! assert_eq!(tx.sender().unwrap(), key.address());
//! ```

use super::types::{Tx, TxData};
use crate::crypto::TxSigner;
use crate::error::{ChainError, Result};
use crate::payload::{
    AddressAliasAdd, AddressAliasRemove, AuthorityAdd, AuthorityRemove, NetworkParamsSet,
    TokenBurn, TokenCreate, TokenMint, TokenUpdate, TxPayload, Vote,
};
use crate::types::{Address, Hash, Network, TxType, TxVersion, VoteType};
use primitive_types::U256;
use tracing::{debug, warn};

/// Highest number of decimals a token may declare.
pub const MAX_TOKEN_DECIMALS: u8 = 18;

/// Accumulates a draft transaction.
///
/// Defaults: version V1, timestamp now, no amount, zero fee.
#[derive(Debug, Clone)]
pub struct TxBuilder {
    pub(crate) version: TxVersion,
    pub(crate) timestamp: u64,
    pub(crate) tx_type: Option<TxType>,
    pub(crate) network: Option<Network>,
    pub(crate) sender: Option<Address>,
    pub(crate) nonce: Option<u64>,
    pub(crate) recipient: Option<Address>,
    pub(crate) token: Option<Address>,
    pub(crate) amount: Option<U256>,
    pub(crate) fee: U256,
    pub(crate) message: Option<Vec<u8>>,
    pub(crate) payload: Option<TxPayload>,
    pub(crate) reference_hash: Option<Hash>,
}

impl Default for TxBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TxBuilder {
    pub fn new() -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        TxBuilder {
            version: TxVersion::V1,
            timestamp: u64::try_from(now).unwrap_or_default(),
            tx_type: None,
            network: None,
            sender: None,
            nonce: None,
            recipient: None,
            token: None,
            amount: None,
            fee: U256::zero(),
            message: None,
            payload: None,
            reference_hash: None,
        }
    }

    pub fn version(mut self, version: TxVersion) -> Self {
        self.version = version;
        self
    }

    /// Milliseconds since the Unix epoch.
    pub fn timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Choosing `Transfer` without a token selects the native token.
    pub fn tx_type(mut self, tx_type: TxType) -> Self {
        self.tx_type = Some(tx_type);
        if tx_type == TxType::Transfer && self.token.is_none() {
            self.token = Some(Address::NATIVE_TOKEN);
        }
        self
    }

    pub fn network(mut self, network: Network) -> Self {
        self.network = Some(network);
        self
    }

    pub fn sender(mut self, sender: Address) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn recipient(mut self, recipient: Address) -> Self {
        self.recipient = Some(recipient);
        self
    }

    pub fn token(mut self, token: Address) -> Self {
        self.token = Some(token);
        self
    }

    pub fn amount(mut self, amount: U256) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn fee(mut self, fee: U256) -> Self {
        self.fee = fee;
        self
    }

    pub fn message(mut self, message: impl Into<Vec<u8>>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn payload(mut self, payload: TxPayload) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn reference_hash(mut self, reference_hash: Hash) -> Self {
        self.reference_hash = Some(reference_hash);
        self
    }

    // ------------------------------------------------------------------
    // Payload sub-builders
    // ------------------------------------------------------------------

    pub fn token_create(self) -> TokenCreateBuilder {
        TokenCreateBuilder::new(self)
    }

    pub fn token_update(self) -> TokenUpdateBuilder {
        TokenUpdateBuilder::new(self)
    }

    pub fn token_mint(self) -> TokenMintBuilder {
        TokenMintBuilder::new(self)
    }

    pub fn token_burn(self) -> TokenBurnBuilder {
        TokenBurnBuilder::new(self)
    }

    pub fn add_authority(self) -> AuthorityBuilder {
        AuthorityBuilder::new(self, true)
    }

    pub fn remove_authority(self) -> AuthorityBuilder {
        AuthorityBuilder::new(self, false)
    }

    pub fn add_address_alias(self) -> AddressAliasAddBuilder {
        AddressAliasAddBuilder::new(self)
    }

    pub fn remove_address_alias(self) -> AddressAliasRemoveBuilder {
        AddressAliasRemoveBuilder::new(self)
    }

    pub fn set_network_params(self) -> NetworkParamsBuilder {
        NetworkParamsBuilder::new(self)
    }

    pub fn vote(self) -> VoteBuilder {
        VoteBuilder::new(self)
    }

    /// Attaches a governance payload and marks the draft as a proposal.
    fn propose(self, payload: TxPayload) -> TxBuilder {
        self.tx_type(TxType::BipCreate).payload(payload)
    }

    // ------------------------------------------------------------------
    // Finalization
    // ------------------------------------------------------------------

    /// Validates the draft and returns it as an unsigned transaction.
    pub fn build_unsigned(&self) -> Result<Tx> {
        self.validate()?;
        Ok(Tx::new(TxData {
            version: self.version,
            timestamp: self.timestamp,
            tx_type: self.tx_type.ok_or(ChainError::MissingField("transaction type"))?,
            network: self.network.ok_or(ChainError::MissingField("network"))?,
            nonce: self.nonce,
            recipient: self.recipient,
            token: self.token,
            amount: self.amount,
            fee: self.fee,
            message: self.message.clone(),
            payload: self.payload.clone(),
            reference_hash: self.reference_hash,
            signature: None,
        }))
    }

    /// Hash the sender will be asked to sign.
    pub fn signing_hash(&self) -> Result<Hash> {
        Ok(self.build_unsigned()?.signing_hash())
    }

    /// Rough signed size; see [`Tx::estimated_size`].
    pub fn estimate_size(&self) -> Result<usize> {
        Ok(self.build_unsigned()?.estimated_size())
    }

    /// Validates, signs the signing hash and checks that the signature
    /// recovers to the declared sender.
    pub fn sign<S: TxSigner + ?Sized>(&self, signer: &S) -> Result<Tx> {
        let unsigned = self.build_unsigned()?;
        let sender = self.sender.ok_or(ChainError::MissingField("sender"))?;

        let signer_address = signer.address();
        if signer_address != sender {
            warn!(
                "Signer {} does not match declared sender {}",
                signer_address, sender
            );
            return Err(ChainError::Signing(format!(
                "Signer address ({}) does not match sender address ({})",
                signer_address, sender
            )));
        }

        let signature = signer.sign_hash(&unsigned.signing_hash())?;
        let signed = unsigned.with_signature(signature);

        match signed.sender() {
            Ok(recovered) if recovered == sender => {
                debug!(
                    "Signed transaction {} from {} (nonce {:?})",
                    signed.hash().short(),
                    sender,
                    signed.nonce
                );
                Ok(signed)
            }
            Ok(recovered) => {
                warn!(
                    "Signature recovers to {} instead of sender {}",
                    recovered, sender
                );
                Err(ChainError::Signing(format!(
                    "Recovered sender ({}) does not match sender address ({})",
                    recovered, sender
                )))
            }
            Err(e) => {
                warn!("Signature for sender {} does not recover: {}", sender, e);
                Err(ChainError::Signing(format!(
                    "Signature does not recover to a sender: {}",
                    e
                )))
            }
        }
    }
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T> {
    value.ok_or(ChainError::MissingField(field))
}

// ============================================================================
// Token payloads
// ============================================================================

#[derive(Debug, Clone)]
pub struct TokenCreateBuilder {
    parent: TxBuilder,
    name: Option<String>,
    symbol: Option<String>,
    decimals: u8,
    website: Option<String>,
    logo: Option<String>,
    max_supply: Option<U256>,
    user_burnable: bool,
}

impl TokenCreateBuilder {
    fn new(parent: TxBuilder) -> Self {
        TokenCreateBuilder {
            parent,
            name: None,
            symbol: None,
            decimals: MAX_TOKEN_DECIMALS,
            website: None,
            logo: None,
            max_supply: None,
            user_burnable: false,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name of the smallest unit.
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    pub fn logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = Some(logo.into());
        self
    }

    pub fn max_supply(mut self, max_supply: U256) -> Self {
        self.max_supply = Some(max_supply);
        self
    }

    pub fn user_burnable(mut self, user_burnable: bool) -> Self {
        self.user_burnable = user_burnable;
        self
    }

    pub fn done(self) -> Result<TxBuilder> {
        if self.decimals > MAX_TOKEN_DECIMALS {
            return Err(ChainError::Validation(format!(
                "Token decimals must be at most {}, got {}",
                MAX_TOKEN_DECIMALS, self.decimals
            )));
        }
        let payload = TxPayload::TokenCreate(TokenCreate {
            name: required(self.name, "token name")?,
            symbol: required(self.symbol, "token symbol")?,
            decimals: self.decimals,
            website: self.website,
            logo: self.logo,
            max_supply: self.max_supply,
            user_burnable: self.user_burnable,
        });
        Ok(self.parent.propose(payload))
    }
}

#[derive(Debug, Clone)]
pub struct TokenUpdateBuilder {
    parent: TxBuilder,
    token: Option<Address>,
    name: Option<String>,
    symbol: Option<String>,
    website: Option<String>,
    logo: Option<String>,
}

impl TokenUpdateBuilder {
    fn new(parent: TxBuilder) -> Self {
        TokenUpdateBuilder {
            parent,
            token: None,
            name: None,
            symbol: None,
            website: None,
            logo: None,
        }
    }

    pub fn token(mut self, token: Address) -> Self {
        self.token = Some(token);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    pub fn logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = Some(logo.into());
        self
    }

    pub fn done(self) -> Result<TxBuilder> {
        let payload = TxPayload::TokenUpdate(TokenUpdate {
            token: required(self.token, "token")?,
            name: self.name,
            symbol: self.symbol,
            website: self.website,
            logo: self.logo,
        });
        Ok(self.parent.propose(payload))
    }
}

#[derive(Debug, Clone)]
pub struct TokenMintBuilder {
    parent: TxBuilder,
    token: Option<Address>,
    recipient: Option<Address>,
    amount: Option<U256>,
}

impl TokenMintBuilder {
    fn new(parent: TxBuilder) -> Self {
        TokenMintBuilder {
            parent,
            token: None,
            recipient: None,
            amount: None,
        }
    }

    pub fn token(mut self, token: Address) -> Self {
        self.token = Some(token);
        self
    }

    pub fn recipient(mut self, recipient: Address) -> Self {
        self.recipient = Some(recipient);
        self
    }

    pub fn amount(mut self, amount: U256) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn done(self) -> Result<TxBuilder> {
        let payload = TxPayload::TokenMint(TokenMint {
            token: required(self.token, "token")?,
            recipient: required(self.recipient, "mint recipient")?,
            amount: required(self.amount, "mint amount")?,
        });
        Ok(self.parent.propose(payload))
    }
}

/// Burn amount defaults to zero.
#[derive(Debug, Clone)]
pub struct TokenBurnBuilder {
    parent: TxBuilder,
    token: Option<Address>,
    holder: Option<Address>,
    amount: U256,
}

impl TokenBurnBuilder {
    fn new(parent: TxBuilder) -> Self {
        TokenBurnBuilder {
            parent,
            token: None,
            holder: None,
            amount: U256::zero(),
        }
    }

    pub fn token(mut self, token: Address) -> Self {
        self.token = Some(token);
        self
    }

    /// Address whose balance is burned.
    pub fn holder(mut self, holder: Address) -> Self {
        self.holder = Some(holder);
        self
    }

    pub fn amount(mut self, amount: U256) -> Self {
        self.amount = amount;
        self
    }

    pub fn done(self) -> Result<TxBuilder> {
        let payload = TxPayload::TokenBurn(TokenBurn {
            token: required(self.token, "token")?,
            holder: required(self.holder, "burn holder")?,
            amount: self.amount,
        });
        Ok(self.parent.propose(payload))
    }
}

// ============================================================================
// Authority and alias payloads
// ============================================================================

#[derive(Debug, Clone)]
pub struct AuthorityBuilder {
    parent: TxBuilder,
    add: bool,
    address: Option<Address>,
}

impl AuthorityBuilder {
    fn new(parent: TxBuilder, add: bool) -> Self {
        AuthorityBuilder {
            parent,
            add,
            address: None,
        }
    }

    pub fn address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    pub fn done(self) -> Result<TxBuilder> {
        let address = required(self.address, "authority address")?;
        let payload = if self.add {
            TxPayload::AuthorityAdd(AuthorityAdd { address })
        } else {
            TxPayload::AuthorityRemove(AuthorityRemove { address })
        };
        Ok(self.parent.propose(payload))
    }
}

#[derive(Debug, Clone)]
pub struct AddressAliasAddBuilder {
    parent: TxBuilder,
    address: Option<Address>,
    alias: Option<String>,
}

impl AddressAliasAddBuilder {
    fn new(parent: TxBuilder) -> Self {
        AddressAliasAddBuilder {
            parent,
            address: None,
            alias: None,
        }
    }

    pub fn address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn done(self) -> Result<TxBuilder> {
        let payload = TxPayload::AddressAliasAdd(AddressAliasAdd {
            address: required(self.address, "alias address")?,
            alias: required(self.alias, "alias")?,
        });
        Ok(self.parent.propose(payload))
    }
}

#[derive(Debug, Clone)]
pub struct AddressAliasRemoveBuilder {
    parent: TxBuilder,
    alias: Option<String>,
}

impl AddressAliasRemoveBuilder {
    fn new(parent: TxBuilder) -> Self {
        AddressAliasRemoveBuilder {
            parent,
            alias: None,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn done(self) -> Result<TxBuilder> {
        let payload = TxPayload::AddressAliasRemove(AddressAliasRemove {
            alias: required(self.alias, "alias")?,
        });
        Ok(self.parent.propose(payload))
    }
}

// ============================================================================
// Network parameters and votes
// ============================================================================

/// Every parameter is optional; unset ones are left unchanged by the proposal.
#[derive(Debug, Clone)]
pub struct NetworkParamsBuilder {
    parent: TxBuilder,
    params: NetworkParamsSet,
}

impl NetworkParamsBuilder {
    fn new(parent: TxBuilder) -> Self {
        NetworkParamsBuilder {
            parent,
            params: NetworkParamsSet::default(),
        }
    }

    pub fn block_reward(mut self, reward: U256) -> Self {
        self.params.block_reward = Some(reward);
        self
    }

    pub fn block_reward_pool_address(mut self, address: Address) -> Self {
        self.params.block_reward_pool_address = Some(address);
        self
    }

    pub fn target_mining_time_ms(mut self, millis: u64) -> Self {
        self.params.target_mining_time_ms = Some(millis);
        self
    }

    pub fn asert_half_life_blocks(mut self, blocks: u64) -> Self {
        self.params.asert_half_life_blocks = Some(blocks);
        self
    }

    pub fn min_difficulty(mut self, difficulty: U256) -> Self {
        self.params.min_difficulty = Some(difficulty);
        self
    }

    pub fn min_tx_base_fee(mut self, fee: U256) -> Self {
        self.params.min_tx_base_fee = Some(fee);
        self
    }

    pub fn min_tx_byte_fee(mut self, fee: U256) -> Self {
        self.params.min_tx_byte_fee = Some(fee);
        self
    }

    pub fn done(self) -> Result<TxBuilder> {
        Ok(self
            .parent
            .propose(TxPayload::NetworkParamsSet(self.params)))
    }
}

/// Vote on a proposal, identified by the proposal transaction's hash.
#[derive(Debug, Clone)]
pub struct VoteBuilder {
    parent: TxBuilder,
    vote: Option<(VoteType, Hash)>,
}

impl VoteBuilder {
    fn new(parent: TxBuilder) -> Self {
        VoteBuilder { parent, vote: None }
    }

    pub fn approve(mut self, proposal: Hash) -> Self {
        self.vote = Some((VoteType::Approval, proposal));
        self
    }

    pub fn disapprove(mut self, proposal: Hash) -> Self {
        self.vote = Some((VoteType::Disapproval, proposal));
        self
    }

    pub fn done(self) -> Result<TxBuilder> {
        let (vote_type, proposal) = required(self.vote, "vote")?;
        Ok(self
            .parent
            .tx_type(TxType::BipVote)
            .payload(TxPayload::Vote(Vote { vote_type }))
            .reference_hash(proposal))
    }
}
