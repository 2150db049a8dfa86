//! Stable integer codes carried on the wire.
//!
//! Each enum maps to exactly one code; decoding an unlisted code is a
//! malformed-input error that names the enum.

use crate::error::DecodeError;

macro_rules! wire_codes {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident = $code:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn code(self) -> u64 {
                match self {
                    $($name::$variant => $code,)+
                }
            }

            pub fn from_code(code: u64) -> Result<Self, DecodeError> {
                match code {
                    $($code => Ok($name::$variant),)+
                    _ => Err(DecodeError::UnknownCode { kind: $kind, code }),
                }
            }
        }
    };
}

wire_codes! {
    /// Layout version of a transaction.
    TxVersion, "transaction version" {
        V1 = 1,
    }
}

wire_codes! {
    /// Layout version of a block header; also selects the block body layout.
    BlockVersion, "block version" {
        V1 = 1,
    }
}

wire_codes! {
    TxType, "transaction type" {
        Transfer = 0,
        /// Governance proposal carrying a payload.
        BipCreate = 1,
        /// Vote on an earlier proposal, referenced by hash.
        BipVote = 2,
    }
}

wire_codes! {
    Network, "network" {
        Mainnet = 0,
        Testnet = 1,
    }
}

wire_codes! {
    /// Tag of a typed payload, independent of the transaction type.
    PayloadKind, "payload kind" {
        AddressAliasAdd = 0,
        AddressAliasRemove = 1,
        AuthorityAdd = 2,
        AuthorityRemove = 3,
        NetworkParamsSet = 4,
        TokenBurn = 5,
        TokenCreate = 6,
        TokenMint = 7,
        TokenUpdate = 8,
        Vote = 9,
    }
}

wire_codes! {
    VoteType, "vote type" {
        Approval = 0,
        Disapproval = 1,
    }
}

impl TxType {
    /// Proposal and vote transactions carry a payload and never an amount.
    pub fn is_governance(self) -> bool {
        matches!(self, TxType::BipCreate | TxType::BipVote)
    }
}

impl Default for TxVersion {
    fn default() -> Self {
        TxVersion::V1
    }
}

impl Default for BlockVersion {
    fn default() -> Self {
        BlockVersion::V1
    }
}
