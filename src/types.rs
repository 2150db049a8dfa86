//! Fixed-size value types and wire code enums shared by every entity.

pub mod address;
pub mod codes;
pub mod hash;
pub mod signature;

pub use address::{Address, ADDRESS_LEN};
pub use codes::{BlockVersion, Network, PayloadKind, TxType, TxVersion, VoteType};
pub use hash::{Hash, HASH_LEN};
pub use signature::{Signature, SIGNATURE_LEN};
