/// Draft validation, kept apart from the builder's setters
use crate::error::{ChainError, Result};
use crate::transaction::builder::TxBuilder;
use crate::types::TxType;

impl TxBuilder {
    /// Checks required fields and the per-type structural rules.
    ///
    /// Runs before anything is hashed or signed, so a failing draft never
    /// reaches the signer.
    pub fn validate(&self) -> Result<()> {
        let tx_type = self
            .tx_type
            .ok_or(ChainError::MissingField("transaction type"))?;
        if self.network.is_none() {
            return Err(ChainError::MissingField("network"));
        }
        if self.sender.is_none() {
            return Err(ChainError::MissingField("sender"));
        }
        if self.nonce.is_none() {
            return Err(ChainError::MissingField("nonce"));
        }

        match tx_type {
            TxType::Transfer => {
                if self.recipient.is_none() {
                    return Err(ChainError::Validation(
                        "Recipient is required for Transfer transactions".to_string(),
                    ));
                }
            }
            TxType::BipCreate => {
                self.require_payload(tx_type)?;
                self.forbid_amount(tx_type)?;
            }
            TxType::BipVote => {
                self.require_payload(tx_type)?;
                if self.reference_hash.is_none() {
                    return Err(ChainError::Validation(
                        "Reference hash is required for BipVote transactions".to_string(),
                    ));
                }
                self.forbid_amount(tx_type)?;
            }
        }
        Ok(())
    }

    fn require_payload(&self, tx_type: TxType) -> Result<()> {
        if self.payload.is_none() {
            return Err(ChainError::Validation(format!(
                "Payload is required for {:?} transactions",
                tx_type
            )));
        }
        Ok(())
    }

    /// Governance transactions must leave the amount unset; zero is not allowed either.
    fn forbid_amount(&self, tx_type: TxType) -> Result<()> {
        if self.amount.is_some() {
            return Err(ChainError::Validation(format!(
                "{:?} transactions must not carry an amount; token amounts belong in the payload",
                tx_type
            )));
        }
        Ok(())
    }
}
