use beneficence_types::AccountId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("insufficient funds in {holder}: need {needed}, have {available}")]
    InsufficientFunds {
        holder: AccountId,
        needed: u64,
        available: u64,
    },

    #[error("balance overflow for {0}")]
    BalanceOverflow(AccountId),

    #[error("storage backend error: {0}")]
    Backend(String),
}
