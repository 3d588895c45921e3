//! Fungible-token custody trait.

use crate::StoreError;
use beneficence_types::AccountId;

/// Balance custody and transfer for fungible assets.
///
/// Holders are plain [`AccountId`]s: user wallets as well as derived
/// custody addresses such as the staking pool or a campaign vault.
pub trait TokenLedger {
    /// Balance of `holder` in `asset`. Unknown holders have a zero balance.
    fn balance(&self, asset: &AccountId, holder: &AccountId) -> Result<u64, StoreError>;

    /// Move `amount` of `asset` from one holder to another.
    ///
    /// Fails with [`StoreError::InsufficientFunds`] without moving anything
    /// when `from` holds less than `amount`.
    fn transfer(
        &self,
        asset: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: u64,
    ) -> Result<(), StoreError>;
}

impl<T: TokenLedger + ?Sized> TokenLedger for &T {
    fn balance(&self, asset: &AccountId, holder: &AccountId) -> Result<u64, StoreError> {
        (**self).balance(asset, holder)
    }

    fn transfer(
        &self,
        asset: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: u64,
    ) -> Result<(), StoreError> {
        (**self).transfer(asset, from, to, amount)
    }
}
