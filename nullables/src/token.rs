//! Nullable token ledger: in-memory balances for testing.

use beneficence_store::{StoreError, TokenLedger};
use beneficence_types::AccountId;
use std::collections::HashMap;
use std::sync::Mutex;

/// An in-memory multi-asset token ledger.
///
/// Balances are keyed by `(asset, holder)`. [`NullTokenLedger::mint`] stands
/// in for the asset administration that lives outside the platform.
pub struct NullTokenLedger {
    balances: Mutex<HashMap<(AccountId, AccountId), u64>>,
}

impl NullTokenLedger {
    pub fn new() -> Self {
        Self {
            balances: Mutex::new(HashMap::new()),
        }
    }

    /// Credit `amount` of `asset` to `holder` out of thin air.
    pub fn mint(
        &self,
        asset: &AccountId,
        holder: &AccountId,
        amount: u64,
    ) -> Result<(), StoreError> {
        let mut balances = self.balances.lock().map_err(poisoned)?;
        let entry = balances.entry((*asset, *holder)).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or(StoreError::BalanceOverflow(*holder))?;
        Ok(())
    }

    /// Sum of every holder's balance in `asset`.
    pub fn supply(&self, asset: &AccountId) -> u64 {
        self.balances
            .lock()
            .map(|b| {
                b.iter()
                    .filter(|((a, _), _)| a == asset)
                    .map(|(_, v)| *v)
                    .sum()
            })
            .unwrap_or(0)
    }
}

impl Default for NullTokenLedger {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Backend("token ledger lock poisoned".into())
}

impl TokenLedger for NullTokenLedger {
    fn balance(&self, asset: &AccountId, holder: &AccountId) -> Result<u64, StoreError> {
        Ok(self
            .balances
            .lock()
            .map_err(poisoned)?
            .get(&(*asset, *holder))
            .copied()
            .unwrap_or(0))
    }

    fn transfer(
        &self,
        asset: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: u64,
    ) -> Result<(), StoreError> {
        let mut balances = self.balances.lock().map_err(poisoned)?;
        let available = balances.get(&(*asset, *from)).copied().unwrap_or(0);
        if available < amount {
            return Err(StoreError::InsufficientFunds {
                holder: *from,
                needed: amount,
                available,
            });
        }
        if from == to {
            return Ok(());
        }
        let credited = balances
            .get(&(*asset, *to))
            .copied()
            .unwrap_or(0)
            .checked_add(amount)
            .ok_or(StoreError::BalanceOverflow(*to))?;
        balances.insert((*asset, *from), available - amount);
        balances.insert((*asset, *to), credited);
        Ok(())
    }
}
