//! The configuration registry: one per deployment.

use beneficence_types::{AccountId, PlatformParams};
use serde::{Deserialize, Serialize};

use crate::engine::Record;

/// Governance parameters and aggregate staking state of a deployment.
///
/// Lives at `H("config", admin)`. `total_amount_staked` always equals the sum
/// of every stake record's deposit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRegistry {
    pub admin: AccountId,
    /// Asset used for staking and for every campaign's donations.
    pub native_asset: AccountId,
    pub params: PlatformParams,
    /// Set once by `initialize_staking`, never cleared.
    pub staking_initialized: bool,
    /// Stakers with a non-zero deposit.
    pub active_stakers: u64,
    pub total_amount_staked: u64,
    /// `AccountId::ZERO` until staking is initialized.
    pub staking_pool: AccountId,
}

impl ConfigRegistry {
    pub fn new(admin: AccountId, native_asset: AccountId, params: PlatformParams) -> Self {
        Self {
            admin,
            native_asset,
            params,
            staking_initialized: false,
            active_stakers: 0,
            total_amount_staked: 0,
            staking_pool: AccountId::ZERO,
        }
    }

    /// Voting window length in seconds.
    pub fn voting_period_secs(&self) -> u64 {
        u64::from(self.params.round_voting_period_in_days) * beneficence_types::time::SECS_PER_DAY
    }
}

impl Record for ConfigRegistry {
    const KIND: &'static str = "config";
}
