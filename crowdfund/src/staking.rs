//! Staking pool: aggregate stake accounting and per-staker deposits.
//!
//! Deposits are held in the pool's custody address (`H("staking-pool", config)`)
//! on the native asset. The registry's `total_amount_staked` and
//! `active_stakers` are the only aggregates; the pool record itself just marks
//! that staking was set up.

use beneficence_store::{RecordStore, TokenLedger, WriteBatch};
use beneficence_types::AccountId;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::{stage, CrowdfundEngine, Record, Transfer};
use crate::error::CrowdfundError;
use crate::keys;

/// The pool created by `initialize_staking`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingPool {
    /// Owning configuration registry.
    pub config: AccountId,
}

impl Record for StakingPool {
    const KIND: &'static str = "staking pool";
}

/// One staker's deposit, reused across stake/unstake cycles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeRecord {
    pub staker: AccountId,
    pub deposit: u64,
    /// Reserved for a yield mechanism; no flow in this crate accrues it.
    pub reward: u64,
}

impl StakeRecord {
    pub fn new(staker: AccountId) -> Self {
        Self {
            staker,
            deposit: 0,
            reward: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.deposit > 0
    }
}

impl Record for StakeRecord {
    const KIND: &'static str = "stake record";
}

impl<S: RecordStore, L: TokenLedger> CrowdfundEngine<S, L> {
    /// Create the staking pool. Admin only, exactly once.
    pub fn initialize_staking(&self, signer: &AccountId) -> Result<StakingPool, CrowdfundError> {
        let mut registry = self.registry()?;
        if *signer != registry.admin {
            return Err(CrowdfundError::Unauthorized(signer.to_string()));
        }
        if registry.staking_initialized {
            return Err(CrowdfundError::StakingAlreadyInitialized);
        }

        let config_key = *self.config_key();
        let pool_key = keys::staking_pool_key(&config_key);
        let pool = StakingPool { config: config_key };
        registry.staking_initialized = true;
        registry.staking_pool = pool_key;

        let mut batch = WriteBatch::new();
        stage(&mut batch, pool_key, &pool)?;
        stage(&mut batch, config_key, &registry)?;
        self.apply(batch, None)?;

        info!(pool = %pool_key, "staking initialized");
        Ok(pool)
    }

    /// Deposit `amount` native tokens into the pool.
    pub fn stake(&self, staker: &AccountId, amount: u64) -> Result<StakeRecord, CrowdfundError> {
        if amount == 0 {
            return Err(CrowdfundError::ZeroAmount);
        }
        let mut registry = self.registry()?;
        if !registry.staking_initialized {
            return Err(CrowdfundError::StakingNotInitialized);
        }

        let record_key = keys::stake_record_key(staker);
        let mut record = self
            .load::<StakeRecord>(&record_key)?
            .unwrap_or_else(|| StakeRecord::new(*staker));
        if !record.is_active() {
            registry.active_stakers = registry
                .active_stakers
                .checked_add(1)
                .ok_or(CrowdfundError::Overflow)?;
        }
        record.deposit = record
            .deposit
            .checked_add(amount)
            .ok_or(CrowdfundError::Overflow)?;
        registry.total_amount_staked = registry
            .total_amount_staked
            .checked_add(amount)
            .ok_or(CrowdfundError::Overflow)?;

        let mut batch = WriteBatch::new();
        stage(&mut batch, record_key, &record)?;
        stage(&mut batch, *self.config_key(), &registry)?;
        let transfer = Transfer {
            asset: registry.native_asset,
            from: *staker,
            to: registry.staking_pool,
            amount,
        };
        self.apply(batch, Some(transfer))?;

        info!(
            staker = %staker,
            amount,
            deposit = record.deposit,
            total_staked = registry.total_amount_staked,
            "stake deposited"
        );
        Ok(record)
    }

    /// Withdraw `amount` from the caller's deposit back to their wallet.
    pub fn unstake(&self, staker: &AccountId, amount: u64) -> Result<StakeRecord, CrowdfundError> {
        if amount == 0 {
            return Err(CrowdfundError::ZeroAmount);
        }
        let mut registry = self.registry()?;
        if !registry.staking_initialized {
            return Err(CrowdfundError::StakingNotInitialized);
        }

        let record_key = keys::stake_record_key(staker);
        let mut record = self
            .load::<StakeRecord>(&record_key)?
            .filter(StakeRecord::is_active)
            .ok_or_else(|| CrowdfundError::NoStake(staker.to_string()))?;
        if amount > record.deposit {
            return Err(CrowdfundError::InsufficientStake {
                have: record.deposit,
                need: amount,
            });
        }
        record.deposit -= amount;
        registry.total_amount_staked = registry
            .total_amount_staked
            .checked_sub(amount)
            .ok_or(CrowdfundError::Overflow)?;
        if !record.is_active() {
            registry.active_stakers = registry
                .active_stakers
                .checked_sub(1)
                .ok_or(CrowdfundError::Overflow)?;
        }

        let mut batch = WriteBatch::new();
        stage(&mut batch, record_key, &record)?;
        stage(&mut batch, *self.config_key(), &registry)?;
        let transfer = Transfer {
            asset: registry.native_asset,
            from: registry.staking_pool,
            to: *staker,
            amount,
        };
        self.apply(batch, Some(transfer))?;

        info!(
            staker = %staker,
            amount,
            deposit = record.deposit,
            total_staked = registry.total_amount_staked,
            "stake withdrawn"
        );
        Ok(record)
    }
}
