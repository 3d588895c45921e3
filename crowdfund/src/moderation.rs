//! Staker moderation of a campaign's validity.
//!
//! Moderation is campaign-scoped and independent of rounds. The validity flag
//! is recomputed after every ballot, so withdrawal always sees the current
//! balance of valid against invalid weight.

use beneficence_store::{RecordStore, TokenLedger, WriteBatch};
use beneficence_types::AccountId;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::campaign::CampaignStatus;
use crate::engine::{stage, CrowdfundEngine, Record};
use crate::error::CrowdfundError;
use crate::keys;
use crate::staking::StakeRecord;
use crate::voting::voting_power;

/// A staker's moderation registration, at `H("moderator", campaign, staker)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeratorRegistration {
    pub campaign: AccountId,
    pub staker: AccountId,
    pub voting_power: u64,
    pub has_voted: bool,
}

impl Record for ModeratorRegistration {
    const KIND: &'static str = "moderator registration";
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Valid,
    Invalid,
}

impl<S: RecordStore, L: TokenLedger> CrowdfundEngine<S, L> {
    /// Register a staker as moderator of a campaign.
    pub fn init_staker_moderation(
        &self,
        staker: &AccountId,
        campaign_key: &AccountId,
    ) -> Result<ModeratorRegistration, CrowdfundError> {
        let registry = self.registry()?;
        let campaign = self.require_campaign(campaign_key)?;
        if campaign.status == CampaignStatus::Ended {
            return Err(CrowdfundError::CampaignEnded);
        }
        let registration_key = keys::moderator_key(campaign_key, staker);
        if self.store().exists(&registration_key)? {
            return Err(CrowdfundError::AlreadyRegistered(staker.to_string()));
        }
        let stake = self
            .load::<StakeRecord>(&keys::stake_record_key(staker))?
            .filter(StakeRecord::is_active)
            .ok_or_else(|| CrowdfundError::NoStake(staker.to_string()))?;
        let power = voting_power(
            stake.deposit,
            registry.total_amount_staked,
            registry.params.staker_moderation_rights,
        )?;

        let registration = ModeratorRegistration {
            campaign: *campaign_key,
            staker: *staker,
            voting_power: power,
            has_voted: false,
        };
        let mut batch = WriteBatch::new();
        stage(&mut batch, registration_key, &registration)?;
        self.apply(batch, None)?;

        debug!(campaign = %campaign_key, staker = %staker, power, "moderator registered");
        Ok(registration)
    }

    /// Cast a moderation ballot and recompute the campaign's validity.
    ///
    /// Returns the updated validity flag.
    pub fn moderate(
        &self,
        staker: &AccountId,
        campaign_key: &AccountId,
        verdict: Verdict,
    ) -> Result<bool, CrowdfundError> {
        let mut campaign = self.require_campaign(campaign_key)?;
        if campaign.status == CampaignStatus::Ended {
            return Err(CrowdfundError::CampaignEnded);
        }
        let registration_key = keys::moderator_key(campaign_key, staker);
        let mut registration = self
            .load::<ModeratorRegistration>(&registration_key)?
            .ok_or_else(|| CrowdfundError::NotRegistered(staker.to_string()))?;
        if registration.has_voted {
            return Err(CrowdfundError::AlreadyVoted(staker.to_string()));
        }

        let bucket = match verdict {
            Verdict::Valid => &mut campaign.is_valid_votes,
            Verdict::Invalid => &mut campaign.not_valid_votes,
        };
        *bucket = bucket
            .checked_add(registration.voting_power)
            .ok_or(CrowdfundError::Overflow)?;
        campaign.moderator_votes = campaign
            .moderator_votes
            .checked_add(1)
            .ok_or(CrowdfundError::Overflow)?;
        campaign.is_valid_campaign = campaign.is_valid_votes > campaign.not_valid_votes;
        registration.has_voted = true;

        let mut batch = WriteBatch::new();
        stage(&mut batch, registration_key, &registration)?;
        stage(&mut batch, *campaign_key, &campaign)?;
        self.apply(batch, None)?;

        info!(
            campaign = %campaign_key,
            staker = %staker,
            ?verdict,
            valid = campaign.is_valid_votes,
            invalid = campaign.not_valid_votes,
            is_valid = campaign.is_valid_campaign,
            "moderation vote recorded"
        );
        Ok(campaign.is_valid_campaign)
    }
}
