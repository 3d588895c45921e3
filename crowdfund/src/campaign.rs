//! Campaign and round lifecycle: opening a campaign, taking donations and
//! advancing to the next round.

use beneficence_store::{RecordStore, TokenLedger, WriteBatch};
use beneficence_types::AccountId;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::{stage, CrowdfundEngine, Record, Transfer};
use crate::error::CrowdfundError;
use crate::keys;
use crate::round::{DonationRecord, Round, RoundStatus};

/// Campaign lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CampaignStatus {
    /// Rounds are running.
    Active,
    /// The final round has closed to donations.
    AwaitingDecision,
    /// Escrow released to the fundraiser.
    Ended,
}

/// A fundraiser's multi-round campaign, at `H("campaign", fundraiser)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub fundraiser: AccountId,
    /// Escrow custody address, `H("vault", campaign)`.
    pub vault: AccountId,
    pub description: String,
    pub content_id: String,
    pub target: u64,
    pub asset: AccountId,
    /// Sum of all donations across rounds.
    pub balance: u64,
    pub status: CampaignStatus,
    pub total_rounds: u16,
    pub active_round: u16,
    pub active_round_key: AccountId,
    pub is_valid_votes: u64,
    pub not_valid_votes: u64,
    pub moderator_votes: u64,
    /// Live result of moderation: `is_valid_votes > not_valid_votes` after any vote.
    pub is_valid_campaign: bool,
    /// Set by the latest tally.
    pub can_start_next_round: bool,
}

impl Campaign {
    pub fn is_final_round(&self) -> bool {
        self.active_round == self.total_rounds
    }
}

impl Record for Campaign {
    const KIND: &'static str = "campaign";
}

/// Escrow descriptor. The tokens themselves are held by the ledger under the
/// vault's address; only the withdrawal path moves them out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vault {
    pub campaign: AccountId,
    pub asset: AccountId,
}

impl Record for Vault {
    const KIND: &'static str = "vault";
}

/// Arguments of [`CrowdfundEngine::start_campaign`].
#[derive(Clone, Debug)]
pub struct CampaignTerms {
    pub description: String,
    pub target: u64,
    pub total_rounds: u16,
    pub initial_round_target: u64,
    pub content_id: String,
}

impl<S: RecordStore, L: TokenLedger> CrowdfundEngine<S, L> {
    /// Open a campaign with its first round and escrow vault.
    ///
    /// A single-round campaign funds its whole target in round 1, so
    /// `initial_round_target` is ignored in that case.
    pub fn start_campaign(
        &self,
        fundraiser: &AccountId,
        terms: CampaignTerms,
    ) -> Result<Campaign, CrowdfundError> {
        if terms.target == 0 || terms.initial_round_target == 0 {
            return Err(CrowdfundError::InvalidTarget);
        }
        if terms.total_rounds == 0 {
            return Err(CrowdfundError::InvalidRoundCount);
        }
        if terms.description.len() > self.limits.max_description_len {
            return Err(CrowdfundError::DescriptionTooLong {
                len: terms.description.len(),
                max: self.limits.max_description_len,
            });
        }
        if terms.content_id.len() > self.limits.max_content_id_len {
            return Err(CrowdfundError::ContentIdTooLong {
                len: terms.content_id.len(),
                max: self.limits.max_content_id_len,
            });
        }
        let registry = self.registry()?;
        let campaign_key = keys::campaign_key(fundraiser);
        if self.store().exists(&campaign_key)? {
            return Err(CrowdfundError::CampaignExists);
        }

        let vault_key = keys::vault_key(&campaign_key);
        let round_key = keys::round_key(&campaign_key, 1);
        let first_target = if terms.total_rounds == 1 {
            terms.target
        } else {
            terms.initial_round_target
        };
        let campaign = Campaign {
            fundraiser: *fundraiser,
            vault: vault_key,
            description: terms.description,
            content_id: terms.content_id,
            target: terms.target,
            asset: registry.native_asset,
            balance: 0,
            status: CampaignStatus::Active,
            total_rounds: terms.total_rounds,
            active_round: 1,
            active_round_key: round_key,
            is_valid_votes: 0,
            not_valid_votes: 0,
            moderator_votes: 0,
            is_valid_campaign: true,
            can_start_next_round: true,
        };
        let round = Round::new(campaign_key, 1, first_target);
        let vault = Vault {
            campaign: campaign_key,
            asset: registry.native_asset,
        };

        let mut batch = WriteBatch::new();
        stage(&mut batch, campaign_key, &campaign)?;
        stage(&mut batch, round_key, &round)?;
        stage(&mut batch, vault_key, &vault)?;
        self.apply(batch, None)?;

        info!(
            campaign = %campaign_key,
            fundraiser = %fundraiser,
            target = campaign.target,
            rounds = campaign.total_rounds,
            first_round_target = first_target,
            "campaign started"
        );
        Ok(campaign)
    }

    /// Donate to the campaign's active round.
    ///
    /// Only the round's status at call time is checked, so the donation that
    /// reaches or passes the target is accepted and closes the round.
    pub fn donate(
        &self,
        donor: &AccountId,
        campaign_key: &AccountId,
        amount: u64,
    ) -> Result<Round, CrowdfundError> {
        if amount == 0 {
            return Err(CrowdfundError::ZeroAmount);
        }
        let mut campaign = self.require_campaign(campaign_key)?;
        if campaign.status == CampaignStatus::Ended {
            return Err(CrowdfundError::CampaignEnded);
        }
        let round_key = campaign.active_round_key;
        let mut round: Round = self.require(&round_key)?;
        if round.status != RoundStatus::Active {
            return Err(CrowdfundError::RoundClosedToDonations);
        }

        let donation_key = keys::donation_key(&round_key, donor);
        let mut donation = match self.load::<DonationRecord>(&donation_key)? {
            Some(existing) => existing,
            None => {
                round.donors = round.donors.checked_add(1).ok_or(CrowdfundError::Overflow)?;
                DonationRecord {
                    round: round_key,
                    round_number: round.number,
                    donor: *donor,
                    amount: 0,
                }
            }
        };
        donation.amount = donation
            .amount
            .checked_add(amount)
            .ok_or(CrowdfundError::Overflow)?;
        round.balance = round
            .balance
            .checked_add(amount)
            .ok_or(CrowdfundError::Overflow)?;
        campaign.balance = campaign
            .balance
            .checked_add(amount)
            .ok_or(CrowdfundError::Overflow)?;

        let closed = round.target_reached();
        if closed {
            round.status = RoundStatus::ClosedToDonations;
            if campaign.is_final_round() {
                campaign.status = CampaignStatus::AwaitingDecision;
            }
        }

        let mut batch = WriteBatch::new();
        stage(&mut batch, donation_key, &donation)?;
        stage(&mut batch, round_key, &round)?;
        stage(&mut batch, *campaign_key, &campaign)?;
        let transfer = Transfer {
            asset: campaign.asset,
            from: *donor,
            to: campaign.vault,
            amount,
        };
        self.apply(batch, Some(transfer))?;

        info!(
            campaign = %campaign_key,
            round = round.number,
            donor = %donor,
            amount,
            round_balance = round.balance,
            "donation accepted"
        );
        if closed {
            info!(
                campaign = %campaign_key,
                round = round.number,
                balance = round.balance,
                target = round.target,
                "round closed to donations"
            );
        }
        Ok(round)
    }

    /// Open the next round after a tally decided to continue. Fundraiser only.
    pub fn start_next_round(
        &self,
        signer: &AccountId,
        campaign_key: &AccountId,
        next_target: u64,
    ) -> Result<Round, CrowdfundError> {
        if next_target == 0 {
            return Err(CrowdfundError::InvalidTarget);
        }
        let mut campaign = self.require_campaign(campaign_key)?;
        if *signer != campaign.fundraiser {
            return Err(CrowdfundError::Unauthorized(signer.to_string()));
        }
        let current: Round = self.require(&campaign.active_round_key)?;
        if current.status != RoundStatus::Ended {
            return Err(CrowdfundError::PreconditionViolated(
                "current round has not ended",
            ));
        }
        if !campaign.can_start_next_round {
            return Err(CrowdfundError::PreconditionViolated(
                "continuation vote did not pass",
            ));
        }
        if campaign.active_round >= campaign.total_rounds {
            return Err(CrowdfundError::NoRoundsRemaining);
        }

        let number = campaign.active_round + 1;
        let next_key = keys::round_key(campaign_key, number);
        let next = Round::new(*campaign_key, number, next_target);
        campaign.active_round = number;
        campaign.active_round_key = next_key;

        let mut batch = WriteBatch::new();
        stage(&mut batch, next_key, &next)?;
        stage(&mut batch, *campaign_key, &campaign)?;
        self.apply(batch, None)?;

        info!(
            campaign = %campaign_key,
            round = number,
            target = next_target,
            "next round started"
        );
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::*;
    use crate::error::ErrorKind;
    use beneficence_types::time::SECS_PER_DAY;
    use beneficence_types::Timestamp;

    const FUNDRAISER: u8 = 20;

    fn terms(target: u64, rounds: u16, first: u64) -> CampaignTerms {
        CampaignTerms {
            description: "Fund my treatment".into(),
            target,
            total_rounds: rounds,
            initial_round_target: first,
            content_id: "X45KFLJ2901994LLJLDJJ99488422".into(),
        }
    }

    fn open(engine: &TestEngine, rounds: u16) -> AccountId {
        engine
            .start_campaign(&id(FUNDRAISER), terms(550, rounds, 100))
            .unwrap();
        keys::campaign_key(&id(FUNDRAISER))
    }

    fn give(
        engine: &TestEngine,
        campaign: &AccountId,
        donor: u8,
        amount: u64,
    ) -> Result<Round, CrowdfundError> {
        fund(engine, &id(donor), amount);
        engine.donate(&id(donor), campaign, amount)
    }

    #[test]
    fn start_campaign_creates_campaign_round_and_vault() {
        let engine = engine();
        let campaign = engine
            .start_campaign(&id(FUNDRAISER), terms(550, 2, 100))
            .unwrap();
        let key = keys::campaign_key(&id(FUNDRAISER));
        assert_eq!(engine.campaign(&key).unwrap(), Some(campaign.clone()));
        assert_eq!(campaign.vault, keys::vault_key(&key));
        assert_eq!(campaign.status, CampaignStatus::Active);
        assert_eq!(campaign.active_round, 1);
        assert_eq!(campaign.active_round_key, keys::round_key(&key, 1));
        assert_eq!(campaign.balance, 0);
        assert_eq!(campaign.asset, id(ASSET));
        assert!(campaign.can_start_next_round);
        assert!(campaign.is_valid_campaign);
        assert_eq!(campaign.moderator_votes, 0);

        let round = engine.round(&key, 1).unwrap().unwrap();
        assert_eq!(round.number, 1);
        assert_eq!(round.target, 100);
        assert_eq!(round.balance, 0);
        assert_eq!(round.donors, 0);
        assert_eq!(round.status, RoundStatus::Active);
        assert!(round.round_vote.is_zero());

        let vault = engine.vault(&key).unwrap().unwrap();
        assert_eq!(vault.campaign, key);
    }

    #[test]
    fn single_round_campaign_uses_campaign_target() {
        let engine = engine();
        engine
            .start_campaign(&id(FUNDRAISER), terms(200, 1, 150))
            .unwrap();
        let key = keys::campaign_key(&id(FUNDRAISER));
        assert_eq!(engine.round(&key, 1).unwrap().unwrap().target, 200);
    }

    #[test]
    fn start_campaign_validates_inputs() {
        let engine = engine();
        let cases = [terms(0, 2, 100), terms(550, 0, 100), terms(550, 2, 0)];
        for t in cases {
            let err = engine.start_campaign(&id(FUNDRAISER), t).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
        let mut long = terms(550, 2, 100);
        long.description = "x".repeat(201);
        let err = engine.start_campaign(&id(FUNDRAISER), long).unwrap_err();
        assert!(matches!(err, CrowdfundError::DescriptionTooLong { len: 201, max: 200 }));
        assert!(engine.campaign(&keys::campaign_key(&id(FUNDRAISER))).unwrap().is_none());
    }

    #[test]
    fn one_campaign_per_fundraiser() {
        let engine = engine();
        open(&engine, 2);
        let err = engine
            .start_campaign(&id(FUNDRAISER), terms(10, 1, 10))
            .unwrap_err();
        assert!(matches!(err, CrowdfundError::CampaignExists));
    }

    #[test]
    fn donations_close_round_at_target() {
        let engine = engine();
        let key = open(&engine, 2);

        let round = give(&engine, &key, 30, 40).unwrap();
        assert_eq!(round.status, RoundStatus::Active);
        assert_eq!(round.balance, 40);

        let round = give(&engine, &key, 31, 70).unwrap();
        assert_eq!(round.status, RoundStatus::ClosedToDonations);
        assert_eq!(round.balance, 110);
        assert_eq!(round.donors, 2);

        let err = give(&engine, &key, 32, 20).unwrap_err();
        assert!(matches!(err, CrowdfundError::RoundClosedToDonations));

        let round = engine.round(&key, 1).unwrap().unwrap();
        assert_eq!(round.balance, 110);
        assert_eq!(round.donors, 2);
        let campaign = engine.campaign(&key).unwrap().unwrap();
        assert_eq!(campaign.balance, 110);
        assert_eq!(campaign.status, CampaignStatus::Active);
        assert_eq!(engine.vault_balance(&key).unwrap(), 110);
        assert_eq!(balance(&engine, &id(32)), 20);
    }

    #[test]
    fn repeat_donor_accumulates_without_new_donor() {
        let engine = engine();
        let key = open(&engine, 2);
        give(&engine, &key, 30, 10).unwrap();
        let round = give(&engine, &key, 30, 15).unwrap();
        assert_eq!(round.donors, 1);
        assert_eq!(round.balance, 25);
        let round_key = keys::round_key(&key, 1);
        let donation = engine.donation(&round_key, &id(30)).unwrap().unwrap();
        assert_eq!(donation.amount, 25);
        assert_eq!(donation.round_number, 1);
    }

    #[test]
    fn closing_final_round_awaits_decision() {
        let engine = engine();
        engine
            .start_campaign(&id(FUNDRAISER), terms(200, 1, 150))
            .unwrap();
        let key = keys::campaign_key(&id(FUNDRAISER));
        give(&engine, &key, 30, 150).unwrap();
        assert_eq!(engine.campaign(&key).unwrap().unwrap().status, CampaignStatus::Active);
        give(&engine, &key, 31, 60).unwrap();
        assert_eq!(
            engine.campaign(&key).unwrap().unwrap().status,
            CampaignStatus::AwaitingDecision
        );
    }

    #[test]
    fn unfunded_donation_changes_nothing() {
        let engine = engine();
        let key = open(&engine, 2);
        fund(&engine, &id(30), 5);
        let err = engine.donate(&id(30), &key, 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);
        let round = engine.round(&key, 1).unwrap().unwrap();
        assert_eq!(round.balance, 0);
        assert_eq!(round.donors, 0);
        assert!(engine.donation(&keys::round_key(&key, 1), &id(30)).unwrap().is_none());
    }

    #[test]
    fn campaign_balance_overflow_fails_closed() {
        let engine = engine();
        let key = open(&engine, 2);
        give(&engine, &key, 30, u64::MAX).unwrap();
        engine
            .initialize_voting(&id(FUNDRAISER), &key, Timestamp::new(0))
            .unwrap();
        engine.tally_votes(&key, Timestamp::new(SECS_PER_DAY)).unwrap();
        engine.start_next_round(&id(FUNDRAISER), &key, 450).unwrap();

        fund(&engine, &id(31), 1);
        let before = engine.store().snapshot();
        let err = engine.donate(&id(31), &key, 1).unwrap_err();
        assert!(matches!(err, CrowdfundError::Overflow));
        assert_eq!(err.kind(), ErrorKind::Arithmetic);
        assert_eq!(engine.store().snapshot(), before);
        assert_eq!(balance(&engine, &id(31)), 1);
        assert_eq!(engine.vault_balance(&key).unwrap(), u64::MAX);
        assert_eq!(engine.round(&key, 2).unwrap().unwrap().balance, 0);
    }

    #[test]
    fn zero_donation_is_rejected() {
        let engine = engine();
        let key = open(&engine, 2);
        let err = engine.donate(&id(30), &key, 0).unwrap_err();
        assert!(matches!(err, CrowdfundError::ZeroAmount));
    }

    #[test]
    fn donation_to_unknown_campaign_fails() {
        let engine = engine();
        let err = engine.donate(&id(30), &id(99), 10).unwrap_err();
        assert!(matches!(err, CrowdfundError::CampaignNotFound(_)));
    }

    #[test]
    fn next_round_requires_ended_round() {
        let engine = engine();
        let key = open(&engine, 2);
        give(&engine, &key, 30, 100).unwrap();
        let err = engine.start_next_round(&id(FUNDRAISER), &key, 450).unwrap_err();
        assert!(matches!(err, CrowdfundError::PreconditionViolated(_)));
    }

    #[test]
    fn next_round_requires_fundraiser() {
        let engine = engine();
        let key = open(&engine, 2);
        let err = engine.start_next_round(&id(77), &key, 450).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
    }

    #[test]
    fn next_round_rejects_zero_target() {
        let engine = engine();
        let key = open(&engine, 2);
        let err = engine.start_next_round(&id(FUNDRAISER), &key, 0).unwrap_err();
        assert!(matches!(err, CrowdfundError::InvalidTarget));
    }
}
