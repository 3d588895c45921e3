//! Continuation vote.
//!
//! Once a round is closed to donations its fundraiser opens a [`RoundVote`].
//! Donors of that round and stakers then register, which fixes their voting
//! power, and cast one ballot each while the window is open. After the window
//! has elapsed anyone may tally; the outcome decides whether the fundraiser
//! may open the next round.
//!
//! The window is evaluated lazily: nothing ends a vote except a `tally_votes`
//! call made after the deadline.

use beneficence_store::{RecordStore, TokenLedger, WriteBatch};
use beneficence_types::{AccountId, Timestamp};
use beneficence_utils::format_duration;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::campaign::Campaign;
use crate::engine::{stage, CrowdfundEngine, Record};
use crate::error::CrowdfundError;
use crate::keys;
use crate::round::{DonationRecord, Round, RoundStatus};
use crate::staking::StakeRecord;

/// Tally of one round's continuation vote, at `H("voting", round)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundVote {
    pub round: AccountId,
    /// Weighted.
    pub continue_votes: u64,
    /// Weighted.
    pub terminate_votes: u64,
    pub donors_voted: u64,
    pub stakers_voted: u64,
    pub voting_ended: bool,
    pub opened_at: Timestamp,
    /// Window length, copied from the registry when voting opens.
    pub period_secs: u64,
}

impl RoundVote {
    /// Whether the window has elapsed, regardless of any tally.
    pub fn window_elapsed(&self, now: Timestamp) -> bool {
        self.opened_at.has_expired(self.period_secs, now)
    }

    pub fn is_open(&self, now: Timestamp) -> bool {
        !self.voting_ended && !self.window_elapsed(now)
    }
}

impl Record for RoundVote {
    const KIND: &'static str = "round vote";
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoterType {
    Donor,
    Staker,
}

/// A voter's registration for one round. Power is fixed when registering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterRegistration {
    pub round: AccountId,
    pub voter: AccountId,
    pub voting_power: u64,
    pub has_voted: bool,
    pub voter_type: VoterType,
}

impl Record for VoterRegistration {
    const KIND: &'static str = "voter registration";
}

/// A continuation ballot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ballot {
    Continue,
    Terminate,
}

/// Result of [`CrowdfundEngine::tally_votes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TallyOutcome {
    /// The fundraiser may open the next round.
    Continue,
    Terminate,
}

/// `floor(contribution * rights / pool_total)`.
///
/// Computed in 128-bit integers so the intermediate product cannot overflow.
pub fn voting_power(
    contribution: u64,
    pool_total: u64,
    rights: u8,
) -> Result<u64, CrowdfundError> {
    if pool_total == 0 {
        return Err(CrowdfundError::EmptyPool);
    }
    let power = u128::from(contribution) * u128::from(rights) / u128::from(pool_total);
    u64::try_from(power).map_err(|_| CrowdfundError::Overflow)
}

/// Continuation wins iff `continue_votes >= min_pct% of all cast weight`.
///
/// With nothing cast the threshold is zero and continuation wins.
pub fn continuation_wins(continue_votes: u64, terminate_votes: u64, min_pct: u8) -> bool {
    let cast = u128::from(continue_votes) + u128::from(terminate_votes);
    u128::from(continue_votes) * 100 >= u128::from(min_pct) * cast
}

impl<S: RecordStore, L: TokenLedger> CrowdfundEngine<S, L> {
    /// Open the continuation vote on the campaign's active round. Fundraiser only.
    pub fn initialize_voting(
        &self,
        signer: &AccountId,
        campaign_key: &AccountId,
        now: Timestamp,
    ) -> Result<RoundVote, CrowdfundError> {
        let registry = self.registry()?;
        let campaign = self.require_campaign(campaign_key)?;
        if *signer != campaign.fundraiser {
            return Err(CrowdfundError::Unauthorized(signer.to_string()));
        }
        let round_key = campaign.active_round_key;
        let mut round: Round = self.require(&round_key)?;
        if round.status != RoundStatus::ClosedToDonations {
            return Err(CrowdfundError::PreconditionViolated(
                "round is not closed to donations",
            ));
        }
        let vote_key = keys::round_vote_key(&round_key);
        if !round.round_vote.is_zero() || self.store().exists(&vote_key)? {
            return Err(CrowdfundError::PreconditionViolated(
                "voting already initialized for this round",
            ));
        }

        let period = registry.voting_period_secs();
        if now.as_secs().checked_add(period).is_none() {
            return Err(CrowdfundError::Overflow);
        }
        let vote = RoundVote {
            round: round_key,
            continue_votes: 0,
            terminate_votes: 0,
            donors_voted: 0,
            stakers_voted: 0,
            voting_ended: false,
            opened_at: now,
            period_secs: period,
        };
        round.round_vote = vote_key;

        let mut batch = WriteBatch::new();
        stage(&mut batch, vote_key, &vote)?;
        stage(&mut batch, round_key, &round)?;
        self.apply(batch, None)?;

        info!(
            campaign = %campaign_key,
            round = round.number,
            opened_at = %now,
            window = %format_duration(period),
            "voting opened"
        );
        Ok(vote)
    }

    /// Register a staker for the active round's vote, weighted by deposit.
    pub fn init_staker_voting(
        &self,
        staker: &AccountId,
        campaign_key: &AccountId,
        now: Timestamp,
    ) -> Result<VoterRegistration, CrowdfundError> {
        let registry = self.registry()?;
        let (round, _) = self.open_vote(campaign_key, now)?;
        let stake = self
            .load::<StakeRecord>(&keys::stake_record_key(staker))?
            .filter(StakeRecord::is_active)
            .ok_or_else(|| CrowdfundError::NoStake(staker.to_string()))?;
        let power = voting_power(
            stake.deposit,
            registry.total_amount_staked,
            registry.params.staker_voting_rights,
        )?;
        self.register_voter(&round, staker, power, VoterType::Staker)
    }

    /// Register a donor of the active round, weighted by their share of the round.
    pub fn init_donator_voting(
        &self,
        donor: &AccountId,
        campaign_key: &AccountId,
        now: Timestamp,
    ) -> Result<VoterRegistration, CrowdfundError> {
        let registry = self.registry()?;
        let (round, _) = self.open_vote(campaign_key, now)?;
        let round_key = keys::round_key(campaign_key, round.number);
        let donation = self
            .load::<DonationRecord>(&keys::donation_key(&round_key, donor))?
            .ok_or_else(|| CrowdfundError::NotDonor(donor.to_string()))?;
        let power = voting_power(
            donation.amount,
            round.balance,
            registry.params.donator_voting_rights,
        )?;
        self.register_voter(&round, donor, power, VoterType::Donor)
    }

    /// Cast the registered voter's single ballot.
    pub fn vote(
        &self,
        voter: &AccountId,
        campaign_key: &AccountId,
        ballot: Ballot,
        now: Timestamp,
    ) -> Result<RoundVote, CrowdfundError> {
        let (round, mut tally) = self.open_vote(campaign_key, now)?;
        let round_key = tally.round;
        let registration_key = keys::voter_key(&round_key, voter);
        let mut registration = self
            .load::<VoterRegistration>(&registration_key)?
            .ok_or_else(|| CrowdfundError::NotRegistered(voter.to_string()))?;
        if registration.has_voted {
            return Err(CrowdfundError::AlreadyVoted(voter.to_string()));
        }

        let bucket = match ballot {
            Ballot::Continue => &mut tally.continue_votes,
            Ballot::Terminate => &mut tally.terminate_votes,
        };
        *bucket = bucket
            .checked_add(registration.voting_power)
            .ok_or(CrowdfundError::Overflow)?;
        let counter = match registration.voter_type {
            VoterType::Donor => &mut tally.donors_voted,
            VoterType::Staker => &mut tally.stakers_voted,
        };
        *counter = counter.checked_add(1).ok_or(CrowdfundError::Overflow)?;
        registration.has_voted = true;

        let mut batch = WriteBatch::new();
        stage(&mut batch, registration_key, &registration)?;
        stage(&mut batch, keys::round_vote_key(&round_key), &tally)?;
        self.apply(batch, None)?;

        debug!(
            campaign = %campaign_key,
            round = round.number,
            voter = %voter,
            ?ballot,
            power = registration.voting_power,
            "ballot cast"
        );
        Ok(tally)
    }

    /// Close the active round's vote once its window has elapsed. Any caller.
    pub fn tally_votes(
        &self,
        campaign_key: &AccountId,
        now: Timestamp,
    ) -> Result<TallyOutcome, CrowdfundError> {
        let registry = self.registry()?;
        let mut campaign = self.require_campaign(campaign_key)?;
        let round_key = campaign.active_round_key;
        let mut round: Round = self.require(&round_key)?;
        let mut tally = self.current_vote(&round_key, &round)?;
        if tally.voting_ended {
            return Err(CrowdfundError::VotingEnded);
        }
        if !tally.window_elapsed(now) {
            return Err(CrowdfundError::VotingWindowOpen {
                remaining_secs: tally.opened_at.remaining(tally.period_secs, now),
            });
        }

        let outcome = if continuation_wins(
            tally.continue_votes,
            tally.terminate_votes,
            registry.params.minimum_required_vote_percentage,
        ) {
            TallyOutcome::Continue
        } else {
            TallyOutcome::Terminate
        };
        tally.voting_ended = true;
        round.status = RoundStatus::Ended;
        campaign.can_start_next_round = outcome == TallyOutcome::Continue;

        let mut batch = WriteBatch::new();
        stage(&mut batch, round.round_vote, &tally)?;
        stage(&mut batch, round_key, &round)?;
        stage(&mut batch, *campaign_key, &campaign)?;
        self.apply(batch, None)?;

        info!(
            campaign = %campaign_key,
            round = round.number,
            continue_votes = tally.continue_votes,
            terminate_votes = tally.terminate_votes,
            donors_voted = tally.donors_voted,
            stakers_voted = tally.stakers_voted,
            ?outcome,
            "votes tallied"
        );
        Ok(outcome)
    }

    /// The active round and its vote, provided the window is still open.
    fn open_vote(
        &self,
        campaign_key: &AccountId,
        now: Timestamp,
    ) -> Result<(Round, RoundVote), CrowdfundError> {
        let campaign: Campaign = self.require_campaign(campaign_key)?;
        let round: Round = self.require(&campaign.active_round_key)?;
        let tally = self.current_vote(&campaign.active_round_key, &round)?;
        if tally.voting_ended {
            return Err(CrowdfundError::VotingEnded);
        }
        if !tally.is_open(now) {
            return Err(CrowdfundError::VotingClosed);
        }
        Ok((round, tally))
    }

    fn current_vote(
        &self,
        round_key: &AccountId,
        round: &Round,
    ) -> Result<RoundVote, CrowdfundError> {
        if round.round_vote.is_zero() {
            return Err(CrowdfundError::VotingNotOpen);
        }
        self.load(&keys::round_vote_key(round_key))?
            .ok_or(CrowdfundError::VotingNotOpen)
    }

    fn register_voter(
        &self,
        round: &Round,
        voter: &AccountId,
        voting_power: u64,
        voter_type: VoterType,
    ) -> Result<VoterRegistration, CrowdfundError> {
        let round_key = keys::round_key(&round.campaign, round.number);
        let registration_key = keys::voter_key(&round_key, voter);
        if self.store().exists(&registration_key)? {
            return Err(CrowdfundError::AlreadyRegistered(voter.to_string()));
        }
        let registration = VoterRegistration {
            round: round_key,
            voter: *voter,
            voting_power,
            has_voted: false,
            voter_type,
        };

        let mut batch = WriteBatch::new();
        stage(&mut batch, registration_key, &registration)?;
        self.apply(batch, None)?;

        debug!(
            round = %round_key,
            voter = %voter,
            ?voter_type,
            voting_power,
            "voter registered"
        );
        Ok(registration)
    }
}
