//! Funding rounds and the per-(round, donor) donation ledger.

use beneficence_types::AccountId;
use serde::{Deserialize, Serialize};

use crate::engine::Record;

/// Lifecycle of one round: `Active → ClosedToDonations → Ended`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundStatus {
    /// Accepting donations.
    Active,
    /// Target reached; waiting for the continuation vote.
    ClosedToDonations,
    /// Continuation vote tallied.
    Ended,
}

/// One funding stage of a campaign, at `H("round", campaign, number)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub campaign: AccountId,
    /// 1-based.
    pub number: u16,
    pub target: u64,
    pub balance: u64,
    /// Distinct donors in this round.
    pub donors: u64,
    pub status: RoundStatus,
    /// `AccountId::ZERO` until voting is initialized.
    pub round_vote: AccountId,
}

impl Round {
    pub fn new(campaign: AccountId, number: u16, target: u64) -> Self {
        Self {
            campaign,
            number,
            target,
            balance: 0,
            donors: 0,
            status: RoundStatus::Active,
            round_vote: AccountId::ZERO,
        }
    }

    pub fn target_reached(&self) -> bool {
        self.balance >= self.target
    }
}

impl Record for Round {
    const KIND: &'static str = "round";
}

/// Cumulative contribution of one donor to one round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationRecord {
    pub round: AccountId,
    /// Round number, for callers that only hold the record.
    pub round_number: u16,
    pub donor: AccountId,
    pub amount: u64,
}

impl Record for DonationRecord {
    const KIND: &'static str = "donation";
}
