//! Governance parameters of a platform deployment.
//!
//! A copy of these values lives in the configuration registry record created at
//! initialisation; every engine operation reads them from there.

use serde::{Deserialize, Serialize};

/// Governance parameters copied into the configuration registry.
///
/// The three rights percentages are independent of one another: nothing
/// requires `donator_voting_rights + staker_voting_rights` to sum to 100.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformParams {
    /// Platform fee recorded in the registry. Not charged by any flow.
    pub fee: u64,

    /// Length of a round's continuation vote, in whole days.
    pub round_voting_period_in_days: u16,

    /// Share (percent) of the cast weight that `continue` must reach.
    pub minimum_required_vote_percentage: u8,

    /// Rights multiplier applied to a donor's share of the round balance.
    pub donator_voting_rights: u8,

    /// Rights multiplier applied to a staker's share of the pool for round votes.
    pub staker_voting_rights: u8,

    /// Rights multiplier applied to a staker's share of the pool for moderation.
    pub staker_moderation_rights: u8,
}

impl PlatformParams {
    /// Defaults of the reference deployment.
    pub fn beneficence_defaults() -> Self {
        Self {
            fee: 0,
            round_voting_period_in_days: 1,
            minimum_required_vote_percentage: 30,
            donator_voting_rights: 60,
            staker_voting_rights: 40,
            staker_moderation_rights: 100,
        }
    }
}

impl Default for PlatformParams {
    fn default() -> Self {
        Self::beneficence_defaults()
    }
}
