//! Milestone crowdfunding with staked governance.
//!
//! A fundraiser opens a [`Campaign`] funded in sequential [`Round`]s. Donations
//! go into the campaign's escrow vault; once a round reaches its target it
//! closes, and donors of that round together with stakers decide through a
//! weighted continuation vote whether the next round may start. Independently,
//! stakers moderate the campaign, and the fundraiser may only withdraw the
//! escrow once the campaign is judged valid and its final round has ended.
//!
//! Everything runs through [`CrowdfundEngine`], which is generic over the
//! record store and token ledger it is given (see `beneficence-store`).
//!
//! ## Modules
//!
//! - [`engine`]: the engine, record access and the commit path
//! - [`staking`]: staking pool and deposits
//! - [`campaign`] / [`round`]: campaign and round lifecycle, donations
//! - [`voting`]: continuation vote
//! - [`moderation`]: campaign validity vote
//! - [`escrow`]: withdrawal
//! - [`keys`]: derived record addresses
//! - [`config`]: TOML configuration

pub mod campaign;
pub mod config;
pub mod engine;
pub mod error;
pub mod escrow;
pub mod keys;
pub mod moderation;
pub mod registry;
pub mod round;
pub mod staking;
pub mod voting;

pub use campaign::{Campaign, CampaignStatus, CampaignTerms, Vault};
pub use config::PlatformConfig;
pub use engine::{CrowdfundEngine, Record};
pub use error::{CrowdfundError, ErrorKind};
pub use escrow::Withdrawal;
pub use moderation::{ModeratorRegistration, Verdict};
pub use registry::ConfigRegistry;
pub use round::{DonationRecord, Round, RoundStatus};
pub use staking::{StakeRecord, StakingPool};
pub use voting::{
    continuation_wins, voting_power, Ballot, RoundVote, TallyOutcome, VoterRegistration, VoterType,
};
