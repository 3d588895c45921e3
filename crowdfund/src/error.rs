use beneficence_store::StoreError;
use thiserror::Error;

/// Broad failure categories. Every variant of [`CrowdfundError`] maps to one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input, rejected before anything was read-modified.
    Validation,
    /// The operation is not allowed in the current lifecycle state.
    StateConstraint,
    /// A checked balance, stake or tally computation overflowed.
    Arithmetic,
    /// The caller is not the fundraiser, admin or registered voter required.
    Authorization,
    /// The record store or token ledger failed.
    Storage,
}

#[derive(Debug, Error)]
pub enum CrowdfundError {
    // ── Validation ─────────────────────────────────────────────────────
    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("target must be greater than 0")]
    InvalidTarget,

    #[error("a campaign needs at least one round")]
    InvalidRoundCount,

    #[error("description is {len} bytes, maximum is {max}")]
    DescriptionTooLong { len: usize, max: usize },

    #[error("content id is {len} bytes, maximum is {max}")]
    ContentIdTooLong { len: usize, max: usize },

    #[error("invalid platform parameters: {0}")]
    InvalidParams(String),

    // ── Lifecycle state ────────────────────────────────────────────────
    #[error("platform is already initialized")]
    AlreadyInitialized,

    #[error("platform has not been initialized")]
    NotInitialized,

    #[error("staking has already been initialized")]
    StakingAlreadyInitialized,

    #[error("staking has not been initialized")]
    StakingNotInitialized,

    #[error("fundraiser already has a campaign")]
    CampaignExists,

    #[error("campaign {0} not found")]
    CampaignNotFound(String),

    #[error("record {0} not found")]
    RecordNotFound(String),

    #[error("campaign has ended")]
    CampaignEnded,

    #[error("round is closed to donations")]
    RoundClosedToDonations,

    #[error("precondition violated: {0}")]
    PreconditionViolated(&'static str),

    #[error("no rounds remain in this campaign")]
    NoRoundsRemaining,

    #[error("voting has not been opened for this round")]
    VotingNotOpen,

    #[error("voting window has closed for this round")]
    VotingClosed,

    #[error("voting window is still open for another {remaining_secs}s")]
    VotingWindowOpen { remaining_secs: u64 },

    #[error("votes for this round have already been tallied")]
    VotingEnded,

    #[error("{0} is already registered")]
    AlreadyRegistered(String),

    #[error("{0} has already voted")]
    AlreadyVoted(String),

    #[error("{0} has no stake")]
    NoStake(String),

    #[error("insufficient stake: have {have}, need {need}")]
    InsufficientStake { have: u64, need: u64 },

    #[error("{0} has not donated to this round")]
    NotDonor(String),

    #[error("nothing has been staked in the pool")]
    EmptyPool,

    // ── Arithmetic ─────────────────────────────────────────────────────
    #[error("arithmetic overflow")]
    Overflow,

    // ── Authorization ──────────────────────────────────────────────────
    #[error("{0} is not authorized for this operation")]
    Unauthorized(String),

    #[error("{0} is not registered for this ballot")]
    NotRegistered(String),

    // ── Storage ────────────────────────────────────────────────────────
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("config error: {0}")]
    Config(String),
}

impl CrowdfundError {
    pub fn kind(&self) -> ErrorKind {
        use CrowdfundError::*;
        match self {
            ZeroAmount
            | InvalidTarget
            | InvalidRoundCount
            | DescriptionTooLong { .. }
            | ContentIdTooLong { .. }
            | InvalidParams(_)
            | Config(_) => ErrorKind::Validation,
            AlreadyInitialized
            | NotInitialized
            | StakingAlreadyInitialized
            | StakingNotInitialized
            | CampaignExists
            | CampaignNotFound(_)
            | RecordNotFound(_)
            | CampaignEnded
            | RoundClosedToDonations
            | PreconditionViolated(_)
            | NoRoundsRemaining
            | VotingNotOpen
            | VotingClosed
            | VotingWindowOpen { .. }
            | VotingEnded
            | AlreadyRegistered(_)
            | AlreadyVoted(_)
            | NoStake(_)
            | InsufficientStake { .. }
            | NotDonor(_)
            | EmptyPool => ErrorKind::StateConstraint,
            Overflow => ErrorKind::Arithmetic,
            Unauthorized(_) | NotRegistered(_) => ErrorKind::Authorization,
            Store(_) | Serialization(_) => ErrorKind::Storage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(CrowdfundError::ZeroAmount.kind(), ErrorKind::Validation);
        assert_eq!(
            CrowdfundError::RoundClosedToDonations.kind(),
            ErrorKind::StateConstraint
        );
        assert_eq!(
            CrowdfundError::PreconditionViolated("x").kind(),
            ErrorKind::StateConstraint
        );
        assert_eq!(CrowdfundError::Overflow.kind(), ErrorKind::Arithmetic);
        assert_eq!(
            CrowdfundError::Unauthorized("x".into()).kind(),
            ErrorKind::Authorization
        );
        let store = CrowdfundError::from(StoreError::Backend("down".into()));
        assert_eq!(store.kind(), ErrorKind::Storage);
    }
}
