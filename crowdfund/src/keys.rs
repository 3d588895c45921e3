//! Derived record addresses.
//!
//! Every record lives at `H(namespace, owner ids...)`. External callers derive
//! the same keys to locate records, so namespaces and seed encodings are part
//! of the platform's interface and must not change.

use beneficence_types::AccountId;

pub const CONFIG: &str = "config";
pub const STAKING_POOL: &str = "staking-pool";
pub const STAKER: &str = "staker";
pub const CAMPAIGN: &str = "campaign";
pub const VAULT: &str = "vault";
pub const ROUND: &str = "round";
pub const VOTING: &str = "voting";
pub const DONATOR: &str = "donator";
pub const VOTER: &str = "voter";
pub const MODERATOR: &str = "moderator";

pub fn config_key(admin: &AccountId) -> AccountId {
    AccountId::derive(CONFIG, &[admin.as_bytes()])
}

pub fn staking_pool_key(config: &AccountId) -> AccountId {
    AccountId::derive(STAKING_POOL, &[config.as_bytes()])
}

pub fn stake_record_key(staker: &AccountId) -> AccountId {
    AccountId::derive(STAKER, &[staker.as_bytes()])
}

pub fn campaign_key(fundraiser: &AccountId) -> AccountId {
    AccountId::derive(CAMPAIGN, &[fundraiser.as_bytes()])
}

pub fn vault_key(campaign: &AccountId) -> AccountId {
    AccountId::derive(VAULT, &[campaign.as_bytes()])
}

/// Round numbers are encoded big-endian.
pub fn round_key(campaign: &AccountId, round: u16) -> AccountId {
    AccountId::derive(ROUND, &[campaign.as_bytes(), &round.to_be_bytes()])
}

pub fn round_vote_key(round: &AccountId) -> AccountId {
    AccountId::derive(VOTING, &[round.as_bytes()])
}

pub fn donation_key(round: &AccountId, donor: &AccountId) -> AccountId {
    AccountId::derive(DONATOR, &[round.as_bytes(), donor.as_bytes()])
}

pub fn voter_key(round: &AccountId, voter: &AccountId) -> AccountId {
    AccountId::derive(VOTER, &[round.as_bytes(), voter.as_bytes()])
}

pub fn moderator_key(campaign: &AccountId, staker: &AccountId) -> AccountId {
    AccountId::derive(MODERATOR, &[campaign.as_bytes(), staker.as_bytes()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_owner_different_namespaces_never_collide() {
        let owner = AccountId::new([3u8; 32]);
        let keys = [
            config_key(&owner),
            staking_pool_key(&owner),
            stake_record_key(&owner),
            campaign_key(&owner),
            vault_key(&owner),
            round_key(&owner, 1),
            round_vote_key(&owner),
            donation_key(&owner, &owner),
            voter_key(&owner, &owner),
            moderator_key(&owner, &owner),
        ];
        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn rounds_of_a_campaign_are_distinct() {
        let campaign = campaign_key(&AccountId::new([1u8; 32]));
        assert_ne!(round_key(&campaign, 1), round_key(&campaign, 2));
    }

    #[test]
    fn voter_and_donation_keys_are_per_round() {
        let campaign = campaign_key(&AccountId::new([1u8; 32]));
        let donor = AccountId::new([2u8; 32]);
        let r1 = round_key(&campaign, 1);
        let r2 = round_key(&campaign, 2);
        assert_ne!(donation_key(&r1, &donor), donation_key(&r2, &donor));
        assert_ne!(voter_key(&r1, &donor), voter_key(&r2, &donor));
    }
}
