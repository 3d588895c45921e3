use proptest::prelude::*;

use beneficence_crowdfund::keys;
use beneficence_crowdfund::{
    continuation_wins, voting_power, CampaignTerms, CrowdfundEngine, CrowdfundError,
    PlatformConfig, RoundStatus,
};
use beneficence_nullables::{NullStore, NullTokenLedger};
use beneficence_types::AccountId;

fn id(n: u8) -> AccountId {
    AccountId::new([n; 32])
}

proptest! {
    /// Voting power is exactly the floored share of the rights percentage.
    #[test]
    fn voting_power_is_floor_of_share(
        pool in 1u64..1_000_000_000,
        share_pct in 0u64..=100,
        rights in 0u8..=100,
    ) {
        let contribution = pool / 100 * share_pct;
        let power = voting_power(contribution, pool, rights).unwrap();
        prop_assert!(power <= u64::from(rights));
        prop_assert!(power * pool <= contribution * u64::from(rights));
        prop_assert!((power + 1) * pool > contribution * u64::from(rights));
    }

    /// Raising the continue weight never flips a win into a loss.
    #[test]
    fn continuation_is_monotone_in_continue_votes(
        cont in 0u64..1_000_000,
        extra in 0u64..1_000_000,
        term in 0u64..1_000_000,
        pct in 0u8..=100,
    ) {
        if continuation_wins(cont, term, pct) {
            prop_assert!(continuation_wins(cont + extra, term, pct));
        }
    }

    /// Unanimous continue always wins; any terminate weight loses at 100%.
    #[test]
    fn continuation_extremes(weight in 1u64..u64::MAX, pct in 0u8..=100) {
        prop_assert!(continuation_wins(weight, 0, pct));
        prop_assert!(!continuation_wins(0, weight, 100));
    }

    /// A round closes exactly at the first donation that reaches its target,
    /// and every later donation is rejected without changing its balance.
    #[test]
    fn round_closes_once_at_target(
        target in 1u64..1_000,
        donations in prop::collection::vec(1u64..200, 1..20),
    ) {
        let engine = CrowdfundEngine::new(
            NullStore::new(),
            NullTokenLedger::new(),
            id(1),
            &PlatformConfig::default(),
        );
        engine.initialize(&id(1), id(2)).unwrap();
        engine
            .start_campaign(
                &id(3),
                CampaignTerms {
                    description: String::new(),
                    target: target * 2,
                    total_rounds: 2,
                    initial_round_target: target,
                    content_id: String::new(),
                },
            )
            .unwrap();
        let campaign = keys::campaign_key(&id(3));

        let mut expected = 0u64;
        for (i, amount) in donations.iter().enumerate() {
            let donor = id(10 + i as u8);
            engine.ledger().mint(&id(2), &donor, *amount).unwrap();
            let result = engine.donate(&donor, &campaign, *amount);
            if expected >= target {
                prop_assert!(matches!(result, Err(CrowdfundError::RoundClosedToDonations)));
            } else {
                let round = result.unwrap();
                expected += amount;
                prop_assert_eq!(round.balance, expected);
                prop_assert_eq!(round.status == RoundStatus::ClosedToDonations, expected >= target);
            }
        }
        let round = engine.round(&campaign, 1).unwrap().unwrap();
        prop_assert_eq!(round.balance, expected);
        prop_assert_eq!(engine.vault_balance(&campaign).unwrap(), expected);
    }
}
