//! Escrow release.

use beneficence_store::{RecordStore, TokenLedger, WriteBatch};
use beneficence_types::AccountId;
use tracing::{info, warn};

use crate::campaign::{Campaign, CampaignStatus};
use crate::engine::{stage, CrowdfundEngine, Transfer};
use crate::error::CrowdfundError;
use crate::round::{Round, RoundStatus};

/// A completed escrow release.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Withdrawal {
    pub campaign: AccountId,
    pub destination: AccountId,
    pub amount: u64,
}

impl<S: RecordStore, L: TokenLedger> CrowdfundEngine<S, L> {
    /// Release the whole escrow balance to `destination` and end the campaign.
    ///
    /// Fundraiser only. The campaign must be valid and its final round must
    /// have ended.
    pub fn withdraw(
        &self,
        signer: &AccountId,
        campaign_key: &AccountId,
        destination: &AccountId,
    ) -> Result<Withdrawal, CrowdfundError> {
        let mut campaign = self.require_campaign(campaign_key)?;
        if *signer != campaign.fundraiser {
            return Err(CrowdfundError::Unauthorized(signer.to_string()));
        }
        if let Some(reason) = self.release_blocker(&campaign)? {
            warn!(campaign = %campaign_key, reason, "withdrawal rejected");
            return Err(CrowdfundError::PreconditionViolated(reason));
        }

        let amount = self.token_balance(&campaign.asset, &campaign.vault)?;
        campaign.status = CampaignStatus::Ended;

        let mut batch = WriteBatch::new();
        stage(&mut batch, *campaign_key, &campaign)?;
        let transfer = Transfer {
            asset: campaign.asset,
            from: campaign.vault,
            to: *destination,
            amount,
        };
        self.apply(batch, Some(transfer))?;

        info!(
            campaign = %campaign_key,
            destination = %destination,
            amount,
            "escrow released"
        );
        Ok(Withdrawal {
            campaign: *campaign_key,
            destination: *destination,
            amount,
        })
    }

    /// Why the escrow cannot be released yet, if anything.
    fn release_blocker(&self, campaign: &Campaign) -> Result<Option<&'static str>, CrowdfundError> {
        if campaign.status == CampaignStatus::Ended {
            return Ok(Some("campaign has already ended"));
        }
        if !campaign.is_valid_campaign {
            return Ok(Some("campaign is not valid"));
        }
        if !campaign.is_final_round() {
            return Ok(Some("final round has not started"));
        }
        let round: Round = self.require(&campaign.active_round_key)?;
        if round.status != RoundStatus::Ended {
            return Ok(Some("final round has not ended"));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::CampaignTerms;
    use crate::engine::test_support::*;
    use crate::error::ErrorKind;
    use crate::keys;
    use crate::moderation::Verdict;
    use beneficence_types::time::SECS_PER_DAY;
    use beneficence_types::Timestamp;

    const FUNDRAISER: u8 = 20;
    const WALLET: u8 = 21;

    /// Single-round campaign, funded 60 + 50 against a target of 100, with
    /// the round's vote opened and tallied.
    fn concluded() -> (TestEngine, AccountId) {
        let engine = engine();
        engine.initialize_staking(&id(ADMIN)).unwrap();
        for (staker, amount) in [(40, 70), (41, 30)] {
            fund(&engine, &id(staker), amount);
            engine.stake(&id(staker), amount).unwrap();
        }
        engine
            .start_campaign(
                &id(FUNDRAISER),
                CampaignTerms {
                    description: "roof repair".into(),
                    target: 100,
                    total_rounds: 1,
                    initial_round_target: 100,
                    content_id: "cid".into(),
                },
            )
            .unwrap();
        let key = keys::campaign_key(&id(FUNDRAISER));
        for (donor, amount) in [(30, 60), (31, 50)] {
            fund(&engine, &id(donor), amount);
            engine.donate(&id(donor), &key, amount).unwrap();
        }
        engine
            .initialize_voting(&id(FUNDRAISER), &key, Timestamp::new(0))
            .unwrap();
        engine.tally_votes(&key, Timestamp::new(SECS_PER_DAY)).unwrap();
        for staker in [40, 41] {
            engine.init_staker_moderation(&id(staker), &key).unwrap();
        }
        (engine, key)
    }

    #[test]
    fn valid_campaign_releases_entire_escrow() {
        let (engine, key) = concluded();
        engine.moderate(&id(40), &key, Verdict::Valid).unwrap();
        engine.moderate(&id(41), &key, Verdict::Invalid).unwrap();
        let before = engine.campaign(&key).unwrap().unwrap();
        assert_eq!(before.balance, 110);

        let withdrawal = engine.withdraw(&id(FUNDRAISER), &key, &id(WALLET)).unwrap();
        assert_eq!(withdrawal.amount, 110);
        assert_eq!(balance(&engine, &id(WALLET)), 110);
        assert_eq!(engine.vault_balance(&key).unwrap(), 0);
        assert_eq!(
            engine.campaign(&key).unwrap().unwrap().status,
            CampaignStatus::Ended
        );

        let err = engine.withdraw(&id(FUNDRAISER), &key, &id(WALLET)).unwrap_err();
        assert!(matches!(err, CrowdfundError::PreconditionViolated(_)));
    }

    #[test]
    fn invalid_campaign_keeps_escrow() {
        let (engine, key) = concluded();
        engine.moderate(&id(40), &key, Verdict::Invalid).unwrap();
        engine.moderate(&id(41), &key, Verdict::Valid).unwrap();

        let err = engine.withdraw(&id(FUNDRAISER), &key, &id(WALLET)).unwrap_err();
        assert!(matches!(err, CrowdfundError::PreconditionViolated(_)));
        assert_eq!(err.kind(), ErrorKind::StateConstraint);
        assert_eq!(engine.vault_balance(&key).unwrap(), 110);
        assert_eq!(balance(&engine, &id(WALLET)), 0);
        assert_eq!(
            engine.campaign(&key).unwrap().unwrap().status,
            CampaignStatus::AwaitingDecision
        );
    }

    #[test]
    fn unfinished_campaign_keeps_escrow() {
        let engine = engine();
        engine
            .start_campaign(
                &id(FUNDRAISER),
                CampaignTerms {
                    description: String::new(),
                    target: 550,
                    total_rounds: 2,
                    initial_round_target: 100,
                    content_id: String::new(),
                },
            )
            .unwrap();
        let key = keys::campaign_key(&id(FUNDRAISER));
        fund(&engine, &id(30), 100);
        engine.donate(&id(30), &key, 100).unwrap();

        let err = engine.withdraw(&id(FUNDRAISER), &key, &id(WALLET)).unwrap_err();
        assert!(matches!(err, CrowdfundError::PreconditionViolated(_)));
        assert_eq!(engine.vault_balance(&key).unwrap(), 100);
    }

    #[test]
    fn only_fundraiser_withdraws() {
        let (engine, key) = concluded();
        let err = engine.withdraw(&id(30), &key, &id(30)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
        assert_eq!(engine.vault_balance(&key).unwrap(), 110);
    }
}
