//! The crowdfunding engine: record access, commit path and deployment setup.
//!
//! Every public operation follows the same shape: load the records it names,
//! run all validations, compute the new record values, then hand them to
//! [`CrowdfundEngine::apply`] together with at most one token transfer. No
//! record is written before every check has passed.

use beneficence_store::{RecordStore, TokenLedger, WriteBatch};
use beneficence_types::{AccountId, PlatformParams};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::campaign::{Campaign, Vault};
use crate::config::{validate_params, PlatformConfig};
use crate::error::CrowdfundError;
use crate::keys;
use crate::moderation::ModeratorRegistration;
use crate::registry::ConfigRegistry;
use crate::round::{DonationRecord, Round};
use crate::staking::{StakeRecord, StakingPool};
use crate::voting::{RoundVote, VoterRegistration};

/// A record type persisted under a derived key.
pub trait Record: Serialize + DeserializeOwned {
    /// Human-readable record kind, used in errors and logs.
    const KIND: &'static str;
}

/// A token movement paired with an operation's record writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Transfer {
    pub asset: AccountId,
    pub from: AccountId,
    pub to: AccountId,
    pub amount: u64,
}

/// Size limits applied to campaign metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ContentLimits {
    pub max_description_len: usize,
    pub max_content_id_len: usize,
}

/// The platform core for one deployment.
///
/// The deployment is identified by its admin; the configuration registry is
/// read from `H("config", admin)` on every operation rather than cached, so
/// the engine holds no state of its own beyond the handles it was given.
pub struct CrowdfundEngine<S, L> {
    store: S,
    ledger: L,
    admin: AccountId,
    config_key: AccountId,
    params: PlatformParams,
    pub(crate) limits: ContentLimits,
}

impl<S: RecordStore, L: TokenLedger> CrowdfundEngine<S, L> {
    pub fn new(store: S, ledger: L, admin: AccountId, config: &PlatformConfig) -> Self {
        Self {
            store,
            ledger,
            admin,
            config_key: keys::config_key(&admin),
            params: config.params(),
            limits: ContentLimits {
                max_description_len: config.max_description_len,
                max_content_id_len: config.max_content_id_len,
            },
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn admin(&self) -> &AccountId {
        &self.admin
    }

    pub fn config_key(&self) -> &AccountId {
        &self.config_key
    }

    /// Create the configuration registry. Callable once, by the admin.
    pub fn initialize(
        &self,
        signer: &AccountId,
        native_asset: AccountId,
    ) -> Result<ConfigRegistry, CrowdfundError> {
        if *signer != self.admin {
            return Err(CrowdfundError::Unauthorized(signer.to_string()));
        }
        validate_params(&self.params)?;
        if self.store.exists(&self.config_key)? {
            return Err(CrowdfundError::AlreadyInitialized);
        }

        let registry = ConfigRegistry::new(self.admin, native_asset, self.params.clone());
        let mut batch = WriteBatch::new();
        stage(&mut batch, self.config_key, &registry)?;
        self.apply(batch, None)?;

        info!(
            admin = %self.admin,
            config = %self.config_key,
            asset = %native_asset,
            "platform initialized"
        );
        Ok(registry)
    }

    // ── Record access ──────────────────────────────────────────────────

    pub(crate) fn load<T: Record>(&self, key: &AccountId) -> Result<Option<T>, CrowdfundError> {
        match self.store.get_record(key)? {
            Some(bytes) => bincode::deserialize(&bytes)
                .map(Some)
                .map_err(|e| CrowdfundError::Serialization(format!("{} {}: {}", T::KIND, key, e))),
            None => Ok(None),
        }
    }

    pub(crate) fn require<T: Record>(&self, key: &AccountId) -> Result<T, CrowdfundError> {
        self.load(key)?
            .ok_or_else(|| CrowdfundError::RecordNotFound(format!("{} {}", T::KIND, key)))
    }

    pub(crate) fn registry(&self) -> Result<ConfigRegistry, CrowdfundError> {
        self.load(&self.config_key)?.ok_or(CrowdfundError::NotInitialized)
    }

    pub(crate) fn require_campaign(&self, key: &AccountId) -> Result<Campaign, CrowdfundError> {
        self.load(key)?
            .ok_or_else(|| CrowdfundError::CampaignNotFound(key.to_string()))
    }

    /// Commit an operation: move tokens first, then write every staged record.
    ///
    /// The substrate guarantees the pair is atomic. Against the nullables a
    /// failed transfer leaves both the ledger and the store untouched, and
    /// `RecordStore::commit` of a validated batch does not fail.
    pub(crate) fn apply(
        &self,
        batch: WriteBatch,
        transfer: Option<Transfer>,
    ) -> Result<(), CrowdfundError> {
        if let Some(t) = transfer {
            if t.amount > 0 {
                self.ledger.transfer(&t.asset, &t.from, &t.to, t.amount)?;
            }
        }
        self.store.commit(batch)?;
        Ok(())
    }

    pub(crate) fn token_balance(
        &self,
        asset: &AccountId,
        holder: &AccountId,
    ) -> Result<u64, CrowdfundError> {
        Ok(self.ledger.balance(asset, holder)?)
    }

    // ── Read accessors ─────────────────────────────────────────────────

    /// The configuration registry, `None` before `initialize`.
    pub fn config(&self) -> Result<Option<ConfigRegistry>, CrowdfundError> {
        self.load(&self.config_key)
    }

    pub fn staking_pool(&self) -> Result<Option<StakingPool>, CrowdfundError> {
        self.load(&keys::staking_pool_key(&self.config_key))
    }

    pub fn stake_record(&self, staker: &AccountId) -> Result<Option<StakeRecord>, CrowdfundError> {
        self.load(&keys::stake_record_key(staker))
    }

    pub fn campaign(&self, campaign: &AccountId) -> Result<Option<Campaign>, CrowdfundError> {
        self.load(campaign)
    }

    pub fn vault(&self, campaign: &AccountId) -> Result<Option<Vault>, CrowdfundError> {
        self.load(&keys::vault_key(campaign))
    }

    pub fn round(
        &self,
        campaign: &AccountId,
        number: u16,
    ) -> Result<Option<Round>, CrowdfundError> {
        self.load(&keys::round_key(campaign, number))
    }

    pub fn donation(
        &self,
        round: &AccountId,
        donor: &AccountId,
    ) -> Result<Option<DonationRecord>, CrowdfundError> {
        self.load(&keys::donation_key(round, donor))
    }

    pub fn round_vote(&self, round: &AccountId) -> Result<Option<RoundVote>, CrowdfundError> {
        self.load(&keys::round_vote_key(round))
    }

    pub fn voter(
        &self,
        round: &AccountId,
        voter: &AccountId,
    ) -> Result<Option<VoterRegistration>, CrowdfundError> {
        self.load(&keys::voter_key(round, voter))
    }

    pub fn moderator(
        &self,
        campaign: &AccountId,
        staker: &AccountId,
    ) -> Result<Option<ModeratorRegistration>, CrowdfundError> {
        self.load(&keys::moderator_key(campaign, staker))
    }

    /// Tokens currently held in a campaign's escrow vault.
    pub fn vault_balance(&self, campaign: &AccountId) -> Result<u64, CrowdfundError> {
        let campaign_record = self.require_campaign(campaign)?;
        self.token_balance(&campaign_record.asset, &campaign_record.vault)
    }
}

/// Serialize a record into the batch under `key`.
pub(crate) fn stage<T: Record>(
    batch: &mut WriteBatch,
    key: AccountId,
    record: &T,
) -> Result<(), CrowdfundError> {
    let bytes = bincode::serialize(record)
        .map_err(|e| CrowdfundError::Serialization(format!("{} {}: {}", T::KIND, key, e)))?;
    batch.put(key, bytes);
    Ok(())
}
