//! Platform configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use beneficence_types::PlatformParams;
use beneficence_utils::LogFormat;

use crate::CrowdfundError;

/// Deployment configuration for a crowdfunding platform.
///
/// Can be loaded from a TOML file via [`PlatformConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). The governance values are copied
/// into the configuration registry when the platform is initialized; changing
/// the file afterwards does not affect a running deployment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Platform fee recorded in the registry.
    #[serde(default)]
    pub fee: u64,

    /// Length of a round's continuation vote in days.
    #[serde(default = "default_voting_period_days")]
    pub round_voting_period_days: u16,

    /// Percentage of cast weight `continue` must reach to open the next round.
    #[serde(default = "default_min_vote_percentage")]
    pub minimum_required_vote_percentage: u8,

    #[serde(default = "default_donator_rights")]
    pub donator_voting_rights: u8,

    #[serde(default = "default_staker_rights")]
    pub staker_voting_rights: u8,

    #[serde(default = "default_moderation_rights")]
    pub staker_moderation_rights: u8,

    /// Maximum campaign description length in bytes.
    #[serde(default = "default_max_description_len")]
    pub max_description_len: usize,

    /// Maximum content-id length in bytes.
    #[serde(default = "default_max_content_id_len")]
    pub max_content_id_len: usize,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_voting_period_days() -> u16 {
    1
}

fn default_min_vote_percentage() -> u8 {
    30
}

fn default_donator_rights() -> u8 {
    60
}

fn default_staker_rights() -> u8 {
    40
}

fn default_moderation_rights() -> u8 {
    100
}

fn default_max_description_len() -> usize {
    200
}

fn default_max_content_id_len() -> usize {
    64
}

fn default_log_format() -> LogFormat {
    LogFormat::Human
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl PlatformConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, CrowdfundError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| CrowdfundError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, CrowdfundError> {
        let config: Self = toml::from_str(s).map_err(|e| CrowdfundError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, CrowdfundError> {
        toml::to_string_pretty(self).map_err(|e| CrowdfundError::Config(e.to_string()))
    }

    /// Reject values no deployment can work with.
    pub fn validate(&self) -> Result<(), CrowdfundError> {
        validate_params(&self.params())
    }

    /// Install the global tracing subscriber described by `log_format` and
    /// `log_level`.
    pub fn init_logging(&self) -> Result<(), CrowdfundError> {
        beneficence_utils::init_logging(self.log_format, &self.log_level)
            .map_err(|e| CrowdfundError::Config(e.to_string()))
    }

    /// Governance parameters to store in the configuration registry.
    pub fn params(&self) -> PlatformParams {
        PlatformParams {
            fee: self.fee,
            round_voting_period_in_days: self.round_voting_period_days,
            minimum_required_vote_percentage: self.minimum_required_vote_percentage,
            donator_voting_rights: self.donator_voting_rights,
            staker_voting_rights: self.staker_voting_rights,
            staker_moderation_rights: self.staker_moderation_rights,
        }
    }
}

/// Shared by config loading and registry initialization.
pub(crate) fn validate_params(params: &PlatformParams) -> Result<(), CrowdfundError> {
    if params.minimum_required_vote_percentage > 100 {
        return Err(CrowdfundError::InvalidParams(format!(
            "minimum_required_vote_percentage is {}, must be at most 100",
            params.minimum_required_vote_percentage
        )));
    }
    if params.round_voting_period_in_days == 0 {
        return Err(CrowdfundError::InvalidParams(
            "round_voting_period_days must be at least 1".into(),
        ));
    }
    Ok(())
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            fee: 0,
            round_voting_period_days: default_voting_period_days(),
            minimum_required_vote_percentage: default_min_vote_percentage(),
            donator_voting_rights: default_donator_rights(),
            staker_voting_rights: default_staker_rights(),
            staker_moderation_rights: default_moderation_rights(),
            max_description_len: default_max_description_len(),
            max_content_id_len: default_max_content_id_len(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
