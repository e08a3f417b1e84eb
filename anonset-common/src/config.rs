//! Configuration management for anonset.
//!
//! Settings are stored in TOML. Every section and field has a default, so a
//! partial file (or an empty one) is a valid configuration. Values are
//! checked by [`Config::validate`] before they reach the selector.
//!
//! ```toml
//! [selection]
//! anonymity_target = 2
//! max_coins = 3
//! shuffle_chance_percent = 10
//! probability_scaling = "fractional"
//!
//! [selection.tier_caps]
//! red = 1999
//!
//! [trials]
//! count = 100
//! seed = 42
//! score_order = "higher_is_better"
//! ```

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use crate::coin_selection::types::{AnonsetTier, ProbabilityScaling, SelectionParams};
use crate::error::{config_error, config_error_with_source, AnonsetResult, ErrorContext};
use crate::logging::{self, LogConfig, LogLevel};
use crate::trials::ScoreOrder;
use crate::validation;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub selection: SelectionConfig,

    #[serde(default)]
    pub trials: TrialsConfig,

    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Parameters of a single selection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    #[serde(default = "default_anonymity_target")]
    pub anonymity_target: u32,

    #[serde(default = "default_max_coins")]
    pub max_coins: usize,

    #[serde(default = "default_shuffle_chance")]
    pub shuffle_chance_percent: u32,

    #[serde(default)]
    pub probability_scaling: ProbabilityScaling,

    /// Maximum selected coins per tier, keyed by tier name (red, orange, green).
    /// Kept last: TOML tables must follow plain values.
    #[serde(default = "default_tier_caps")]
    pub tier_caps: BTreeMap<String, usize>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            anonymity_target: default_anonymity_target(),
            max_coins: default_max_coins(),
            shuffle_chance_percent: default_shuffle_chance(),
            probability_scaling: ProbabilityScaling::default(),
            tier_caps: default_tier_caps(),
        }
    }
}

/// Repeated runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialsConfig {
    #[serde(default = "default_trial_count")]
    pub count: usize,

    /// Base seed; a random one is drawn (and logged) when absent
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub score_order: ScoreOrder,
}

impl Default for TrialsConfig {
    fn default() -> Self {
        Self {
            count: default_trial_count(),
            seed: None,
            score_order: ScoreOrder::default(),
        }
    }
}

/// Synthetic input generation for demonstration runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_min_coins")]
    pub min_coins: usize,

    #[serde(default = "default_generated_coins")]
    pub max_coins: usize,

    #[serde(default)]
    pub min_payments: usize,

    #[serde(default)]
    pub max_payments: usize,

    /// Exclusive upper bound of generated coin and payment values
    #[serde(default = "default_max_value")]
    pub max_value: u32,

    /// Exclusive upper bound of generated anonymity sets
    #[serde(default = "default_max_anonymity_set")]
    pub max_anonymity_set: u32,

    /// Number of distinct origins to spread coins over (0 = no origins)
    #[serde(default)]
    pub origin_pool: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_coins: default_min_coins(),
            max_coins: default_generated_coins(),
            min_payments: 0,
            max_payments: 0,
            max_value: default_max_value(),
            max_anonymity_set: default_max_anonymity_set(),
            origin_pool: 0,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    #[serde(default)]
    pub json_format: bool,

    #[serde(default)]
    pub log_file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
            log_file: None,
        }
    }
}

impl LoggingConfig {
    /// Logging system configuration for these settings
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            level: self.level,
            log_file: self.log_file.clone(),
            json_format: self.json_format,
            ..LogConfig::default()
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> AnonsetResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file {}", path.display()))?;

        let config = toml::from_str::<Config>(&content)
            .context(format!("Failed to parse config file {}", path.display()))?;

        logging::log_config(
            LogLevel::Debug,
            "configuration loaded",
            Some(json!({ "path": path.display().to_string() })),
        );

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> AnonsetResult<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content)
            .context(format!("Failed to write config file {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> AnonsetResult<()> {
        validation::validate_params(&self.selection_params()?)?;

        if self.trials.count == 0 {
            return Err(config_error("Invalid trial count: must be greater than 0"));
        }

        let generator = &self.generator;
        if generator.min_coins > generator.max_coins {
            return Err(config_error(format!(
                "Invalid generator coin range: {}..={}",
                generator.min_coins, generator.max_coins
            )));
        }
        if generator.min_payments > generator.max_payments {
            return Err(config_error(format!(
                "Invalid generator payment range: {}..={}",
                generator.min_payments, generator.max_payments
            )));
        }
        if generator.max_value < 2 {
            return Err(config_error("Invalid generator max_value: must be at least 2"));
        }
        if generator.max_anonymity_set == 0 {
            return Err(config_error(
                "Invalid generator max_anonymity_set: must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Selection parameters described by the `[selection]` section
    pub fn selection_params(&self) -> AnonsetResult<SelectionParams> {
        let selection = &self.selection;

        let mut tier_caps = HashMap::with_capacity(selection.tier_caps.len());
        for (name, cap) in &selection.tier_caps {
            let tier: AnonsetTier = name.parse().map_err(|e| {
                config_error_with_source(format!("Invalid tier cap entry '{}'", name), e)
            })?;
            tier_caps.insert(tier, *cap);
        }

        Ok(SelectionParams {
            anonymity_target: selection.anonymity_target,
            max_coins: selection.max_coins,
            tier_caps,
            shuffle_chance_percent: selection.shuffle_chance_percent,
            probability_scaling: selection.probability_scaling,
        })
    }
}

/// Ensure a configuration file exists at the specified path
/// If it doesn't exist, create it with default values
pub fn ensure_config_exists(path: &Path) -> AnonsetResult<()> {
    if !path.exists() {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
        }

        Config::default().save(path)?;

        logging::log_config(
            LogLevel::Info,
            "default configuration written",
            Some(json!({ "path": path.display().to_string() })),
        );
    }

    Ok(())
}

// Default value functions

fn default_anonymity_target() -> u32 {
    2
}

fn default_max_coins() -> usize {
    3
}

fn default_tier_caps() -> BTreeMap<String, usize> {
    let mut caps = BTreeMap::new();
    caps.insert(AnonsetTier::Red.to_string(), 1999);
    caps
}

fn default_shuffle_chance() -> u32 {
    10
}

fn default_trial_count() -> usize {
    100
}

fn default_min_coins() -> usize {
    1
}

fn default_generated_coins() -> usize {
    50
}

fn default_max_value() -> u32 {
    100
}

fn default_max_anonymity_set() -> u32 {
    3
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}
