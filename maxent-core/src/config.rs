//! # Configuration - Indexing and Model Parameters
//!
//! These parameters control how training events are compressed and
//! how a trained model is laid out for evaluation.

use serde::{Deserialize, Serialize};

use crate::error::{MaxentError, MaxentResult};

/// Master configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MaxentConfig {
    /// Event indexing settings
    pub indexing: IndexingConfig,

    /// Model layout and evaluation settings
    pub model: ModelConfig,
}

/// Event indexing
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndexingConfig {
    /// Minimum number of times a predicate must be observed to be kept
    pub cutoff: u32,

    /// Sort observations and merge duplicates
    pub sort: bool,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            cutoff: 5,
            sort: true,
        }
    }
}

/// Model layout and evaluation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Load factor of the predicate key table, in (0, 1]
    pub load_factor: f64,

    /// Maximum number of features fired in an event (0 = no correction)
    pub correction_constant: u32,

    /// Weight of the correction feature
    pub correction_param: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            load_factor: crate::DEFAULT_LOAD_FACTOR,
            correction_constant: 0,
            correction_param: 0.0,
        }
    }
}

impl MaxentConfig {
    /// Load configuration from file
    pub fn load(path: impl AsRef<std::path::Path>) -> MaxentResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> MaxentResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check every value is usable before anything is built from it
    pub fn validate(&self) -> MaxentResult<()> {
        let lf = self.model.load_factor;
        if !(lf > 0.0 && lf <= 1.0) {
            return Err(MaxentError::config(format!(
                "load factor must be greater than zero and less or equal to 1, got {}",
                lf
            )));
        }
        if !self.model.correction_param.is_finite() {
            return Err(MaxentError::config("correction parameter must be finite"));
        }
        Ok(())
    }

    /// Create config from environment variables
    ///
    /// Reads:
    /// - MAXENT_CUTOFF: Predicate cutoff (default: 5)
    /// - MAXENT_SORT: "0"/"false" disables sort and merge (default: on)
    /// - MAXENT_LOAD_FACTOR: Key table load factor (default: 0.7)
    /// - MAXENT_CORRECTION_CONSTANT: Correction constant (default: 0)
    /// - MAXENT_CORRECTION_PARAM: Correction parameter (default: 0.0)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(v) = env_parse("MAXENT_CUTOFF") {
            config.indexing.cutoff = v;
        }
        if let Ok(val) = std::env::var("MAXENT_SORT") {
            let val = val.to_lowercase();
            config.indexing.sort = !(val == "0" || val == "false");
        }
        if let Some(v) = env_parse("MAXENT_LOAD_FACTOR") {
            config.model.load_factor = v;
        }
        if let Some(v) = env_parse("MAXENT_CORRECTION_CONSTANT") {
            config.model.correction_constant = v;
        }
        if let Some(v) = env_parse("MAXENT_CORRECTION_PARAM") {
            config.model.correction_param = v;
        }

        config
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}
