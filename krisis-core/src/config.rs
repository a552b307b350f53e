//! Configuration types for the Krisis pipeline

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for an evaluation run
///
/// Passed explicitly into the harness rather than read from ambient state,
/// so runs stay pure and reproducible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Minimum pass rate required by the gate, in `[0.0, 1.0]`
    pub pass_threshold: f64,

    /// Delay the simulator represents before a `timeout` scenario fails
    ///
    /// Zero by default so a full suite completes without real waits; the
    /// failure semantics are identical at any value.
    #[serde(with = "humantime_serde")]
    pub simulated_delay: Duration,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            pass_threshold: 1.0,
            simulated_delay: Duration::ZERO,
        }
    }
}

impl EvalConfig {
    /// Set the pass-rate threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.pass_threshold = threshold;
        self
    }

    /// Set the simulated tool delay
    pub fn with_simulated_delay(mut self, delay: Duration) -> Self {
        self.simulated_delay = delay;
        self
    }

    /// Load configuration from file and environment variables.
    ///
    /// Loads in this order:
    /// 1. Default configuration
    /// 2. Configuration file (krisis.toml or path from KRISIS_CONFIG_PATH)
    /// 3. Environment variable overrides (KRISIS_*)
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is invalid or the merged
    /// configuration fails validation.
    pub fn load() -> crate::error::Result<Self> {
        use figment::{
            Figment,
            providers::{Env, Format, Serialized, Toml},
        };

        let mut figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file("krisis.toml"))
            .merge(Env::prefixed("KRISIS_"));

        // Check for custom config path
        if let Ok(path) = std::env::var("KRISIS_CONFIG_PATH") {
            figment = figment.merge(Toml::file(path));
        }

        let config: Self = figment.extract().map_err(|e| {
            crate::error::KrisisError::Configuration(format!("Failed to load configuration: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::error::Result<Self> {
        use figment::{
            Figment,
            providers::{Format, Serialized, Toml},
        };

        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| {
                crate::error::KrisisError::Configuration(format!(
                    "Failed to load configuration file: {}",
                    e
                ))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// A threshold outside `[0.0, 1.0]` invalidates the meaning of the gate
    /// and is rejected up front.
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.pass_threshold.is_finite() || !(0.0..=1.0).contains(&self.pass_threshold) {
            return Err(crate::error::KrisisError::Configuration(format!(
                "pass_threshold must be within [0.0, 1.0], got {}",
                self.pass_threshold
            )));
        }
        Ok(())
    }
}
