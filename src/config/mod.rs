mod file_config;

pub use file_config::FileConfig;

use crate::weights::DEFAULT_TAIL_YEARS;
use anyhow::{bail, Result};
use std::collections::BTreeMap;

/// CLI arguments that can be used for settings resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML
/// config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub debug: bool,
    pub age_tail_years: Option<u8>,
}

/// Resolved engine settings, fed into [`crate::pipeline::Pipeline::core`].
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Whether ranked garments carry per-stage explanations.
    pub debug: bool,
    /// Years outside a brand's age range that still score in the age weight.
    pub age_tail_years: u8,
    /// Importance overrides by weight slug.
    pub importance: BTreeMap<String, f64>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            debug: false,
            age_tail_years: DEFAULT_TAIL_YEARS,
            importance: BTreeMap::new(),
        }
    }
}

impl EngineSettings {
    /// Resolve settings from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let debug = file.debug.unwrap_or(cli.debug);
        let age_tail_years = file
            .age_tail_years
            .or(cli.age_tail_years)
            .unwrap_or(DEFAULT_TAIL_YEARS);

        let importance = file.importance.unwrap_or_default();
        for (slug, value) in &importance {
            if !value.is_finite() || *value <= 0.0 {
                bail!(
                    "importance for weight {:?} must be a positive number, got {}",
                    slug,
                    value
                );
            }
        }

        Ok(Self {
            debug,
            age_tail_years,
            importance,
        })
    }
}
