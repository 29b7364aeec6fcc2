//! Configuration for the record store and its core engines

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Ordered roster; position determines buyer rotation
    pub roster: Vec<String>,

    /// Week whose buyer is `roster[0]`
    pub rotation_epoch: NaiveDate,

    /// Settled/noise threshold for the netting engine
    pub tolerance: f64,

    /// Days an archived record is retained before pruning
    pub archive_retention_days: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            roster: vec![
                "bee".to_string(),
                "elsa".to_string(),
                "jim".to_string(),
                "betty".to_string(),
            ],
            rotation_epoch: NaiveDate::from_ymd_opt(2025, 10, 20).expect("valid epoch date"),
            tolerance: split_core::SETTLEMENT_TOLERANCE,
            archive_retention_days: crate::store::ARCHIVE_RETENTION_DAYS,
        }
    }
}

impl Config {
    /// Parse configuration from a TOML document
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(raw).map_err(|e| Error::Config(e.to_string()))?;
        if config.roster.is_empty() {
            return Err(Error::Config("roster must not be empty".to_string()));
        }
        if !config.tolerance.is_finite() || config.tolerance < 0.0 {
            return Err(Error::Config(format!(
                "tolerance {} must be finite and non-negative",
                config.tolerance
            )));
        }
        Ok(config)
    }

    /// Roster as core member values
    pub fn members(&self) -> Vec<split_core::Member> {
        self.roster.iter().map(split_core::Member::new).collect()
    }
}
