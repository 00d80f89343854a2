//! Engine settings model.

use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CURRENCY, DEFAULT_DEBOUNCE_MS};
use crate::errors::{Error, Result};
use crate::utils::time_utils::DEFAULT_PERIOD_TZ;

/// Runtime settings shared by the aggregator and the live worker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineSettings {
    /// IANA timezone used to cut month windows.
    pub timezone: String,
    /// Debounce window applied to bursts of change notices.
    pub debounce_ms: u64,
    /// Display currency for summaries.
    pub currency: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_PERIOD_TZ.name().to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl EngineSettings {
    /// Parsed timezone. Fails on names unknown to the tz database.
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| Error::InvalidConfigValue(format!("unknown timezone '{}'", self.timezone)))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Checks every field that can be wrong at runtime.
    pub fn validate(&self) -> Result<()> {
        self.tz()?;
        if self.currency.trim().is_empty() {
            return Err(Error::InvalidConfigValue(
                "currency must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
