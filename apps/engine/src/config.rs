use std::path::PathBuf;
use std::time::Duration;

use pennywise_core::constants::{DEFAULT_CURRENCY, DEFAULT_DEBOUNCE_MS};
use pennywise_core::settings::EngineSettings;
use pennywise_core::utils::time_utils::DEFAULT_PERIOD_TZ;

pub struct Config {
    pub settings: EngineSettings,
    pub seed_path: Option<PathBuf>,
    /// Users to report on. Empty means every user found in the store.
    pub users: Vec<String>,
    pub settle_timeout: Duration,
    pub log_format: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the config from a variable lookup. Unparseable numbers fall
    /// back to their defaults; an unknown timezone is an error.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let timezone = var("PW_TIMEZONE").unwrap_or_else(|| DEFAULT_PERIOD_TZ.name().into());
        let debounce_ms: u64 = var("PW_DEBOUNCE_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_DEBOUNCE_MS);
        let currency = var("PW_CURRENCY").unwrap_or_else(|| DEFAULT_CURRENCY.into());
        let seed_path = var("PW_SEED_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let users = var("PW_USERS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let settle_ms: u64 = var("PW_SETTLE_TIMEOUT_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(5000);
        let log_format = var("PW_LOG_FORMAT").unwrap_or_else(|| "text".into());

        let settings = EngineSettings {
            timezone,
            debounce_ms,
            currency,
        };
        settings.validate()?;

        Ok(Self {
            settings,
            seed_path,
            users,
            settle_timeout: Duration::from_millis(settle_ms),
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(lookup(&[])).unwrap();
        assert_eq!(config.settings, EngineSettings::default());
        assert!(config.seed_path.is_none());
        assert!(config.users.is_empty());
        assert_eq!(config.settle_timeout, Duration::from_secs(5));
        assert_eq!(config.log_format, "text");
    }

    #[test]
    fn test_reads_overrides() {
        let config = Config::from_vars(lookup(&[
            ("PW_TIMEZONE", "Europe/Lisbon"),
            ("PW_DEBOUNCE_MS", "40"),
            ("PW_CURRENCY", "EUR"),
            ("PW_SEED_PATH", "demos/seed.json"),
            ("PW_USERS", "alice, ,bob"),
            ("PW_LOG_FORMAT", "json"),
        ]))
        .unwrap();
        assert_eq!(config.settings.timezone, "Europe/Lisbon");
        assert_eq!(config.settings.debounce_ms, 40);
        assert_eq!(config.settings.currency, "EUR");
        assert_eq!(config.seed_path, Some(PathBuf::from("demos/seed.json")));
        assert_eq!(config.users, vec!["alice".to_string(), "bob".to_string()]);
        assert_eq!(config.log_format, "json");
    }

    #[test]
    fn test_bad_debounce_falls_back() {
        let config = Config::from_vars(lookup(&[("PW_DEBOUNCE_MS", "soon")])).unwrap();
        assert_eq!(config.settings.debounce_ms, DEFAULT_DEBOUNCE_MS);
    }

    #[test]
    fn test_unknown_timezone_is_rejected() {
        assert!(Config::from_vars(lookup(&[("PW_TIMEZONE", "Mars/Olympus")])).is_err());
    }
}
