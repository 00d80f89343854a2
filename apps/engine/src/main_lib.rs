use std::sync::Arc;

use anyhow::Context;
use pennywise_core::{
    cards::{CardService, CardServiceTrait},
    events::DomainEventSink,
    goals::{GoalService, GoalServiceTrait},
    live::LiveEventSink,
    subscriptions::{SubscriptionService, SubscriptionServiceTrait},
    transactions::{TransactionService, TransactionServiceTrait},
    utils::clock::{Clock, SystemClock},
};
use pennywise_storage_memory::MemoryStore;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

pub struct AppState {
    pub live_sink: Arc<LiveEventSink>,
    pub store: MemoryStore,
    pub currency: String,
    pub transaction_service: Arc<dyn TransactionServiceTrait>,
    pub goal_service: Arc<dyn GoalServiceTrait>,
    pub card_service: Arc<dyn CardServiceTrait>,
    pub subscription_service: Arc<dyn SubscriptionServiceTrait>,
}

/// Installs the global subscriber. `log` records from the library crates
/// are forwarded through the subscriber's `tracing-log` bridge.
pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let tz = config.settings.tz()?;

    // The store announces writes to the live sink; the worker is started
    // once the store's repositories exist.
    let live_sink = Arc::new(LiveEventSink::new());
    let domain_event_sink: Arc<dyn DomainEventSink> = live_sink.clone();
    let store = MemoryStore::with_clock(domain_event_sink, clock.clone());

    if let Some(path) = &config.seed_path {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file {}", path.display()))?;
        let count = store.import_json(&json).await?;
        tracing::info!("Seeded {} record(s) from {}", count, path.display());
    }

    live_sink.start_worker(
        store.transaction_repository(),
        store.goal_repository(),
        clock.clone(),
        &config.settings,
    )?;

    let transaction_service = Arc::new(TransactionService::new(
        store.transaction_repository(),
        store.card_repository(),
        tz,
    ));
    let goal_service = Arc::new(GoalService::new(store.goal_repository(), clock, tz));
    let card_service = Arc::new(CardService::new(store.card_repository()));
    let subscription_service = Arc::new(SubscriptionService::new(store.subscription_repository()));

    Ok(Arc::new(AppState {
        live_sink,
        store,
        currency: config.settings.currency.clone(),
        transaction_service,
        goal_service,
        card_service,
        subscription_service,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pennywise_core::settings::EngineSettings;
    use std::time::Duration;

    fn test_config() -> Config {
        Config {
            settings: EngineSettings {
                timezone: "UTC".to_string(),
                debounce_ms: 5,
                currency: "USD".to_string(),
            },
            seed_path: None,
            users: vec![],
            settle_timeout: Duration::from_secs(2),
            log_format: "text".to_string(),
        }
    }

    #[tokio::test]
    async fn test_build_state_without_seed_is_empty() {
        let state = build_state(&test_config()).await.unwrap();
        assert!(state.store.user_ids().unwrap().is_empty());
        assert!(state.transaction_service.get_transactions("u1").unwrap().is_empty());
        assert_eq!(state.currency, "USD");
    }

    #[tokio::test]
    async fn test_build_state_fails_on_missing_seed_file() {
        let mut config = test_config();
        config.seed_path = Some("/nonexistent/pennywise-seed.json".into());
        assert!(build_state(&config).await.is_err());
    }
}
