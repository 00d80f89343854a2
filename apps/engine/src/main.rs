mod config;
mod main_lib;
mod report;

use config::Config;
use main_lib::{build_state, init_tracing};
use report::build_report;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config.log_format);
    let state = build_state(&config).await?;

    let users = if config.users.is_empty() {
        state.store.user_ids()?
    } else {
        config.users.clone()
    };
    tracing::info!("Building dashboards for {} user(s)", users.len());

    let report = build_report(&state, &users, config.settle_timeout).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
