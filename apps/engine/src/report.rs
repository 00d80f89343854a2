//! Dashboard report printed by the runner.

use std::time::Duration;

use pennywise_core::cards::Card;
use pennywise_core::goals::Goal;
use pennywise_core::live::LiveState;
use pennywise_core::summary::{PeriodOverview, SummaryDelta};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::watch;
use tokio::time::timeout;

use crate::main_lib::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub currency: String,
    pub users: Vec<UserDashboard>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDashboard {
    pub user_id: String,
    pub overview: LiveState<PeriodOverview>,
    pub deltas: Option<SummaryDelta>,
    pub favorite_goal: LiveState<Option<Goal>>,
    pub goals: Vec<Goal>,
    pub transaction_count: usize,
    pub cards: Vec<CardUsage>,
    pub subscriptions_monthly_total: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardUsage {
    #[serde(flatten)]
    pub card: Card,
    pub available_limit: Decimal,
    pub utilization_percent: Decimal,
}

impl From<Card> for CardUsage {
    fn from(card: Card) -> Self {
        Self {
            available_limit: card.available_limit(),
            utilization_percent: card.utilization_percent(),
            card,
        }
    }
}

/// Watches each user, waits up to `settle` for their live views to leave
/// `Loading`, and collects the dashboard. Views still loading after the
/// wait are reported as they are.
pub async fn build_report(
    state: &AppState,
    users: &[String],
    settle: Duration,
) -> anyhow::Result<DashboardReport> {
    let mut dashboards = Vec::with_capacity(users.len());

    for user_id in users {
        let mut handles = state.live_sink.watch_user(user_id);
        let overview = settled(&mut handles.summary, settle, user_id).await;
        let favorite_goal = settled(&mut handles.favorite, settle, user_id).await;

        let cards = state
            .card_service
            .get_cards(user_id)?
            .into_iter()
            .map(CardUsage::from)
            .collect();
        let subscriptions_monthly_total = state.subscription_service.monthly_total(user_id)?;
        let goals = state.goal_service.get_goals(user_id)?;
        let transaction_count = state.transaction_service.get_transactions(user_id)?.len();

        dashboards.push(UserDashboard {
            user_id: user_id.clone(),
            deltas: overview.ready().map(PeriodOverview::deltas),
            overview,
            favorite_goal,
            goals,
            transaction_count,
            cards,
            subscriptions_monthly_total,
        });
    }

    Ok(DashboardReport {
        currency: state.currency.clone(),
        users: dashboards,
    })
}

async fn settled<T: Clone>(
    rx: &mut watch::Receiver<LiveState<T>>,
    settle: Duration,
    user_id: &str,
) -> LiveState<T> {
    let waited = timeout(settle, rx.wait_for(|state| !state.is_loading()))
        .await
        .map(|result| result.map(|state| state.clone()));
    match waited {
        Ok(Ok(state)) => state,
        Ok(Err(_)) => LiveState::Failed("live worker stopped".to_string()),
        Err(_) => {
            tracing::warn!("Live view for user {} did not settle in {:?}", user_id, settle);
            rx.borrow().clone()
        }
    }
}
