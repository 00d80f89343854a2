//! Live event worker.
//!
//! Receives change notices from an mpsc channel, debounces them, then plans
//! and runs per-user view refreshes.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use chrono_tz::Tz;
use log::{debug, info, warn};
use tokio::sync::mpsc;

use super::live_model::LiveState;
use super::planner::plan_refresh;
use super::views::LiveViews;
use crate::errors::Result;
use crate::events::DomainEvent;
use crate::goals::{select_favorite, GoalRepositoryTrait};
use crate::summary::{PeriodOverview, PeriodWindow, SummaryBoard, SummarySource};
use crate::transactions::{TransactionRecord, TransactionRepositoryTrait};
use crate::utils::clock::Clock;
use crate::utils::time_utils::local_date_from_utc;

/// Dependencies needed by the live worker.
pub struct LiveWorkerDeps {
    pub transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    pub goal_repository: Arc<dyn GoalRepositoryTrait>,
    pub views: LiveViews,
    pub clock: Arc<dyn Clock>,
    pub tz: Tz,
    pub debounce: Duration,
}

/// Current and previous month boards for one user.
///
/// The boards survive across batches so a notice touching one source only
/// refolds the fields that source owns.
struct UserBoards {
    window: PeriodWindow,
    current: SummaryBoard,
    previous: SummaryBoard,
    /// False until every source has been folded once
    seeded: bool,
}

impl UserBoards {
    fn new(window: PeriodWindow) -> Self {
        Self {
            window,
            current: SummaryBoard::new(),
            previous: SummaryBoard::new(),
            seeded: false,
        }
    }
}

/// Runs the live worker until every sender is dropped.
///
/// Events are collected until the debounce window passes without a new
/// one, then processed as a single batch.
pub async fn live_event_worker(
    mut rx: mpsc::UnboundedReceiver<DomainEvent>,
    deps: Arc<LiveWorkerDeps>,
) {
    info!("Live event worker started");

    let mut boards: HashMap<String, UserBoards> = HashMap::new();
    let mut pending_events: Vec<DomainEvent> = Vec::new();

    loop {
        if !pending_events.is_empty() {
            tokio::select! {
                event = rx.recv() => {
                    match event {
                        Some(e) => pending_events.push(e),
                        None => {
                            // Channel closed, flush what we have
                            process_event_batch(&pending_events, &deps, &mut boards);
                            info!("Live event worker shutting down");
                            return;
                        }
                    }
                }
                _ = tokio::time::sleep(deps.debounce) => {
                    let batch = std::mem::take(&mut pending_events);
                    process_event_batch(&batch, &deps, &mut boards);
                }
            }
        } else {
            match rx.recv().await {
                Some(e) => pending_events.push(e),
                None => {
                    info!("Live event worker shutting down");
                    return;
                }
            }
        }
    }
}

fn process_event_batch(
    events: &[DomainEvent],
    deps: &LiveWorkerDeps,
    boards: &mut HashMap<String, UserBoards>,
) {
    let plan = plan_refresh(events);
    if plan.is_empty() {
        return;
    }
    debug!(
        "Processing batch of {} live event(s) for {} user(s)",
        events.len(),
        plan.users().len()
    );

    for (user_id, sources) in &plan.summaries {
        if deps.views.is_registered(user_id) {
            refresh_summary(deps, boards, user_id, sources);
        }
    }

    for user_id in &plan.favorites {
        if deps.views.is_registered(user_id) {
            refresh_favorite(deps, user_id);
        }
    }
}

fn refresh_summary(
    deps: &LiveWorkerDeps,
    boards: &mut HashMap<String, UserBoards>,
    user_id: &str,
    sources: &BTreeSet<SummarySource>,
) {
    match rebuild_overview(deps, boards, user_id, sources) {
        Ok(overview) => deps
            .views
            .publish_summary(user_id, LiveState::Ready(overview)),
        Err(e) => {
            warn!("Summary refresh failed for user {}: {}", user_id, e);
            // Next successful load starts from a clean board
            boards.remove(user_id);
            deps.views
                .publish_summary(user_id, LiveState::Failed(e.to_string()));
        }
    }
}

fn rebuild_overview(
    deps: &LiveWorkerDeps,
    boards: &mut HashMap<String, UserBoards>,
    user_id: &str,
    sources: &BTreeSet<SummarySource>,
) -> Result<PeriodOverview> {
    let today = local_date_from_utc(deps.clock.now(), deps.tz);
    let window = PeriodWindow::month(today, 0)?;
    let previous_window = PeriodWindow::month(today, -1)?;
    let records = deps.transaction_repository.load_transactions(user_id)?;

    let mut sources: Vec<SummarySource> = sources.iter().copied().collect();
    let user_boards = boards
        .entry(user_id.to_string())
        .or_insert_with(|| UserBoards::new(window));
    if user_boards.window != window {
        debug!(
            "Month rolled over to {} for user {}, rebuilding boards",
            window.start, user_id
        );
        *user_boards = UserBoards::new(window);
    }
    if !user_boards.seeded {
        sources = SummarySource::ALL.to_vec();
        user_boards.seeded = true;
    }

    let current_records = within(&records, &window);
    let previous_records = within(&records, &previous_window);
    for source in sources {
        let applied = user_boards
            .current
            .apply(source, &current_records)
            .map(|_| ())
            .and_then(|()| {
                user_boards
                    .previous
                    .apply(source, &previous_records)
                    .map(|_| ())
            });
        if let Err(e) = applied {
            // Reseed from scratch next time
            boards.remove(user_id);
            return Err(e);
        }
    }

    debug!(
        "Refreshed summary for user {}: balance {}",
        user_id,
        user_boards.current.summary().balance
    );
    Ok(PeriodOverview {
        window,
        current: user_boards.current.summary().clone(),
        previous: user_boards.previous.summary().clone(),
    })
}

fn within(records: &[TransactionRecord], window: &PeriodWindow) -> Vec<TransactionRecord> {
    records
        .iter()
        .filter(|r| window.contains(r.date))
        .cloned()
        .collect()
}

fn refresh_favorite(deps: &LiveWorkerDeps, user_id: &str) {
    match deps.goal_repository.load_goals(user_id) {
        Ok(goals) => {
            let favorite = select_favorite(&goals).cloned();
            debug!(
                "Favorite goal for user {}: {:?}",
                user_id,
                favorite.as_ref().map(|g| g.id.as_str())
            );
            deps.views
                .publish_favorite(user_id, LiveState::Ready(favorite));
        }
        Err(e) => {
            warn!("Favorite refresh failed for user {}: {}", user_id, e);
            deps.views
                .publish_favorite(user_id, LiveState::Failed(e.to_string()));
        }
    }
}
