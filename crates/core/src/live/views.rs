//! Per-user view registry.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;

use super::live_model::LiveState;
use crate::goals::Goal;
use crate::summary::PeriodOverview;

struct UserViews {
    summary: watch::Sender<LiveState<PeriodOverview>>,
    favorite: watch::Sender<LiveState<Option<Goal>>>,
    load_claimed: bool,
}

impl UserViews {
    fn new() -> Self {
        let (summary, _) = watch::channel(LiveState::Loading);
        let (favorite, _) = watch::channel(LiveState::Loading);
        Self {
            summary,
            favorite,
            load_claimed: false,
        }
    }
}

/// Receivers for one user's live views.
pub struct LiveHandles {
    pub summary: watch::Receiver<LiveState<PeriodOverview>>,
    pub favorite: watch::Receiver<LiveState<Option<Goal>>>,
}

/// Registry of live views, one `watch` channel per user and view.
///
/// Views start as `Loading`. Only registered users are refreshed by the
/// worker; notices for other users are dropped.
#[derive(Clone, Default)]
pub struct LiveViews {
    users: Arc<DashMap<String, UserViews>>,
}

impl LiveViews {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the user if needed and claims the initial load. Returns
    /// true exactly once per user, however the user was first registered.
    pub fn claim_initial_load(&self, user_id: &str) -> bool {
        let mut views = self
            .users
            .entry(user_id.to_string())
            .or_insert_with(UserViews::new);
        !std::mem::replace(&mut views.load_claimed, true)
    }

    pub fn is_registered(&self, user_id: &str) -> bool {
        self.users.contains_key(user_id)
    }

    pub fn users(&self) -> Vec<String> {
        self.users.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn handles(&self, user_id: &str) -> LiveHandles {
        LiveHandles {
            summary: self.watch_summary(user_id),
            favorite: self.watch_favorite(user_id),
        }
    }

    /// Subscribes to the user's period overview, registering the user if
    /// needed. Does not claim the initial load.
    pub fn watch_summary(&self, user_id: &str) -> watch::Receiver<LiveState<PeriodOverview>> {
        self.users
            .entry(user_id.to_string())
            .or_insert_with(UserViews::new)
            .summary
            .subscribe()
    }

    /// Subscribes to the user's favorite goal, registering the user if
    /// needed.
    pub fn watch_favorite(&self, user_id: &str) -> watch::Receiver<LiveState<Option<Goal>>> {
        self.users
            .entry(user_id.to_string())
            .or_insert_with(UserViews::new)
            .favorite
            .subscribe()
    }

    /// Current summary state, or `None` for an unregistered user.
    pub fn summary_state(&self, user_id: &str) -> Option<LiveState<PeriodOverview>> {
        self.users
            .get(user_id)
            .map(|views| views.summary.borrow().clone())
    }

    pub fn favorite_state(&self, user_id: &str) -> Option<LiveState<Option<Goal>>> {
        self.users
            .get(user_id)
            .map(|views| views.favorite.borrow().clone())
    }

    pub(crate) fn publish_summary(&self, user_id: &str, state: LiveState<PeriodOverview>) {
        if let Some(views) = self.users.get(user_id) {
            views.summary.send_replace(state);
        }
    }

    pub(crate) fn publish_favorite(&self, user_id: &str, state: LiveState<Option<Goal>>) {
        if let Some(views) = self.users.get(user_id) {
            views.favorite.send_replace(state);
        }
    }
}
