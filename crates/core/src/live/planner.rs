//! Refresh planning for live views.
//!
//! Analyzes a batch of change notices and determines which views of which
//! users need reloading.

use std::collections::{BTreeMap, BTreeSet};

use crate::events::DomainEvent;
use crate::summary::SummarySource;

/// Per-user refresh work derived from one event batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshPlan {
    /// Summary sources to refold, by user.
    pub summaries: BTreeMap<String, BTreeSet<SummarySource>>,
    /// Users whose favorite goal must be re-selected.
    pub favorites: BTreeSet<String>,
}

impl RefreshPlan {
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty() && self.favorites.is_empty()
    }

    /// Every user touched by the plan, each once.
    pub fn users(&self) -> BTreeSet<String> {
        self.summaries
            .keys()
            .chain(self.favorites.iter())
            .cloned()
            .collect()
    }
}

/// Plans view refreshes from a batch of domain events.
///
/// A transaction notice refreshes only the summary sources owning the
/// changed kinds. A notice without kinds refreshes every source. Goal
/// notices refresh the favorite. Card and subscription notices feed no
/// live view.
pub fn plan_refresh(events: &[DomainEvent]) -> RefreshPlan {
    let mut plan = RefreshPlan::default();

    for event in events {
        match event {
            DomainEvent::TransactionsChanged { user_id, kinds, .. } => {
                if user_id.is_empty() {
                    continue;
                }
                let sources = plan.summaries.entry(user_id.clone()).or_default();
                if kinds.is_empty() {
                    sources.extend(SummarySource::ALL);
                } else {
                    sources.extend(kinds.iter().map(|kind| SummarySource::for_kind(*kind)));
                }
            }
            DomainEvent::GoalsChanged { user_id, .. } => {
                if !user_id.is_empty() {
                    plan.favorites.insert(user_id.clone());
                }
            }
            DomainEvent::CardsChanged { .. } | DomainEvent::SubscriptionsChanged { .. } => {}
        }
    }

    plan
}
