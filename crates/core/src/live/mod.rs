//! Live (reactive) engine.
//!
//! Turns store change notices into continuously refreshed per-user views:
//! - period overview (current and previous month summaries)
//! - favorite goal
//!
//! Events are debounced, planned into per-user refreshes and answered by
//! reloading full snapshots, so duplicate or reordered notices are harmless.

mod live_model;
mod planner;
mod sink;
mod views;
mod worker;

pub use live_model::LiveState;
pub use planner::{plan_refresh, RefreshPlan};
pub use sink::LiveEventSink;
pub use views::{LiveHandles, LiveViews};
pub use worker::{live_event_worker, LiveWorkerDeps};
