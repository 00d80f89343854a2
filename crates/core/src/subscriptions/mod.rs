//! Legacy subscriptions module - recurring charges kept as their own stream.
//!
//! Fixed expenses are recorded as `FixedExpense` transactions; subscriptions
//! are stored and streamed but never feed a period summary.

mod subscriptions_model;
mod subscriptions_service;
mod subscriptions_traits;

pub use subscriptions_model::{active_monthly_total, NewSubscription, Subscription};
pub use subscriptions_service::SubscriptionService;
pub use subscriptions_traits::{SubscriptionRepositoryTrait, SubscriptionServiceTrait};
