use async_trait::async_trait;
use rust_decimal::Decimal;

use super::subscriptions_model::{NewSubscription, Subscription};
use crate::errors::Result;

/// Trait for subscription repository operations
#[async_trait]
pub trait SubscriptionRepositoryTrait: Send + Sync {
    fn load_subscriptions(&self, user_id: &str) -> Result<Vec<Subscription>>;
    async fn insert_subscription(&self, new_subscription: NewSubscription) -> Result<Subscription>;

    /// Marks the subscription inactive. Deactivating twice is not an error.
    async fn deactivate_subscription(&self, subscription_id: &str) -> Result<Subscription>;
}

/// Trait for subscription service operations
#[async_trait]
pub trait SubscriptionServiceTrait: Send + Sync {
    fn get_subscriptions(&self, user_id: &str) -> Result<Vec<Subscription>>;
    fn monthly_total(&self, user_id: &str) -> Result<Decimal>;
    async fn create_subscription(&self, new_subscription: NewSubscription) -> Result<Subscription>;
    async fn deactivate_subscription(&self, subscription_id: &str) -> Result<Subscription>;
}
