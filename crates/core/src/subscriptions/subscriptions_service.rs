use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use rust_decimal::Decimal;

use super::subscriptions_model::{active_monthly_total, NewSubscription, Subscription};
use super::subscriptions_traits::{SubscriptionRepositoryTrait, SubscriptionServiceTrait};
use crate::errors::Result;

pub struct SubscriptionService {
    repository: Arc<dyn SubscriptionRepositoryTrait>,
}

impl SubscriptionService {
    pub fn new(repository: Arc<dyn SubscriptionRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl SubscriptionServiceTrait for SubscriptionService {
    fn get_subscriptions(&self, user_id: &str) -> Result<Vec<Subscription>> {
        self.repository.load_subscriptions(user_id)
    }

    fn monthly_total(&self, user_id: &str) -> Result<Decimal> {
        let subscriptions = self.repository.load_subscriptions(user_id)?;
        active_monthly_total(&subscriptions)
    }

    async fn create_subscription(&self, new_subscription: NewSubscription) -> Result<Subscription> {
        new_subscription.validate()?;
        self.repository.insert_subscription(new_subscription).await
    }

    async fn deactivate_subscription(&self, subscription_id: &str) -> Result<Subscription> {
        debug!("Deactivating subscription {}", subscription_id);
        self.repository
            .deactivate_subscription(subscription_id)
            .await
    }
}
