use std::sync::Arc;

use async_trait::async_trait;
use pennywise_core::events::DomainEvent;
use pennywise_core::subscriptions::{NewSubscription, Subscription, SubscriptionRepositoryTrait};
use pennywise_core::utils::clock::Clock;
use pennywise_core::Result;
use uuid::Uuid;

use crate::db::{read_tables, SharedTables, WriteHandle};
use crate::errors::StorageError;

pub struct SubscriptionRepository {
    tables: SharedTables,
    writer: WriteHandle,
    clock: Arc<dyn Clock>,
}

impl SubscriptionRepository {
    pub fn new(tables: SharedTables, writer: WriteHandle, clock: Arc<dyn Clock>) -> Self {
        SubscriptionRepository {
            tables,
            writer,
            clock,
        }
    }
}

#[async_trait]
impl SubscriptionRepositoryTrait for SubscriptionRepository {
    fn load_subscriptions(&self, user_id: &str) -> Result<Vec<Subscription>> {
        Ok(read_tables(&self.tables)?.user_subscriptions(user_id))
    }

    async fn insert_subscription(&self, new_subscription: NewSubscription) -> Result<Subscription> {
        let created_at = self.clock.now();
        self.writer
            .exec(move |tx| {
                let id = new_subscription
                    .id
                    .clone()
                    .unwrap_or_else(|| Uuid::new_v4().to_string());
                if tx.tables().subscriptions.contains_key(&id) {
                    return Err(StorageError::AlreadyExists {
                        entity: "Subscription",
                        id,
                    }
                    .into());
                }
                let subscription = new_subscription.into_subscription(id, created_at);
                tx.tables_mut()
                    .subscriptions
                    .insert(subscription.id.clone(), subscription.clone());
                tx.emit(DomainEvent::subscriptions_changed(
                    subscription.user_id.clone(),
                    vec![subscription.id.clone()],
                ));
                Ok(subscription)
            })
            .await
    }

    async fn deactivate_subscription(&self, subscription_id: &str) -> Result<Subscription> {
        let subscription_id = subscription_id.to_string();
        self.writer
            .exec(move |tx| {
                let subscription = tx
                    .tables_mut()
                    .subscriptions
                    .get_mut(&subscription_id)
                    .ok_or_else(|| StorageError::NotFound {
                        entity: "Subscription",
                        id: subscription_id.clone(),
                    })?;
                if !subscription.active {
                    return Ok(subscription.clone());
                }
                subscription.active = false;
                let subscription = subscription.clone();
                tx.emit(DomainEvent::subscriptions_changed(
                    subscription.user_id.clone(),
                    vec![subscription.id.clone()],
                ));
                Ok(subscription)
            })
            .await
    }
}
