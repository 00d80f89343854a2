//! Domain event types.

use serde::{Deserialize, Serialize};

use crate::transactions::TransactionKind;

/// Logical record collections, one change stream each.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Transactions,
    Goals,
    Cards,
    Subscriptions,
}

/// Change notices emitted by the store after successful writes.
///
/// A notice names what changed, not the new contents. Consumers reload the
/// full record set for the user, which keeps them correct under duplicate
/// or reordered delivery.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// Transactions were created.
    TransactionsChanged {
        user_id: String,
        transaction_ids: Vec<String>,
        /// Kinds of the affected records (which summary fields to refold)
        kinds: Vec<TransactionKind>,
    },

    /// Goals were created or their saved amount / priority flag changed.
    GoalsChanged {
        user_id: String,
        goal_ids: Vec<String>,
    },

    /// Cards were created or charged.
    CardsChanged {
        user_id: String,
        card_ids: Vec<String>,
    },

    /// Legacy subscriptions were created or deactivated.
    SubscriptionsChanged {
        user_id: String,
        subscription_ids: Vec<String>,
    },
}

impl DomainEvent {
    /// Creates a TransactionsChanged event.
    pub fn transactions_changed(
        user_id: impl Into<String>,
        transaction_ids: Vec<String>,
        kinds: Vec<TransactionKind>,
    ) -> Self {
        Self::TransactionsChanged {
            user_id: user_id.into(),
            transaction_ids,
            kinds,
        }
    }

    /// Creates a GoalsChanged event.
    pub fn goals_changed(user_id: impl Into<String>, goal_ids: Vec<String>) -> Self {
        Self::GoalsChanged {
            user_id: user_id.into(),
            goal_ids,
        }
    }

    /// Creates a CardsChanged event.
    pub fn cards_changed(user_id: impl Into<String>, card_ids: Vec<String>) -> Self {
        Self::CardsChanged {
            user_id: user_id.into(),
            card_ids,
        }
    }

    /// Creates a SubscriptionsChanged event.
    pub fn subscriptions_changed(user_id: impl Into<String>, subscription_ids: Vec<String>) -> Self {
        Self::SubscriptionsChanged {
            user_id: user_id.into(),
            subscription_ids,
        }
    }

    pub fn user_id(&self) -> &str {
        match self {
            DomainEvent::TransactionsChanged { user_id, .. }
            | DomainEvent::GoalsChanged { user_id, .. }
            | DomainEvent::CardsChanged { user_id, .. }
            | DomainEvent::SubscriptionsChanged { user_id, .. } => user_id,
        }
    }

    pub fn collection(&self) -> Collection {
        match self {
            DomainEvent::TransactionsChanged { .. } => Collection::Transactions,
            DomainEvent::GoalsChanged { .. } => Collection::Goals,
            DomainEvent::CardsChanged { .. } => Collection::Cards,
            DomainEvent::SubscriptionsChanged { .. } => Collection::Subscriptions,
        }
    }
}
