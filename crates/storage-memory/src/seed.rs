//! JSON seed documents.

use std::collections::{BTreeMap, BTreeSet};

use pennywise_core::cards::Card;
use pennywise_core::events::DomainEvent;
use pennywise_core::goals::Goal;
use pennywise_core::subscriptions::Subscription;
use pennywise_core::transactions::{TransactionKind, TransactionRecord};
use serde::{Deserialize, Serialize};

use crate::db::{Tables, WriteTx};

/// Every collection as plain arrays. Missing collections default to empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeedDocument {
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
}

impl SeedDocument {
    pub fn from_tables(tables: &Tables) -> Self {
        Self {
            transactions: tables.transactions.values().cloned().collect(),
            goals: tables.goals.values().cloned().collect(),
            cards: tables.cards.values().cloned().collect(),
            subscriptions: tables.subscriptions.values().cloned().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.transactions.len() + self.goals.len() + self.cards.len() + self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Upserts every record by id and queues one notice per user and
    /// collection.
    pub(crate) fn write_into(self, tx: &mut WriteTx) {
        let mut transactions: BTreeMap<String, (Vec<String>, BTreeSet<TransactionKind>)> =
            BTreeMap::new();
        for record in self.transactions {
            let entry = transactions.entry(record.user_id.clone()).or_default();
            entry.0.push(record.id.clone());
            entry.1.insert(record.kind);
            tx.tables_mut()
                .transactions
                .insert(record.id.clone(), record);
        }
        for (user_id, (ids, kinds)) in transactions {
            tx.emit(DomainEvent::transactions_changed(
                user_id,
                ids,
                kinds.into_iter().collect(),
            ));
        }

        let mut goals: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for goal in self.goals {
            goals.entry(goal.user_id.clone()).or_default().push(goal.id.clone());
            tx.tables_mut().goals.insert(goal.id.clone(), goal);
        }
        for (user_id, ids) in goals {
            tx.emit(DomainEvent::goals_changed(user_id, ids));
        }

        let mut cards: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for card in self.cards {
            cards.entry(card.user_id.clone()).or_default().push(card.id.clone());
            tx.tables_mut().cards.insert(card.id.clone(), card);
        }
        for (user_id, ids) in cards {
            tx.emit(DomainEvent::cards_changed(user_id, ids));
        }

        let mut subscriptions: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for subscription in self.subscriptions {
            subscriptions
                .entry(subscription.user_id.clone())
                .or_default()
                .push(subscription.id.clone());
            tx.tables_mut()
                .subscriptions
                .insert(subscription.id.clone(), subscription);
        }
        for (user_id, ids) in subscriptions {
            tx.emit(DomainEvent::subscriptions_changed(user_id, ids));
        }
    }
}
