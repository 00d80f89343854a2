use std::sync::Arc;

use async_trait::async_trait;
use pennywise_core::cards::{authorize_and_apply, Card, CardRepositoryTrait, NewCard};
use pennywise_core::errors::{CreditError, ValidationError};
use pennywise_core::events::DomainEvent;
use pennywise_core::utils::clock::Clock;
use pennywise_core::Result;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::db::{read_tables, SharedTables, WriteHandle, WriteTx};
use crate::errors::StorageError;

/// Conditional increment of `used_credit` inside a write.
///
/// The limit is checked against the draft, which no other writer can touch
/// until this write commits, so concurrent charges never overshoot. A card
/// owned by someone other than `user_id` is reported as not found.
pub(crate) fn charge_card_in(
    tx: &mut WriteTx,
    user_id: &str,
    card_id: &str,
    amount: Decimal,
) -> Result<Card> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::InvalidInput(format!(
            "Charge amount must be positive, got {}",
            amount
        ))
        .into());
    }
    let card = tx
        .tables_mut()
        .cards
        .get_mut(card_id)
        .filter(|card| card.user_id == user_id)
        .ok_or_else(|| CreditError::CardNotFound(card_id.to_string()))?;
    authorize_and_apply(card, amount)?;
    let card = card.clone();
    tx.emit(DomainEvent::cards_changed(
        card.user_id.clone(),
        vec![card.id.clone()],
    ));
    Ok(card)
}

pub struct CardRepository {
    tables: SharedTables,
    writer: WriteHandle,
    clock: Arc<dyn Clock>,
}

impl CardRepository {
    pub fn new(tables: SharedTables, writer: WriteHandle, clock: Arc<dyn Clock>) -> Self {
        CardRepository {
            tables,
            writer,
            clock,
        }
    }
}

#[async_trait]
impl CardRepositoryTrait for CardRepository {
    fn load_cards(&self, user_id: &str) -> Result<Vec<Card>> {
        Ok(read_tables(&self.tables)?.user_cards(user_id))
    }

    fn get_card(&self, card_id: &str) -> Result<Card> {
        read_tables(&self.tables)?
            .cards
            .get(card_id)
            .cloned()
            .ok_or_else(|| CreditError::CardNotFound(card_id.to_string()).into())
    }

    async fn insert_card(&self, new_card: NewCard) -> Result<Card> {
        let created_at = self.clock.now();
        self.writer
            .exec(move |tx| {
                let id = new_card
                    .id
                    .clone()
                    .unwrap_or_else(|| Uuid::new_v4().to_string());
                if tx.tables().cards.contains_key(&id) {
                    return Err(StorageError::AlreadyExists { entity: "Card", id }.into());
                }
                let card = new_card.into_card(id, created_at);
                tx.tables_mut().cards.insert(card.id.clone(), card.clone());
                tx.emit(DomainEvent::cards_changed(
                    card.user_id.clone(),
                    vec![card.id.clone()],
                ));
                Ok(card)
            })
            .await
    }

    async fn charge_card(&self, user_id: &str, card_id: &str, amount: Decimal) -> Result<Card> {
        let user_id = user_id.to_string();
        let card_id = card_id.to_string();
        self.writer
            .exec(move |tx| charge_card_in(tx, &user_id, &card_id, amount))
            .await
    }
}
