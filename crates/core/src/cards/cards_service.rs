use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;

use super::cards_model::{Card, ChargePreview, NewCard};
use super::cards_traits::{CardRepositoryTrait, CardServiceTrait};
use super::credit_engine::{authorize, plan};
use crate::errors::Result;

pub struct CardService {
    card_repository: Arc<dyn CardRepositoryTrait>,
}

impl CardService {
    pub fn new(card_repository: Arc<dyn CardRepositoryTrait>) -> Self {
        CardService { card_repository }
    }
}

#[async_trait]
impl CardServiceTrait for CardService {
    fn get_cards(&self, user_id: &str) -> Result<Vec<Card>> {
        self.card_repository.load_cards(user_id)
    }

    fn get_card(&self, card_id: &str) -> Result<Card> {
        self.card_repository.get_card(card_id)
    }

    async fn create_card(&self, new_card: NewCard) -> Result<Card> {
        new_card.validate()?;
        self.card_repository.insert_card(new_card).await
    }

    fn preview_charge(
        &self,
        card_id: &str,
        amount: Decimal,
        installments: u32,
        purchase_date: NaiveDate,
    ) -> Result<ChargePreview> {
        let card = self.card_repository.get_card(card_id)?;
        let plan = plan(amount, installments.max(1), card.interest_rate)?;
        let schedule = plan.schedule(purchase_date, card.billing_day)?;
        let authorized = authorize(&card, amount).is_ok();
        debug!(
            "Previewed charge of {} on card {}: authorized={}",
            amount, card_id, authorized
        );
        Ok(ChargePreview {
            card_id: card.id.clone(),
            plan,
            schedule,
            available_limit: card.available_limit(),
            authorized,
        })
    }
}
