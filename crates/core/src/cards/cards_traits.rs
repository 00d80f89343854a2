//! Card repository and service traits.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::cards_model::{Card, ChargePreview, NewCard};
use crate::errors::Result;

/// Trait defining the contract for Card repository operations.
#[async_trait]
pub trait CardRepositoryTrait: Send + Sync {
    /// Lists the user's cards.
    fn load_cards(&self, user_id: &str) -> Result<Vec<Card>>;

    /// Retrieves a card by its ID. Fails with `CardNotFound`.
    fn get_card(&self, card_id: &str) -> Result<Card>;

    async fn insert_card(&self, new_card: NewCard) -> Result<Card>;

    /// Draws `amount` on `user_id`'s card as a conditional increment.
    ///
    /// The ownership check, the limit check and the `used_credit` update must
    /// happen in one store transaction so concurrent charges cannot overshoot
    /// the limit. Another user's card fails with `CardNotFound`.
    async fn charge_card(&self, user_id: &str, card_id: &str, amount: Decimal) -> Result<Card>;
}

/// Trait defining the contract for Card service operations.
#[async_trait]
pub trait CardServiceTrait: Send + Sync {
    fn get_cards(&self, user_id: &str) -> Result<Vec<Card>>;
    fn get_card(&self, card_id: &str) -> Result<Card>;
    async fn create_card(&self, new_card: NewCard) -> Result<Card>;

    /// Plans a charge, lays it out on the card's billing dates and checks it
    /// against the current limit without writing anything.
    fn preview_charge(
        &self,
        card_id: &str,
        amount: Decimal,
        installments: u32,
        purchase_date: NaiveDate,
    ) -> Result<ChargePreview>;
}
