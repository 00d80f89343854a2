use crate::errors::Result;
use crate::goals::goals_model::{ContributionDirection, Goal, GoalWriteIntent, NewGoal};
use crate::transactions::TransactionRecord;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Trait for goal repository operations
#[async_trait]
pub trait GoalRepositoryTrait: Send + Sync {
    fn load_goals(&self, user_id: &str) -> Result<Vec<Goal>>;

    /// Fails with `GoalNotFound`.
    fn get_goal(&self, goal_id: &str) -> Result<Goal>;

    async fn insert_goal(&self, new_goal: NewGoal) -> Result<Goal>;

    /// Applies a `set_favorite` intent batch for one user.
    ///
    /// Implementations should apply the batch in a single transaction. One
    /// that cannot must document that the favorite flag is only eventually
    /// consistent. Returns the user's goals after the write.
    async fn apply_goal_intents(
        &self,
        user_id: &str,
        intents: Vec<GoalWriteIntent>,
    ) -> Result<Vec<Goal>>;

    /// Reads the goal, applies `contribute`, stores the new saved amount and
    /// inserts the ledger entry, all in one transaction.
    async fn record_contribution(
        &self,
        goal_id: &str,
        direction: ContributionDirection,
        amount: Decimal,
        today: NaiveDate,
    ) -> Result<(Goal, TransactionRecord)>;
}

/// Trait for goal service operations
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    fn get_goals(&self, user_id: &str) -> Result<Vec<Goal>>;
    fn favorite_goal(&self, user_id: &str) -> Result<Option<Goal>>;
    async fn create_goal(&self, new_goal: NewGoal) -> Result<Goal>;
    async fn set_favorite(&self, user_id: &str, goal_id: &str) -> Result<Vec<Goal>>;
    async fn contribute(
        &self,
        goal_id: &str,
        direction: ContributionDirection,
        amount: Decimal,
    ) -> Result<(Goal, TransactionRecord)>;
}
