use crate::errors::Result;
use crate::goals::goals_model::{ContributionDirection, Goal, NewGoal};
use crate::goals::goals_resolver::{select_favorite, set_favorite};
use crate::goals::goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
use crate::transactions::TransactionRecord;
use crate::utils::clock::Clock;
use crate::utils::time_utils::local_date_from_utc;
use async_trait::async_trait;
use chrono_tz::Tz;
use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;

pub struct GoalService {
    goal_repo: Arc<dyn GoalRepositoryTrait>,
    clock: Arc<dyn Clock>,
    tz: Tz,
}

impl GoalService {
    pub fn new(goal_repo: Arc<dyn GoalRepositoryTrait>, clock: Arc<dyn Clock>, tz: Tz) -> Self {
        GoalService {
            goal_repo,
            clock,
            tz,
        }
    }
}

#[async_trait]
impl GoalServiceTrait for GoalService {
    fn get_goals(&self, user_id: &str) -> Result<Vec<Goal>> {
        self.goal_repo.load_goals(user_id)
    }

    fn favorite_goal(&self, user_id: &str) -> Result<Option<Goal>> {
        let goals = self.goal_repo.load_goals(user_id)?;
        Ok(select_favorite(&goals).cloned())
    }

    async fn create_goal(&self, new_goal: NewGoal) -> Result<Goal> {
        new_goal.validate()?;
        self.goal_repo.insert_goal(new_goal).await
    }

    async fn set_favorite(&self, user_id: &str, goal_id: &str) -> Result<Vec<Goal>> {
        // Only the user's own goals are loaded, so a foreign goal id is
        // reported as not found.
        let goals = self.goal_repo.load_goals(user_id)?;
        let intents = set_favorite(&goals, goal_id)?;
        debug!(
            "Setting favorite goal {} for user {} with {} write(s)",
            goal_id,
            user_id,
            intents.len()
        );
        self.goal_repo.apply_goal_intents(user_id, intents).await
    }

    async fn contribute(
        &self,
        goal_id: &str,
        direction: ContributionDirection,
        amount: Decimal,
    ) -> Result<(Goal, TransactionRecord)> {
        let today = local_date_from_utc(self.clock.now(), self.tz);
        self.goal_repo
            .record_contribution(goal_id, direction, amount, today)
            .await
    }
}
