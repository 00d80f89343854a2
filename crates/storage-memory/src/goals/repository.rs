use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use pennywise_core::errors::GoalError;
use pennywise_core::events::DomainEvent;
use pennywise_core::goals::{
    apply_goal_intents, contribute, set_favorite, ContributionDirection, Goal,
    GoalRepositoryTrait, GoalWriteIntent, NewGoal,
};
use pennywise_core::transactions::TransactionRecord;
use pennywise_core::utils::clock::Clock;
use pennywise_core::Result;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::db::{read_tables, SharedTables, WriteHandle, WriteTx};
use crate::errors::StorageError;
use crate::transactions::insert_transaction_in;

/// Applies an intent batch to one user's goals inside a write. Goals of
/// other users are never touched; referencing one fails the whole batch.
fn apply_intents_in(tx: &mut WriteTx, user_id: &str, intents: &[GoalWriteIntent]) -> Result<Vec<Goal>> {
    let mut goals = tx.tables().user_goals(user_id);
    let changed = apply_goal_intents(&mut goals, intents)?;
    for goal in &goals {
        if changed.contains(&goal.id) {
            tx.tables_mut().goals.insert(goal.id.clone(), goal.clone());
        }
    }
    if !changed.is_empty() {
        tx.emit(DomainEvent::goals_changed(user_id, changed));
    }
    Ok(goals)
}

pub struct GoalRepository {
    tables: SharedTables,
    writer: WriteHandle,
    clock: Arc<dyn Clock>,
}

impl GoalRepository {
    pub fn new(tables: SharedTables, writer: WriteHandle, clock: Arc<dyn Clock>) -> Self {
        GoalRepository {
            tables,
            writer,
            clock,
        }
    }
}

#[async_trait]
impl GoalRepositoryTrait for GoalRepository {
    fn load_goals(&self, user_id: &str) -> Result<Vec<Goal>> {
        Ok(read_tables(&self.tables)?.user_goals(user_id))
    }

    fn get_goal(&self, goal_id: &str) -> Result<Goal> {
        read_tables(&self.tables)?
            .goals
            .get(goal_id)
            .cloned()
            .ok_or_else(|| GoalError::GoalNotFound(goal_id.to_string()).into())
    }

    async fn insert_goal(&self, new_goal: NewGoal) -> Result<Goal> {
        let created_at = self.clock.now();
        self.writer
            .exec(move |tx| {
                let id = new_goal
                    .id
                    .clone()
                    .unwrap_or_else(|| Uuid::new_v4().to_string());
                if tx.tables().goals.contains_key(&id) {
                    return Err(StorageError::AlreadyExists { entity: "Goal", id }.into());
                }
                let mut goal = new_goal.into_goal(id, created_at);
                let flagged = goal.is_priority;
                // Stored unflagged; a flagged goal goes through the intent
                // batch so it becomes the only favorite.
                goal.is_priority = false;
                tx.tables_mut().goals.insert(goal.id.clone(), goal.clone());
                tx.emit(DomainEvent::goals_changed(
                    goal.user_id.clone(),
                    vec![goal.id.clone()],
                ));

                if flagged {
                    let user_goals = tx.tables().user_goals(&goal.user_id);
                    let intents = set_favorite(&user_goals, &goal.id)?;
                    apply_intents_in(tx, &goal.user_id, &intents)?;
                    goal.is_priority = true;
                }
                Ok(goal)
            })
            .await
    }

    async fn apply_goal_intents(
        &self,
        user_id: &str,
        intents: Vec<GoalWriteIntent>,
    ) -> Result<Vec<Goal>> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |tx| apply_intents_in(tx, &user_id, &intents))
            .await
    }

    async fn record_contribution(
        &self,
        goal_id: &str,
        direction: ContributionDirection,
        amount: Decimal,
        today: NaiveDate,
    ) -> Result<(Goal, TransactionRecord)> {
        let created_at = self.clock.now();
        let goal_id = goal_id.to_string();
        self.writer
            .exec(move |tx| {
                // Read inside the write so the floor uses the current amount
                let mut goal = tx
                    .tables()
                    .goals
                    .get(&goal_id)
                    .cloned()
                    .ok_or_else(|| GoalError::GoalNotFound(goal_id.clone()))?;
                let contribution = contribute(&goal, direction, amount, today)?;
                debug!(
                    "Goal {} {:?} {}: saved {} -> {}",
                    goal.id, direction, contribution.moved_amount, goal.saved_amount,
                    contribution.new_saved_amount
                );

                goal.saved_amount = contribution.new_saved_amount;
                tx.tables_mut().goals.insert(goal.id.clone(), goal.clone());
                tx.emit(DomainEvent::goals_changed(
                    goal.user_id.clone(),
                    vec![goal.id.clone()],
                ));

                let record = insert_transaction_in(tx, contribution.ledger_entry, created_at)?;
                Ok((goal, record))
            })
            .await
    }
}
