//! Favorite-goal selection and goal contributions.
//!
//! The single-favorite rule is cooperative. `set_favorite` only produces
//! write intents; a store that applies them one by one leaves a window
//! where zero or two goals are flagged. Stores that can should apply the
//! whole batch in one transaction (see `GoalRepositoryTrait`).
//! `select_favorite` tolerates any flag state.

use std::cmp::Ordering;

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;

use super::goals_model::{Contribution, ContributionDirection, Goal, GoalWriteIntent};
use crate::constants::GOAL_LEDGER_CATEGORY;
use crate::errors::{GoalError, ValidationError};
use crate::transactions::{NewTransaction, TransactionKind};
use crate::Result;

/// Earliest created first, then lowest id.
fn creation_order(a: &Goal, b: &Goal) -> Ordering {
    a.created_at
        .cmp(&b.created_at)
        .then_with(|| a.id.as_bytes().cmp(b.id.as_bytes()))
}

/// Picks the goal to highlight.
///
/// - one flagged goal: that goal;
/// - several flagged (concurrent writers): the earliest created of them;
/// - none flagged: the earliest created goal overall.
///
/// Ties on `created_at` go to the lowest id, so the result does not depend
/// on the order the store delivered the goals in.
pub fn select_favorite(goals: &[Goal]) -> Option<&Goal> {
    let flagged: Vec<&Goal> = goals.iter().filter(|g| g.is_priority).collect();
    if flagged.len() > 1 {
        debug!(
            "{} goals flagged as priority; picking the earliest created",
            flagged.len()
        );
    }
    if flagged.is_empty() {
        goals.iter().min_by(|a, b| creation_order(a, b))
    } else {
        flagged.into_iter().min_by(|a, b| creation_order(a, b))
    }
}

/// Write intents that make `target_id` the only favorite of its owner:
/// clear every other goal of that user, then flag the target.
pub fn set_favorite(goals: &[Goal], target_id: &str) -> Result<Vec<GoalWriteIntent>> {
    let target = goals
        .iter()
        .find(|g| g.id == target_id)
        .ok_or_else(|| GoalError::GoalNotFound(target_id.to_string()))?;

    let mut intents: Vec<GoalWriteIntent> = goals
        .iter()
        .filter(|g| g.user_id == target.user_id && g.id != target.id)
        .map(|g| GoalWriteIntent::ClearPriority {
            goal_id: g.id.clone(),
        })
        .collect();
    intents.push(GoalWriteIntent::SetPriority {
        goal_id: target.id.clone(),
    });
    Ok(intents)
}

/// Applies intents to an in-memory goal set. Every referenced goal is
/// checked first; on `GoalNotFound` nothing is changed.
/// Returns the ids of the goals whose flag actually changed.
pub fn apply_goal_intents(goals: &mut [Goal], intents: &[GoalWriteIntent]) -> Result<Vec<String>> {
    if let Some(missing) = intents
        .iter()
        .find(|intent| !goals.iter().any(|g| g.id == intent.goal_id()))
    {
        return Err(GoalError::GoalNotFound(missing.goal_id().to_string()).into());
    }

    let mut changed = Vec::new();
    for intent in intents {
        if let Some(goal) = goals.iter_mut().find(|g| g.id == intent.goal_id()) {
            if goal.is_priority != intent.is_priority() {
                goal.is_priority = intent.is_priority();
                changed.push(goal.id.clone());
            }
        }
    }
    Ok(changed)
}

/// Moves money into or out of a goal.
///
/// `Add` raises the saved amount by `amount`. `Remove` lowers it and floors
/// at zero: asking for more than is saved silently removes what is there.
/// The ledger entry records the amount that actually moved, as an expense
/// for `Add` and as income for `Remove`.
pub fn contribute(
    goal: &Goal,
    direction: ContributionDirection,
    amount: Decimal,
    today: NaiveDate,
) -> Result<Contribution> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::InvalidInput(format!(
            "Contribution amount must be positive, got {}",
            amount
        ))
        .into());
    }

    let (new_saved_amount, kind, description) = match direction {
        ContributionDirection::Add => (
            goal.saved_amount + amount,
            TransactionKind::Expense,
            format!("Saved towards {}", goal.name),
        ),
        ContributionDirection::Remove => (
            (goal.saved_amount - amount).max(Decimal::ZERO),
            TransactionKind::Income,
            format!("Withdrawn from {}", goal.name),
        ),
    };
    let moved_amount = (new_saved_amount - goal.saved_amount).abs();

    let mut ledger_entry = NewTransaction::new(
        goal.user_id.clone(),
        kind,
        moved_amount,
        GOAL_LEDGER_CATEGORY,
        today,
    )
    .with_description(description);
    ledger_entry.goal_ref = Some(goal.id.clone());

    Ok(Contribution {
        goal_id: goal.id.clone(),
        direction,
        new_saved_amount,
        moved_amount,
        ledger_entry,
    })
}
