//! Goals domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::transactions::NewTransaction;
use crate::{errors::ValidationError, Result};

/// Domain model representing a savings goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub target_value: Decimal,
    /// Never negative: removals floor at zero
    pub saved_amount: Decimal,
    /// At most one per user by convention; see `select_favorite`
    pub is_priority: bool,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    /// Saved amount as a share of the target, capped at 100.
    pub fn progress_percent(&self) -> Decimal {
        if self.target_value <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        (self.saved_amount / self.target_value * Decimal::ONE_HUNDRED)
            .min(Decimal::ONE_HUNDRED)
            .round_dp(DISPLAY_DECIMAL_PRECISION)
    }

    pub fn is_achieved(&self) -> bool {
        self.saved_amount >= self.target_value
    }
}

/// Input model for creating a new goal
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub id: Option<String>,
    pub user_id: String,
    pub name: String,
    pub target_value: Decimal,
    #[serde(default)]
    pub saved_amount: Decimal,
    #[serde(default)]
    pub is_priority: bool,
}

impl NewGoal {
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(ValidationError::MissingField("userId".to_string()).into());
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        if self.target_value <= Decimal::ZERO || self.saved_amount < Decimal::ZERO {
            return Err(ValidationError::InvalidInput(
                "Target must be positive and saved amount must not be negative".to_string(),
            )
            .into());
        }
        Ok(())
    }

    pub fn into_goal(self, id: String, created_at: DateTime<Utc>) -> Goal {
        Goal {
            id,
            user_id: self.user_id,
            name: self.name,
            target_value: self.target_value,
            saved_amount: self.saved_amount,
            is_priority: self.is_priority,
            created_at,
        }
    }
}

/// One write produced by `set_favorite`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GoalWriteIntent {
    ClearPriority { goal_id: String },
    SetPriority { goal_id: String },
}

impl GoalWriteIntent {
    pub fn goal_id(&self) -> &str {
        match self {
            GoalWriteIntent::ClearPriority { goal_id } | GoalWriteIntent::SetPriority { goal_id } => {
                goal_id
            }
        }
    }

    pub fn is_priority(&self) -> bool {
        matches!(self, GoalWriteIntent::SetPriority { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContributionDirection {
    Add,
    Remove,
}

/// Result of a goal contribution: the new saved amount and the ledger
/// entry that makes the movement visible in transaction history.
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub goal_id: String,
    pub direction: ContributionDirection,
    pub new_saved_amount: Decimal,
    /// Amount that actually moved. Smaller than requested when a removal
    /// was truncated at zero.
    pub moved_amount: Decimal,
    /// Always present. Its amount is zero when a removal found nothing
    /// left to move.
    pub ledger_entry: NewTransaction,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn goal(saved: Decimal, target: Decimal) -> Goal {
        Goal {
            id: "g1".to_string(),
            user_id: "u1".to_string(),
            name: "Trip".to_string(),
            target_value: target,
            saved_amount: saved,
            is_priority: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_progress_percent_caps_at_hundred() {
        assert_eq!(goal(dec!(250), dec!(1000)).progress_percent(), dec!(25));
        assert_eq!(goal(dec!(1500), dec!(1000)).progress_percent(), dec!(100));
        assert!(goal(dec!(1000), dec!(1000)).is_achieved());
    }

    #[test]
    fn test_write_intent_serialization() {
        let intent = GoalWriteIntent::SetPriority {
            goal_id: "g1".to_string(),
        };
        let json = serde_json::to_string(&intent).unwrap();
        assert_eq!(json, r#"{"type":"set_priority","goal_id":"g1"}"#);
        assert!(intent.is_priority());
        assert_eq!(intent.goal_id(), "g1");
    }
}
