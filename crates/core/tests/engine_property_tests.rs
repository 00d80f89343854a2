//! Property-based integration tests for the aggregation, goal and credit
//! engines.
//!
//! These tests verify that universal properties hold across all valid inputs,
//! using the `proptest` crate for random test case generation.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use pennywise_core::cards::plan;
use pennywise_core::goals::{
    apply_goal_intents, contribute, select_favorite, set_favorite, ContributionDirection, Goal,
};
use pennywise_core::summary::{percent_change, recompute, SummaryBoard, SummarySource};
use pennywise_core::transactions::{TransactionKind, TransactionRecord};
use proptest::prelude::*;
use rust_decimal::Decimal;

// =============================================================================
// Generators
// =============================================================================

/// Non-negative amounts with up to two decimal places.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000, 0u32..=2).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

/// Any sign, for the delta calculator.
fn arb_signed_amount() -> impl Strategy<Value = Decimal> {
    (-10_000_000i64..10_000_000, 0u32..=2)
        .prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

fn arb_kind() -> impl Strategy<Value = TransactionKind> {
    prop_oneof![
        Just(TransactionKind::Income),
        Just(TransactionKind::Expense),
        Just(TransactionKind::FixedExpense),
    ]
}

fn arb_source() -> impl Strategy<Value = SummarySource> {
    prop_oneof![
        Just(SummarySource::Transactions),
        Just(SummarySource::FixedExpenses),
    ]
}

fn arb_records(max_count: usize) -> impl Strategy<Value = Vec<TransactionRecord>> {
    proptest::collection::vec((arb_kind(), arb_amount()), 0..=max_count).prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(i, (kind, amount))| TransactionRecord {
                id: format!("t{}", i),
                user_id: "u1".to_string(),
                kind,
                amount,
                category: "misc".to_string(),
                description: None,
                card_ref: None,
                installments: None,
                goal_ref: None,
                date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                created_at: Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap(),
            })
            .collect()
    })
}

/// Goals with unique ids and creation times drawn from a small range so
/// ties on `created_at` are common.
fn arb_goals(max_count: usize) -> impl Strategy<Value = Vec<Goal>> {
    proptest::collection::vec((0i64..4, any::<bool>(), arb_amount()), 1..=max_count).prop_map(
        |items| {
            let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
            items
                .into_iter()
                .enumerate()
                .map(|(i, (minutes, is_priority, saved_amount))| Goal {
                    id: format!("g{:02}", i),
                    user_id: "u1".to_string(),
                    name: format!("Goal {}", i),
                    target_value: Decimal::new(100_000, 0),
                    saved_amount,
                    is_priority,
                    created_at: base + Duration::minutes(minutes),
                })
                .collect()
        },
    )
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Recomputing the same record set always yields the same summary.
    #[test]
    fn prop_recompute_is_idempotent(records in arb_records(40)) {
        let first = recompute(&records).unwrap();
        let second = recompute(&records).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Balance is the clamped net and is never negative.
    #[test]
    fn prop_balance_is_never_negative(records in arb_records(40)) {
        let summary = recompute(&records).unwrap();
        prop_assert!(summary.balance >= Decimal::ZERO);
        prop_assert_eq!(summary.balance, summary.net().max(Decimal::ZERO));
    }

    /// Record order does not change the summary.
    #[test]
    fn prop_recompute_ignores_order(
        records in arb_records(30).prop_flat_map(|r| Just(r).prop_shuffle()),
    ) {
        let mut sorted = records.clone();
        sorted.sort_by(|a, b| a.id.cmp(&b.id));
        prop_assert_eq!(recompute(&records).unwrap(), recompute(&sorted).unwrap());
    }

    /// After any interleaving of stale snapshots, applying the latest
    /// snapshot of each source (in either order) matches a full fold.
    #[test]
    fn prop_board_matches_full_fold(
        stale in arb_records(20),
        latest in arb_records(20),
        interleaving in proptest::collection::vec(arb_source(), 0..8),
        fixed_first in any::<bool>(),
    ) {
        let mut board = SummaryBoard::new();
        for source in interleaving {
            board.apply(source, &stale).unwrap();
        }
        let order = if fixed_first {
            [SummarySource::FixedExpenses, SummarySource::Transactions]
        } else {
            [SummarySource::Transactions, SummarySource::FixedExpenses]
        };
        for source in order {
            board.apply(source, &latest).unwrap();
        }
        prop_assert_eq!(board.summary(), &recompute(&latest).unwrap());
    }

    /// The selected favorite does not depend on delivery order.
    #[test]
    fn prop_select_favorite_is_order_independent(
        (goals, shuffled) in arb_goals(12)
            .prop_flat_map(|g| (Just(g.clone()), Just(g).prop_shuffle())),
    ) {
        let a = select_favorite(&goals).map(|g| g.id.clone());
        let b = select_favorite(&shuffled).map(|g| g.id.clone());
        prop_assert!(a.is_some());
        prop_assert_eq!(a, b);
    }

    /// A flagged goal always wins over unflagged ones.
    #[test]
    fn prop_select_favorite_prefers_flagged(goals in arb_goals(12)) {
        let favorite = select_favorite(&goals).unwrap();
        let any_flagged = goals.iter().any(|g| g.is_priority);
        prop_assert_eq!(favorite.is_priority, any_flagged);
    }

    /// Applying every intent from `set_favorite` leaves exactly one
    /// favorite, the target.
    #[test]
    fn prop_set_favorite_leaves_single_favorite(
        (goals, target) in arb_goals(12).prop_flat_map(|g| {
            let len = g.len();
            (Just(g), 0..len)
        }),
    ) {
        let mut goals = goals;
        let target_id = goals[target].id.clone();
        let intents = set_favorite(&goals, &target_id).unwrap();
        apply_goal_intents(&mut goals, &intents).unwrap();

        let flagged: Vec<&Goal> = goals.iter().filter(|g| g.is_priority).collect();
        prop_assert_eq!(flagged.len(), 1);
        prop_assert_eq!(&flagged[0].id, &target_id);
        prop_assert_eq!(select_favorite(&goals).map(|g| g.id.clone()), Some(target_id));
    }

    /// Removals floor at zero and never move more than was saved.
    #[test]
    fn prop_contribution_floor(
        goals in arb_goals(1),
        amount in arb_amount().prop_filter("positive", |a| *a > Decimal::ZERO),
        add in any::<bool>(),
    ) {
        let goal = &goals[0];
        let direction = if add { ContributionDirection::Add } else { ContributionDirection::Remove };
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let outcome = contribute(goal, direction, amount, today).unwrap();

        prop_assert!(outcome.new_saved_amount >= Decimal::ZERO);
        prop_assert!(outcome.moved_amount <= amount);
        prop_assert_eq!(outcome.ledger_entry.amount, outcome.moved_amount);
        if add {
            prop_assert_eq!(outcome.new_saved_amount, goal.saved_amount + amount);
        } else {
            prop_assert_eq!(outcome.new_saved_amount, (goal.saved_amount - amount).max(Decimal::ZERO));
            prop_assert_eq!(outcome.moved_amount, goal.saved_amount - outcome.new_saved_amount);
        }
    }

    /// The delta label is total and its sign follows the direction of change.
    #[test]
    fn prop_percent_change_sign(current in arb_signed_amount(), previous in arb_signed_amount()) {
        let label = percent_change(current, previous);
        prop_assert!(label.ends_with('%'));
        if !previous.is_zero() {
            let rising = (current - previous) / previous > Decimal::ZERO;
            if label.starts_with('+') {
                prop_assert!(rising);
            }
            if label.starts_with('-') {
                prop_assert!(!rising);
            }
        }
    }

    /// Schedules never contain a negative installment and always add up to
    /// the rounded plan total.
    #[test]
    fn prop_schedule_is_non_negative_and_sums_to_total(
        principal in arb_amount().prop_filter("positive", |a| *a > Decimal::ZERO),
        count in 1u32..=48,
        rate in (0i64..=50).prop_map(|tenths| Decimal::new(tenths, 1)),
        billing_day in 1u32..=31,
    ) {
        let installment_plan = plan(principal, count, rate).unwrap();
        let purchase = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let schedule = installment_plan.schedule(purchase, billing_day).unwrap();

        prop_assert_eq!(schedule.len(), count as usize);
        prop_assert!(schedule.iter().all(|i| i.amount >= Decimal::ZERO));
        prop_assert_eq!(
            schedule.iter().map(|i| i.amount).sum::<Decimal>(),
            installment_plan.total_with_interest.round_dp(2)
        );
    }
}
