//! Integration tests for the in-process store: transactional writes,
//! change notices and seed documents.

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use futures::future::join_all;
use pennywise_core::cards::{CardRepositoryTrait, NewCard};
use pennywise_core::errors::CreditError;
use pennywise_core::events::{Collection, DomainEvent, RecordingSink};
use pennywise_core::goals::{
    ContributionDirection, GoalRepositoryTrait, GoalService, GoalServiceTrait, NewGoal,
};
use pennywise_core::subscriptions::{NewSubscription, SubscriptionRepositoryTrait};
use pennywise_core::transactions::{
    NewTransaction, TransactionKind, TransactionRepositoryTrait, TransactionService,
    TransactionServiceTrait,
};
use pennywise_core::utils::clock::FixedClock;
use pennywise_core::Error;
use pennywise_storage_memory::MemoryStore;
use rust_decimal_macros::dec;

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()))
}

fn setup() -> (MemoryStore, RecordingSink) {
    let sink = RecordingSink::new();
    let store = MemoryStore::with_clock(Arc::new(sink.clone()), clock());
    (store, sink)
}

fn new_card(limit: rust_decimal::Decimal, used: rust_decimal::Decimal) -> NewCard {
    NewCard {
        id: Some("card-1".to_string()),
        user_id: "u1".to_string(),
        bank: "First Bank".to_string(),
        brand: "Visa".to_string(),
        last4_digits: "4242".to_string(),
        interest_rate: dec!(10),
        credit_limit: limit,
        used_credit: used,
        billing_day: 10,
    }
}

fn new_goal(id: &str, priority: bool) -> NewGoal {
    NewGoal {
        id: Some(id.to_string()),
        user_id: "u1".to_string(),
        name: format!("Goal {}", id),
        target_value: dec!(1000),
        saved_amount: dec!(50),
        is_priority: priority,
    }
}

fn day(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, m, d).unwrap()
}

#[tokio::test]
async fn test_concurrent_charges_never_exceed_limit() {
    let (store, _) = setup();
    let cards = store.card_repository();
    cards.insert_card(new_card(dec!(1000), dec!(0))).await.unwrap();

    let attempts = (0..25).map(|_| {
        let cards = cards.clone();
        tokio::spawn(async move { cards.charge_card("u1", "card-1", dec!(100)).await })
    });
    let results: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let accepted = results.iter().filter(|r| r.is_ok()).count();
    let rejected = results
        .iter()
        .filter(|r| {
            matches!(
                r,
                Err(Error::Credit(CreditError::InsufficientLimit { available })) if available.is_zero()
            )
        })
        .count();
    assert_eq!(accepted, 10);
    assert_eq!(rejected, 15);

    let card = cards.get_card("card-1").unwrap();
    assert_eq!(card.used_credit, dec!(1000));
}

#[tokio::test]
async fn test_rejected_card_expense_writes_nothing() {
    let (store, sink) = setup();
    let cards = store.card_repository();
    cards.insert_card(new_card(dec!(1000), dec!(900))).await.unwrap();
    sink.take();

    let service = TransactionService::new(
        store.transaction_repository(),
        store.card_repository(),
        chrono_tz::UTC,
    );
    let expense = NewTransaction::new("u1", TransactionKind::Expense, dec!(150), "travel", day(3, 14))
        .with_card("card-1", 2);

    let err = service.create_transaction(expense.clone()).await.unwrap_err();
    assert_eq!(
        err.as_credit(),
        Some(&CreditError::InsufficientLimit { available: dec!(100) })
    );
    assert!(store.transaction_repository().load_transactions("u1").unwrap().is_empty());
    assert_eq!(cards.get_card("card-1").unwrap().used_credit, dec!(900));
    assert!(sink.is_empty());

    // Same expense through the store directly is rejected atomically too
    let direct = store
        .transaction_repository()
        .record_card_expense(expense, "card-1", dec!(150))
        .await;
    assert!(direct.is_err());
    assert!(store.transaction_repository().load_transactions("u1").unwrap().is_empty());
}

#[tokio::test]
async fn test_card_cannot_be_charged_by_another_user() {
    let (store, sink) = setup();
    let cards = store.card_repository();
    cards.insert_card(new_card(dec!(1000), dec!(0))).await.unwrap();
    sink.take();

    let service = TransactionService::new(
        store.transaction_repository(),
        store.card_repository(),
        chrono_tz::UTC,
    );
    let foreign = NewTransaction::new("u2", TransactionKind::Expense, dec!(900), "travel", day(3, 14))
        .with_card("card-1", 1);

    let err = service.create_transaction(foreign.clone()).await.unwrap_err();
    assert_eq!(
        err.as_credit(),
        Some(&CreditError::CardNotFound("card-1".to_string()))
    );

    // The store enforces ownership on its own as well
    let direct = store
        .transaction_repository()
        .record_card_expense(foreign, "card-1", dec!(900))
        .await
        .unwrap_err();
    assert!(matches!(direct, Error::Credit(CreditError::CardNotFound(_))));
    let charged = cards.charge_card("u2", "card-1", dec!(900)).await.unwrap_err();
    assert!(matches!(charged, Error::Credit(CreditError::CardNotFound(_))));

    assert_eq!(cards.get_card("card-1").unwrap().used_credit, dec!(0));
    assert!(store.transaction_repository().load_transactions("u2").unwrap().is_empty());
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_duplicate_ids_are_rejected() {
    let (store, sink) = setup();
    let cards = store.card_repository();
    cards.insert_card(new_card(dec!(1000), dec!(0))).await.unwrap();
    let service = TransactionService::new(
        store.transaction_repository(),
        store.card_repository(),
        chrono_tz::UTC,
    );

    let mut first = NewTransaction::new("u1", TransactionKind::Expense, dec!(300), "tech", day(3, 14))
        .with_card("card-1", 1);
    first.id = Some("t1".to_string());
    let mut second = first.clone();
    second.amount = dec!(400);

    service.create_transaction(first).await.unwrap();
    sink.take();
    let err = service.create_transaction(second).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(sink.for_user("u1").is_empty());

    // The rejected write keeps neither the record nor its charge
    let records = store.transaction_repository().load_transactions("u1").unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].amount, dec!(300));
    assert_eq!(cards.get_card("card-1").unwrap().used_credit, dec!(300));

    let mut plain = NewTransaction::new("u1", TransactionKind::Income, dec!(50), "misc", day(3, 14));
    plain.id = Some("t1".to_string());
    assert!(store.transaction_repository().insert_transaction(plain).await.is_err());

    assert!(cards.insert_card(new_card(dec!(5), dec!(0))).await.is_err());
    assert_eq!(cards.get_card("card-1").unwrap().credit_limit, dec!(1000));

    let goals = store.goal_repository();
    goals.insert_goal(new_goal("a", false)).await.unwrap();
    let mut again = new_goal("a", true);
    again.saved_amount = dec!(999);
    assert!(goals.insert_goal(again).await.is_err());
    let kept = goals.get_goal("a").unwrap();
    assert_eq!(kept.saved_amount, dec!(50));
    assert!(!kept.is_priority);
}

#[tokio::test]
async fn test_accepted_card_expense_charges_principal() {
    let (store, sink) = setup();
    store.card_repository().insert_card(new_card(dec!(1000), dec!(900))).await.unwrap();
    sink.take();

    let service = TransactionService::new(
        store.transaction_repository(),
        store.card_repository(),
        chrono_tz::UTC,
    );
    let expense = NewTransaction::new("u1", TransactionKind::Expense, dec!(50), "books", day(3, 14))
        .with_card("card-1", 2);
    let outcome = service.create_transaction(expense).await.unwrap();

    assert_eq!(outcome.card.unwrap().used_credit, dec!(950));
    assert_eq!(outcome.plan.unwrap().total_with_interest, dec!(60.50));
    assert_eq!(outcome.record.installments, Some(2));

    assert_eq!(
        sink.collections(),
        vec![Collection::Cards, Collection::Transactions]
    );
}

#[tokio::test]
async fn test_concurrent_favorite_switches_leave_one_favorite() {
    let (store, _) = setup();
    let goals = store.goal_repository();
    for (id, flagged) in [("a", true), ("b", false), ("c", false), ("d", false)] {
        goals.insert_goal(new_goal(id, flagged)).await.unwrap();
    }
    let service = Arc::new(GoalService::new(goals.clone(), clock(), chrono_tz::UTC));

    let switches = ["b", "c", "d", "b", "c"].into_iter().map(|target| {
        let service = service.clone();
        tokio::spawn(async move { service.set_favorite("u1", target).await })
    });
    for joined in join_all(switches).await {
        joined.unwrap().unwrap();
    }

    let flagged: Vec<String> = goals
        .load_goals("u1")
        .unwrap()
        .into_iter()
        .filter(|g| g.is_priority)
        .map(|g| g.id)
        .collect();
    assert_eq!(flagged.len(), 1);
    assert_eq!(
        service.favorite_goal("u1").unwrap().map(|g| g.id),
        Some(flagged[0].clone())
    );
}

#[tokio::test]
async fn test_inserting_flagged_goal_clears_previous_favorite() {
    let (store, _) = setup();
    let goals = store.goal_repository();
    goals.insert_goal(new_goal("a", true)).await.unwrap();
    let b = goals.insert_goal(new_goal("b", true)).await.unwrap();
    assert!(b.is_priority);

    let flagged: Vec<String> = goals
        .load_goals("u1")
        .unwrap()
        .into_iter()
        .filter(|g| g.is_priority)
        .map(|g| g.id)
        .collect();
    assert_eq!(flagged, vec!["b".to_string()]);
}

#[tokio::test]
async fn test_set_favorite_rejects_foreign_goal() {
    let (store, _) = setup();
    let goals = store.goal_repository();
    goals.insert_goal(new_goal("a", true)).await.unwrap();
    let mut other = new_goal("z", false);
    other.user_id = "u2".to_string();
    goals.insert_goal(other).await.unwrap();

    let service = GoalService::new(goals.clone(), clock(), chrono_tz::UTC);
    let err = service.set_favorite("u1", "z").await.unwrap_err();
    assert!(matches!(err, Error::Goal(_)));
    assert!(goals.get_goal("a").unwrap().is_priority);
}

#[tokio::test]
async fn test_contribution_floors_at_zero_and_records_ledger_entry() {
    let (store, _) = setup();
    store.goal_repository().insert_goal(new_goal("a", false)).await.unwrap();
    let service = GoalService::new(store.goal_repository(), clock(), chrono_tz::UTC);

    let (goal, entry) = service
        .contribute("a", ContributionDirection::Remove, dec!(80))
        .await
        .unwrap();
    assert_eq!(goal.saved_amount, dec!(0));
    assert_eq!(entry.kind, TransactionKind::Income);
    assert_eq!(entry.amount, dec!(50));
    assert_eq!(entry.category, "goals");
    assert_eq!(entry.goal_ref.as_deref(), Some("a"));
    assert_eq!(entry.date, day(3, 15));

    // Nothing left to remove: the movement is still recorded, at zero
    let (goal, entry) = service
        .contribute("a", ContributionDirection::Remove, dec!(10))
        .await
        .unwrap();
    assert_eq!(goal.saved_amount, dec!(0));
    assert_eq!(entry.kind, TransactionKind::Income);
    assert_eq!(entry.amount, dec!(0));

    let err = service
        .contribute("missing", ContributionDirection::Add, dec!(10))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Goal(_)));
    assert_eq!(store.transaction_repository().load_transactions("u1").unwrap().len(), 2);
}

#[tokio::test]
async fn test_subscription_deactivation() {
    let (store, sink) = setup();
    let subscriptions = store.subscription_repository();
    let created = subscriptions
        .insert_subscription(NewSubscription {
            id: None,
            user_id: "u1".to_string(),
            name: "Streaming".to_string(),
            amount: dec!(12.99),
            billing_day: 5,
            card_ref: None,
        })
        .await
        .unwrap();
    assert!(created.active);

    let deactivated = subscriptions.deactivate_subscription(&created.id).await.unwrap();
    assert!(!deactivated.active);
    // Second deactivation is a no-op without a notice
    subscriptions.deactivate_subscription(&created.id).await.unwrap();
    assert_eq!(sink.len(), 2);

    let err = subscriptions.deactivate_subscription("nope").await.unwrap_err();
    assert!(matches!(err, Error::Repository(_)));
}

#[tokio::test]
async fn test_change_stream_receives_committed_writes() {
    let (store, _) = setup();
    let mut stream = store.subscribe("u1", Collection::Transactions);

    store
        .transaction_repository()
        .insert_transaction(NewTransaction::new(
            "u1",
            TransactionKind::FixedExpense,
            dec!(800),
            "rent",
            day(3, 1),
        ))
        .await
        .unwrap();

    match stream.next().await.unwrap() {
        DomainEvent::TransactionsChanged { user_id, kinds, .. } => {
            assert_eq!(user_id, "u1");
            assert_eq!(kinds, vec![TransactionKind::FixedExpense]);
        }
        other => panic!("Expected TransactionsChanged, got {:?}", other),
    }
}

#[tokio::test]
async fn test_seed_import_and_export() {
    let (store, sink) = setup();
    let seed = r#"{
        "transactions": [
            {"id": "t1", "userId": "u1", "kind": "INCOME", "amount": 1000, "category": "salary",
             "description": null, "cardRef": null, "installments": null, "goalRef": null,
             "date": "2026-03-01", "createdAt": "2026-03-01T09:00:00Z"},
            {"id": "t2", "userId": "u1", "kind": "FIXED_EXPENSE", "amount": 800, "category": "rent",
             "description": null, "cardRef": null, "installments": null, "goalRef": null,
             "date": "2026-03-02", "createdAt": "2026-03-02T09:00:00Z"}
        ],
        "goals": [
            {"id": "g1", "userId": "u1", "name": "Trip", "targetValue": 2000, "savedAmount": 100,
             "isPriority": false, "createdAt": "2026-01-01T00:00:00Z"}
        ]
    }"#;

    let count = store.import_json(seed).await.unwrap();
    assert_eq!(count, 3);
    assert_eq!(store.transaction_repository().load_transactions("u1").unwrap().len(), 2);
    assert_eq!(sink.len(), 2);

    assert_eq!(store.user_ids().unwrap(), vec!["u1".to_string()]);

    let exported = store.export_json().unwrap();
    let (copy, _) = setup();
    assert_eq!(copy.import_json(&exported).await.unwrap(), 3);
    assert_eq!(copy.export_json().unwrap(), exported);

    assert!(matches!(
        store.import_json("{ not json").await,
        Err(Error::Validation(_))
    ));
}
