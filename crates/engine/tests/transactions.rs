mod common;

use chrono::{Duration, TimeZone, Utc};
use engine::{
    EngineError, NewTransactionCmd, NewWalletCmd, TransactionPatch, TransactionStatus, WalletKind,
};

use common::{engine_with_db, register};

#[tokio::test]
async fn page_metadata_over_twenty_five_rows() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice@example.com").await;
    let base = Utc.with_ymd_and_hms(2026, 1, 31, 12, 0, 0).unwrap();
    for i in 0..25 {
        engine
            .create_transaction(
                NewTransactionCmd::new(user.id, 100 + i, "Lunch", "M-Pesa", "Food")
                    .transaction_date(base - Duration::days(i)),
            )
            .await
            .unwrap();
    }

    let paged = engine.transactions_page(user.id, 10, 10).await.unwrap();
    assert_eq!(paged.items.len(), 10);
    assert_eq!(paged.page.total, 25);
    assert_eq!(paged.page.page, 2);
    assert_eq!(paged.page.total_pages, 3);
    assert!(paged.page.has_next);
    assert!(paged.page.has_prev);
    assert_eq!(paged.items[0].transaction_date, base - Duration::days(10));
    assert!(paged.items[0].transaction_date > paged.items[9].transaction_date);

    let last = engine.transactions_page(user.id, 10, 20).await.unwrap();
    assert_eq!(last.items.len(), 5);
    assert!(!last.page.has_next);

    let fallback = engine.transactions_page(user.id, 0, -5).await.unwrap();
    assert_eq!(fallback.page.limit, 50);
    assert_eq!(fallback.page.page, 1);
    assert_eq!(fallback.items.len(), 25);
}

#[tokio::test]
async fn create_applies_defaults_and_leaves_wallet_alone() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice@example.com").await;
    let wallet = engine
        .create_wallet(
            NewWalletCmd::new(user.id, "M-Pesa", WalletKind::MobileMoney, "#22c55e")
                .balance_minor(1_000),
        )
        .await
        .unwrap();

    let tx = engine
        .create_transaction(
            NewTransactionCmd::new(user.id, 250, " Groceries ", "M-Pesa", "Food")
                .wallet_id(wallet.id)
                .notes("weekly"),
        )
        .await
        .unwrap();

    assert_eq!(tx.status, TransactionStatus::Completed);
    assert_eq!(tx.description, "Groceries");
    assert_eq!(tx.wallet_id, Some(wallet.id));
    assert_eq!(engine.transaction(user.id, tx.id).await.unwrap().id, tx.id);
    assert_eq!(
        engine.wallet(user.id, wallet.id).await.unwrap().balance_minor,
        1_000
    );
}

#[tokio::test]
async fn create_validates_input() {
    let (engine, _db) = engine_with_db().await;
    let alice = register(&engine, "alice@example.com").await;
    let bob = register(&engine, "bob@example.com").await;
    let bobs = engine
        .create_wallet(NewWalletCmd::new(bob.id, "Cash", WalletKind::Cash, "#000000"))
        .await
        .unwrap();

    assert_eq!(
        engine
            .create_transaction(NewTransactionCmd::new(alice.id, 0, "Lunch", "Cash", "Food"))
            .await
            .unwrap_err(),
        EngineError::Validation("amount must be greater than 0".to_string())
    );
    assert_eq!(
        engine
            .create_transaction(NewTransactionCmd::new(alice.id, 10, "Lunch", "Cash", " "))
            .await
            .unwrap_err(),
        EngineError::Validation("category must not be empty".to_string())
    );
    assert_eq!(
        engine
            .create_transaction(
                NewTransactionCmd::new(alice.id, 10, "Lunch", "Cash", "Food").wallet_id(bobs.id)
            )
            .await
            .unwrap_err(),
        EngineError::Unauthorized("unauthorized access to wallet".to_string())
    );
}

#[tokio::test]
async fn update_is_field_presence_aware() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice@example.com").await;
    let tx = engine
        .create_transaction(
            NewTransactionCmd::new(user.id, 250, "Groceries", "M-Pesa", "Food").notes("weekly"),
        )
        .await
        .unwrap();

    let updated = engine
        .update_transaction(
            user.id,
            tx.id,
            TransactionPatch {
                amount_minor: Some(300),
                notes: Some(None),
                status: Some(TransactionStatus::Pending),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.amount_minor, 300);
    assert_eq!(updated.notes, None);
    assert_eq!(updated.status, TransactionStatus::Pending);
    assert_eq!(updated.description, "Groceries");

    let stored = engine.transaction(user.id, tx.id).await.unwrap();
    assert_eq!(stored.amount_minor, 300);
    assert_eq!(stored.notes, None);

    let err = engine
        .update_transaction(
            user.id,
            tx.id,
            TransactionPatch {
                amount_minor: Some(-5),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn deleted_transactions_disappear() {
    let (engine, _db) = engine_with_db().await;
    let alice = register(&engine, "alice@example.com").await;
    let bob = register(&engine, "bob@example.com").await;
    let tx = engine
        .create_transaction(NewTransactionCmd::new(alice.id, 250, "Taxi", "Cash", "Transport"))
        .await
        .unwrap();

    assert_eq!(
        engine.delete_transaction(bob.id, tx.id).await.unwrap_err(),
        EngineError::Unauthorized("unauthorized access to transaction".to_string())
    );

    engine.delete_transaction(alice.id, tx.id).await.unwrap();
    assert_eq!(
        engine.transaction(alice.id, tx.id).await.unwrap_err(),
        EngineError::KeyNotFound("transaction not found".to_string())
    );
    assert_eq!(
        engine.transactions_page(alice.id, 10, 0).await.unwrap().page.total,
        0
    );
}

#[tokio::test]
async fn stats_count_completed_rows_in_window() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice@example.com").await;
    let jan = |d| Utc.with_ymd_and_hms(2026, 1, d, 10, 0, 0).unwrap();

    for (amount, date, status) in [
        (100, jan(10), TransactionStatus::Completed),
        (200, jan(20), TransactionStatus::Pending),
        (50, Utc.with_ymd_and_hms(2026, 2, 1, 10, 0, 0).unwrap(), TransactionStatus::Completed),
    ] {
        engine
            .create_transaction(
                NewTransactionCmd::new(user.id, amount, "Item", "Cash", "Food")
                    .transaction_date(date)
                    .status(status),
            )
            .await
            .unwrap();
    }

    let january = engine
        .transaction_stats(
            user.id,
            Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()),
            Some(Utc.with_ymd_and_hms(2026, 1, 31, 23, 59, 59).unwrap()),
        )
        .await
        .unwrap();
    assert_eq!(january.total_income_minor, 0);
    assert_eq!(january.total_expense_minor, 100);
    assert_eq!(january.net_balance_minor, -100);
    assert_eq!(january.transaction_count, 1);

    let all = engine.transaction_stats(user.id, None, None).await.unwrap();
    assert_eq!(all.total_expense_minor, 150);
    assert_eq!(all.transaction_count, 2);

    let inclusive = engine
        .transaction_stats(user.id, Some(jan(10)), Some(jan(10)))
        .await
        .unwrap();
    assert_eq!(inclusive.transaction_count, 1);
}
