mod common;

use engine::{
    Engine, HealthRating, MAX_AMOUNT_MINOR, NewBudgetCmd, NewGoalCmd, NewTransactionCmd,
    NewWalletCmd, Period, TrendDirection, User, WalletKind,
};

use common::{engine_with_db, register};

/// Wallet of 10_000, one Food expense of 1_000 this month, a Food budget of
/// 5_000 and a goal at 80%.
async fn seeded(engine: &Engine) -> User {
    let user = register(engine, "alice@example.com").await;
    engine
        .create_wallet(
            NewWalletCmd::new(user.id, "M-Pesa", WalletKind::MobileMoney, "#22c55e")
                .balance_minor(10_000),
        )
        .await
        .unwrap();
    engine
        .create_transaction(NewTransactionCmd::new(user.id, 1_000, "Groceries", "M-Pesa", "Food"))
        .await
        .unwrap();
    engine
        .create_budget(NewBudgetCmd::new(user.id, "Food", 5_000, "#ef4444"))
        .await
        .unwrap();
    engine
        .create_goal(NewGoalCmd::new(user.id, "Laptop", 1_000, "#f97316").current_amount_minor(800))
        .await
        .unwrap();
    user
}

#[tokio::test]
async fn dashboard_summarizes_current_month() {
    let (engine, _db) = engine_with_db().await;
    let user = seeded(&engine).await;

    let dashboard = engine.dashboard(user.id).await.unwrap();
    assert_eq!(dashboard.total_balance_minor, 10_000);
    assert_eq!(dashboard.total_income_minor, 0);
    assert_eq!(dashboard.total_expense_minor, 1_000);
    assert_eq!(dashboard.net_savings_minor, -1_000);
    assert_eq!(dashboard.active_goals_count, 1);
    assert_eq!(dashboard.total_goals_progress, 80.0);
    assert_eq!(dashboard.budget_alerts, 0);
    assert_eq!(dashboard.recent_transactions, 1);
    assert_eq!(dashboard.top_categories.len(), 1);
    assert_eq!(dashboard.top_categories[0].category, "Food");
    assert_eq!(dashboard.top_categories[0].percentage, 100.0);
    assert_eq!(dashboard.month_comparison.current_month_expense_minor, 1_000);
}

#[tokio::test]
async fn spending_splits_by_category() {
    let (engine, _db) = engine_with_db().await;
    let user = seeded(&engine).await;
    engine
        .create_transaction(NewTransactionCmd::new(user.id, 3_000, "Fuel", "Cash", "Transport"))
        .await
        .unwrap();

    let report = engine.spending(user.id, Period::OneMonth).await.unwrap();
    assert!(report.start <= report.end);
    assert_eq!(report.total_spending_minor, 4_000);
    assert_eq!(report.by_category.len(), 2);
    assert_eq!(report.by_category[0].category, "Transport");
    assert_eq!(report.by_category[0].percentage, 75.0);
    assert_eq!(report.by_category[0].budget_limit_minor, None);
    assert_eq!(report.by_category[1].budget_limit_minor, Some(5_000));
    let total: f64 = report.by_category.iter().map(|c| c.percentage).sum();
    assert_eq!(total, 100.0);
}

#[tokio::test]
async fn flow_and_trends_use_recent_activity() {
    let (engine, _db) = engine_with_db().await;
    let user = seeded(&engine).await;

    let flow = engine
        .income_vs_expense(user.id, Period::SevenDays)
        .await
        .unwrap();
    assert_eq!(flow.total_expense_minor, 1_000);
    assert_eq!(flow.savings_rate, 0.0);
    assert_eq!(flow.data_points.len(), 1);
    assert_eq!(flow.data_points[0].expense_minor, 1_000);

    let trends = engine.monthly_trends(user.id, 3).await.unwrap();
    assert_eq!(trends.months.len(), 3);
    assert_eq!(trends.expense_minor, vec![0, 0, 1_000]);
    assert_eq!(trends.savings_minor, vec![0, 0, -1_000]);
    assert_eq!(trends.direction, TrendDirection::Down);

    let capped = engine.monthly_trends(user.id, 100).await.unwrap();
    assert_eq!(capped.months.len(), 24);
}

#[tokio::test]
async fn health_and_insights() {
    let (engine, _db) = engine_with_db().await;
    let user = seeded(&engine).await;

    let health = engine.financial_health(user.id).await.unwrap();
    assert_eq!(health.metrics.budget_compliance, 100.0);
    assert_eq!(health.metrics.goal_progress, 80.0);
    assert!(health.metrics.emergency_fund_ratio > 3.0);
    assert_eq!(health.score, 70);
    assert_eq!(health.rating, HealthRating::Good);
    assert_eq!(health.debt_to_income, 0.0);
    assert_eq!(
        health.recommendations,
        vec!["Try to save at least 10-20% of your income".to_string()]
    );

    let insights = engine.insights(user.id).await.unwrap();
    assert_eq!(insights.health.score, 70);
    assert!(insights.message.starts_with("You're doing well!"));
    assert!(
        insights
            .message
            .ends_with(" Try to save at least 10-20% of your income")
    );
}

#[tokio::test]
async fn empty_history_scores_zero() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice@example.com").await;

    let health = engine.financial_health(user.id).await.unwrap();
    assert_eq!(health.score, 0);
    assert_eq!(health.rating, HealthRating::NeedsImprovement);

    let report = engine.spending(user.id, Period::OneYear).await.unwrap();
    assert_eq!(report.total_spending_minor, 0);
    assert!(report.by_category.is_empty());
}

#[tokio::test]
async fn reports_stay_available_with_balances_at_the_maximum() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice@example.com").await;
    for name in ["Bank", "Savings"] {
        engine
            .create_wallet(
                NewWalletCmd::new(user.id, name, WalletKind::Bank, "#22c55e")
                    .balance_minor(MAX_AMOUNT_MINOR),
            )
            .await
            .unwrap();
    }
    engine
        .create_goal(NewGoalCmd::new(user.id, "Island", MAX_AMOUNT_MINOR, "#f97316"))
        .await
        .unwrap();

    let summary = engine.dashboard(user.id).await.unwrap();
    assert_eq!(summary.total_balance_minor, 2 * MAX_AMOUNT_MINOR);
    assert!(engine.financial_health(user.id).await.is_ok());
    assert_eq!(
        engine.goal_summary(user.id).await.unwrap().total_target_minor,
        MAX_AMOUNT_MINOR
    );
}
