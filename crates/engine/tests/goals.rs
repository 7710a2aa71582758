mod common;

use chrono::{Duration, Utc};
use engine::{EngineError, GoalPatch, GoalStatus, MAX_AMOUNT_MINOR, NewGoalCmd};

use common::{engine_with_db, register};

#[tokio::test]
async fn create_checks_amounts_and_deadline() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice@example.com").await;

    assert_eq!(
        engine
            .create_goal(
                NewGoalCmd::new(user.id, "Laptop", 1_000, "#f97316").current_amount_minor(1_500)
            )
            .await
            .unwrap_err(),
        EngineError::Validation("current amount cannot exceed target amount".to_string())
    );
    assert_eq!(
        engine
            .create_goal(
                NewGoalCmd::new(user.id, "Laptop", 1_000, "#f97316")
                    .deadline(Utc::now() - Duration::days(1))
            )
            .await
            .unwrap_err(),
        EngineError::Validation("deadline must be in the future".to_string())
    );

    let met = engine
        .create_goal(NewGoalCmd::new(user.id, "Phone", 500, "#f97316").current_amount_minor(500))
        .await
        .unwrap();
    assert_eq!(met.status, GoalStatus::Completed);

    let fresh = engine
        .create_goal(
            NewGoalCmd::new(user.id, "Trip", 2_000, "#0ea5e9")
                .deadline(Utc::now() + Duration::days(30)),
        )
        .await
        .unwrap();
    assert_eq!(fresh.status, GoalStatus::Active);
    assert_eq!(fresh.remaining_minor(), 2_000);
    assert!(fresh.days_remaining(Utc::now()).is_some_and(|d| d >= 29));
}

#[tokio::test]
async fn progress_never_overshoots_and_completes() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice@example.com").await;
    let goal = engine
        .create_goal(NewGoalCmd::new(user.id, "Laptop", 1_000, "#f97316"))
        .await
        .unwrap();

    let step = engine.add_goal_progress(user.id, goal.id, 400).await.unwrap();
    assert_eq!(step.current_amount_minor, 400);
    assert_eq!(step.status, GoalStatus::Active);

    assert_eq!(
        engine
            .add_goal_progress(user.id, goal.id, 700)
            .await
            .unwrap_err(),
        EngineError::Validation("current amount cannot exceed target amount".to_string())
    );
    assert_eq!(
        engine.goal(user.id, goal.id).await.unwrap().current_amount_minor,
        400
    );

    assert_eq!(
        engine.add_goal_progress(user.id, goal.id, 0).await.unwrap_err(),
        EngineError::Validation("amount must be greater than 0".to_string())
    );

    let done = engine.add_goal_progress(user.id, goal.id, 600).await.unwrap();
    assert_eq!(done.current_amount_minor, 1_000);
    assert_eq!(done.status, GoalStatus::Completed);
    assert_eq!(
        engine.goal(user.id, goal.id).await.unwrap().status,
        GoalStatus::Completed
    );

    assert_eq!(
        engine.add_goal_progress(user.id, goal.id, 1).await.unwrap_err(),
        EngineError::GoalCompleted("cannot add progress to completed goal".to_string())
    );
}

#[tokio::test]
async fn update_keeps_current_within_target() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice@example.com").await;
    let goal = engine
        .create_goal(NewGoalCmd::new(user.id, "Laptop", 1_000, "#f97316").current_amount_minor(600))
        .await
        .unwrap();

    let err = engine
        .update_goal(
            user.id,
            goal.id,
            GoalPatch {
                target_amount_minor: Some(500),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("current amount cannot exceed target amount".to_string())
    );

    let err = engine
        .update_goal(
            user.id,
            goal.id,
            GoalPatch {
                deadline: Some(Some(Utc::now() - Duration::days(2))),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("deadline must be in the future".to_string())
    );

    let renamed = engine
        .update_goal(
            user.id,
            goal.id,
            GoalPatch {
                name: Some("Work laptop".to_string()),
                icon: Some(Some("laptop".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Work laptop");
    assert_eq!(renamed.icon.as_deref(), Some("laptop"));
    assert_eq!(renamed.current_amount_minor, 600);

    let done = engine
        .update_goal(
            user.id,
            goal.id,
            GoalPatch {
                current_amount_minor: Some(1_000),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(done.status, GoalStatus::Completed);

    let stored = engine.goal(user.id, goal.id).await.unwrap();
    assert_eq!(stored.status, GoalStatus::Completed);
    assert_eq!(stored.icon.as_deref(), Some("laptop"));

    // A completed goal may carry a past deadline.
    let archived = engine
        .update_goal(
            user.id,
            goal.id,
            GoalPatch {
                deadline: Some(Some(Utc::now() - Duration::days(2))),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(archived.deadline.is_some());
}

#[tokio::test]
async fn goals_are_private_and_soft_deleted() {
    let (engine, _db) = engine_with_db().await;
    let alice = register(&engine, "alice@example.com").await;
    let bob = register(&engine, "bob@example.com").await;
    let goal = engine
        .create_goal(NewGoalCmd::new(alice.id, "Laptop", 1_000, "#f97316"))
        .await
        .unwrap();

    assert_eq!(
        engine.goal(bob.id, goal.id).await.unwrap_err(),
        EngineError::Unauthorized("unauthorized access to goal".to_string())
    );
    assert_eq!(
        engine
            .add_goal_progress(bob.id, goal.id, 10)
            .await
            .unwrap_err(),
        EngineError::Unauthorized("unauthorized access to goal".to_string())
    );

    engine.delete_goal(alice.id, goal.id).await.unwrap();
    assert_eq!(
        engine.goal(alice.id, goal.id).await.unwrap_err(),
        EngineError::KeyNotFound("goal not found".to_string())
    );
    assert!(engine.goals(alice.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn summary_totals_all_goals() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice@example.com").await;
    engine
        .create_goal(NewGoalCmd::new(user.id, "Laptop", 1_000, "#f97316").current_amount_minor(250))
        .await
        .unwrap();
    engine
        .create_goal(NewGoalCmd::new(user.id, "Phone", 1_000, "#0ea5e9").current_amount_minor(1_000))
        .await
        .unwrap();

    let summary = engine.goal_summary(user.id).await.unwrap();
    assert_eq!(summary.total_goals, 2);
    assert_eq!(summary.completed_goals, 1);
    assert_eq!(summary.active_goals, 1);
    assert_eq!(summary.total_target_minor, 2_000);
    assert_eq!(summary.total_saved_minor, 1_250);
    assert_eq!(summary.overall_progress, 62.5);
}

#[tokio::test]
async fn progress_near_the_maximum_is_rejected_without_overflow() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice@example.com").await;

    assert!(matches!(
        engine
            .create_goal(NewGoalCmd::new(user.id, "Island", i64::MAX, "#f97316"))
            .await
            .unwrap_err(),
        EngineError::Validation(_)
    ));

    let goal = engine
        .create_goal(
            NewGoalCmd::new(user.id, "Island", MAX_AMOUNT_MINOR, "#f97316")
                .current_amount_minor(MAX_AMOUNT_MINOR - 1),
        )
        .await
        .unwrap();

    assert!(matches!(
        engine
            .add_goal_progress(user.id, goal.id, i64::MAX)
            .await
            .unwrap_err(),
        EngineError::Validation(_)
    ));
    assert_eq!(
        engine
            .add_goal_progress(user.id, goal.id, MAX_AMOUNT_MINOR)
            .await
            .unwrap_err(),
        EngineError::Validation("current amount cannot exceed target amount".to_string())
    );
    assert_eq!(
        engine.goal(user.id, goal.id).await.unwrap().current_amount_minor,
        MAX_AMOUNT_MINOR - 1
    );

    let done = engine.add_goal_progress(user.id, goal.id, 1).await.unwrap();
    assert_eq!(done.current_amount_minor, MAX_AMOUNT_MINOR);
    assert_eq!(done.status, GoalStatus::Completed);
}
