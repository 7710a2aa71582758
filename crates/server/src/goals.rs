//! Saving goal endpoints.

use api_types::goal::{
    GoalNew, GoalPriority as ApiPriority, GoalProgress, GoalStatus as ApiStatus, GoalSummaryView,
    GoalUpdate, GoalView,
};
use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::Utc;
use engine::{GoalPatch, GoalPriority, GoalStatus, NewGoalCmd, SavingGoal};

use crate::{
    ApiResult, AuthUser, CreatedResult, ServerError, created, ok, parse_id, server::ServerState,
};

fn map_priority(priority: ApiPriority) -> GoalPriority {
    match priority {
        ApiPriority::High => GoalPriority::High,
        ApiPriority::Medium => GoalPriority::Medium,
        ApiPriority::Low => GoalPriority::Low,
    }
}

fn map_status(status: ApiStatus) -> GoalStatus {
    match status {
        ApiStatus::Active => GoalStatus::Active,
        ApiStatus::Paused => GoalStatus::Paused,
        ApiStatus::Completed => GoalStatus::Completed,
    }
}

fn goal_view(goal: SavingGoal) -> GoalView {
    let progress_percentage = goal.progress_percentage();
    let remaining_minor = goal.remaining_minor();
    let days_remaining = goal.days_remaining(Utc::now());
    GoalView {
        id: goal.id,
        user_id: goal.user_id,
        name: goal.name,
        target_amount_minor: goal.target_amount_minor,
        current_amount_minor: goal.current_amount_minor,
        color: goal.color,
        icon: goal.icon,
        deadline: goal.deadline,
        priority: match goal.priority {
            GoalPriority::High => ApiPriority::High,
            GoalPriority::Medium => ApiPriority::Medium,
            GoalPriority::Low => ApiPriority::Low,
        },
        category: goal.category,
        status: match goal.status {
            GoalStatus::Active => ApiStatus::Active,
            GoalStatus::Paused => ApiStatus::Paused,
            GoalStatus::Completed => ApiStatus::Completed,
        },
        progress_percentage,
        remaining_minor,
        days_remaining,
        created_at: goal.created_at,
        updated_at: goal.updated_at,
    }
}

pub async fn list(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> ApiResult<Vec<GoalView>> {
    let goals = state.engine.goals(auth.id).await?;
    ok(goals.into_iter().map(goal_view).collect())
}

pub async fn create(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    payload: Result<Json<GoalNew>, JsonRejection>,
) -> CreatedResult<GoalView> {
    let Json(payload) = payload?;
    let cmd = NewGoalCmd {
        user_id: auth.id,
        name: payload.name,
        target_amount_minor: payload.target_amount_minor,
        current_amount_minor: payload.current_amount_minor,
        color: payload.color,
        icon: payload.icon,
        deadline: payload.deadline,
        priority: payload.priority.map(map_priority),
        category: payload.category,
        status: payload.status.map(map_status),
    };
    let goal = state
        .engine
        .create_goal(cmd)
        .await
        .map_err(ServerError::failed("CREATE_FAILED"))?;

    created(goal_view(goal))
}

pub async fn get(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> ApiResult<GoalView> {
    let id = parse_id(&id, "goal")?;
    let goal = state.engine.goal(auth.id, id).await?;
    ok(goal_view(goal))
}

pub async fn update(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<GoalUpdate>, JsonRejection>,
) -> ApiResult<GoalView> {
    let id = parse_id(&id, "goal")?;
    let Json(payload) = payload?;
    let patch = GoalPatch {
        name: payload.name,
        target_amount_minor: payload.target_amount_minor,
        current_amount_minor: payload.current_amount_minor,
        color: payload.color,
        icon: payload.icon,
        deadline: payload.deadline,
        priority: payload.priority.map(map_priority),
        category: payload.category,
        status: payload.status.map(map_status),
    };
    let goal = state
        .engine
        .update_goal(auth.id, id, patch)
        .await
        .map_err(ServerError::failed("UPDATE_FAILED"))?;

    ok(goal_view(goal))
}

pub async fn delete(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    let id = parse_id(&id, "goal")?;
    state
        .engine
        .delete_goal(auth.id, id)
        .await
        .map_err(ServerError::failed("DELETE_FAILED"))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_progress(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<GoalProgress>, JsonRejection>,
) -> ApiResult<GoalView> {
    let id = parse_id(&id, "goal")?;
    let Json(payload) = payload?;
    let goal = state
        .engine
        .add_goal_progress(auth.id, id, payload.amount_minor)
        .await
        .map_err(ServerError::failed("UPDATE_PROGRESS_FAILED"))?;

    ok(goal_view(goal))
}

pub async fn summary(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> ApiResult<GoalSummaryView> {
    let summary = state.engine.goal_summary(auth.id).await?;
    ok(GoalSummaryView {
        total_goals: summary.total_goals,
        completed_goals: summary.completed_goals,
        active_goals: summary.active_goals,
        total_target_minor: summary.total_target_minor,
        total_saved_minor: summary.total_saved_minor,
        overall_progress: summary.overall_progress,
    })
}
