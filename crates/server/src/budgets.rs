//! Budget endpoints.

use api_types::budget::{
    BudgetNew, BudgetStatusView, BudgetSummaryView, BudgetType, BudgetUpdate, BudgetView,
};
use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use engine::{Budget, BudgetKind, BudgetPatch, BudgetStatus, NewBudgetCmd};

use crate::{
    ApiResult, AuthUser, CreatedResult, ServerError, created, ok, parse_id, server::ServerState,
};

fn map_kind(kind: BudgetType) -> BudgetKind {
    match kind {
        BudgetType::Fixed => BudgetKind::Fixed,
        BudgetType::Variable => BudgetKind::Variable,
    }
}

fn budget_view(budget: Budget) -> BudgetView {
    BudgetView {
        id: budget.id,
        user_id: budget.user_id,
        category: budget.category,
        limit_amount_minor: budget.limit_amount_minor,
        color: budget.color,
        icon: budget.icon,
        is_rollover: budget.is_rollover,
        kind: match budget.kind {
            BudgetKind::Fixed => BudgetType::Fixed,
            BudgetKind::Variable => BudgetType::Variable,
        },
        alert_threshold: budget.alert_threshold,
        created_at: budget.created_at,
        updated_at: budget.updated_at,
    }
}

fn status_view(status: BudgetStatus) -> BudgetStatusView {
    BudgetStatusView {
        budget_id: status.budget_id,
        category: status.category,
        limit_amount_minor: status.limit_amount_minor,
        spent_amount_minor: status.spent_amount_minor,
        remaining_amount_minor: status.remaining_amount_minor,
        percentage_used: status.percentage_used,
        is_over_budget: status.is_over_budget,
        is_near_limit: status.is_near_limit,
        alert_threshold: status.alert_threshold,
    }
}

pub async fn list(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> ApiResult<Vec<BudgetView>> {
    let budgets = state.engine.budgets(auth.id).await?;
    ok(budgets.into_iter().map(budget_view).collect())
}

pub async fn create(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    payload: Result<Json<BudgetNew>, JsonRejection>,
) -> CreatedResult<BudgetView> {
    let Json(payload) = payload?;
    let cmd = NewBudgetCmd {
        user_id: auth.id,
        category: payload.category,
        limit_amount_minor: payload.limit_amount_minor,
        color: payload.color,
        icon: payload.icon,
        is_rollover: payload.is_rollover,
        kind: payload.kind.map(map_kind),
        alert_threshold: payload.alert_threshold,
    };
    let budget = state
        .engine
        .create_budget(cmd)
        .await
        .map_err(ServerError::failed("CREATE_FAILED"))?;

    created(budget_view(budget))
}

pub async fn get(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> ApiResult<BudgetView> {
    let id = parse_id(&id, "budget")?;
    let budget = state.engine.budget(auth.id, id).await?;
    ok(budget_view(budget))
}

pub async fn update(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<BudgetUpdate>, JsonRejection>,
) -> ApiResult<BudgetView> {
    let id = parse_id(&id, "budget")?;
    let Json(payload) = payload?;
    let patch = BudgetPatch {
        category: payload.category,
        limit_amount_minor: payload.limit_amount_minor,
        color: payload.color,
        icon: payload.icon,
        is_rollover: payload.is_rollover,
        kind: payload.kind.map(map_kind),
        alert_threshold: payload.alert_threshold,
    };
    let budget = state
        .engine
        .update_budget(auth.id, id, patch)
        .await
        .map_err(ServerError::failed("UPDATE_FAILED"))?;

    ok(budget_view(budget))
}

pub async fn delete(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    let id = parse_id(&id, "budget")?;
    state
        .engine
        .delete_budget(auth.id, id)
        .await
        .map_err(ServerError::failed("DELETE_FAILED"))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Current-month spending against every budget.
pub async fn status(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> ApiResult<Vec<BudgetStatusView>> {
    let statuses = state.engine.budget_statuses(auth.id).await?;
    ok(statuses.into_iter().map(status_view).collect())
}

pub async fn summary(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> ApiResult<BudgetSummaryView> {
    let summary = state.engine.budget_summary(auth.id).await?;
    ok(BudgetSummaryView {
        total_budgets: summary.total_budgets,
        total_limit_minor: summary.total_limit_minor,
        total_spent_minor: summary.total_spent_minor,
        total_remaining_minor: summary.total_remaining_minor,
        over_budget_count: summary.over_budget_count,
        near_limit_count: summary.near_limit_count,
    })
}
