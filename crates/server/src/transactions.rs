//! Transaction endpoints.

use api_types::transaction::{
    Pagination, TransactionListQuery, TransactionListResponse, TransactionNew, TransactionStatsView,
    TransactionStatus as ApiStatus, TransactionUpdate, TransactionView,
};
use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use chrono::{DateTime, Datelike, TimeZone, Utc};
use engine::{NewTransactionCmd, Page, Transaction, TransactionPatch, TransactionStatus};

use crate::{
    ApiResult, AuthUser, CreatedResult, ServerError, created, ok, parse_id, server::ServerState,
};

const DEFAULT_LIMIT: u64 = 20;
const MAX_LIMIT: u64 = 100;

fn map_status(status: ApiStatus) -> TransactionStatus {
    match status {
        ApiStatus::Completed => TransactionStatus::Completed,
        ApiStatus::Pending => TransactionStatus::Pending,
        ApiStatus::Failed => TransactionStatus::Failed,
    }
}

fn map_status_back(status: TransactionStatus) -> ApiStatus {
    match status {
        TransactionStatus::Completed => ApiStatus::Completed,
        TransactionStatus::Pending => ApiStatus::Pending,
        TransactionStatus::Failed => ApiStatus::Failed,
    }
}

fn transaction_view(tx: Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        user_id: tx.user_id,
        wallet_id: tx.wallet_id,
        amount_minor: tx.amount_minor,
        description: tx.description,
        method: tx.method,
        category: tx.category,
        status: map_status_back(tx.status),
        notes: tx.notes,
        receipt_url: tx.receipt_url,
        transaction_date: tx.transaction_date,
        created_at: tx.created_at,
        updated_at: tx.updated_at,
    }
}

fn pagination(page: Page) -> Pagination {
    Pagination {
        page: page.page,
        limit: page.limit,
        total: page.total,
        total_pages: page.total_pages,
        has_next: page.has_next,
        has_prev: page.has_prev,
    }
}

/// Validate `page`/`limit` and turn them into `(limit, offset)`.
fn page_window(query: &TransactionListQuery) -> Result<(u64, u64), ServerError> {
    let page = query.page.unwrap_or(1);
    if page < 1 {
        return Err(ServerError::Validation("page must be at least 1".to_string()));
    }
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(ServerError::Validation(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }
    let offset = (page - 1)
        .checked_mul(limit)
        .ok_or_else(|| ServerError::Validation("page is out of range".to_string()))?;
    Ok((limit, offset))
}

fn start_of_month(now: DateTime<Utc>) -> Result<DateTime<Utc>, ServerError> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .ok_or_else(|| ServerError::Internal("invalid month start".to_string()))
}

fn to_i64(value: u64) -> Result<i64, ServerError> {
    i64::try_from(value).map_err(|_| ServerError::Validation("page is out of range".to_string()))
}

pub async fn list(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    query: Result<Query<TransactionListQuery>, QueryRejection>,
) -> ApiResult<TransactionListResponse> {
    let Query(query) = query?;
    let (limit, offset) = page_window(&query)?;
    let paged = state
        .engine
        .transactions_page(auth.id, to_i64(limit)?, to_i64(offset)?)
        .await?;

    ok(TransactionListResponse {
        transactions: paged.items.into_iter().map(transaction_view).collect(),
        pagination: pagination(paged.page),
    })
}

pub async fn create(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    payload: Result<Json<TransactionNew>, JsonRejection>,
) -> CreatedResult<TransactionView> {
    let Json(payload) = payload?;
    let cmd = NewTransactionCmd {
        user_id: auth.id,
        amount_minor: payload.amount_minor,
        description: payload.description,
        method: payload.method,
        category: payload.category,
        wallet_id: payload.wallet_id,
        status: payload.status.map(map_status),
        notes: payload.notes,
        receipt_url: payload.receipt_url,
        transaction_date: payload.transaction_date,
    };
    let tx = state
        .engine
        .create_transaction(cmd)
        .await
        .map_err(ServerError::failed("CREATE_FAILED"))?;

    created(transaction_view(tx))
}

pub async fn get(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> ApiResult<TransactionView> {
    let id = parse_id(&id, "transaction")?;
    let tx = state.engine.transaction(auth.id, id).await?;
    ok(transaction_view(tx))
}

pub async fn update(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<TransactionUpdate>, JsonRejection>,
) -> ApiResult<TransactionView> {
    let id = parse_id(&id, "transaction")?;
    let Json(payload) = payload?;
    let patch = TransactionPatch {
        wallet_id: payload.wallet_id,
        amount_minor: payload.amount_minor,
        description: payload.description,
        method: payload.method,
        category: payload.category,
        status: payload.status.map(map_status),
        notes: payload.notes,
        receipt_url: payload.receipt_url,
        transaction_date: payload.transaction_date,
    };
    let tx = state
        .engine
        .update_transaction(auth.id, id, patch)
        .await
        .map_err(ServerError::failed("UPDATE_FAILED"))?;

    ok(transaction_view(tx))
}

pub async fn delete(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    let id = parse_id(&id, "transaction")?;
    state
        .engine
        .delete_transaction(auth.id, id)
        .await
        .map_err(ServerError::failed("DELETE_FAILED"))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Totals from the start of the current month until now.
pub async fn stats(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> ApiResult<TransactionStatsView> {
    let now = Utc::now();
    let stats = state
        .engine
        .transaction_stats(auth.id, Some(start_of_month(now)?), Some(now))
        .await?;

    ok(TransactionStatsView {
        total_income_minor: stats.total_income_minor,
        total_expense_minor: stats.total_expense_minor,
        net_balance_minor: stats.net_balance_minor,
        transaction_count: stats.transaction_count,
    })
}
