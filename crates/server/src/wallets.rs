//! Wallet endpoints.

use api_types::wallet::{
    TransferRequest, TransferResponse, WalletNew, WalletType, WalletUpdate, WalletView,
};
use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use engine::{Currency, NewWalletCmd, TransferCmd, Wallet, WalletKind, WalletPatch};

use crate::{
    ApiResult, AuthUser, CreatedResult, ServerError, created, ok, parse_id, server::ServerState,
};

fn map_kind(kind: WalletType) -> WalletKind {
    match kind {
        WalletType::MobileMoney => WalletKind::MobileMoney,
        WalletType::Bank => WalletKind::Bank,
        WalletType::Cash => WalletKind::Cash,
        WalletType::Credit => WalletKind::Credit,
        WalletType::Savings => WalletKind::Savings,
    }
}

fn map_kind_back(kind: WalletKind) -> WalletType {
    match kind {
        WalletKind::MobileMoney => WalletType::MobileMoney,
        WalletKind::Bank => WalletType::Bank,
        WalletKind::Cash => WalletType::Cash,
        WalletKind::Credit => WalletType::Credit,
        WalletKind::Savings => WalletType::Savings,
    }
}

fn parse_currency(code: Option<String>) -> Result<Option<Currency>, ServerError> {
    code.map(|code| Currency::try_from(code.as_str()))
        .transpose()
        .map_err(ServerError::from)
}

fn wallet_view(wallet: Wallet) -> WalletView {
    WalletView {
        id: wallet.id,
        user_id: wallet.user_id,
        name: wallet.name,
        kind: map_kind_back(wallet.kind),
        balance_minor: wallet.balance_minor,
        currency: wallet.currency.code().to_string(),
        color: wallet.color,
        account_number: wallet.account_number,
        is_default: wallet.is_default,
        last_synced: wallet.last_synced,
        created_at: wallet.created_at,
        updated_at: wallet.updated_at,
    }
}

pub async fn list(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> ApiResult<Vec<WalletView>> {
    let wallets = state.engine.wallets(auth.id).await?;
    ok(wallets.into_iter().map(wallet_view).collect())
}

pub async fn create(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    payload: Result<Json<WalletNew>, JsonRejection>,
) -> CreatedResult<WalletView> {
    let Json(payload) = payload?;
    let cmd = NewWalletCmd {
        user_id: auth.id,
        name: payload.name,
        kind: map_kind(payload.kind),
        balance_minor: payload.balance_minor.unwrap_or(0),
        currency: parse_currency(payload.currency)?,
        color: payload.color,
        account_number: payload.account_number,
        is_default: payload.is_default,
    };
    let wallet = state
        .engine
        .create_wallet(cmd)
        .await
        .map_err(ServerError::failed("CREATE_FAILED"))?;

    created(wallet_view(wallet))
}

pub async fn get(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> ApiResult<WalletView> {
    let id = parse_id(&id, "wallet")?;
    let wallet = state.engine.wallet(auth.id, id).await?;
    ok(wallet_view(wallet))
}

pub async fn default_wallet(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> ApiResult<WalletView> {
    let wallet = state.engine.default_wallet(auth.id).await?;
    ok(wallet_view(wallet))
}

pub async fn update(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<WalletUpdate>, JsonRejection>,
) -> ApiResult<WalletView> {
    let id = parse_id(&id, "wallet")?;
    let Json(payload) = payload?;
    let patch = WalletPatch {
        name: payload.name,
        kind: payload.kind.map(map_kind),
        balance_minor: payload.balance_minor,
        currency: parse_currency(payload.currency)?,
        color: payload.color,
        account_number: payload.account_number,
        is_default: payload.is_default,
        last_synced: None,
    };
    let wallet = state
        .engine
        .update_wallet(auth.id, id, patch)
        .await
        .map_err(ServerError::failed("UPDATE_FAILED"))?;

    ok(wallet_view(wallet))
}

pub async fn delete(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    let id = parse_id(&id, "wallet")?;
    state
        .engine
        .delete_wallet(auth.id, id)
        .await
        .map_err(ServerError::failed("DELETE_FAILED"))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_default(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> ApiResult<WalletView> {
    let id = parse_id(&id, "wallet")?;
    let wallet = state
        .engine
        .set_default_wallet(auth.id, id)
        .await
        .map_err(ServerError::failed("UPDATE_FAILED"))?;

    ok(wallet_view(wallet))
}

pub async fn transfer(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> ApiResult<TransferResponse> {
    let Json(payload) = payload?;
    state
        .engine
        .transfer(TransferCmd {
            user_id: auth.id,
            from_wallet_id: payload.from_wallet_id,
            to_wallet_id: payload.to_wallet_id,
            amount_minor: payload.amount_minor,
        })
        .await
        .map_err(ServerError::failed("TRANSFER_FAILED"))?;

    ok(TransferResponse {
        message: "transfer completed successfully".to_string(),
    })
}
