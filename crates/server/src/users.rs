//! Registration, login and profile endpoints.

use api_types::auth::{
    AuthResponse, LoginRequest, OnboardingRequest, ProfileUpdate, RegisterRequest, UserView,
};
use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use engine::{Currency, EngineError, OnboardingCmd, ProfilePatch, User};

use crate::{ApiResult, AuthUser, CreatedResult, ServerError, created, ok, server::ServerState};

pub(crate) fn user_view(user: User) -> UserView {
    UserView {
        id: user.id,
        name: user.name,
        email: user.email,
        is_onboarded: user.is_onboarded,
        monthly_income_minor: user.monthly_income_minor,
        currency: user.currency.code().to_string(),
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

fn auth_response(state: &ServerState, user: User) -> Result<AuthResponse, ServerError> {
    let token = state.keys.issue(&user)?;
    Ok(AuthResponse {
        token,
        user: user_view(user),
    })
}

pub async fn register(
    State(state): State<ServerState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> CreatedResult<AuthResponse> {
    let Json(payload) = payload?;
    let user = state
        .engine
        .register(&payload.name, &payload.email, &payload.password)
        .await
        .map_err(ServerError::failed("REGISTER_FAILED"))?;
    tracing::info!("registered user {}", user.id);

    created(auth_response(&state, user)?)
}

pub async fn login(
    State(state): State<ServerState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<AuthResponse> {
    let Json(payload) = payload?;
    let user = state.engine.login(&payload.email, &payload.password).await?;

    ok(auth_response(&state, user)?)
}

pub async fn me(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> ApiResult<UserView> {
    let user = state.engine.user(auth.id).await.map_err(|err| match err {
        EngineError::KeyNotFound(message) => ServerError::UserNotFound(message),
        other => other.into(),
    })?;

    ok(user_view(user))
}

pub async fn update_profile(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> ApiResult<UserView> {
    let Json(payload) = payload?;
    let user = state
        .engine
        .update_profile(
            auth.id,
            ProfilePatch {
                name: payload.name,
                email: payload.email,
            },
        )
        .await
        .map_err(ServerError::failed("UPDATE_FAILED"))?;

    ok(user_view(user))
}

pub async fn onboarding(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    payload: Result<Json<OnboardingRequest>, JsonRejection>,
) -> ApiResult<UserView> {
    let Json(payload) = payload?;
    let currency = Currency::try_from(payload.currency.as_str())?;
    let user = state
        .engine
        .complete_onboarding(OnboardingCmd {
            user_id: auth.id,
            monthly_income_minor: payload.monthly_income_minor,
            currency,
        })
        .await
        .map_err(ServerError::failed("ONBOARDING_FAILED"))?;

    ok(user_view(user))
}
