use axum::{
    Json, Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, patch, post, put},
};
use chrono::Duration;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use std::sync::Arc;

use api_types::HealthCheck;
use engine::Engine;

use crate::{
    analytics, auth::JwtKeys, auth::require_auth, budgets, goals, transactions, users, wallets,
};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub keys: Arc<JwtKeys>,
}

/// Settings the router needs besides the engine.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub jwt_secret: String,
    pub jwt_expiry_minutes: i64,
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me".to_string(),
            jwt_expiry_minutes: 15,
            cors_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}

async fn health() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn cors(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignoring invalid CORS origin: {origin}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

fn router(state: ServerState) -> Router {
    let public = Router::new()
        .route("/auth/register", post(users::register))
        .route("/auth/login", post(users::login));

    let protected = Router::new()
        .route("/auth/me", get(users::me))
        .route("/auth/profile", put(users::update_profile))
        .route("/auth/onboarding", post(users::onboarding))
        .route("/wallets", get(wallets::list).post(wallets::create))
        .route("/wallets/default", get(wallets::default_wallet))
        .route("/wallets/transfer", post(wallets::transfer))
        .route(
            "/wallets/{id}",
            get(wallets::get).put(wallets::update).delete(wallets::delete),
        )
        .route("/wallets/{id}/default", put(wallets::set_default))
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route("/transactions/stats", get(transactions::stats))
        .route(
            "/transactions/{id}",
            get(transactions::get)
                .put(transactions::update)
                .delete(transactions::delete),
        )
        .route("/goals", get(goals::list).post(goals::create))
        .route("/goals/summary", get(goals::summary))
        .route(
            "/goals/{id}",
            get(goals::get).put(goals::update).delete(goals::delete),
        )
        .route("/goals/{id}/progress", patch(goals::add_progress))
        .route("/budgets", get(budgets::list).post(budgets::create))
        .route("/budgets/summary", get(budgets::summary))
        .route("/budgets/status", get(budgets::status))
        .route(
            "/budgets/{id}",
            get(budgets::get).put(budgets::update).delete(budgets::delete),
        )
        .route("/analytics/dashboard", get(analytics::dashboard))
        .route("/analytics/money-flow", get(analytics::money_flow))
        .route("/analytics/spending", get(analytics::spending))
        .route("/analytics/trends", get(analytics::trends))
        .route("/analytics/health", get(analytics::health))
        .route("/analytics/insights", get(analytics::insights))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", public.merge(protected))
        .with_state(state)
}

/// Build the application router.
pub fn app(engine: Engine, config: &ServerConfig) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
        keys: Arc::new(JwtKeys::new(
            &config.jwt_secret,
            Duration::minutes(config.jwt_expiry_minutes),
        )),
    };

    router(state)
        .layer(cors(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
}

pub async fn run_with_listener(
    engine: Engine,
    config: ServerConfig,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(engine, &config)).await
}
