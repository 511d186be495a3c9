//! HTTP gateway for the accounts service

pub mod api;
pub mod error;
pub mod config;

use std::sync::Arc;

use account_service::AccountService;
use axum::{
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    account::{apply_transaction, create_account, get_account, list_accounts},
    health::{health, not_found},
};

/// App state shared across handlers
pub struct AppState {
    /// Account service
    pub account_service: Arc<AccountService>,
}

impl AppState {
    /// Wrap a service for use as router state
    pub fn new(account_service: Arc<AccountService>) -> Arc<Self> {
        Arc::new(Self { account_service })
    }
}

/// API documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        api::account::create_account,
        api::account::get_account,
        api::account::list_accounts,
        api::account::apply_transaction,
        api::health::health,
    ),
    components(
        schemas(
            common::model::account::Account,
            common::model::account::AccountType,
            common::model::account::NewAccount,
            common::model::account::Transaction,
            common::model::account::TransactionType,
            api::response::HealthResponse,
        )
    ),
    tags(
        (name = "account", description = "Account management endpoints"),
        (name = "health", description = "Liveness probe")
    ),
    info(
        title = "Accounts API",
        version = "1.0.0",
        description = "Create accounts, look them up and apply credit/debit transactions"
    )
)]
pub struct ApiDoc;

/// Build the application router with all routes and the Swagger UI
pub fn router(state: Arc<AppState>) -> Router {
    let swagger_ui = SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi());

    Router::new()
        .route("/accounts", post(create_account).get(list_accounts))
        .route("/accounts/transaction", post(apply_transaction))
        .route("/accounts/:id", get(get_account))
        .route("/health", get(health))
        .merge(swagger_ui)
        .fallback(not_found)
        .with_state(state)
}
