//! Account API handlers
//!
//! Handles endpoints related to account management:
//! - Create account
//! - Get account details
//! - List a user's accounts, optionally by type
//! - Apply credit and debit transactions

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use common::model::account::{Account, AccountId, AccountType, NewAccount, Transaction};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::response::TransactionReply;
use crate::error::ApiError;
use crate::AppState;

/// Create a new account
#[utoipa::path(
    post,
    path = "/accounts",
    request_body = NewAccount,
    responses(
        (status = 201, description = "Account created, body holds the assigned ID", body = i32),
        (status = 422, description = "Malformed account"),
        (status = 500, description = "Internal server error")
    ),
    tag = "account"
)]
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewAccount>,
) -> Result<impl IntoResponse, ApiError> {
    let id = state.account_service.save_account(request).await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/accounts/{}", id))],
        Json(id),
    ))
}

/// Get an account by ID
#[utoipa::path(
    get,
    path = "/accounts/{id}",
    params(
        ("id" = i32, Path, description = "Account ID")
    ),
    responses(
        (status = 200, description = "Account details retrieved successfully", body = Account),
        (status = 404, description = "Account not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "account"
)]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<AccountId>,
) -> Result<Json<Account>, ApiError> {
    let account = state.account_service.find_account(id).await?;
    Ok(Json(account))
}

/// Account lookup query
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AccountsQuery {
    /// Owning user ID
    pub name: String,
    /// Restrict results to one account type
    #[serde(rename = "type")]
    pub account_type: Option<AccountType>,
}

/// List a user's accounts
#[utoipa::path(
    get,
    path = "/accounts",
    params(AccountsQuery),
    responses(
        (status = 200, description = "Accounts owned by the user, possibly empty", body = [Account]),
        (status = 400, description = "Missing user or unknown account type"),
        (status = 500, description = "Internal server error")
    ),
    tag = "account"
)]
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AccountsQuery>,
) -> Result<Json<Vec<Account>>, ApiError> {
    let accounts = match query.account_type {
        Some(account_type) => {
            state
                .account_service
                .find_accounts_by_type(&query.name, account_type)
                .await?
        }
        None => state.account_service.find_accounts(&query.name).await?,
    };

    Ok(Json(accounts))
}

/// Apply a credit or debit to an account
#[utoipa::path(
    post,
    path = "/accounts/transaction",
    request_body = Transaction,
    responses(
        (status = 200, description = "Transaction applied", body = String, example = json!("SUCCESS")),
        (status = 417, description = "Balance would go negative", body = String, example = json!("FAILED")),
        (status = 404, description = "Account not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "account"
)]
pub async fn apply_transaction(
    State(state): State<Arc<AppState>>,
    Json(transaction): Json<Transaction>,
) -> Result<TransactionReply, ApiError> {
    let outcome = state.account_service.apply_transaction(&transaction).await?;
    Ok(TransactionReply::from(outcome))
}
