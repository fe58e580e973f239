//! Account handlers (create, lookup)

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::super::state::AppState;
use super::super::types::{AccountResponseData, ApiError, ApiResult, reply};
use crate::account::Account;

/// Create account
///
/// POST /v1/accounts
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    Json(account): Json<Account>,
) -> ApiResult<AccountResponseData> {
    tracing::info!(account_id = %account.account_id, "Creating account");

    let view = AccountResponseData::from(account.clone());
    state.service.create_account(account)?;
    reply(StatusCode::CREATED, view)
}

/// Get account
///
/// GET /v1/accounts/{account_id}
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
) -> ApiResult<AccountResponseData> {
    tracing::debug!(account_id = %account_id, "Retrieving account");

    match state.service.get_account(&account_id) {
        Some(account) => reply(StatusCode::OK, account.into()),
        None => Err(ApiError::not_found(format!(
            "Account not found: {}",
            account_id
        ))),
    }
}
