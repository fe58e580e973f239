//! Transfer handler

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResult, reply};
use crate::transfer::{LockPolicy, TransferReceipt, TransferRequest};

/// Transfer between two accounts
///
/// POST /v1/accounts/transferAmount
///
/// - 202: transfer completed
/// - 400: invalid request (empty id, non-positive amount, same account)
/// - 404: either account missing
/// - 406: insufficient balance
/// - 409: either account busy, retry later
/// - 500: store failure while writing balances
pub async fn transfer_amount(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TransferRequest>,
) -> ApiResult<TransferReceipt> {
    tracing::info!(
        from = %req.from_account_id,
        to = %req.to_account_id,
        amount = %req.amount,
        "Initiating account transfer"
    );

    let service = state.service.clone();
    let result = match service.lock_policy() {
        LockPolicy::FailFast => service.transfer_amount(&req),
        // Blocking lock acquisition must stay off the async workers
        LockPolicy::Ordered => tokio::task::spawn_blocking(move || service.transfer_amount(&req))
            .await
            .map_err(|e| ApiError::internal(format!("Transfer task failed: {}", e)))?,
    };

    reply(StatusCode::ACCEPTED, result?)
}
