//! Transfer Error Types
//!
//! Every way a transfer attempt can end without completing. None of them is
//! fatal to the process and none of them escapes with an account lock held.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::account::ValidationError;
use crate::core_types::AccountId;

/// Transfer error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    // === Validation Errors ===
    #[error("Invalid account id: {0}")]
    InvalidAccountId(#[from] ValidationError),

    #[error("Transfer amount must be greater than zero, got {0}")]
    InvalidAmount(Decimal),

    #[error("Source and target account cannot be the same: {0}")]
    SameAccount(AccountId),

    // === Account Errors ===
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Insufficient balance in account {account_id}: balance {balance}, requested {amount}")]
    InsufficientBalance {
        account_id: AccountId,
        balance: Decimal,
        amount: Decimal,
    },

    // === Contention ===
    #[error(
        "Transaction is processing on account {from} or {to}. Please wait and try again later"
    )]
    Busy { from: AccountId, to: AccountId },

    // === System Errors ===
    #[error("Failed to transfer {amount} from account id {from} to account id {to}: {reason}")]
    TransferFailure {
        from: AccountId,
        to: AccountId,
        amount: Decimal,
        reason: String,
    },
}

impl TransferError {
    pub(crate) fn failure(from: &str, to: &str, amount: Decimal, reason: impl ToString) -> Self {
        TransferError::TransferFailure {
            from: from.to_string(),
            to: to.to_string(),
            amount,
            reason: reason.to_string(),
        }
    }

    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            TransferError::InvalidAccountId(_) => "INVALID_ACCOUNT_ID",
            TransferError::InvalidAmount(_) => "INVALID_AMOUNT",
            TransferError::SameAccount(_) => "SAME_ACCOUNT",
            TransferError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            TransferError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            TransferError::Busy { .. } => "ACCOUNT_BUSY",
            TransferError::TransferFailure { .. } => "TRANSFER_FAILURE",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            TransferError::InvalidAccountId(_)
            | TransferError::InvalidAmount(_)
            | TransferError::SameAccount(_) => 400,
            TransferError::AccountNotFound(_) => 404,
            TransferError::InsufficientBalance { .. } => 406,
            TransferError::Busy { .. } => 409,
            TransferError::TransferFailure { .. } => 500,
        }
    }
}
