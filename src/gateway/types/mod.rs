//! Gateway types module
//!
//! - [`ApiResponse<T>`]: Unified API response wrapper
//! - [`ApiError`]: Error responses, built from domain errors
//! - [`AccountResponseData`]: Account view returned by the account endpoints

pub mod response;

use serde::Serialize;

use crate::account::Account;
use crate::core_types::{AccountId, Amount};

pub use response::{ApiError, ApiResponse, ApiResult, error_codes, reply};

/// Account view
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponseData {
    pub account_id: AccountId,
    pub balance: Amount,
}

impl From<Account> for AccountResponseData {
    fn from(account: Account) -> Self {
        Self {
            account_id: account.account_id,
            balance: account.balance,
        }
    }
}
