//! Account record

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core_types::{AccountId, Amount};

/// A named balance holder
///
/// The id is fixed at creation. The balance only changes through the transfer
/// engine's update path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_id: AccountId,
    #[serde(default)]
    pub balance: Amount,
}

impl Account {
    /// New account with a zero balance
    pub fn new(account_id: impl Into<AccountId>) -> Self {
        Self {
            account_id: account_id.into(),
            balance: Decimal::ZERO,
        }
    }

    pub fn with_balance(account_id: impl Into<AccountId>, balance: Amount) -> Self {
        Self {
            account_id: account_id.into(),
            balance,
        }
    }

    /// Copy of this account carrying a different balance
    pub fn with_new_balance(&self, balance: Amount) -> Self {
        Self {
            account_id: self.account_id.clone(),
            balance,
        }
    }
}
