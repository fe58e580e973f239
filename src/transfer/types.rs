//! Transfer Core Types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use super::error::TransferError;
use crate::account::validate_account_id;
use crate::core_types::{AccountId, Amount};

/// Transfer ID - ULID assigned to every attempt, used to correlate logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransferId(ulid::Ulid);

impl TransferId {
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }
}

impl Default for TransferId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for TransferId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

/// How a transfer takes its two account locks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockPolicy {
    /// Probe and try-lock both accounts; any contention fails the attempt
    /// as `Busy` right away
    #[default]
    FailFast,
    /// Block on both locks, smaller account id first. Never `Busy`, but
    /// callers wait behind whoever holds either account.
    Ordered,
}

/// A request to move `amount` from one account to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub from_account_id: AccountId,
    pub to_account_id: AccountId,
    #[serde(alias = "balance")]
    pub amount: Amount,
}

impl TransferRequest {
    pub fn new(from: impl Into<AccountId>, to: impl Into<AccountId>, amount: Amount) -> Self {
        Self {
            from_account_id: from.into(),
            to_account_id: to.into(),
            amount,
        }
    }

    /// Shape checks that need no store access.
    ///
    /// A transfer from an account to itself is rejected here, so the engine
    /// never tries to lock the same key twice.
    pub fn validate(&self) -> Result<(), TransferError> {
        validate_account_id(&self.from_account_id)?;
        validate_account_id(&self.to_account_id)?;

        if self.amount <= Decimal::ZERO {
            return Err(TransferError::InvalidAmount(self.amount));
        }

        if self.from_account_id == self.to_account_id {
            return Err(TransferError::SameAccount(self.from_account_id.clone()));
        }

        Ok(())
    }
}

/// Result of a completed transfer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReceipt {
    pub transfer_id: TransferId,
    pub from_account_id: AccountId,
    pub to_account_id: AccountId,
    pub amount: Amount,
    /// Balances as written under lock
    pub from_balance: Amount,
    pub to_balance: Amount,
    pub completed_at: DateTime<Utc>,
}
