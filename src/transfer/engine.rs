//! Transfer Engine
//!
//! Moves an amount between two accounts as one atomic step with respect to
//! every other transfer touching either account. Transfers on disjoint
//! account pairs share nothing but the lock registry's bookkeeping and run in
//! parallel.

use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::error::TransferError;
use super::state::TransferPhase;
use super::types::{LockPolicy, TransferId, TransferReceipt, TransferRequest};
use crate::account::{Account, AccountStore};
use crate::key_lock::{KeyLockGuard, KeyLockManager};

/// Both account locks of one attempt. Dropping it releases both.
struct LockedPair<'a> {
    _from: KeyLockGuard<'a>,
    _to: KeyLockGuard<'a>,
}

/// Phases one attempt went through, in order
struct Attempt {
    id: TransferId,
    phases: Vec<TransferPhase>,
}

impl Attempt {
    fn new() -> Self {
        Self {
            id: TransferId::new(),
            phases: Vec::with_capacity(7),
        }
    }

    fn enter(&mut self, phase: TransferPhase) {
        debug!(transfer_id = %self.id, phase = %phase, "transfer phase");
        self.phases.push(phase);
    }

    /// Phase the attempt gave up in. `Releasing` only cleans up after it.
    fn failed_in(&self) -> TransferPhase {
        self.phases
            .iter()
            .rev()
            .copied()
            .find(|p| !p.is_terminal() && *p != TransferPhase::Releasing)
            .unwrap_or(TransferPhase::Resolving)
    }
}

pub struct TransferEngine {
    store: Arc<dyn AccountStore>,
    locks: Arc<KeyLockManager>,
    policy: LockPolicy,
}

impl TransferEngine {
    pub fn new(store: Arc<dyn AccountStore>, locks: Arc<KeyLockManager>) -> Self {
        Self::with_policy(store, locks, LockPolicy::default())
    }

    pub fn with_policy(
        store: Arc<dyn AccountStore>,
        locks: Arc<KeyLockManager>,
        policy: LockPolicy,
    ) -> Self {
        Self {
            store,
            locks,
            policy,
        }
    }

    pub fn policy(&self) -> LockPolicy {
        self.policy
    }

    pub fn locks(&self) -> &KeyLockManager {
        &self.locks
    }

    pub fn transfer(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
    ) -> Result<TransferReceipt, TransferError> {
        self.execute(&TransferRequest::new(from, to, amount))
    }

    /// Run one transfer attempt to a terminal outcome.
    ///
    /// `Busy`, `InsufficientBalance` and `AccountNotFound` leave both accounts
    /// untouched. The engine never retries.
    pub fn execute(&self, req: &TransferRequest) -> Result<TransferReceipt, TransferError> {
        let (attempt, result) = self.attempt(req);

        match &result {
            Ok(receipt) => info!(
                transfer_id = %attempt.id,
                from = %receipt.from_account_id,
                to = %receipt.to_account_id,
                amount = %receipt.amount,
                from_balance = %receipt.from_balance,
                to_balance = %receipt.to_balance,
                "Transfer completed"
            ),
            Err(e @ TransferError::TransferFailure { .. }) => error!(
                transfer_id = %attempt.id,
                phase = %attempt.failed_in(),
                code = e.code(),
                "Transfer failed: {}", e
            ),
            Err(e) => warn!(
                transfer_id = %attempt.id,
                phase = %attempt.failed_in(),
                code = e.code(),
                "Transfer rejected: {}", e
            ),
        }

        result
    }

    fn attempt(&self, req: &TransferRequest) -> (Attempt, Result<TransferReceipt, TransferError>) {
        let mut attempt = Attempt::new();
        let result = self.run(&mut attempt, req);
        attempt.enter(match result {
            Ok(_) => TransferPhase::Completed,
            Err(_) => TransferPhase::Failed,
        });
        (attempt, result)
    }

    fn run(
        &self,
        attempt: &mut Attempt,
        req: &TransferRequest,
    ) -> Result<TransferReceipt, TransferError> {
        let from_id = req.from_account_id.as_str();
        let to_id = req.to_account_id.as_str();

        // Resolution happens before locking; anything read here is provisional
        attempt.enter(TransferPhase::Resolving);
        req.validate()?;
        for id in [from_id, to_id] {
            if self.store.get(id).is_none() {
                return Err(TransferError::AccountNotFound(id.to_string()));
            }
        }

        attempt.enter(TransferPhase::Locking);
        let pair = self.lock_pair(from_id, to_id)?;

        let result = self.settle(attempt, req);

        attempt.enter(TransferPhase::Releasing);
        drop(pair);
        result
    }

    /// Check funds and write both balances. Both locks are held throughout.
    fn settle(
        &self,
        attempt: &mut Attempt,
        req: &TransferRequest,
    ) -> Result<TransferReceipt, TransferError> {
        let from_id = req.from_account_id.as_str();
        let to_id = req.to_account_id.as_str();
        let amount = req.amount;

        attempt.enter(TransferPhase::Validating);
        let from_acc = self
            .store
            .get(from_id)
            .ok_or_else(|| TransferError::AccountNotFound(from_id.to_string()))?;
        let to_acc = self
            .store
            .get(to_id)
            .ok_or_else(|| TransferError::AccountNotFound(to_id.to_string()))?;

        let remaining = from_acc
            .balance
            .checked_sub(amount)
            .ok_or_else(|| TransferError::failure(from_id, to_id, amount, "debit overflow"))?;
        if remaining < Decimal::ZERO {
            return Err(TransferError::InsufficientBalance {
                account_id: from_id.to_string(),
                balance: from_acc.balance,
                amount,
            });
        }
        let credited = to_acc
            .balance
            .checked_add(amount)
            .ok_or_else(|| TransferError::failure(from_id, to_id, amount, "credit overflow"))?;

        attempt.enter(TransferPhase::Mutating);
        let from_after = self
            .store
            .update(from_acc.with_new_balance(remaining))
            .map_err(|e| TransferError::failure(from_id, to_id, amount, e))?;
        let to_after = match self.store.update(to_acc.with_new_balance(credited)) {
            Ok(acc) => acc,
            Err(e) => {
                self.compensate(attempt.id, &from_acc);
                return Err(TransferError::failure(from_id, to_id, amount, e));
            }
        };

        Ok(TransferReceipt {
            transfer_id: attempt.id,
            from_account_id: from_after.account_id,
            to_account_id: to_after.account_id,
            amount,
            from_balance: from_after.balance,
            to_balance: to_after.balance,
            completed_at: Utc::now(),
        })
    }

    fn lock_pair<'a>(&'a self, from: &str, to: &str) -> Result<LockedPair<'a>, TransferError> {
        debug_assert_ne!(from, to, "same-account transfers are rejected by validation");

        match self.policy {
            LockPolicy::FailFast => {
                // A guard taken for `from` is dropped if `to` fails, so no
                // partial hold outlives the attempt
                let from_guard = self.try_lock(from, from, to)?;
                let to_guard = self.try_lock(to, from, to)?;
                Ok(LockedPair {
                    _from: from_guard,
                    _to: to_guard,
                })
            }
            LockPolicy::Ordered => {
                if from < to {
                    let from_guard = self.locks.acquire(from);
                    let to_guard = self.locks.acquire(to);
                    Ok(LockedPair {
                        _from: from_guard,
                        _to: to_guard,
                    })
                } else {
                    let to_guard = self.locks.acquire(to);
                    let from_guard = self.locks.acquire(from);
                    Ok(LockedPair {
                        _from: from_guard,
                        _to: to_guard,
                    })
                }
            }
        }
    }

    fn try_lock<'a>(
        &'a self,
        key: &str,
        from: &str,
        to: &str,
    ) -> Result<KeyLockGuard<'a>, TransferError> {
        let busy = || TransferError::Busy {
            from: from.to_string(),
            to: to.to_string(),
        };
        if self.locks.is_held(key) {
            return Err(busy());
        }
        self.locks.try_acquire(key).ok_or_else(busy)
    }

    /// Put the source balance back after the credit write failed.
    ///
    /// Runs while both locks are still held, so nobody observed the debit.
    fn compensate(&self, transfer_id: TransferId, original: &Account) {
        match self.store.update(original.clone()) {
            Ok(_) => warn!(
                transfer_id = %transfer_id,
                account_id = %original.account_id,
                balance = %original.balance,
                "Debit compensated after failed credit"
            ),
            Err(e) => error!(
                transfer_id = %transfer_id,
                account_id = %original.account_id,
                balance = %original.balance,
                "Debit compensation failed: {}", e
            ),
        }
    }
}
