//! Accounts service
//!
//! The surface handed to calling layers: create an account, read it back,
//! transfer between two accounts. Completed transfers notify both owners.

use std::sync::Arc;
use tracing::info;

use crate::account::{
    Account, AccountStore, InMemoryAccountRepository, StoreError, validate_new_account,
};
use crate::key_lock::KeyLockManager;
use crate::notification::{NotificationService, credit_message, debit_message};
use crate::transfer::{LockPolicy, TransferEngine, TransferError, TransferReceipt, TransferRequest};

/// Account creation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CreateAccountError {
    #[error(transparent)]
    Invalid(#[from] crate::account::ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct AccountsService {
    store: Arc<dyn AccountStore>,
    engine: TransferEngine,
    notifier: Arc<dyn NotificationService>,
}

impl AccountsService {
    pub fn new(
        store: Arc<dyn AccountStore>,
        locks: Arc<KeyLockManager>,
        policy: LockPolicy,
        notifier: Arc<dyn NotificationService>,
    ) -> Self {
        Self {
            engine: TransferEngine::with_policy(store.clone(), locks, policy),
            store,
            notifier,
        }
    }

    /// In-memory store sharing the process-wide lock registry
    pub fn in_memory(policy: LockPolicy, notifier: Arc<dyn NotificationService>) -> Self {
        Self::new(
            Arc::new(InMemoryAccountRepository::new()),
            KeyLockManager::global(),
            policy,
            notifier,
        )
    }

    pub fn create_account(&self, account: Account) -> Result<(), CreateAccountError> {
        validate_new_account(&account)?;
        let (account_id, balance) = (account.account_id.clone(), account.balance);
        self.store.create(account)?;
        info!(account_id = %account_id, balance = %balance, "Account created");
        Ok(())
    }

    pub fn get_account(&self, account_id: &str) -> Option<Account> {
        self.store.get(account_id)
    }

    pub fn transfer_amount(&self, req: &TransferRequest) -> Result<TransferReceipt, TransferError> {
        let receipt = self.engine.execute(req)?;

        if let Some(from) = self.store.get(&receipt.from_account_id) {
            self.notifier
                .notify_about_transfer(&from, &debit_message(&receipt.amount, &from.account_id));
        }
        if let Some(to) = self.store.get(&receipt.to_account_id) {
            self.notifier
                .notify_about_transfer(&to, &credit_message(&receipt.amount, &to.account_id));
        }

        Ok(receipt)
    }

    pub fn lock_policy(&self) -> LockPolicy {
        self.engine.policy()
    }

    pub fn engine(&self) -> &TransferEngine {
        &self.engine
    }

    /// Drop every account. Test fixture reset.
    pub fn clear_accounts(&self) {
        self.store.clear();
    }
}
