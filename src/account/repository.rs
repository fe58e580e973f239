//! Account store
//!
//! The store is a plain key-value map. It is safe for concurrent single-key
//! create/get/update but provides no atomicity across keys; cross-account
//! consistency is the transfer engine's job.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use thiserror::Error;

use super::models::Account;
use crate::core_types::AccountId;

/// Account store errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Account id {0} already exists!")]
    DuplicateAccountId(AccountId),

    #[error("Account id {0} not found")]
    AccountNotFound(AccountId),

    #[error("Account store unavailable: {0}")]
    Unavailable(String),
}

/// Storage contract consumed by the transfer engine
pub trait AccountStore: Send + Sync {
    /// Insert a new account. Fails if the id is already present.
    fn create(&self, account: Account) -> Result<(), StoreError>;

    /// Snapshot of the account, if present
    fn get(&self, account_id: &str) -> Option<Account>;

    /// Atomically replace the record for an existing id.
    ///
    /// Returns the stored record. Never inserts.
    fn update(&self, account: Account) -> Result<Account, StoreError>;

    /// Drop every account
    fn clear(&self);
}

/// In-memory store backed by a sharded concurrent map
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: DashMap<AccountId, Account>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl AccountStore for InMemoryAccountRepository {
    fn create(&self, account: Account) -> Result<(), StoreError> {
        match self.accounts.entry(account.account_id.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateAccountId(account.account_id)),
            Entry::Vacant(slot) => {
                slot.insert(account);
                Ok(())
            }
        }
    }

    fn get(&self, account_id: &str) -> Option<Account> {
        self.accounts.get(account_id).map(|acc| acc.value().clone())
    }

    fn update(&self, account: Account) -> Result<Account, StoreError> {
        match self.accounts.get_mut(&account.account_id) {
            Some(mut stored) => {
                *stored = account;
                Ok(stored.clone())
            }
            None => Err(StoreError::AccountNotFound(account.account_id)),
        }
    }

    fn clear(&self) {
        self.accounts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_create_and_get() {
        let repo = InMemoryAccountRepository::new();
        repo.create(Account::with_balance("Id-123", Decimal::from(1000)))
            .unwrap();

        let acc = repo.get("Id-123").unwrap();
        assert_eq!(acc.balance, Decimal::from(1000));
        assert!(repo.get("Id-999").is_none());
    }

    #[test]
    fn test_duplicate_create_rejected() {
        let repo = InMemoryAccountRepository::new();
        repo.create(Account::new("Id-1")).unwrap();

        let err = repo
            .create(Account::with_balance("Id-1", Decimal::from(5)))
            .unwrap_err();
        assert_eq!(err, StoreError::DuplicateAccountId("Id-1".into()));
        assert_eq!(err.to_string(), "Account id Id-1 already exists!");
        // first record untouched
        assert_eq!(repo.get("Id-1").unwrap().balance, Decimal::ZERO);
    }

    #[test]
    fn test_update_only_replaces_existing() {
        let repo = InMemoryAccountRepository::new();
        let err = repo
            .update(Account::with_balance("ghost", Decimal::ONE))
            .unwrap_err();
        assert_eq!(err, StoreError::AccountNotFound("ghost".into()));
        assert!(repo.is_empty());

        repo.create(Account::new("Id-1")).unwrap();
        let stored = repo
            .update(Account::with_balance("Id-1", Decimal::from(42)))
            .unwrap();
        assert_eq!(stored.balance, Decimal::from(42));
        assert_eq!(repo.get("Id-1").unwrap().balance, Decimal::from(42));
    }

    #[test]
    fn test_concurrent_create_same_id_single_winner() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let repo = Arc::clone(&repo);
                thread::spawn(move || {
                    repo.create(Account::with_balance("shared", Decimal::from(i)))
                        .is_ok()
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(winners, 1);
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_clear() {
        let repo = InMemoryAccountRepository::new();
        repo.create(Account::new("a")).unwrap();
        repo.create(Account::new("b")).unwrap();
        repo.clear();
        assert!(repo.is_empty());
    }
}
