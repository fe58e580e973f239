//! Account Ledger
//!
//! In-memory accounts with atomic two-account balance transfers under
//! concurrent access.
//!
//! # Modules
//!
//! - [`core_types`] - Core type aliases (AccountId, Amount)
//! - [`account`] - Account record and the key-value account store
//! - [`key_lock`] - Reference-counted per-account lock registry
//! - [`transfer`] - Transfer engine, outcomes and phases
//! - [`notification`] - Debit/credit notifications to account owners
//! - [`service`] - Accounts service facade used by calling layers
//! - [`gateway`] - HTTP binding
//! - [`config`] / [`logging`] - Startup configuration and tracing setup

// Core types - must be first!
pub mod core_types;

pub mod account;
pub mod key_lock;
pub mod notification;
pub mod service;
pub mod transfer;

pub mod config;
pub mod gateway;
pub mod logging;

// Convenient re-exports at crate root
pub use account::{Account, AccountStore, InMemoryAccountRepository, StoreError};
pub use core_types::{AccountId, Amount};
pub use key_lock::{KeyLockGuard, KeyLockManager};
pub use notification::{LoggingNotificationService, NotificationService};
pub use service::{AccountsService, CreateAccountError};
pub use transfer::{
    LockPolicy, TransferEngine, TransferError, TransferPhase, TransferReceipt, TransferRequest,
};
