//! Account management module
//!
//! In-memory storage for accounts and their balances.

pub mod models;
pub mod repository;
pub mod validation;

// Re-export commonly used types
pub use models::Account;
pub use repository::{AccountStore, InMemoryAccountRepository, StoreError};
pub use validation::{ValidationError, validate_account_id, validate_new_account};
