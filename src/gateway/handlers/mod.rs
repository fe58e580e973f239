//! HTTP handlers
//!
//! Thin mapping from requests onto [`AccountsService`](crate::service::AccountsService)
//! and from its outcomes onto status codes.

mod account;
mod health;
mod transfer;

pub use account::{create_account, get_account};
pub use health::{HealthResponse, health_check};
pub use transfer::transfer_amount;
