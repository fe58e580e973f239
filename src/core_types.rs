//! Core types used throughout the ledger
//!
//! Type aliases shared by the store, the lock registry and the transfer engine.

/// Account ID - unique key of an account.
///
/// # Constraints:
/// - **Immutable**: Once an account is created under an id, the id never changes
/// - **Non-empty**: Empty ids are rejected at creation and at transfer time
///
/// Also used as the key of the per-account lock registry.
pub type AccountId = String;

/// Monetary amount (arbitrary-precision decimal)
pub type Amount = rust_decimal::Decimal;
