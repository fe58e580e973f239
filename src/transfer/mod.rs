//! Account-to-account transfers
//!
//! # Flow
//!
//! ```text
//! validate → resolve both accounts → lock both → re-read + check funds
//!          → write debit, write credit → release both
//! ```
//!
//! # Safety Invariants
//!
//! 1. **Lock Both Or Neither**: a failed lock attempt gives back anything it
//!    already took before reporting `Busy`
//! 2. **Read Under Lock**: balances used for the funds check and the writes
//!    are read after both locks are held
//! 3. **Always Release**: locks are RAII guards, so every exit path
//!    (including errors and panics) releases them
//! 4. **Read-Only Rejections**: `AccountNotFound`, `Busy` and
//!    `InsufficientBalance` never write to the store

pub mod engine;
pub mod error;
pub mod state;
pub mod types;

// Re-exports for convenience
pub use engine::TransferEngine;
pub use error::TransferError;
pub use state::TransferPhase;
pub use types::{LockPolicy, TransferId, TransferReceipt, TransferRequest};
