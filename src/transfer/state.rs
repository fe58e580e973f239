//! Transfer attempt phases
//!
//! ```text
//! Resolving → Locking → Validating → Mutating → Releasing → Completed
//!     ↓          ↓           ↓           ↓
//!   Failed     Failed        └─────┬─────┘
//!                                  ↓
//!                             Releasing → Failed
//! ```
//!
//! Request checks belong to `Resolving`. Every path that gets past `Locking`
//! goes through `Releasing`.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferPhase {
    /// Checking the request and looking up both accounts, no locks taken
    Resolving,
    /// Taking the two account locks
    Locking,
    /// Re-reading balances under lock and checking funds
    Validating,
    /// Writing both balances
    Mutating,
    /// Giving back both locks
    Releasing,
    /// Terminal: both balances updated
    Completed,
    /// Terminal: nothing changed (or the debit was compensated)
    Failed,
}

impl TransferPhase {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransferPhase::Completed | TransferPhase::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransferPhase::Resolving => "RESOLVING",
            TransferPhase::Locking => "LOCKING",
            TransferPhase::Validating => "VALIDATING",
            TransferPhase::Mutating => "MUTATING",
            TransferPhase::Releasing => "RELEASING",
            TransferPhase::Completed => "COMPLETED",
            TransferPhase::Failed => "FAILED",
        }
    }
}

impl fmt::Display for TransferPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
