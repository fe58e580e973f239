//! Account input validation

use rust_decimal::Decimal;
use thiserror::Error;

use super::models::Account;

/// Validation errors for account input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Account id must not be empty")]
    EmptyAccountId,

    #[error("Account id must not contain whitespace: {0:?}")]
    WhitespaceInAccountId(String),

    #[error("Initial balance must be positive or zero, got {0}")]
    NegativeBalance(Decimal),
}

/// Reject empty ids and ids carrying whitespace
pub fn validate_account_id(account_id: &str) -> Result<(), ValidationError> {
    if account_id.is_empty() {
        return Err(ValidationError::EmptyAccountId);
    }
    if account_id.chars().any(char::is_whitespace) {
        return Err(ValidationError::WhitespaceInAccountId(account_id.to_string()));
    }
    Ok(())
}

/// Check a record before it is handed to the store
pub fn validate_new_account(account: &Account) -> Result<(), ValidationError> {
    validate_account_id(&account.account_id)?;
    if account.balance < Decimal::ZERO {
        return Err(ValidationError::NegativeBalance(account.balance));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_rules() {
        assert!(validate_account_id("Id-123").is_ok());
        assert_eq!(validate_account_id(""), Err(ValidationError::EmptyAccountId));
        assert!(matches!(
            validate_account_id("Id 123"),
            Err(ValidationError::WhitespaceInAccountId(_))
        ));
    }

    #[test]
    fn test_negative_initial_balance() {
        let acc = Account::with_balance("Id-1", Decimal::from(-1));
        assert_eq!(
            validate_new_account(&acc),
            Err(ValidationError::NegativeBalance(Decimal::from(-1)))
        );

        let acc = Account::with_balance("Id-1", Decimal::ZERO);
        assert!(validate_new_account(&acc).is_ok());
    }
}
