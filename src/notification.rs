//! User-facing transfer notifications

use tracing::info;

use crate::account::Account;

/// Delivers messages to account holders
pub trait NotificationService: Send + Sync {
    fn notify_about_transfer(&self, account: &Account, transfer_description: &str);
}

/// Writes notifications to the log instead of sending them anywhere
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotificationService;

impl NotificationService for LoggingNotificationService {
    fn notify_about_transfer(&self, account: &Account, transfer_description: &str) {
        info!(
            account_id = %account.account_id,
            "Sending notification to owner: {}", transfer_description
        );
    }
}

pub fn debit_message(amount: &impl std::fmt::Display, account_id: &str) -> String {
    format!(
        "Dear User, Amount {} has been debited from account {}",
        amount, account_id
    )
}

pub fn credit_message(amount: &impl std::fmt::Display, account_id: &str) -> String {
    format!(
        "Dear User, Amount {} has been credited to account {}",
        amount, account_id
    )
}
