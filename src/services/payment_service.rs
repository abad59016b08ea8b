//! Mock payment processor
//! Nothing leaves the process: the outcome is decided from the request alone.

use crate::models::payment::{PaymentReceipt, PaymentRequest, PaymentStatus};
use chrono::Utc;
use uuid::Uuid;

pub const MIN_AMOUNT: f64 = 100.0;

/// Account numbers the mock bank accepts
const MIN_ACCOUNT_DIGITS: usize = 6;
const MAX_ACCOUNT_DIGITS: usize = 17;

const REJECTED_MESSAGE: &str =
    "Payment rejected: amount must be >= 100 and account number must be 6–17 digits.";

#[derive(Debug, Clone, Default)]
pub struct PaymentService;

impl PaymentService {
    pub fn new() -> Self {
        Self
    }

    /// Decide the outcome of an already validated request
    pub fn process(&self, req: &PaymentRequest) -> PaymentReceipt {
        let transaction_id = Uuid::new_v4();
        let digits = req.bank_account_number.len();
        let accepted = req.amount >= MIN_AMOUNT
            && (MIN_ACCOUNT_DIGITS..=MAX_ACCOUNT_DIGITS).contains(&digits)
            && req.bank_account_number.bytes().all(|b| b.is_ascii_digit());

        let (status, message) = if accepted {
            (
                PaymentStatus::Success,
                format!(
                    "Payment of {:.2} processed for account {}",
                    req.amount,
                    mask_account(&req.bank_account_number)
                ),
            )
        } else {
            (PaymentStatus::Failed, REJECTED_MESSAGE.to_string())
        };

        tracing::info!(
            transaction_id = %transaction_id,
            status = ?status,
            account = %mask_account(&req.bank_account_number),
            "Payment processed"
        );

        PaymentReceipt {
            transaction_id,
            status,
            message,
            timestamp: Utc::now(),
        }
    }
}

/// Keep only the last four characters visible
pub fn mask_account(account: &str) -> String {
    let chars: Vec<char> = account.chars().collect();
    let visible = chars.len().min(4);
    let hidden = chars.len() - visible;

    std::iter::repeat('*')
        .take(hidden)
        .chain(chars[hidden..].iter().copied())
        .collect()
}
