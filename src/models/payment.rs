//! Payment models

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

static ACCOUNT_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{6,24}$").unwrap_or_else(|e| panic!("invalid account number pattern: {e}"))
});

/// Mock payment request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub bank_account_number: String,
    #[validate(range(min = 100.0, message = "Amount must be at least 100"))]
    pub amount: f64,
    #[validate(length(max = 500, message = "Payment info must be at most 500 characters"))]
    pub payment_info: String,
}

impl PaymentRequest {
    /// Field checks the derive can't express
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()?;

        if !ACCOUNT_NUMBER.is_match(&self.bank_account_number) {
            return Err(AppError::Validation(
                "Bank account number must be 6 to 24 digits".to_string(),
            ));
        }

        if self.payment_info.trim().is_empty() {
            return Err(AppError::Validation("Payment info is required".to_string()));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Success,
    Failed,
}

/// Outcome of a mock payment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub transaction_id: Uuid,
    pub status: PaymentStatus,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(account: &str, amount: f64, info: &str) -> PaymentRequest {
        PaymentRequest {
            bank_account_number: account.to_string(),
            amount,
            payment_info: info.to_string(),
        }
    }

    #[test]
    fn test_check_accepts_valid_request() {
        assert!(request("123456", 100.0, "Donation").check().is_ok());
        assert!(request(&"9".repeat(24), 1500.5, "Donation").check().is_ok());
    }

    #[test]
    fn test_check_rejects_bad_fields() {
        assert!(matches!(
            request("12345", 150.0, "Donation").check(),
            Err(AppError::Validation(_))
        ));
        assert!(request(&"1".repeat(25), 150.0, "Donation").check().is_err());
        assert!(request("12ab5678", 150.0, "Donation").check().is_err());
        assert!(request("123456", 99.99, "Donation").check().is_err());
        assert!(request("123456", 150.0, "   ").check().is_err());
    }

    #[test]
    fn test_request_wire_format() {
        let req: PaymentRequest = serde_json::from_value(serde_json::json!({
            "bankAccountNumber": "12345678",
            "amount": 250,
            "paymentInfo": "Wells"
        }))
        .unwrap();
        assert_eq!(req.amount, 250.0);
        assert_eq!(req.bank_account_number, "12345678");
    }
}
