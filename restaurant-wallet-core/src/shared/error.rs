//! Error handling for the wallet ledger
//!
//! This module defines the error type shared by the domain and the repositories.

use rust_decimal::Decimal;
use thiserror::Error;

/// Ledger error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("A pending withdrawal request already exists for restaurant {0}")]
    PendingRequestExists(String),

    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: Decimal, available: Decimal },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create an invalid state error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Business-rule violations the caller can fix; everything else is a server fault.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::storage(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_ledger_error_creation() {
        assert!(matches!(LedgerError::validation("bad"), LedgerError::Validation(_)));
        assert!(matches!(LedgerError::not_found("gone"), LedgerError::NotFound(_)));
        assert!(matches!(LedgerError::invalid_state("done"), LedgerError::InvalidState(_)));
        assert!(matches!(LedgerError::storage("disk"), LedgerError::Storage(_)));
    }

    #[test]
    fn test_error_conversions() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let ledger_error: LedgerError = io_error.into();

        assert!(matches!(ledger_error, LedgerError::Storage(_)));
        assert!(!ledger_error.is_client_error());
    }

    #[test]
    fn test_error_display() {
        let error = LedgerError::InsufficientBalance {
            requested: dec!(120.00),
            available: dec!(80.50),
        };
        let display = format!("{}", error);

        assert!(display.contains("120.00"));
        assert!(display.contains("80.50"));
        assert!(error.is_client_error());
    }
}
