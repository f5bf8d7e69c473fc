//! Error types for hatake-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    #[error("Unknown card condition: {0}")]
    UnknownCondition(String),

    #[error("Decimal parse error: {0}")]
    DecimalParse(#[from] rust_decimal::Error),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
