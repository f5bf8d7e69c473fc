//! Fx error types.

use hatake_core::CurrencyCode;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FxError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),

    #[error("No exchange rate available for {0}")]
    RateUnavailable(CurrencyCode),
}

pub type FxResult<T> = Result<T, FxError>;
