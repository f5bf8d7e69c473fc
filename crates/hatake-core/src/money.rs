//! Precision-safe money types for marketplace pricing.
//!
//! Uses `rust_decimal` for exact decimal arithmetic, avoiding
//! floating-point rounding errors in price handling. Normalized
//! prices are stored as minor-unit integers (cents) in the
//! canonical currency.

use crate::error::CoreError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Currency codes accepted for ask prices.
///
/// Matches the set of currencies sellers can list in. All six use
/// two minor-unit decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    Usd,
    Eur,
    Gbp,
    Sek,
    Nok,
    Dkk,
}

impl CurrencyCode {
    /// ISO 4217 code as displayed on listings.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Sek => "SEK",
            Self::Nok => "NOK",
            Self::Dkk => "DKK",
        }
    }

    /// Number of minor-unit decimal places (cents, öre).
    pub fn minor_unit_scale(&self) -> u32 {
        2
    }

    /// Multiplier from major units to minor units.
    pub fn minor_units_per_major(&self) -> Decimal {
        Decimal::from(10u64.pow(self.minor_unit_scale()))
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "GBP" => Ok(Self::Gbp),
            "SEK" => Ok(Self::Sek),
            "NOK" => Ok(Self::Nok),
            "DKK" => Ok(Self::Dkk),
            other => Err(CoreError::UnsupportedCurrency(other.to_string())),
        }
    }
}

/// An ask price as entered by the seller: amount plus currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub amount: Decimal,
    pub currency: CurrencyCode,
}

impl Money {
    pub fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// A price normalized to the canonical currency.
///
/// Stored as an integer number of minor units (e.g. cents) so that
/// equality and ordering are exact and independent of how the
/// original amount was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NormalizedPrice {
    pub minor_units: i64,
    pub currency: CurrencyCode,
}

impl NormalizedPrice {
    pub fn new(minor_units: i64, currency: CurrencyCode) -> Self {
        Self {
            minor_units,
            currency,
        }
    }

    /// Round a major-unit amount to minor units, half-to-even.
    ///
    /// Banker's rounding keeps conversions deterministic and
    /// reproducible independent of summation order.
    pub fn from_major(amount: Decimal, currency: CurrencyCode) -> Self {
        let minor = (amount * currency.minor_units_per_major())
            .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
        Self {
            // Scale-0 decimal within i64 range for any realistic price.
            minor_units: minor.to_i64().unwrap_or(i64::MAX),
            currency,
        }
    }

    /// Major-unit representation (e.g. 1155 -> 11.55).
    pub fn to_major(&self) -> Decimal {
        Decimal::from(self.minor_units) / self.currency.minor_units_per_major()
    }
}

impl fmt::Display for NormalizedPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.to_major(), self.currency)
    }
}
