//! Currency normalizer.
//!
//! Pure function of its inputs plus the rate source's current
//! snapshot: converts an ask price into the canonical currency and
//! rounds half-to-even to minor-unit precision.

use crate::error::{FxError, FxResult};
use crate::rates::DynRateSource;
use hatake_core::{CurrencyCode, Money, NormalizedPrice};
use rust_decimal::Decimal;

/// Converts and rounds heterogeneous price inputs into one canonical
/// currency and precision.
pub struct CurrencyNormalizer {
    canonical: CurrencyCode,
    rates: DynRateSource,
}

impl CurrencyNormalizer {
    pub fn new(canonical: CurrencyCode, rates: DynRateSource) -> Self {
        Self { canonical, rates }
    }

    pub fn canonical_currency(&self) -> CurrencyCode {
        self.canonical
    }

    /// Normalize a major-unit amount in the given currency.
    ///
    /// Negative amounts are rejected; zero is a valid (free) price.
    /// Conversion goes through the USD base: `amount / quote(from)`
    /// yields USD, `* quote(canonical)` yields the canonical amount.
    pub fn normalize(&self, amount: Decimal, currency: CurrencyCode) -> FxResult<NormalizedPrice> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(FxError::InvalidAmount(amount));
        }

        if currency == self.canonical {
            return Ok(NormalizedPrice::from_major(amount, self.canonical));
        }

        let snapshot = self.rates.current();
        let from = snapshot
            .quote(currency)
            .ok_or(FxError::RateUnavailable(currency))?;
        let to = snapshot
            .quote(self.canonical)
            .ok_or(FxError::RateUnavailable(self.canonical))?;

        let canonical_amount = amount / from * to;
        Ok(NormalizedPrice::from_major(canonical_amount, self.canonical))
    }

    /// Normalize an ask price.
    pub fn normalize_money(&self, money: &Money) -> FxResult<NormalizedPrice> {
        self.normalize(money.amount, money.currency)
    }
}
