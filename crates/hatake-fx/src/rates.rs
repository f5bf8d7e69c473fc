//! Exchange-rate snapshots and the injected rate-source seam.
//!
//! Rates are quoted against a USD base: `quote(c)` is how many units
//! of `c` one USD buys. The snapshot is point-in-time; it is not
//! queried transactionally with a sync, so two syncs may observe
//! different snapshots if a refresh happens between them.

use chrono::{DateTime, Utc};
use hatake_core::CurrencyCode;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// A point-in-time view of exchange rates against the USD base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSnapshot {
    /// Units of each currency per one USD.
    rates: HashMap<CurrencyCode, Decimal>,
    pub fetched_at: DateTime<Utc>,
}

impl RateSnapshot {
    pub fn new(rates: HashMap<CurrencyCode, Decimal>, fetched_at: DateTime<Utc>) -> Self {
        Self { rates, fetched_at }
    }

    /// Static fallback rates used when no live source is configured.
    pub fn fallback() -> Self {
        let mut rates = HashMap::new();
        rates.insert(CurrencyCode::Usd, Decimal::ONE);
        rates.insert(CurrencyCode::Sek, Decimal::new(1058, 2));
        rates.insert(CurrencyCode::Eur, Decimal::new(93, 2));
        rates.insert(CurrencyCode::Gbp, Decimal::new(79, 2));
        rates.insert(CurrencyCode::Nok, Decimal::new(1060, 2));
        rates.insert(CurrencyCode::Dkk, Decimal::new(695, 2));
        Self {
            rates,
            fetched_at: Utc::now(),
        }
    }

    /// Units of `currency` per one USD, if quoted.
    ///
    /// USD always quotes at 1. Zero or negative quotes are treated as
    /// absent; dividing by them would produce garbage prices.
    pub fn quote(&self, currency: CurrencyCode) -> Option<Decimal> {
        if currency == CurrencyCode::Usd {
            return Some(Decimal::ONE);
        }
        self.rates
            .get(&currency)
            .copied()
            .filter(|q| q.is_sign_positive() && !q.is_zero())
    }
}

/// Supplier of the current rate snapshot.
///
/// The sync engine treats this as an external collaborator; the
/// embedding application decides how snapshots are refreshed.
pub trait RateSource: Send + Sync {
    fn current(&self) -> RateSnapshot;
}

/// Arc wrapper for RateSource trait objects.
pub type DynRateSource = Arc<dyn RateSource>;

/// A rate source that always returns the same snapshot.
#[derive(Debug, Clone)]
pub struct FixedRates {
    snapshot: RateSnapshot,
}

impl FixedRates {
    pub fn new(snapshot: RateSnapshot) -> Self {
        Self { snapshot }
    }

    /// Fixed source backed by the static fallback table.
    pub fn fallback() -> Self {
        Self::new(RateSnapshot::fallback())
    }
}

impl RateSource for FixedRates {
    fn current(&self) -> RateSnapshot {
        self.snapshot.clone()
    }
}

/// A rate source whose snapshot can be replaced as fresh rates arrive.
///
/// Readers always see a complete snapshot; the swap is atomic under
/// the lock.
pub struct SwappableRates {
    snapshot: RwLock<RateSnapshot>,
}

impl SwappableRates {
    pub fn new(initial: RateSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(initial),
        }
    }

    /// Replace the current snapshot.
    pub fn set(&self, snapshot: RateSnapshot) {
        *self.snapshot.write() = snapshot;
    }
}

impl RateSource for SwappableRates {
    fn current(&self) -> RateSnapshot {
        self.snapshot.read().clone()
    }
}
