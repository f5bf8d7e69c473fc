//! Currency normalization for marketplace prices.
//!
//! Converts heterogeneous ask prices into the canonical currency at
//! minor-unit precision, using an injected point-in-time rate
//! snapshot. Rate sourcing itself (API fetch, caching) lives with the
//! embedding application; this crate only consumes snapshots.

pub mod error;
pub mod normalizer;
pub mod rates;

pub use error::{FxError, FxResult};
pub use normalizer::CurrencyNormalizer;
pub use rates::{DynRateSource, FixedRates, RateSnapshot, RateSource, SwappableRates};
