//! Synchronizer: reconciles one entry mutation against the index.
//!
//! Validation and projection failures are rejected fail-closed before
//! any store call, so an invalid entry never gets partially listed.
//! Version conflicts are not errors; the losing write simply skips.

use crate::identity::DynIdentityProvider;
use crate::projector::{ListingProjector, Projection};
use crate::raw::{validate_entry, RawCollectionEntry};
use chrono::Utc;
use hatake_core::{CollectionEntry, SellerProfile};
use hatake_fx::FxError;
use hatake_index::{DynListingStore, StoreError, WriteOutcome};
use hatake_telemetry::metrics;
use rust_decimal::Decimal;
use serde::Serialize;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Why a sync was rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    /// The ask price amount was negative.
    InvalidAmount { amount: Decimal },
    /// The ask price currency is not one the marketplace accepts.
    UnsupportedCurrency { code: String },
    /// No exchange rate was quoted for the currency.
    RateUnavailable { currency: String },
    /// The payload failed boundary validation.
    MalformedEntry { detail: String },
    /// The index store reported an infrastructure failure.
    StoreUnavailable { detail: String },
    /// The index store call exceeded the configured timeout.
    StoreTimeout,
}

impl RejectReason {
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedEntry {
            detail: detail.into(),
        }
    }

    /// Whether retrying with the same entry version can succeed.
    ///
    /// Input errors must be corrected upstream; infrastructure
    /// failures are safe to retry because writes are conditional
    /// upserts.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. } | Self::StoreTimeout)
    }

    /// Metric label for this reason.
    pub fn label(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::UnsupportedCurrency { .. } => "unsupported_currency",
            Self::RateUnavailable { .. } => "rate_unavailable",
            Self::MalformedEntry { .. } => "malformed_entry",
            Self::StoreUnavailable { .. } => "store_unavailable",
            Self::StoreTimeout => "store_timeout",
        }
    }
}

impl From<FxError> for RejectReason {
    fn from(err: FxError) -> Self {
        match err {
            FxError::InvalidAmount(amount) => Self::InvalidAmount { amount },
            FxError::RateUnavailable(currency) => Self::RateUnavailable {
                currency: currency.to_string(),
            },
        }
    }
}

impl From<StoreError> for RejectReason {
    fn from(err: StoreError) -> Self {
        Self::StoreUnavailable {
            detail: err.to_string(),
        }
    }
}

/// Result of syncing one entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// The index now reflects this entry version.
    Applied,
    /// A newer version was already stored; nothing changed. Expected
    /// for concurrent or out-of-order syncs of the same entry.
    SkippedStale,
    /// The entry was invalid or the store failed; nothing changed.
    Rejected(RejectReason),
}

impl SyncOutcome {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// Metric label for this outcome.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::SkippedStale => "skipped_stale",
            Self::Rejected(_) => "rejected",
        }
    }
}

/// Reconciles entry mutations against the marketplace index.
pub struct Synchronizer {
    projector: ListingProjector,
    store: DynListingStore,
    identity: DynIdentityProvider,
    store_timeout: Duration,
}

impl Synchronizer {
    pub fn new(
        projector: ListingProjector,
        store: DynListingStore,
        identity: DynIdentityProvider,
        store_timeout: Duration,
    ) -> Self {
        Self {
            projector,
            store,
            identity,
            store_timeout,
        }
    }

    /// Validate and sync a raw payload on behalf of the authenticated
    /// seller.
    pub async fn sync(&self, raw: RawCollectionEntry) -> SyncOutcome {
        let seller = self.identity.authenticated_seller();
        let entry = match validate_entry(raw, &seller.id) {
            Ok(entry) => entry,
            Err(reason) => {
                warn!(%seller.id, reason = reason.label(), "rejected entry payload");
                return self.record(SyncOutcome::Rejected(reason));
            }
        };
        self.sync_entry(&entry, &seller.profile).await
    }

    /// Sync an already-validated entry.
    pub async fn sync_entry(
        &self,
        entry: &CollectionEntry,
        seller_profile: &SellerProfile,
    ) -> SyncOutcome {
        let projection = match self.projector.project(entry, seller_profile, Utc::now()) {
            Ok(projection) => projection,
            Err(reason) => {
                warn!(entry = %entry.id, reason = reason.label(), "rejected entry");
                return self.record(SyncOutcome::Rejected(reason));
            }
        };

        let write = match projection {
            Projection::List(listing) => self.store.upsert(listing),
            Projection::Withdraw => self.store.withdraw(entry.listing_id(), entry.version),
        };

        let outcome = match timeout(self.store_timeout, write).await {
            Err(_) => {
                metrics::STORE_FAILURES_TOTAL
                    .with_label_values(&["timeout"])
                    .inc();
                warn!(entry = %entry.id, "index store call timed out");
                SyncOutcome::Rejected(RejectReason::StoreTimeout)
            }
            Ok(Err(err)) => {
                metrics::STORE_FAILURES_TOTAL
                    .with_label_values(&["unavailable"])
                    .inc();
                warn!(entry = %entry.id, %err, "index store unavailable");
                SyncOutcome::Rejected(err.into())
            }
            Ok(Ok(WriteOutcome::Applied)) => {
                debug!(entry = %entry.id, version = %entry.version, "sync applied");
                SyncOutcome::Applied
            }
            Ok(Ok(WriteOutcome::Stale)) => {
                debug!(entry = %entry.id, version = %entry.version, "sync skipped, stale version");
                SyncOutcome::SkippedStale
            }
        };
        self.record(outcome)
    }

    fn record(&self, outcome: SyncOutcome) -> SyncOutcome {
        metrics::SYNC_OUTCOMES_TOTAL
            .with_label_values(&[outcome.label()])
            .inc();
        if let SyncOutcome::Rejected(reason) = &outcome {
            metrics::SYNC_REJECTED_TOTAL
                .with_label_values(&[reason.label()])
                .inc();
        }
        outcome
    }
}
