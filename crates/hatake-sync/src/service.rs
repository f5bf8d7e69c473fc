//! Marketplace service facade.
//!
//! Wires configuration, normalizer, index store, and identity into
//! the operations the API layer calls: individual toggles, bulk
//! toggles, read queries, and orphan reconciliation. Transport is the
//! embedding application's concern.

use crate::bulk::{BulkCoordinator, BulkReport};
use crate::config::SyncConfig;
use crate::identity::DynIdentityProvider;
use crate::projector::ListingProjector;
use crate::raw::RawCollectionEntry;
use crate::synchronizer::{SyncOutcome, Synchronizer};
use chrono::Utc;
use hatake_core::{CardId, CollectionEntry, EntryVersion, ListingId, MarketplaceListing};
use hatake_fx::{CurrencyNormalizer, DynRateSource};
use hatake_index::{DynListingStore, StoreError, StoreResult, WriteOutcome};
use hatake_telemetry::metrics;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::info;

/// Result of an orphan reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Active listings examined for the seller.
    pub examined: usize,
    /// Orphaned listings withdrawn.
    pub withdrawn: usize,
    /// Orphans that raced with a newer write and were left alone.
    pub skipped_stale: usize,
}

/// The synchronization engine behind the marketplace API surface.
pub struct MarketplaceService {
    config: SyncConfig,
    synchronizer: Arc<Synchronizer>,
    bulk: BulkCoordinator,
    store: DynListingStore,
    identity: DynIdentityProvider,
}

impl MarketplaceService {
    pub fn new(
        config: SyncConfig,
        store: DynListingStore,
        rates: DynRateSource,
        identity: DynIdentityProvider,
    ) -> Self {
        let normalizer = CurrencyNormalizer::new(config.canonical_currency, rates);
        let synchronizer = Arc::new(Synchronizer::new(
            ListingProjector::new(normalizer),
            Arc::clone(&store),
            Arc::clone(&identity),
            config.store_timeout(),
        ));
        let bulk = BulkCoordinator::new(Arc::clone(&synchronizer), config.bulk_parallelism);
        Self {
            config,
            synchronizer,
            bulk,
            store,
            identity,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Sync one entry mutation (list, re-price, or un-list).
    pub async fn toggle_for_sale(&self, payload: RawCollectionEntry) -> SyncOutcome {
        self.synchronizer.sync(payload).await
    }

    /// Sync a batch of entry mutations, isolating failures per entry.
    pub async fn bulk_toggle_for_sale(&self, payloads: Vec<RawCollectionEntry>) -> BulkReport {
        self.bulk.sync_many(payloads).await
    }

    /// Fetch one listing by id, withdrawn ones included.
    pub async fn listing(&self, id: ListingId) -> StoreResult<Option<MarketplaceListing>> {
        self.bounded(self.store.get(id)).await
    }

    /// Active listings for a card, newest first.
    pub async fn listings_for_card(&self, card: CardId) -> StoreResult<Vec<MarketplaceListing>> {
        self.bounded(self.store.active_for_card(card)).await
    }

    /// The authenticated seller's active listings, newest first.
    pub async fn my_listings(&self) -> StoreResult<Vec<MarketplaceListing>> {
        let seller = self.identity.authenticated_seller();
        self.bounded(self.store.active_for_seller(seller.id)).await
    }

    /// Withdraw the seller's active listings whose backing entry is
    /// gone from the given collection snapshot.
    ///
    /// Orphans are withdrawn at a now-stamped version so the write
    /// wins over whatever version the orphan carries; a concurrent
    /// newer write wins the race and the orphan is skipped.
    pub async fn reconcile(&self, entries: &[CollectionEntry]) -> StoreResult<ReconcileReport> {
        let seller = self.identity.authenticated_seller();
        let live: HashSet<ListingId> = entries.iter().map(CollectionEntry::listing_id).collect();

        let active = self
            .bounded(self.store.active_for_seller(seller.id.clone()))
            .await?;

        let mut report = ReconcileReport {
            examined: active.len(),
            ..Default::default()
        };
        for listing in active {
            if live.contains(&listing.id) {
                continue;
            }
            let version = EntryVersion::from_datetime(Utc::now());
            match self.bounded(self.store.withdraw(listing.id, version)).await? {
                WriteOutcome::Applied => report.withdrawn += 1,
                WriteOutcome::Stale => report.skipped_stale += 1,
            }
        }

        if report.withdrawn > 0 {
            metrics::RECONCILE_WITHDRAWN_TOTAL.inc_by(report.withdrawn as f64);
            info!(
                seller = %seller.id,
                withdrawn = report.withdrawn,
                examined = report.examined,
                "withdrew orphaned listings"
            );
        }
        Ok(report)
    }

    async fn bounded<T>(
        &self,
        fut: impl std::future::Future<Output = StoreResult<T>>,
    ) -> StoreResult<T> {
        match timeout(self.config.store_timeout(), fut).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Unavailable("store call timed out".to_string())),
        }
    }
}
