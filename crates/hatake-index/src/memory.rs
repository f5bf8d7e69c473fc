//! In-memory listing store.
//!
//! Backs the marketplace index with a concurrent map keyed by listing
//! id. Per-key atomicity comes from the map's entry API: a write
//! holds the key's shard lock for the compare-and-swap, so readers
//! never observe a partially written listing and concurrent writes to
//! different keys never contend.

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use hatake_core::{CardId, EntryVersion, ListingId, MarketplaceListing, SellerId};

use crate::error::StoreResult;
use crate::store::{BoxFuture, ListingStore, WriteOutcome};

/// Stored state for one listing key.
#[derive(Debug, Clone)]
enum Slot {
    Listing(MarketplaceListing),
    /// A withdraw observed before any listing content. Keeps the
    /// version so an out-of-order older upsert cannot resurrect the
    /// listing; invisible to reads.
    Tombstone(EntryVersion),
}

impl Slot {
    fn version(&self) -> EntryVersion {
        match self {
            Self::Listing(listing) => listing.source_version,
            Self::Tombstone(version) => *version,
        }
    }
}

/// In-memory marketplace index.
#[derive(Debug, Default)]
pub struct MemoryListingStore {
    slots: DashMap<ListingId, Slot>,
}

impl MemoryListingStore {
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }

    /// Number of active listings currently indexed.
    pub fn active_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot.value(), Slot::Listing(l) if l.is_active()))
            .count()
    }

    fn apply_upsert(&self, mut listing: MarketplaceListing) -> WriteOutcome {
        match self.slots.entry(listing.id) {
            Entry::Occupied(mut occupied) => {
                let stored = occupied.get();
                if !listing.source_version.is_newer_than(stored.version()) {
                    return WriteOutcome::Stale;
                }
                // Re-syncs keep the original listing time.
                if let Slot::Listing(existing) = stored {
                    listing.listed_at = existing.listed_at;
                }
                occupied.insert(Slot::Listing(listing));
                WriteOutcome::Applied
            }
            Entry::Vacant(vacant) => {
                vacant.insert(Slot::Listing(listing));
                WriteOutcome::Applied
            }
        }
    }

    fn apply_withdraw(&self, id: ListingId, version: EntryVersion) -> WriteOutcome {
        match self.slots.entry(id) {
            Entry::Occupied(mut occupied) => {
                if !version.is_newer_than(occupied.get().version()) {
                    return WriteOutcome::Stale;
                }
                match occupied.get_mut() {
                    Slot::Listing(listing) => listing.mark_withdrawn(version, Utc::now()),
                    Slot::Tombstone(stored) => *stored = version,
                }
                WriteOutcome::Applied
            }
            Entry::Vacant(vacant) => {
                vacant.insert(Slot::Tombstone(version));
                WriteOutcome::Applied
            }
        }
    }

    fn collect_active<F>(&self, matches: F) -> Vec<MarketplaceListing>
    where
        F: Fn(&MarketplaceListing) -> bool,
    {
        let mut listings: Vec<MarketplaceListing> = self
            .slots
            .iter()
            .filter_map(|slot| match slot.value() {
                Slot::Listing(l) if l.is_active() && matches(l) => Some(l.clone()),
                _ => None,
            })
            .collect();
        // Newest first.
        listings.sort_by(|a, b| b.listed_at.cmp(&a.listed_at));
        listings
    }
}

impl ListingStore for MemoryListingStore {
    fn get(&self, id: ListingId) -> BoxFuture<'_, StoreResult<Option<MarketplaceListing>>> {
        Box::pin(async move {
            Ok(self.slots.get(&id).and_then(|slot| match slot.value() {
                Slot::Listing(listing) => Some(listing.clone()),
                Slot::Tombstone(_) => None,
            }))
        })
    }

    fn upsert(&self, listing: MarketplaceListing) -> BoxFuture<'_, StoreResult<WriteOutcome>> {
        Box::pin(async move { Ok(self.apply_upsert(listing)) })
    }

    fn withdraw(
        &self,
        id: ListingId,
        version: EntryVersion,
    ) -> BoxFuture<'_, StoreResult<WriteOutcome>> {
        Box::pin(async move { Ok(self.apply_withdraw(id, version)) })
    }

    fn active_for_card(
        &self,
        card: CardId,
    ) -> BoxFuture<'_, StoreResult<Vec<MarketplaceListing>>> {
        Box::pin(async move { Ok(self.collect_active(|l| *l.card_id() == card)) })
    }

    fn active_for_seller(
        &self,
        seller: SellerId,
    ) -> BoxFuture<'_, StoreResult<Vec<MarketplaceListing>>> {
        Box::pin(async move { Ok(self.collect_active(|l| l.seller == seller)) })
    }
}
