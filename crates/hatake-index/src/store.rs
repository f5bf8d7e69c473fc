//! Listing store trait for the marketplace index.
//!
//! Provides a trait-based abstraction over the index backend. This
//! allows for:
//! - Dependency injection for testing
//! - An in-memory materialization and a document-datastore backend
//!   behind the same contract

use std::pin::Pin;
use std::sync::Arc;

use hatake_core::{CardId, EntryVersion, ListingId, MarketplaceListing, SellerId};

use crate::error::StoreResult;

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Result of a conditional write against the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The write was newer than the stored state and fully applied.
    Applied,
    /// The incoming version was not newer than the stored one; the
    /// index is unchanged. Expected for concurrent or out-of-order
    /// syncs, not an error.
    Stale,
}

impl WriteOutcome {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Keyed lookup, conditional write, and range query over listings.
///
/// Guarantees required of implementations:
/// - Writes are per-key atomic: an upsert or withdraw either fully
///   applies or has no effect; readers never observe a partial listing.
/// - A write whose `source_version` is not strictly newer than what
///   is stored returns `Stale` and leaves the index unchanged, which
///   prevents an out-of-order update from resurrecting an
///   already-withdrawn listing.
pub trait ListingStore: Send + Sync {
    /// Fetch a listing by id, regardless of visibility.
    fn get(&self, id: ListingId) -> BoxFuture<'_, StoreResult<Option<MarketplaceListing>>>;

    /// Insert or replace the listing keyed by its id, conditional on
    /// the listing's source version being newer than the stored one.
    fn upsert(&self, listing: MarketplaceListing) -> BoxFuture<'_, StoreResult<WriteOutcome>>;

    /// Soft-deactivate the listing at the given source version. The
    /// record is kept, not erased.
    fn withdraw(
        &self,
        id: ListingId,
        version: EntryVersion,
    ) -> BoxFuture<'_, StoreResult<WriteOutcome>>;

    /// Active listings for a card, newest first.
    fn active_for_card(&self, card: CardId)
        -> BoxFuture<'_, StoreResult<Vec<MarketplaceListing>>>;

    /// Active listings for a seller, newest first.
    fn active_for_seller(
        &self,
        seller: SellerId,
    ) -> BoxFuture<'_, StoreResult<Vec<MarketplaceListing>>>;
}

/// Arc wrapper for ListingStore trait objects.
pub type DynListingStore = Arc<dyn ListingStore>;

/// A store whose every call fails; for exercising infrastructure
/// error paths in tests.
#[derive(Debug, Default)]
pub struct UnavailableStore;

impl UnavailableStore {
    fn fail<T>(&self) -> BoxFuture<'_, StoreResult<T>>
    where
        T: Send + 'static,
    {
        Box::pin(async { Err(crate::error::StoreError::Unavailable("down".to_string())) })
    }
}

impl ListingStore for UnavailableStore {
    fn get(&self, _id: ListingId) -> BoxFuture<'_, StoreResult<Option<MarketplaceListing>>> {
        self.fail()
    }

    fn upsert(&self, _listing: MarketplaceListing) -> BoxFuture<'_, StoreResult<WriteOutcome>> {
        self.fail()
    }

    fn withdraw(
        &self,
        _id: ListingId,
        _version: EntryVersion,
    ) -> BoxFuture<'_, StoreResult<WriteOutcome>> {
        self.fail()
    }

    fn active_for_card(
        &self,
        _card: CardId,
    ) -> BoxFuture<'_, StoreResult<Vec<MarketplaceListing>>> {
        self.fail()
    }

    fn active_for_seller(
        &self,
        _seller: SellerId,
    ) -> BoxFuture<'_, StoreResult<Vec<MarketplaceListing>>> {
        self.fail()
    }
}
