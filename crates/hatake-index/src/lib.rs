//! Materialized marketplace index for the Hatake sync engine.
//!
//! The index is the sole source of truth for "what is publicly
//! listed". It persists what the synchronizer computes and enforces
//! per-key optimistic concurrency on the source entry version; it
//! does not interpret business rules.

pub mod error;
pub mod memory;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryListingStore;
pub use store::{BoxFuture, DynListingStore, ListingStore, UnavailableStore, WriteOutcome};
