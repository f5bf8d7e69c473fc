//! Core domain types for the Hatake marketplace sync engine.
//!
//! This crate provides fundamental types used throughout the sync engine:
//! - `EntryId`, `ListingId`, `SellerId`, `CardId`: Identifier newtypes
//! - `Money`, `NormalizedPrice`, `CurrencyCode`: Precision-safe price types
//! - `CollectionEntry`: A user's owned-card record, source of truth for sale intent
//! - `MarketplaceListing`: The derived, public-facing marketplace record

pub mod entry;
pub mod error;
pub mod ids;
pub mod listing;
pub mod money;

pub use entry::{CardCondition, CardDetails, CollectionEntry};
pub use error::{CoreError, Result};
pub use ids::{CardId, EntryId, EntryVersion, ListingId, SellerId};
pub use listing::{MarketplaceListing, SellerProfile, Visibility};
pub use money::{CurrencyCode, Money, NormalizedPrice};
