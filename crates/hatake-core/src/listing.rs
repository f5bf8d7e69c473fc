//! Marketplace listing: the derived, public-facing record for an entry.
//!
//! Listings are owned by the synchronizer and never edited directly
//! by clients. Withdrawn listings are kept for audit/history and only
//! purged by an out-of-scope retention job.

use crate::entry::CardDetails;
use crate::ids::{CardId, EntryVersion, ListingId, SellerId};
use crate::money::NormalizedPrice;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Visibility state of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Publicly visible in the marketplace.
    Active,
    /// Soft-deactivated; queryable by id but excluded from browse queries.
    Withdrawn,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Withdrawn => write!(f, "withdrawn"),
        }
    }
}

/// Public seller information embedded in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerProfile {
    pub display_name: String,
    #[serde(default)]
    pub country: Option<String>,
}

impl SellerProfile {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            country: None,
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

/// The derived marketplace record for one collection entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketplaceListing {
    pub id: ListingId,
    pub seller: SellerId,
    pub seller_profile: SellerProfile,
    pub card: CardDetails,
    /// Copies available for sale.
    pub quantity: u32,
    /// Always in the canonical currency.
    pub price: NormalizedPrice,
    /// Version of the entry state this listing was derived from.
    pub source_version: EntryVersion,
    pub visibility: Visibility,
    /// When the listing first became active.
    pub listed_at: DateTime<Utc>,
    /// When the listing was last re-synced or withdrawn.
    pub updated_at: DateTime<Utc>,
}

impl MarketplaceListing {
    pub fn is_active(&self) -> bool {
        self.visibility == Visibility::Active
    }

    pub fn card_id(&self) -> &CardId {
        &self.card.card_id
    }

    /// Soft-deactivate the listing at the given source version.
    pub fn mark_withdrawn(&mut self, version: EntryVersion, at: DateTime<Utc>) {
        self.visibility = Visibility::Withdrawn;
        self.source_version = version;
        self.updated_at = at;
    }
}
