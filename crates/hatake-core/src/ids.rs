//! Identifier newtypes for entries, listings, sellers, and cards.
//!
//! Listings are keyed by an id derived deterministically from the
//! owning entry id, so one entry always maps to exactly one listing.

use crate::error::CoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of a collection entry (a user's owned-card record).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub Uuid);

impl EntryId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh random entry id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| CoreError::InvalidId(format!("{s}: {e}")))
    }
}

/// Identifier of a marketplace listing.
///
/// Derived from the owning entry id, never allocated independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(pub Uuid);

impl ListingId {
    /// The listing id owned by a given entry.
    pub fn for_entry(entry: EntryId) -> Self {
        Self(entry.0)
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Authenticated seller identifier, supplied by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SellerId(String);

impl SellerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SellerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Catalog identifier of a card (the upstream API id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Version of a collection entry: its last-modified timestamp in
/// milliseconds since the epoch.
///
/// Versions are totally ordered per entry. A write wins only if its
/// version is strictly newer than what the index already stores;
/// equal versions are idempotent replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryVersion(pub u64);

impl EntryVersion {
    pub fn new(millis: u64) -> Self {
        Self(millis)
    }

    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at.timestamp_millis().max(0) as u64)
    }

    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Strictly-newer comparison used by the optimistic-concurrency check.
    #[inline]
    pub fn is_newer_than(&self, other: EntryVersion) -> bool {
        self.0 > other.0
    }
}

impl fmt::Display for EntryVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_id_deterministic() {
        let entry = EntryId::generate();
        assert_eq!(ListingId::for_entry(entry), ListingId::for_entry(entry));
    }

    #[test]
    fn test_entry_id_parse_round_trip() {
        let id = EntryId::generate();
        let parsed: EntryId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_entry_id_parse_rejects_garbage() {
        assert!("not-a-uuid".parse::<EntryId>().is_err());
    }

    #[test]
    fn test_version_ordering() {
        let v1 = EntryVersion::new(1000);
        let v2 = EntryVersion::new(2000);
        assert!(v2.is_newer_than(v1));
        assert!(!v1.is_newer_than(v2));
        // Equal versions are replays, not newer.
        assert!(!v1.is_newer_than(v1));
    }

    #[test]
    fn test_version_from_datetime() {
        let at = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        assert_eq!(EntryVersion::from_datetime(at).value(), 1_700_000_000_123);
    }
}
