//! Collection entry: a user's owned-card record.
//!
//! The entry is the source of truth for sale intent. It is mutated
//! only by its owning user, and the sync engine derives the public
//! marketplace listing from it.

use crate::error::CoreError;
use crate::ids::{CardId, EntryId, EntryVersion, ListingId, SellerId};
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical condition of a card, using the catalog's wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardCondition {
    Mint,
    #[default]
    NearMint,
    LightlyPlayed,
    ModeratelyPlayed,
    HeavilyPlayed,
    Damaged,
}

impl CardCondition {
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Mint => "mint",
            Self::NearMint => "near_mint",
            Self::LightlyPlayed => "lightly_played",
            Self::ModeratelyPlayed => "moderately_played",
            Self::HeavilyPlayed => "heavily_played",
            Self::Damaged => "damaged",
        }
    }
}

impl fmt::Display for CardCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

impl FromStr for CardCondition {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mint" => Ok(Self::Mint),
            "near_mint" => Ok(Self::NearMint),
            "lightly_played" => Ok(Self::LightlyPlayed),
            "moderately_played" => Ok(Self::ModeratelyPlayed),
            "heavily_played" => Ok(Self::HeavilyPlayed),
            "damaged" => Ok(Self::Damaged),
            other => Err(CoreError::UnknownCondition(other.to_string())),
        }
    }
}

/// Card metadata carried from the entry onto its listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDetails {
    /// Upstream catalog id.
    pub card_id: CardId,
    pub name: String,
    /// Game the card belongs to (e.g. "mtg", "pokemon", "lorcana").
    pub game: String,
    pub set_code: String,
    pub set_name: String,
    pub collector_number: String,
    pub rarity: String,
    pub language: String,
    pub condition: CardCondition,
    pub foil: bool,
}

/// A user's owned-card record.
///
/// Never deleted while referenced by an active listing; the sync
/// engine withdraws the listing first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub id: EntryId,
    pub seller: SellerId,
    pub card: CardDetails,
    /// Copies owned. Zero is valid and means the entry cannot be listed.
    pub quantity: u32,
    pub for_sale: bool,
    /// Ask price as entered. Required when `for_sale` is set.
    pub ask_price: Option<Money>,
    /// Last-modified timestamp in milliseconds.
    pub version: EntryVersion,
}

impl CollectionEntry {
    /// The listing id this entry owns.
    pub fn listing_id(&self) -> ListingId {
        ListingId::for_entry(self.id)
    }

    /// Whether the entry currently qualifies for an active listing.
    pub fn is_listable(&self) -> bool {
        self.for_sale && self.quantity > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::CurrencyCode;
    use rust_decimal_macros::dec;

    fn sample_card() -> CardDetails {
        CardDetails {
            card_id: CardId::new("mtg-lotus-001"),
            name: "Black Lotus".to_string(),
            game: "mtg".to_string(),
            set_code: "lea".to_string(),
            set_name: "Limited Edition Alpha".to_string(),
            collector_number: "232".to_string(),
            rarity: "rare".to_string(),
            language: "en".to_string(),
            condition: CardCondition::NearMint,
            foil: false,
        }
    }

    #[test]
    fn test_condition_wire_names() {
        let parsed: CardCondition = "lightly_played".parse().unwrap();
        assert_eq!(parsed, CardCondition::LightlyPlayed);
        assert_eq!(parsed.to_string(), "lightly_played");
        assert!("pristine".parse::<CardCondition>().is_err());
    }

    #[test]
    fn test_condition_serde_matches_wire_name() {
        let json = serde_json::to_string(&CardCondition::ModeratelyPlayed).unwrap();
        assert_eq!(json, "\"moderately_played\"");
    }

    #[test]
    fn test_listable() {
        let mut entry = CollectionEntry {
            id: EntryId::generate(),
            seller: SellerId::new("seller-1"),
            card: sample_card(),
            quantity: 2,
            for_sale: true,
            ask_price: Some(Money::new(dec!(10), CurrencyCode::Usd)),
            version: EntryVersion::new(1),
        };
        assert!(entry.is_listable());

        entry.quantity = 0;
        assert!(!entry.is_listable());

        entry.quantity = 2;
        entry.for_sale = false;
        assert!(!entry.is_listable());
    }

    #[test]
    fn test_listing_id_tracks_entry() {
        let entry = CollectionEntry {
            id: EntryId::generate(),
            seller: SellerId::new("seller-1"),
            card: sample_card(),
            quantity: 1,
            for_sale: false,
            ask_price: None,
            version: EntryVersion::new(1),
        };
        assert_eq!(entry.listing_id(), ListingId::for_entry(entry.id));
    }
}
