//! Listing projector.
//!
//! Derives the marketplace listing a collection entry should have, or
//! the signal to withdraw it. Deterministic for a given entry state
//! aside from the freshly stamped sync timestamp.

use crate::synchronizer::RejectReason;
use chrono::{DateTime, Utc};
use hatake_core::{CollectionEntry, MarketplaceListing, SellerProfile, Visibility};
use hatake_fx::CurrencyNormalizer;

/// What the marketplace should hold for an entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// The entry qualifies; the index should hold this listing.
    List(MarketplaceListing),
    /// The entry does not qualify; its listing, if any, is withdrawn.
    Withdraw,
}

/// Derives listings from entries, normalizing the ask price.
pub struct ListingProjector {
    normalizer: CurrencyNormalizer,
}

impl ListingProjector {
    pub fn new(normalizer: CurrencyNormalizer) -> Self {
        Self { normalizer }
    }

    pub fn normalizer(&self) -> &CurrencyNormalizer {
        &self.normalizer
    }

    /// Project an entry into its marketplace state.
    ///
    /// `now` stamps the listing's sync timestamps; the index keeps the
    /// original `listed_at` across re-syncs.
    pub fn project(
        &self,
        entry: &CollectionEntry,
        seller_profile: &SellerProfile,
        now: DateTime<Utc>,
    ) -> Result<Projection, RejectReason> {
        if !entry.is_listable() {
            return Ok(Projection::Withdraw);
        }

        if entry.card.card_id.is_empty() {
            return Err(RejectReason::malformed("entry has no card identifier"));
        }

        let ask = entry
            .ask_price
            .ok_or_else(|| RejectReason::malformed("for-sale entry has no ask price"))?;
        let price = self.normalizer.normalize_money(&ask)?;

        Ok(Projection::List(MarketplaceListing {
            id: entry.listing_id(),
            seller: entry.seller.clone(),
            seller_profile: seller_profile.clone(),
            card: entry.card.clone(),
            quantity: entry.quantity,
            price,
            source_version: entry.version,
            visibility: Visibility::Active,
            listed_at: now,
            updated_at: now,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hatake_core::{
        CardCondition, CardDetails, CardId, CurrencyCode, EntryId, EntryVersion, Money, SellerId,
    };
    use hatake_fx::{FixedRates, RateSnapshot};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn projector() -> ListingProjector {
        let normalizer = CurrencyNormalizer::new(
            CurrencyCode::Usd,
            Arc::new(FixedRates::new(RateSnapshot::fallback())),
        );
        ListingProjector::new(normalizer)
    }

    fn entry(for_sale: bool, quantity: u32, ask: Option<Money>) -> CollectionEntry {
        CollectionEntry {
            id: EntryId::generate(),
            seller: SellerId::new("seller-1"),
            card: CardDetails {
                card_id: CardId::new("mtg-bolt-001"),
                name: "Lightning Bolt".to_string(),
                game: "mtg".to_string(),
                set_code: "lea".to_string(),
                set_name: "Limited Edition Alpha".to_string(),
                collector_number: "161".to_string(),
                rarity: "common".to_string(),
                language: "en".to_string(),
                condition: CardCondition::NearMint,
                foil: false,
            },
            quantity,
            for_sale,
            ask_price: ask,
            version: EntryVersion::new(42),
        }
    }

    #[test]
    fn test_for_sale_entry_projects_listing() {
        let p = projector();
        let e = entry(true, 3, Some(Money::new(dec!(5), CurrencyCode::Usd)));
        let profile = SellerProfile::new("Kaito");

        match p.project(&e, &profile, Utc::now()).unwrap() {
            Projection::List(listing) => {
                assert_eq!(listing.id, e.listing_id());
                assert_eq!(listing.quantity, 3);
                assert_eq!(listing.price.minor_units, 500);
                assert_eq!(listing.source_version, EntryVersion::new(42));
                assert!(listing.is_active());
                assert_eq!(listing.seller_profile.display_name, "Kaito");
            }
            Projection::Withdraw => panic!("expected a listing"),
        }
    }

    #[test]
    fn test_not_for_sale_projects_withdraw() {
        let p = projector();
        let e = entry(false, 3, None);
        let projection = p.project(&e, &SellerProfile::new("Kaito"), Utc::now());
        assert_eq!(projection.unwrap(), Projection::Withdraw);
    }

    #[test]
    fn test_zero_quantity_projects_withdraw() {
        let p = projector();
        let e = entry(true, 0, Some(Money::new(dec!(5), CurrencyCode::Usd)));
        let projection = p.project(&e, &SellerProfile::new("Kaito"), Utc::now());
        assert_eq!(projection.unwrap(), Projection::Withdraw);
    }

    #[test]
    fn test_missing_ask_price_rejected() {
        let p = projector();
        let e = entry(true, 1, None);
        let err = p
            .project(&e, &SellerProfile::new("Kaito"), Utc::now())
            .unwrap_err();
        assert!(matches!(err, RejectReason::MalformedEntry { .. }));
    }

    #[test]
    fn test_negative_ask_price_rejected() {
        let p = projector();
        let e = entry(true, 1, Some(Money::new(dec!(-2), CurrencyCode::Usd)));
        let err = p
            .project(&e, &SellerProfile::new("Kaito"), Utc::now())
            .unwrap_err();
        assert!(matches!(err, RejectReason::InvalidAmount { .. }));
    }

    #[test]
    fn test_projection_deterministic() {
        let p = projector();
        let e = entry(true, 2, Some(Money::new(dec!(10.50), CurrencyCode::Eur)));
        let profile = SellerProfile::new("Kaito");
        let now = Utc::now();

        let first = p.project(&e, &profile, now).unwrap();
        let second = p.project(&e, &profile, now).unwrap();
        assert_eq!(first, second);
    }
}
