//! Untyped collection-entry payloads and boundary validation.
//!
//! The document datastore hands back loosely-typed documents; this is
//! where they become strongly-typed `CollectionEntry` values or get
//! rejected as malformed. Field names follow the stored document
//! shape (`for_sale`, `sale_price`, `sale_currency`, ...).

use crate::synchronizer::RejectReason;
use hatake_core::{
    CardCondition, CardDetails, CardId, CollectionEntry, CurrencyCode, EntryId, EntryVersion,
    Money, SellerId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A collection entry as stored, before validation.
///
/// Everything defaults so a partial document still deserializes; the
/// validation step decides what is actually required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCollectionEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub seller_id: Option<String>,
    /// Upstream catalog id of the card.
    #[serde(default)]
    pub api_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub game: Option<String>,
    #[serde(default)]
    pub set: Option<String>,
    #[serde(default)]
    pub set_name: Option<String>,
    #[serde(default)]
    pub collector_number: Option<String>,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default, alias = "isFoil")]
    pub is_foil: bool,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub for_sale: bool,
    #[serde(default)]
    pub sale_price: Option<Decimal>,
    #[serde(default)]
    pub sale_currency: Option<String>,
    /// Last-modified timestamp in milliseconds.
    #[serde(default)]
    pub updated_at_ms: Option<u64>,
}

/// Validate a raw payload into a typed entry, stamping the
/// authenticated seller.
///
/// A payload claiming a different seller than the authenticated one
/// is malformed; clients do not choose their own seller id.
pub fn validate_entry(
    raw: RawCollectionEntry,
    seller: &SellerId,
) -> Result<CollectionEntry, RejectReason> {
    let id: EntryId = raw
        .id
        .as_deref()
        .ok_or_else(|| RejectReason::malformed("missing entry id"))?
        .parse()
        .map_err(|e| RejectReason::malformed(format!("bad entry id: {e}")))?;

    if let Some(claimed) = raw.seller_id.as_deref() {
        if claimed != seller.as_str() {
            return Err(RejectReason::malformed(format!(
                "payload seller {claimed} does not match authenticated seller {seller}"
            )));
        }
    }

    let card_id = match raw.api_id.as_deref() {
        Some(api_id) if !api_id.is_empty() => CardId::new(api_id),
        _ => return Err(RejectReason::malformed("missing card identifier")),
    };

    let quantity = match raw.quantity {
        None => return Err(RejectReason::malformed("missing quantity")),
        Some(q) if q < 0 => {
            return Err(RejectReason::malformed(format!("negative quantity {q}")))
        }
        Some(q) => u32::try_from(q)
            .map_err(|_| RejectReason::malformed(format!("quantity {q} out of range")))?,
    };

    let version = raw
        .updated_at_ms
        .map(EntryVersion::new)
        .ok_or_else(|| RejectReason::malformed("missing last-modified timestamp"))?;

    let condition = match raw.condition.as_deref() {
        None => CardCondition::default(),
        Some(s) => s
            .parse()
            .map_err(|_| RejectReason::malformed(format!("unknown condition {s}")))?,
    };

    let ask_price = match raw.sale_price {
        Some(amount) => {
            let currency: CurrencyCode = raw
                .sale_currency
                .as_deref()
                .unwrap_or("USD")
                .parse()
                .map_err(|_| RejectReason::UnsupportedCurrency {
                    code: raw.sale_currency.clone().unwrap_or_default(),
                })?;
            Some(Money::new(amount, currency))
        }
        None if raw.for_sale => {
            return Err(RejectReason::malformed("for-sale entry has no ask price"))
        }
        None => None,
    };

    Ok(CollectionEntry {
        id,
        seller: seller.clone(),
        card: CardDetails {
            card_id,
            name: raw.name.unwrap_or_default(),
            game: raw.game.unwrap_or_else(|| "mtg".to_string()),
            set_code: raw.set.unwrap_or_default(),
            set_name: raw.set_name.unwrap_or_default(),
            collector_number: raw.collector_number.unwrap_or_default(),
            rarity: raw.rarity.unwrap_or_default(),
            language: raw.language.unwrap_or_else(|| "en".to_string()),
            condition,
            foil: raw.is_foil,
        },
        quantity,
        for_sale: raw.for_sale,
        ask_price,
        version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn seller() -> SellerId {
        SellerId::new("seller-1")
    }

    fn valid_raw() -> RawCollectionEntry {
        RawCollectionEntry {
            id: Some(EntryId::generate().to_string()),
            api_id: Some("mtg-lotus-001".to_string()),
            name: Some("Black Lotus".to_string()),
            quantity: Some(2),
            for_sale: true,
            sale_price: Some(dec!(100)),
            sale_currency: Some("EUR".to_string()),
            updated_at_ms: Some(1_700_000_000_000),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_payload() {
        let entry = validate_entry(valid_raw(), &seller()).unwrap();
        assert_eq!(entry.seller, seller());
        assert_eq!(entry.quantity, 2);
        assert!(entry.for_sale);
        let ask = entry.ask_price.unwrap();
        assert_eq!(ask.amount, dec!(100));
        assert_eq!(ask.currency, CurrencyCode::Eur);
        assert_eq!(entry.version, EntryVersion::new(1_700_000_000_000));
        // Unspecified condition defaults like the stored documents do.
        assert_eq!(entry.card.condition, CardCondition::NearMint);
    }

    #[test]
    fn test_missing_id_rejected() {
        let raw = RawCollectionEntry {
            id: None,
            ..valid_raw()
        };
        let err = validate_entry(raw, &seller()).unwrap_err();
        assert!(matches!(err, RejectReason::MalformedEntry { .. }));
    }

    #[test]
    fn test_seller_mismatch_rejected() {
        let raw = RawCollectionEntry {
            seller_id: Some("somebody-else".to_string()),
            ..valid_raw()
        };
        let err = validate_entry(raw, &seller()).unwrap_err();
        assert!(matches!(err, RejectReason::MalformedEntry { .. }));
    }

    #[test]
    fn test_matching_seller_accepted() {
        let raw = RawCollectionEntry {
            seller_id: Some("seller-1".to_string()),
            ..valid_raw()
        };
        assert!(validate_entry(raw, &seller()).is_ok());
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let raw = RawCollectionEntry {
            quantity: Some(-1),
            ..valid_raw()
        };
        let err = validate_entry(raw, &seller()).unwrap_err();
        assert!(matches!(err, RejectReason::MalformedEntry { .. }));
    }

    #[test]
    fn test_zero_quantity_valid() {
        let raw = RawCollectionEntry {
            quantity: Some(0),
            ..valid_raw()
        };
        let entry = validate_entry(raw, &seller()).unwrap();
        assert_eq!(entry.quantity, 0);
        assert!(!entry.is_listable());
    }

    #[test]
    fn test_unknown_currency_rejected() {
        let raw = RawCollectionEntry {
            sale_currency: Some("JPY".to_string()),
            ..valid_raw()
        };
        let err = validate_entry(raw, &seller()).unwrap_err();
        assert_eq!(
            err,
            RejectReason::UnsupportedCurrency {
                code: "JPY".to_string()
            }
        );
    }

    #[test]
    fn test_missing_currency_defaults_to_usd() {
        let raw = RawCollectionEntry {
            sale_currency: None,
            ..valid_raw()
        };
        let entry = validate_entry(raw, &seller()).unwrap();
        assert_eq!(entry.ask_price.unwrap().currency, CurrencyCode::Usd);
    }

    #[test]
    fn test_for_sale_without_price_rejected() {
        let raw = RawCollectionEntry {
            sale_price: None,
            ..valid_raw()
        };
        let err = validate_entry(raw, &seller()).unwrap_err();
        assert!(matches!(err, RejectReason::MalformedEntry { .. }));
    }

    #[test]
    fn test_not_for_sale_without_price_valid() {
        let raw = RawCollectionEntry {
            for_sale: false,
            sale_price: None,
            ..valid_raw()
        };
        let entry = validate_entry(raw, &seller()).unwrap();
        assert!(entry.ask_price.is_none());
    }

    #[test]
    fn test_lenient_json_payload() {
        // A document with extra fields and a numeric price still parses.
        let raw: RawCollectionEntry = serde_json::from_str(
            r#"{
                "id": "7f6e5d4c-3b2a-4190-8f7e-6d5c4b3a2910",
                "api_id": "pkm-base1-25",
                "quantity": 1,
                "for_sale": true,
                "sale_price": 4.99,
                "sale_currency": "SEK",
                "condition": "lightly_played",
                "isFoil": true,
                "updated_at_ms": 1700000000000,
                "views": 12,
                "watchers": []
            }"#,
        )
        .unwrap();
        let entry = validate_entry(raw, &seller()).unwrap();
        assert!(entry.card.foil);
        assert_eq!(entry.card.condition, CardCondition::LightlyPlayed);
        assert_eq!(entry.ask_price.unwrap().currency, CurrencyCode::Sek);
    }
}
