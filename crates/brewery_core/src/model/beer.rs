//! Beer domain model.
//!
//! # Responsibility
//! - Define the catalog record and its closed style enumeration.
//! - Provide the read-side validation applied to persisted rows.
//!
//! # Invariants
//! - `id` is stable and never reused for another record.
//! - `version` and both timestamps are owned by the store; the read path only
//!   carries them through.
//! - `price` is never negative.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier for one catalog record.
pub type BeerId = Uuid;

/// Closed set of beer styles known to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BeerStyle {
    Lager,
    Pilsner,
    Stout,
    Gose,
    Porter,
    Ale,
    Wheat,
    Ipa,
    PaleAle,
    Saison,
}

impl BeerStyle {
    /// All styles in declaration order.
    pub const ALL: [BeerStyle; 10] = [
        Self::Lager,
        Self::Pilsner,
        Self::Stout,
        Self::Gose,
        Self::Porter,
        Self::Ale,
        Self::Wheat,
        Self::Ipa,
        Self::PaleAle,
        Self::Saison,
    ];

    /// Canonical wire and storage name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lager => "LAGER",
            Self::Pilsner => "PILSNER",
            Self::Stout => "STOUT",
            Self::Gose => "GOSE",
            Self::Porter => "PORTER",
            Self::Ale => "ALE",
            Self::Wheat => "WHEAT",
            Self::Ipa => "IPA",
            Self::PaleAle => "PALE_ALE",
            Self::Saison => "SAISON",
        }
    }
}

impl Display for BeerStyle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when text does not name a known `BeerStyle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBeerStyle(pub String);

impl Display for UnknownBeerStyle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown beer style `{}`", self.0)
    }
}

impl Error for UnknownBeerStyle {}

impl FromStr for BeerStyle {
    type Err = UnknownBeerStyle;

    /// Parses a style name, ignoring surrounding whitespace and ASCII case.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == normalized)
            .ok_or_else(|| UnknownBeerStyle(value.to_string()))
    }
}

/// Validation failures for a `Beer` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeerValidationError {
    BlankName,
    NegativePrice(Decimal),
}

impl Display for BeerValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "beer_name must not be blank"),
            Self::NegativePrice(price) => write!(f, "price must not be negative, got {price}"),
        }
    }
}

impl Error for BeerValidationError {}

/// Canonical catalog record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Beer {
    pub id: BeerId,
    /// Optimistic-concurrency counter, bumped by the store on every mutation.
    pub version: u32,
    pub beer_name: String,
    pub beer_style: BeerStyle,
    pub price: Decimal,
    pub quantity_on_hand: u32,
    /// External product code, when one is assigned.
    pub upc: Option<i64>,
    pub created_date: DateTime<FixedOffset>,
    pub last_modified_date: DateTime<FixedOffset>,
}

impl Beer {
    /// Checks field-level invariants.
    pub fn validate(&self) -> Result<(), BeerValidationError> {
        if self.beer_name.trim().is_empty() {
            return Err(BeerValidationError::BlankName);
        }
        if self.price.is_sign_negative() && !self.price.is_zero() {
            return Err(BeerValidationError::NegativePrice(self.price));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Beer, BeerStyle, BeerValidationError};
    use chrono::DateTime;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use uuid::Uuid;

    fn sample() -> Beer {
        let stamp = DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z").unwrap();
        Beer {
            id: Uuid::new_v4(),
            version: 1,
            beer_name: "Beer1".to_string(),
            beer_style: BeerStyle::PaleAle,
            price: Decimal::from_str("12.99").unwrap(),
            quantity_on_hand: 4,
            upc: None,
            created_date: stamp,
            last_modified_date: stamp,
        }
    }

    #[test]
    fn style_parsing_ignores_case_and_whitespace() {
        assert_eq!(BeerStyle::from_str(" pale_ale ").unwrap(), BeerStyle::PaleAle);
        assert_eq!(BeerStyle::from_str("IPA").unwrap(), BeerStyle::Ipa);
    }

    #[test]
    fn style_parsing_rejects_unknown_names() {
        let err = BeerStyle::from_str("PALE ALE").unwrap_err();
        assert!(err.to_string().contains("PALE ALE"));
    }

    #[test]
    fn style_names_match_serde_form() {
        for style in BeerStyle::ALL {
            let json = serde_json::to_value(style).unwrap();
            assert_eq!(json, style.as_str());
        }
    }

    #[test]
    fn validate_rejects_negative_price_and_blank_name() {
        let mut beer = sample();
        assert!(beer.validate().is_ok());

        beer.price = Decimal::from_str("-0.01").unwrap();
        assert!(matches!(
            beer.validate(),
            Err(BeerValidationError::NegativePrice(_))
        ));

        beer = sample();
        beer.beer_name = "   ".to_string();
        assert_eq!(beer.validate(), Err(BeerValidationError::BlankName));
    }
}
