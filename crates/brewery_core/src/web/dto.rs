//! Wire representations of catalog records and pages.

use crate::model::beer::{Beer, BeerId, BeerStyle};
use crate::model::page::PageResult;
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// JSON form of one `Beer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeerDto {
    pub id: BeerId,
    pub version: u32,
    pub beer_name: String,
    pub beer_style: BeerStyle,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub quantity_on_hand: u32,
    pub upc: Option<i64>,
    #[serde(with = "offset_timestamp")]
    pub created_date: DateTime<FixedOffset>,
    #[serde(with = "offset_timestamp")]
    pub last_modified_date: DateTime<FixedOffset>,
}

impl From<Beer> for BeerDto {
    fn from(beer: Beer) -> Self {
        Self {
            id: beer.id,
            version: beer.version,
            beer_name: beer.beer_name,
            beer_style: beer.beer_style,
            price: beer.price,
            quantity_on_hand: beer.quantity_on_hand,
            upc: beer.upc,
            created_date: beer.created_date,
            last_modified_date: beer.last_modified_date,
        }
    }
}

/// JSON form of one page of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeerPageDto {
    pub content: Vec<BeerDto>,
    pub number: u64,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
    pub number_of_elements: usize,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl From<PageResult<Beer>> for BeerPageDto {
    fn from(page: PageResult<Beer>) -> Self {
        let (content, metadata) = page.map(BeerDto::from).into_parts();
        Self {
            number: metadata.number(),
            size: metadata.size(),
            total_elements: metadata.total_elements(),
            total_pages: metadata.total_pages(),
            number_of_elements: content.len(),
            first: metadata.is_first(),
            last: metadata.is_last(),
            empty: content.is_empty(),
            content,
        }
    }
}

/// Body returned with every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

/// `yyyy-MM-dd'T'HH:mm:ssZ` timestamps, e.g. `2019-05-31T10:15:30+0000`.
pub mod offset_timestamp {
    use chrono::{DateTime, FixedOffset};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

    pub fn serialize<S: Serializer>(
        value: &DateTime<FixedOffset>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<FixedOffset>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
