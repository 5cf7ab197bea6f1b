//! Store-side fixture loading.
//!
//! # Responsibility
//! - Insert catalog records on behalf of the store (fixtures, demos, tests).
//! - Provide the stock catalog loaded into an empty database.
//!
//! # Invariants
//! - The store assigns `id`, `version = 0` and both timestamps.
//! - `seed_default_catalog` never duplicates rows on a non-empty catalog.

use super::DbResult;
use crate::model::beer::{BeerId, BeerStyle};
use log::info;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Caller-supplied attributes of a record to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBeer {
    pub beer_name: String,
    pub beer_style: BeerStyle,
    pub price: Decimal,
    pub quantity_on_hand: u32,
    pub upc: Option<i64>,
}

impl NewBeer {
    pub fn new(beer_name: impl Into<String>, beer_style: BeerStyle, price: Decimal) -> Self {
        Self {
            beer_name: beer_name.into(),
            beer_style,
            price,
            quantity_on_hand: 0,
            upc: None,
        }
    }
}

/// Inserts one record and returns its store-assigned id.
pub fn seed_beer(conn: &Connection, beer: &NewBeer) -> DbResult<BeerId> {
    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO beers (
            id,
            beer_name,
            beer_style,
            price,
            quantity_on_hand,
            upc
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        params![
            id.to_string(),
            beer.beer_name.as_str(),
            beer.beer_style.as_str(),
            beer.price.to_string(),
            beer.quantity_on_hand,
            beer.upc,
        ],
    )?;
    Ok(id)
}

/// Loads the stock catalog when the `beers` table is empty.
///
/// Returns the number of inserted rows (`0` when data already exists).
pub fn seed_default_catalog(conn: &Connection) -> DbResult<usize> {
    let existing: i64 = conn.query_row("SELECT COUNT(*) FROM beers;", [], |row| row.get(0))?;
    if existing > 0 {
        return Ok(0);
    }

    let stock = [
        ("Mango Bobs", BeerStyle::Ale, 337_010_000_001_i64, Decimal::new(1295, 2)),
        ("Galaxy Cat", BeerStyle::PaleAle, 337_010_000_002, Decimal::new(1195, 2)),
        ("Pinball Porter", BeerStyle::Porter, 337_010_000_003, Decimal::new(1295, 2)),
    ];

    let tx = conn.unchecked_transaction()?;
    for (name, style, upc, price) in stock {
        let mut beer = NewBeer::new(name, style, price);
        beer.quantity_on_hand = 200;
        beer.upc = Some(upc);
        seed_beer(&tx, &beer)?;
    }
    tx.commit()?;

    info!("event=db_seed module=db status=ok inserted={}", stock.len());
    Ok(stock.len())
}
