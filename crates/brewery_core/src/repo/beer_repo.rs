//! Beer repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Resolve one record by id.
//! - Resolve one filtered, ordered window of records together with the
//!   pre-pagination match count.
//!
//! # Invariants
//! - Window and count are read from one snapshot.
//! - Ordering is `created_date ASC, id ASC` for every list query.
//! - Name filters match case-insensitively (ASCII folding); `*` is the only
//!   wildcard and SQL `LIKE` metacharacters in user input match literally.

use crate::db::migrations::{latest_version, schema_version};
use crate::db::DbError;
use crate::model::beer::{Beer, BeerId, BeerStyle, BeerValidationError};
use chrono::{DateTime, FixedOffset};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

const BEER_SELECT_SQL: &str = "SELECT
    id,
    version,
    beer_name,
    beer_style,
    price,
    quantity_on_hand,
    upc,
    created_date,
    last_modified_date
FROM beers";

const BEER_COLUMNS: [&str; 9] = [
    "id",
    "version",
    "beer_name",
    "beer_style",
    "price",
    "quantity_on_hand",
    "upc",
    "created_date",
    "last_modified_date",
];

const NAME_WILDCARD: char = '*';
const LIKE_ESCAPE: char = '\\';

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for catalog reads.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted row cannot be converted into a valid `Beer`.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "beer repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "beer repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "beer repository requires column `{table}.{column}`")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted beer data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<BeerValidationError> for RepoError {
    fn from(value: BeerValidationError) -> Self {
        Self::InvalidData(value.to_string())
    }
}

/// Optional constraints narrowing a list query. `None` means unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeerFilter {
    /// Whole-name match, `*` as wildcard, case-insensitive.
    pub beer_name: Option<String>,
    pub beer_style: Option<BeerStyle>,
}

impl BeerFilter {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            beer_name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn by_style(style: BeerStyle) -> Self {
        Self {
            beer_style: Some(style),
            ..Self::default()
        }
    }

    /// Drops blank name constraints so they behave like absent ones.
    pub fn normalized(&self) -> Self {
        Self {
            beer_name: self
                .beer_name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
            beer_style: self.beer_style,
        }
    }

    /// In-memory form of the predicate the SQLite query applies.
    pub fn matches(&self, beer: &Beer) -> bool {
        let filter = self.normalized();
        let name_ok = filter
            .beer_name
            .as_deref()
            .map_or(true, |pattern| wildcard_matches(pattern, &beer.beer_name));
        let style_ok = filter
            .beer_style
            .map_or(true, |style| style == beer.beer_style);
        name_ok && style_ok
    }
}

/// Filter plus window bounds for one list call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeerListQuery {
    pub filter: BeerFilter,
    pub limit: u32,
    pub offset: u64,
}

/// One window of matching records plus the full match count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeerWindow {
    pub items: Vec<Beer>,
    pub total_elements: u64,
}

/// Read contract over the catalog store.
pub trait BeerRepository {
    /// Gets one record by id.
    fn find_beer(&self, id: BeerId) -> RepoResult<Option<Beer>>;
    /// Lists one ordered window of filtered records with the total match count.
    fn list_beers(&self, query: &BeerListQuery) -> RepoResult<BeerWindow>;
}

impl<R: BeerRepository + ?Sized> BeerRepository for &R {
    fn find_beer(&self, id: BeerId) -> RepoResult<Option<Beer>> {
        (**self).find_beer(id)
    }

    fn list_beers(&self, query: &BeerListQuery) -> RepoResult<BeerWindow> {
        (**self).list_beers(query)
    }
}

/// SQLite-backed beer repository.
pub struct SqliteBeerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBeerRepository<'conn> {
    /// Creates a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_beer_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl BeerRepository for SqliteBeerRepository<'_> {
    fn find_beer(&self, id: BeerId) -> RepoResult<Option<Beer>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BEER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_beer_row(row)?));
        }
        Ok(None)
    }

    fn list_beers(&self, query: &BeerListQuery) -> RepoResult<BeerWindow> {
        let (where_sql, bind_values) = filter_clause(&query.filter.normalized());

        let tx = self.conn.unchecked_transaction()?;

        let total: i64 = tx.query_row(
            &format!("SELECT COUNT(*) FROM beers{where_sql};"),
            params_from_iter(bind_values.iter()),
            |row| row.get(0),
        )?;
        let total_elements = u64::try_from(total)
            .map_err(|_| RepoError::InvalidData(format!("negative row count {total}")))?;

        let mut items = Vec::new();
        if query.offset < total_elements {
            let offset = i64::try_from(query.offset).map_err(|_| {
                RepoError::InvalidData(format!("offset {} out of range", query.offset))
            })?;
            let mut window_values = bind_values;
            window_values.push(Value::Integer(i64::from(query.limit)));
            window_values.push(Value::Integer(offset));

            let mut stmt = tx.prepare(&format!(
                "{BEER_SELECT_SQL}{where_sql} ORDER BY created_date ASC, id ASC LIMIT ? OFFSET ?;"
            ))?;
            let mut rows = stmt.query(params_from_iter(window_values))?;
            while let Some(row) = rows.next()? {
                items.push(parse_beer_row(row)?);
            }
        }

        tx.finish()?;
        Ok(BeerWindow {
            items,
            total_elements,
        })
    }
}

fn filter_clause(filter: &BeerFilter) -> (String, Vec<Value>) {
    let mut conditions: Vec<&str> = Vec::new();
    let mut bind_values: Vec<Value> = Vec::new();

    if let Some(name) = filter.beer_name.as_deref() {
        conditions.push("lower(beer_name) LIKE ? ESCAPE '\\'");
        bind_values.push(Value::Text(name_like_pattern(name)));
    }

    if let Some(style) = filter.beer_style {
        conditions.push("beer_style = ?");
        bind_values.push(Value::Text(style.as_str().to_string()));
    }

    if conditions.is_empty() {
        (String::new(), bind_values)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), bind_values)
    }
}

/// Translates a name filter into a lowercase `LIKE` pattern.
pub fn name_like_pattern(name: &str) -> String {
    let mut pattern = String::with_capacity(name.len() + 2);
    for ch in name.to_ascii_lowercase().chars() {
        match ch {
            NAME_WILDCARD => pattern.push('%'),
            '%' | '_' | LIKE_ESCAPE => {
                pattern.push(LIKE_ESCAPE);
                pattern.push(ch);
            }
            other => pattern.push(other),
        }
    }
    pattern
}

fn wildcard_matches(pattern: &str, candidate: &str) -> bool {
    let pattern = pattern.to_ascii_lowercase();
    let candidate = candidate.to_ascii_lowercase();
    let parts: Vec<&str> = pattern.split(NAME_WILDCARD).collect();
    if parts.len() == 1 {
        return pattern == candidate;
    }

    let first = parts[0];
    let last = parts[parts.len() - 1];
    let Some(mut remaining) = candidate.strip_prefix(first) else {
        return false;
    };
    for part in &parts[1..parts.len() - 1] {
        match remaining.find(part) {
            Some(index) => remaining = &remaining[index + part.len()..],
            None => return false,
        }
    }
    remaining.ends_with(last)
}

fn parse_beer_row(row: &Row<'_>) -> RepoResult<Beer> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{id_text}` in beers.id")))?;

    let version = non_negative::<u32>(row.get("version")?, "beers.version")?;

    let style_text: String = row.get("beer_style")?;
    let beer_style = BeerStyle::from_str(&style_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid style `{style_text}` in beers.beer_style"))
    })?;

    let price_text: String = row.get("price")?;
    let price = Decimal::from_str(&price_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid decimal `{price_text}` in beers.price"))
    })?;

    let quantity_on_hand =
        non_negative::<u32>(row.get("quantity_on_hand")?, "beers.quantity_on_hand")?;

    let beer = Beer {
        id,
        version,
        beer_name: row.get("beer_name")?,
        beer_style,
        price,
        quantity_on_hand,
        upc: row.get("upc")?,
        created_date: parse_timestamp(row.get("created_date")?, "beers.created_date")?,
        last_modified_date: parse_timestamp(
            row.get("last_modified_date")?,
            "beers.last_modified_date",
        )?,
    };
    beer.validate()?;
    Ok(beer)
}

fn non_negative<T: TryFrom<i64>>(value: i64, column: &str) -> RepoResult<T> {
    T::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("out-of-range value `{value}` in {column}")))
}

fn parse_timestamp(value: String, column: &str) -> RepoResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(&value)
        .map_err(|_| RepoError::InvalidData(format!("invalid timestamp `{value}` in {column}")))
}

fn ensure_beer_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "beers")? {
        return Err(RepoError::MissingRequiredTable("beers"));
    }

    for column in BEER_COLUMNS {
        if !table_has_column(conn, "beers", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "beers",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
