//! Catalog store access.
//!
//! # Responsibility
//! - `open_db` / `open_db_in_memory`: create a catalog if needed and bring
//!   its schema up to date. Used by seeding, tooling and tests.
//! - `open_db_existing`: attach read-only to a catalog that already exists.
//!   Never creates files or changes the schema; request handling uses this.
//! - `seed`: store-side fixture records.
//!
//! # Invariants
//! - The schema version lives in `PRAGMA user_version`.
//! - A catalog newer than this build is refused on every open path.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;
pub mod seed;

pub use open::{open_db, open_db_existing, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// SQLite refused an open, pragma or query.
    Sqlite(rusqlite::Error),
    /// No catalog file at the path handed to `open_db_existing`.
    CatalogMissing(PathBuf),
    /// The catalog was written by a newer build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// One upgrade step failed; nothing from the batch was committed.
    MigrationFailed {
        version: u32,
        name: &'static str,
        source: rusqlite::Error,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::CatalogMissing(path) => {
                write!(f, "no beer catalog at `{}`", path.display())
            }
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "catalog schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::MigrationFailed {
                version,
                name,
                source,
            } => write!(f, "catalog migration {version} ({name}) failed: {source}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::MigrationFailed { source: err, .. } => Some(err),
            Self::CatalogMissing(_) | Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
