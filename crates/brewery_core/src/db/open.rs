//! Connection opening for the catalog store.
//!
//! # Invariants
//! - Every returned connection has a busy timeout.
//! - `open_db` / `open_db_in_memory` connections are fully migrated.
//! - `open_db_existing` connections are read-only and were never created by
//!   this call.

use super::migrations::{apply_migrations, ensure_supported, schema_version};
use super::{DbError, DbResult};
use log::{error, info, warn};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a catalog database file, creating it when absent, and applies all
/// pending migrations.
///
/// # Side effects
/// - May create the file and write schema changes.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_with("file", || Connection::open(path), upgrade_schema)
}

/// Opens an in-memory catalog database and applies all pending migrations.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory, upgrade_schema)
}

/// Opens an existing catalog read-only.
///
/// The schema is checked, not upgraded: an outdated catalog still opens and
/// is left for the repository readiness check to reject.
///
/// # Errors
/// - `CatalogMissing` when nothing exists at `path`; no file is created.
/// - `UnsupportedSchemaVersion` for catalogs from a newer build.
pub fn open_db_existing(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    if !path.exists() {
        warn!(
            "event=db_open module=db status=error mode=existing error_code=db_missing path={}",
            path.display()
        );
        return Err(DbError::CatalogMissing(path.to_path_buf()));
    }

    open_with(
        "existing",
        || {
            Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
        },
        check_schema,
    )
}

fn open_with(
    mode: &str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
    prepare: impl FnOnce(&mut Connection) -> DbResult<()>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = connect().map_err(|err| {
        error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={err}",
            started_at.elapsed().as_millis()
        );
        err
    })?;

    let prepared = conn
        .busy_timeout(BUSY_TIMEOUT)
        .map_err(DbError::from)
        .and_then(|()| prepare(&mut conn));
    if let Err(err) = prepared {
        error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_prepare_failed error={err}",
            started_at.elapsed().as_millis()
        );
        return Err(err);
    }

    info!(
        "event=db_open module=db status=ok mode={mode} duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

fn upgrade_schema(conn: &mut Connection) -> DbResult<()> {
    apply_migrations(conn).map(|_| ())
}

fn check_schema(conn: &mut Connection) -> DbResult<()> {
    ensure_supported(schema_version(conn)?)
}
