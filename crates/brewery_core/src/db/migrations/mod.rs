//! Catalog schema upgrades.
//!
//! Each step is one SQL script keyed by the `user_version` it leaves behind.
//! Pending steps run inside a single transaction, so a catalog is either at
//! its old version or fully upgraded.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "beers",
        sql: include_str!("0001_beers.sql"),
    },
    Migration {
        version: 2,
        name: "beer_audit_trigger",
        sql: include_str!("0002_beer_audit_trigger.sql"),
    },
];

/// Schema versions a catalog moved through during one upgrade call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationReport {
    pub from_version: u32,
    pub to_version: u32,
}

impl MigrationReport {
    pub fn steps_applied(&self) -> u32 {
        self.to_version - self.from_version
    }
}

/// Schema version this build writes and expects.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Reads the catalog's recorded schema version.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Refuses catalogs written by a newer build.
pub fn ensure_supported(db_version: u32) -> DbResult<()> {
    let latest_supported = latest_version();
    if db_version > latest_supported {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        });
    }
    Ok(())
}

/// Brings the catalog schema up to `latest_version()`.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the catalog is newer than this build.
/// - `MigrationFailed` naming the step that broke; the catalog keeps its
///   previous version.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<MigrationReport> {
    let from_version = schema_version(conn)?;
    ensure_supported(from_version)?;

    let mut report = MigrationReport {
        from_version,
        to_version: from_version,
    };
    let mut pending = MIGRATIONS
        .iter()
        .filter(|migration| migration.version > from_version)
        .peekable();
    if pending.peek().is_none() {
        return Ok(report);
    }

    let tx = conn.transaction()?;
    for migration in pending {
        let step = format!(
            "{}\nPRAGMA user_version = {};",
            migration.sql, migration.version
        );
        tx.execute_batch(&step)
            .map_err(|source| DbError::MigrationFailed {
                version: migration.version,
                name: migration.name,
                source,
            })?;
        debug!(
            "event=db_migrate_step module=db version={} name={}",
            migration.version, migration.name
        );
        report.to_version = migration.version;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={} steps={}",
        report.from_version,
        report.to_version,
        report.steps_applied()
    );
    Ok(report)
}
