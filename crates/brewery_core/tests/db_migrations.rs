use brewery_core::db::migrations::{apply_migrations, latest_version, MigrationReport};
use brewery_core::db::seed::{seed_beer, seed_default_catalog, NewBeer};
use brewery_core::db::{open_db, open_db_existing, open_db_in_memory, DbError};
use brewery_core::BeerStyle;
use rusqlite::Connection;
use rust_decimal::Decimal;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_eq!(count_objects(&conn, "table", "beers"), 1);
    assert_eq!(count_objects(&conn, "trigger", "beers_bump_version"), 1);
    assert_eq!(count_objects(&conn, "index", "idx_beers_style"), 1);
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("brewery.db");

    let conn_first = open_db(&path).unwrap();
    seed_default_catalog(&conn_first).unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_eq!(row_count(&conn_second), 3);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn migrations_report_the_versions_they_moved_through() {
    let mut conn = Connection::open_in_memory().unwrap();

    let report = apply_migrations(&mut conn).unwrap();
    assert_eq!(
        report,
        MigrationReport {
            from_version: 0,
            to_version: latest_version(),
        }
    );
    assert_eq!(report.steps_applied(), latest_version());

    let again = apply_migrations(&mut conn).unwrap();
    assert_eq!(again.steps_applied(), 0);
    assert_eq!(again.to_version, latest_version());
}

#[test]
fn opening_existing_catalog_never_creates_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.db");

    match open_db_existing(&path).unwrap_err() {
        DbError::CatalogMissing(missing) => assert_eq!(missing, path),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!path.exists());
}

#[test]
fn existing_catalog_opens_read_only_without_migrating() {
    let dir = tempfile::tempdir().unwrap();
    let current = dir.path().join("current.db");
    seed_default_catalog(&open_db(&current).unwrap()).unwrap();

    let conn = open_db_existing(&current).unwrap();
    assert_eq!(row_count(&conn), 3);
    assert!(conn.execute("DELETE FROM beers;", []).is_err());

    let blank = dir.path().join("blank.db");
    drop(Connection::open(&blank).unwrap());
    let conn = open_db_existing(&blank).unwrap();
    assert_eq!(schema_version(&conn), 0);
    assert_eq!(count_objects(&conn, "table", "beers"), 0);
}

#[test]
fn existing_catalog_from_newer_build_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    assert!(matches!(
        open_db_existing(&path).unwrap_err(),
        DbError::UnsupportedSchemaVersion { db_version: 999, .. }
    ));
}

#[test]
fn store_assigns_version_and_timestamps_on_insert() {
    let conn = open_db_in_memory().unwrap();
    let id = seed_beer(
        &conn,
        &NewBeer::new("Beer1", BeerStyle::PaleAle, Decimal::new(1299, 2)),
    )
    .unwrap();

    let (version, created, modified): (i64, String, String) = conn
        .query_row(
            "SELECT version, created_date, last_modified_date FROM beers WHERE id = ?1",
            [id.to_string()],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!(version, 0);
    assert!(chrono::DateTime::parse_from_rfc3339(&created).is_ok());
    assert_eq!(created, modified);
    // Millisecond precision: `YYYY-MM-DDTHH:MM:SS.fffZ`.
    assert_eq!(created.len(), 24, "{created}");
    assert_eq!(&created[19..20], ".");
}

#[test]
fn every_data_mutation_bumps_version() {
    let conn = open_db_in_memory().unwrap();
    let id = seed_beer(
        &conn,
        &NewBeer::new("Beer1", BeerStyle::PaleAle, Decimal::new(1299, 2)),
    )
    .unwrap();

    conn.execute(
        "UPDATE beers SET quantity_on_hand = 10 WHERE id = ?1",
        [id.to_string()],
    )
    .unwrap();
    conn.execute(
        "UPDATE beers SET price = '13.49' WHERE id = ?1",
        [id.to_string()],
    )
    .unwrap();

    let version: i64 = conn
        .query_row(
            "SELECT version FROM beers WHERE id = ?1",
            [id.to_string()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(version, 2);
}

#[test]
fn default_catalog_seed_runs_only_on_empty_store() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(seed_default_catalog(&conn).unwrap(), 3);
    assert_eq!(seed_default_catalog(&conn).unwrap(), 0);
    assert_eq!(row_count(&conn), 3);
}

#[test]
fn store_rejects_negative_quantity() {
    let conn = open_db_in_memory().unwrap();
    let result = conn.execute(
        "INSERT INTO beers (id, beer_name, beer_style, price, quantity_on_hand)
         VALUES ('00000000-0000-4000-8000-000000000001', 'Bad', 'ALE', '1.00', -1);",
        [],
    );
    assert!(result.is_err());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn row_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM beers;", [], |row| row.get(0))
        .unwrap()
}

fn count_objects(conn: &Connection, kind: &str, name: &str) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = ?1 AND name = ?2;",
        [kind, name],
        |row| row.get(0),
    )
    .unwrap()
}
