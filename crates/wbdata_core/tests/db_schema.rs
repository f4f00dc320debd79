use rusqlite::Connection;
use wbdata_core::db::{open_db, open_db_in_memory};

#[test]
fn fresh_connection_has_tables_and_year_index() {
    let conn = open_db_in_memory().expect("in-memory db should open");

    assert_schema_object(&conn, "table", "collections");
    assert_schema_object(&conn, "table", "entries");
    assert_schema_object(&conn, "index", "idx_entries_collection_date");
}

#[test]
fn reopening_file_keeps_stored_collections() {
    let dir = tempfile::tempdir().expect("temp dir should be creatable");
    let path = dir.path().join("data.db");

    let conn = open_db(&path).expect("first open should create the schema");
    conn.execute(
        "INSERT INTO collections (collection_id, indicator_id, indicator_val, creation_time)
         VALUES (1, 'SP.RUR.TOTL', 'Rural population', '2019-01-01T00:00:00Z');",
        [],
    )
    .expect("insert into fresh schema should succeed");
    drop(conn);

    let reopened = open_db(&path).expect("second open should reuse the schema");
    let count: i64 = reopened
        .query_row("SELECT COUNT(*) FROM collections;", [], |row| row.get(0))
        .expect("count query should succeed");
    assert_eq!(count, 1, "bootstrap must not drop existing rows");
}

#[test]
fn foreign_keys_are_enforced_for_entries() {
    let conn = open_db_in_memory().expect("in-memory db should open");

    let result = conn.execute(
        "INSERT INTO entries (collection_id, country, date, value)
         VALUES (42, 'Chad', '2015', '1');",
        [],
    );
    assert!(result.is_err(), "orphan entry must be rejected");
}

#[test]
fn indicator_code_is_unique_at_storage_level() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    conn.execute_batch(
        "INSERT INTO collections (collection_id, indicator_id, indicator_val, creation_time)
         VALUES (1, 'SP.RUR.TOTL', 'Rural population', '2019-01-01T00:00:00Z');",
    )
    .expect("first insert should succeed");

    let duplicate = conn.execute(
        "INSERT INTO collections (collection_id, indicator_id, indicator_val, creation_time)
         VALUES (2, 'SP.RUR.TOTL', 'Rural population', '2019-01-01T00:00:00Z');",
        [],
    );
    assert!(duplicate.is_err(), "second collection for one indicator must be rejected");
}

#[test]
fn deleting_collection_cascades_to_entries() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    conn.execute_batch(
        "INSERT INTO collections (collection_id, indicator_id, indicator_val, creation_time)
         VALUES (1, 'SP.RUR.TOTL', 'Rural population', '2019-01-01T00:00:00Z');
         INSERT INTO entries (collection_id, country, date, value)
         VALUES (1, 'Chad', '2015', '1'), (1, 'Chad', '2016', '2');
         DELETE FROM collections WHERE collection_id = 1;",
    )
    .expect("seed and delete should succeed");

    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM entries;", [], |row| row.get(0))
        .expect("count query should succeed");
    assert_eq!(remaining, 0);
}

fn assert_schema_object(conn: &Connection, kind: &str, name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = ?1 AND name = ?2
            );",
            [kind, name],
            |row| row.get(0),
        )
        .expect("sqlite_master lookup should succeed");
    assert_eq!(exists, 1, "{kind} {name} does not exist");
}
