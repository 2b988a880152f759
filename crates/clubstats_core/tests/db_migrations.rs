use clubstats_core::db::migrations::{current_version, latest_version};
use clubstats_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(current_version(&conn).unwrap(), latest_version());
    for table in ["coaches", "training_groups", "persons", "events", "results"] {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("club.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute("INSERT INTO coaches (full_name) VALUES ('Ivanova');", [])
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(current_version(&conn_second).unwrap(), latest_version());
    let coaches: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM coaches;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(coaches, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
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
fn foreign_keys_are_enforced() {
    let conn = open_db_in_memory().unwrap();
    let err = conn
        .execute(
            "INSERT INTO results (event_id, person_id) VALUES (1, 1);",
            [],
        )
        .unwrap_err();
    assert!(err.to_string().contains("FOREIGN KEY"));
}

#[test]
fn result_identity_triple_is_unique() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO persons (person_id, last_name, first_name) VALUES (1, 'Smith', 'Anna');
         INSERT INTO events (event_id, name, date, level, track, sport)
             VALUES (1, 'Cup', '2023-05-01', 'Region', 'Sport', 'Orienteering');
         INSERT INTO results (event_id, person_id) VALUES (1, 1);",
    )
    .unwrap();

    let duplicate = conn.execute(
        "INSERT INTO results (event_id, person_id, category) VALUES (1, 1, '');",
        [],
    );
    assert!(duplicate.is_err());
    conn.execute(
        "INSERT INTO results (event_id, person_id, category) VALUES (1, 1, 'W14');",
        [],
    )
    .unwrap();
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
