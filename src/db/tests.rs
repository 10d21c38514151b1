use super::{get_value, open_connection, set_values};
use rusqlite::params;
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_db_path(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX_EPOCH")
        .as_nanos();
    std::env::temp_dir()
        .join(format!("taskboard-{prefix}-{nanos}.sqlite"))
        .display()
        .to_string()
}

fn cleanup_db_files(path: &str) {
    for suffix in ["", "-wal", "-shm"] {
        let candidate = format!("{path}{suffix}");
        let _ = std::fs::remove_file(candidate);
    }
}

fn table_exists(conn: &rusqlite::Connection, table_name: &str) -> bool {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1)",
            params![table_name],
            |row| row.get(0),
        )
        .expect("table existence query should be readable");
    exists == 1
}

#[test]
fn configures_connection_pragmas() {
    let path = unique_db_path("pragmas");
    let conn = open_connection(&path).expect("connection should open");

    let journal_mode: String = conn
        .query_row("PRAGMA journal_mode;", [], |row| row.get(0))
        .expect("journal_mode pragma should be readable");
    assert_eq!(journal_mode.to_uppercase(), "WAL");

    let synchronous: i64 = conn
        .query_row("PRAGMA synchronous;", [], |row| row.get(0))
        .expect("synchronous pragma should be readable");
    assert_eq!(synchronous, 1);

    let busy_timeout: i64 = conn
        .query_row("PRAGMA busy_timeout;", [], |row| row.get(0))
        .expect("busy_timeout pragma should be readable");
    assert_eq!(busy_timeout, 5000);

    drop(conn);
    cleanup_db_files(&path);
}

#[test]
fn migrations_create_tables_and_are_idempotent() {
    let path = unique_db_path("migrations");
    let conn = open_connection(&path).expect("first open should succeed");
    assert!(table_exists(&conn, "kv"));
    assert!(!table_exists(&conn, "meta"));
    assert!(table_exists(&conn, "schema_migrations"));
    drop(conn);

    let conn = open_connection(&path).expect("second open should succeed");
    let applied: i64 = conn
        .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| row.get(0))
        .expect("migration count should be readable");
    assert_eq!(applied, 1);
    let (version, name): (i64, String) = conn
        .query_row("SELECT version, name FROM schema_migrations", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .expect("migration row should be readable");
    assert_eq!(version, 1);
    assert_eq!(name, "key_value_store_v1");

    drop(conn);
    cleanup_db_files(&path);
}

#[test]
fn set_values_upserts_and_get_value_reads_back() {
    let path = unique_db_path("kv");
    let mut conn = open_connection(&path).expect("connection should open");

    assert_eq!(get_value(&conn, "tasks").expect("read"), None);

    set_values(
        &mut conn,
        &[("tasks", "[]".to_string()), ("activity", "[\"a\"]".to_string())],
    )
    .expect("first write should succeed");
    set_values(&mut conn, &[("tasks", "[1]".to_string())]).expect("overwrite should succeed");

    assert_eq!(
        get_value(&conn, "tasks").expect("read"),
        Some("[1]".to_string())
    );
    assert_eq!(
        get_value(&conn, "activity").expect("read"),
        Some("[\"a\"]".to_string())
    );

    drop(conn);
    cleanup_db_files(&path);
}
