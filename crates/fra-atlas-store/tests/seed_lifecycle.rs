// SPDX-License-Identifier: Apache-2.0

use fra_atlas_store::{migrate, open_connection, seed_demo, Database, DbConfig, TABLES};
use tempfile::tempdir;

fn cfg(dir: &tempfile::TempDir) -> DbConfig {
    DbConfig {
        path: dir.path().join("atlas.sqlite"),
        auto_migrate: true,
        ..DbConfig::default()
    }
}

fn counts(conn: &rusqlite::Connection) -> Vec<(String, i64)> {
    TABLES
        .iter()
        .map(|table| {
            let n: i64 = conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
                .expect("count");
            ((*table).to_string(), n)
        })
        .collect()
}

#[test]
fn seeding_twice_without_reset_does_not_duplicate_rows() {
    let dir = tempdir().expect("tmp");
    let cfg = cfg(&dir);
    let mut conn = open_connection(&cfg).expect("conn");
    migrate(&mut conn).expect("migrate");

    let first = seed_demo(&mut conn, false).expect("first seed");
    assert!(first.skipped.is_empty());
    assert!(first.inserted["claims"] > 0);
    let after_first = counts(&conn);

    let second = seed_demo(&mut conn, false).expect("second seed");
    assert!(second.inserted.is_empty());
    assert_eq!(second.skipped.len(), TABLES.len());
    assert_eq!(counts(&conn), after_first);
}

#[test]
fn reset_deletes_rows_and_reseeds_in_one_pass() {
    let dir = tempdir().expect("tmp");
    let cfg = cfg(&dir);
    let mut conn = open_connection(&cfg).expect("conn");
    migrate(&mut conn).expect("migrate");
    seed_demo(&mut conn, false).expect("seed");
    conn.execute(
        "INSERT INTO support_tickets (ticket_number, subject, description) VALUES ('TKT-1', 's', 'd')",
        [],
    )
    .expect("extra ticket");
    let before = counts(&conn);

    let report = seed_demo(&mut conn, true).expect("reset seed");
    assert!(report.reset);
    assert!(report.skipped.is_empty());
    let after = counts(&conn);
    let tickets = |rows: &[(String, i64)]| {
        rows.iter()
            .find(|(t, _)| t == "support_tickets")
            .map(|(_, n)| *n)
            .expect("tickets row")
    };
    assert_eq!(tickets(&after) + 1, tickets(&before));
}

#[test]
fn migrating_an_existing_database_keeps_its_rows() {
    let dir = tempdir().expect("tmp");
    let cfg = cfg(&dir);
    let mut conn = open_connection(&cfg).expect("conn");
    migrate(&mut conn).expect("migrate");
    seed_demo(&mut conn, false).expect("seed");
    let before = counts(&conn);
    migrate(&mut conn).expect("migrate again");
    assert_eq!(counts(&conn), before);
}

#[tokio::test]
async fn database_pool_serves_concurrent_checkouts() {
    let dir = tempdir().expect("tmp");
    let db = Database::open(DbConfig {
        max_connections: 2,
        ..cfg(&dir)
    })
    .expect("open");
    db.with_connection(|conn| seed_demo(conn, false).map(|_| ()))
        .await
        .expect("seed via pool");

    let mut handles = Vec::new();
    for _ in 0..6 {
        let db = db.clone();
        handles.push(tokio::spawn(async move {
            db.with_connection(|conn| {
                conn.query_row("SELECT COUNT(*) FROM claims", [], |row| row.get::<_, i64>(0))
                    .map_err(fra_atlas_store::StoreError::from)
            })
            .await
        }));
    }
    for handle in handles {
        assert!(handle.await.expect("join").expect("count") > 0);
    }
}
