use std::cell::Cell;

use ludoka_db::schema::verify_table;
use ludoka_db::unique::*;
use rusqlite::{Connection, params};

#[derive(Debug, Clone)]
struct TestData {
    userid: i64,
    gameid: i64,
    unique1: String,
    unique2a: String,
    unique2b: String,
}

fn data(userid: i64, gameid: i64, u1: &str, u2a: &str, u2b: &str) -> TestData {
    TestData {
        userid,
        gameid,
        unique1: u1.to_string(),
        unique2a: u2a.to_string(),
        unique2b: u2b.to_string(),
    }
}

fn bindings() -> Vec<Entry<TestData>> {
    vec![
        Entry::new("userid", |t: &TestData| t.userid),
        Entry::new("gameid", |t: &TestData| t.gameid),
        Entry::new("unique1", |t: &TestData| t.unique1.clone()),
        Entry::new("unique2a", |t: &TestData| t.unique2a.clone()),
        Entry::new("unique2b", |t: &TestData| t.unique2b.clone()),
    ]
}

fn descriptor() -> TableDescriptor<TestData> {
    register_table(
        "test",
        &["userid", "gameid"],
        vec![
            UniqueIndex::new("unique1_index", ["unique1"]),
            UniqueIndex::new("unique2_index", ["unique2a", "unique2b"]),
        ],
        bindings(),
    )
    .unwrap()
}

fn setup_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE test (
             userid INTEGER NOT NULL,
             gameid INTEGER NOT NULL,
             interest BOOLEAN NOT NULL DEFAULT 0,
             unique1 TEXT NOT NULL,
             unique2a TEXT NOT NULL,
             unique2b TEXT NOT NULL,
             PRIMARY KEY (userid, gameid)
         );
         CREATE UNIQUE INDEX unique1_index ON test(unique1);
         CREATE UNIQUE INDEX unique2_index ON test(unique2a, unique2b);",
    )
    .unwrap();

    for row in [
        data(1, 1, "a", "a", "a"),
        data(1, 2, "b", "a", "b"),
        data(1, 3, "c", "b", "a"),
        data(2, 1, "d", "b", "b"),
        data(2, 2, "e", "c", "a"),
    ] {
        insert_row(&conn, &row).unwrap();
    }
    conn
}

fn insert_row(conn: &Connection, row: &TestData) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO test (userid, gameid, unique1, unique2a, unique2b)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![row.userid, row.gameid, row.unique1, row.unique2a, row.unique2b],
    )
}

fn update_row(conn: &Connection, row: &TestData) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE test SET unique1 = ?3, unique2a = ?4, unique2b = ?5
         WHERE userid = ?1 AND gameid = ?2",
        params![row.userid, row.gameid, row.unique1, row.unique2a, row.unique2b],
    )
}

fn row_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM test", [], |row| row.get(0))
        .unwrap()
}

/// (candidate, update, expected conflicts)
fn cases() -> Vec<(TestData, bool, Vec<&'static str>)> {
    vec![
        (data(1, 1, "x", "y", "z"), false, vec![PRIMARY_KEY]),
        (data(1, 2, "b", "y", "z"), true, vec![]),
        (data(1, 1, "b", "y", "z"), true, vec!["unique1_index"]),
        (
            data(1, 1, "b", "y", "z"),
            false,
            vec![PRIMARY_KEY, "unique1_index"],
        ),
        (data(1, 1, "x", "b", "b"), true, vec!["unique2_index"]),
        (
            data(1, 1, "x", "a", "a"),
            false,
            vec![PRIMARY_KEY, "unique2_index"],
        ),
        (
            data(2, 1, "e", "c", "a"),
            true,
            vec!["unique1_index", "unique2_index"],
        ),
    ]
}

// ── Conflict Detection ──────────────────────────────────────────────────────

#[test]
fn reports_expected_conflicts() {
    let conn = setup_db();
    let table = descriptor();

    for (candidate, update, expected) in cases() {
        let found = check_conflicts(&conn, &table, &candidate, update).unwrap();
        assert_eq!(found, expected, "candidate {:?}, update={}", candidate, update);
    }
}

#[test]
fn checking_twice_gives_identical_results() {
    let conn = setup_db();
    let table = descriptor();

    for (candidate, update, _) in cases() {
        let first = check_conflicts(&conn, &table, &candidate, update).unwrap();
        let second = check_conflicts(&conn, &table, &candidate, update).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn new_row_without_collisions_is_clean() {
    let conn = setup_db();
    let table = descriptor();

    let found = check_conflicts(&conn, &table, &data(3, 3, "f", "d", "d"), false).unwrap();
    assert!(found.is_empty());
    // Partial overlap of a composite index is not a conflict
    let found = check_conflicts(&conn, &table, &data(3, 3, "f", "a", "z"), false).unwrap();
    assert!(found.is_empty());
}

// ── Guarded Writes ──────────────────────────────────────────────────────────

#[test]
fn guarded_write_runs_only_without_conflicts() {
    let conn = setup_db();
    let table = descriptor();

    for (candidate, update, expected) in cases() {
        let tx = conn.unchecked_transaction().unwrap();
        let calls = Cell::new(0);

        let result = if update {
            guarded_update(&tx, &table, &candidate, |conn| {
                calls.set(calls.get() + 1);
                Ok(update_row(conn, &candidate)? > 0)
            })
            .map(usize::from)
        } else {
            guarded_create(&tx, &table, &candidate, |conn| {
                calls.set(calls.get() + 1);
                insert_row(conn, &candidate)
            })
        };

        if expected.is_empty() {
            assert_eq!(result.unwrap(), 1, "candidate {:?}", candidate);
            assert_eq!(calls.get(), 1);
        } else {
            match result {
                Err(WriteError::Conflict(conflict)) => {
                    assert_eq!(conflict.table, "test");
                    assert_eq!(conflict.constraints, expected);
                }
                other => panic!("expected conflict for {:?}, got {:?}", candidate, other),
            }
            assert_eq!(calls.get(), 0, "write must not run on conflict");
        }
        assert_eq!(row_count(&tx), 5);
        // Dropping rolls back
    }

    let unchanged: String = conn
        .query_row(
            "SELECT unique1 FROM test WHERE userid = 1 AND gameid = 2",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(unchanged, "b");
}

#[test]
fn guarded_create_inserts_in_own_transaction() {
    let conn = setup_db();
    let table = descriptor();
    let row = data(3, 1, "f", "d", "d");

    let written = guarded_create(&conn, &table, &row, |conn| insert_row(conn, &row)).unwrap();
    assert_eq!(written, 1);
    assert!(conn.is_autocommit());
    assert_eq!(row_count(&conn), 6);

    let err = guarded_create(&conn, &table, &row, |conn| insert_row(conn, &row)).unwrap_err();
    assert!(matches!(
        err,
        WriteError::Conflict(ref c) if c.constraints == [PRIMARY_KEY, "unique1_index", "unique2_index"]
    ));
    assert!(conn.is_autocommit());
    assert_eq!(row_count(&conn), 6);
}

#[test]
fn failed_write_rolls_back_savepoint_only() {
    let conn = setup_db();
    let table = descriptor();
    let tx = conn.unchecked_transaction().unwrap();

    insert_row(&tx, &data(4, 4, "g", "g", "g")).unwrap();
    let err = guarded_create(&tx, &table, &data(4, 5, "h", "h", "h"), |conn| {
        insert_row(conn, &data(4, 5, "h", "h", "h"))?;
        conn.execute("INSERT INTO missing_table VALUES (1)", [])
    })
    .unwrap_err();
    assert!(matches!(err, WriteError::Sqlite(_)));

    // The caller's own insert survives, the guarded one does not
    assert_eq!(row_count(&tx), 6);
    tx.commit().unwrap();
    assert_eq!(row_count(&conn), 6);
}

// ── Storage Backstop ────────────────────────────────────────────────────────

#[test]
fn translates_storage_violations_to_group_names() {
    let conn = setup_db();
    let table = descriptor();

    let err = insert_row(&conn, &data(9, 9, "a", "q", "q")).unwrap_err();
    assert_eq!(
        conflict_from_sqlite(&table, &err),
        Some(ConflictError::new("test", vec!["unique1_index".into()]))
    );

    let err = insert_row(&conn, &data(9, 9, "q", "b", "a")).unwrap_err();
    assert_eq!(
        conflict_from_sqlite(&table, &err).unwrap().constraints,
        ["unique2_index"]
    );

    let err = insert_row(&conn, &data(1, 1, "q", "q", "q")).unwrap_err();
    assert_eq!(
        conflict_from_sqlite(&table, &err).unwrap().constraints,
        [PRIMARY_KEY]
    );

    let other = conn.execute("INSERT INTO missing_table VALUES (1)", []).unwrap_err();
    assert_eq!(conflict_from_sqlite(&table, &other), None);
}

#[test]
fn undeclared_index_surfaces_as_conflict() {
    let conn = setup_db();
    // Only the composite index is declared
    let table = register_table(
        "test",
        &["userid", "gameid"],
        vec![UniqueIndex::new("unique2_index", ["unique2a", "unique2b"])],
        bindings(),
    )
    .unwrap();

    let row = data(5, 5, "a", "z", "z");
    assert!(check_conflicts(&conn, &table, &row, false).unwrap().is_empty());

    let err = guarded_create(&conn, &table, &row, |conn| insert_row(conn, &row)).unwrap_err();
    match err {
        WriteError::Conflict(conflict) => assert_eq!(conflict.constraints, ["unique1"]),
        other => panic!("expected conflict, got {:?}", other),
    }
    assert_eq!(row_count(&conn), 5);
}

// ── Schema Verification ─────────────────────────────────────────────────────

#[test]
fn descriptor_matches_fixture_schema() {
    let conn = setup_db();
    verify_table(&conn, &descriptor()).unwrap();
}

#[test]
fn misdeclared_index_fails_verification() {
    let conn = setup_db();
    let table = register_table(
        "test",
        &["userid", "gameid"],
        vec![UniqueIndex::new("unique2_index", ["unique2b", "unique2a"])],
        bindings(),
    )
    .unwrap();
    assert!(verify_table(&conn, &table).is_err());

    let table = register_table("test", &["gameid", "userid"], vec![], bindings()).unwrap();
    assert!(verify_table(&conn, &table).is_err());
}
