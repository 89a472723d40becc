//! Integration tests for statement execution, cursors and result set
//! configuration.

use sdbc_marshal::client::constants::*;
use sdbc_marshal::client::memory::{
    column, numeric_column, MemoryCell, MemoryResult, MemoryServer, Script,
    BATCH_SUCCESS_NO_INFO, ERR_FORWARD_ONLY, ERR_QUERY_IN_BATCH,
};
use sdbc_marshal::{
    Concurrency, CursorState, Error, HostValue, ResultSetConfig, ResultSetType, Seek,
    SeekOutcome, Serial, Statement,
};

const ROOMS: &str = "SELECT ID, NAME, RATE, NOTE FROM ROOMS";

fn rooms_server() -> MemoryServer {
    let server = MemoryServer::new();
    server.register(
        ROOMS,
        Script::query(
            MemoryResult::new(vec![
                column("ID", SQLTYPE_INTEGER, 10),
                column("NAME", SQLTYPE_VARCHARUNI, 20),
                numeric_column("RATE", 7, 2),
                column("NOTE", SQLTYPE_VARCHARA, 40),
            ])
            .row(vec![1.into(), "Aurora".into(), 99.5.into(), MemoryCell::Null])
            .row(vec![2.into(), "Borealis".into(), 120.0.into(), "sea view".into()])
            .row(vec![3.into(), "Cirrus".into(), 75.25.into(), MemoryCell::Null]),
        ),
    );
    server
}

fn scrollable() -> ResultSetConfig {
    ResultSetConfig::new().with_result_set_type(ResultSetType::ScrollInsensitive)
}

#[test]
fn test_fetch_all_rows() {
    let server = rooms_server();
    let mut stmt = Statement::new(Box::new(server.statement()), ResultSetConfig::new()).unwrap();

    assert_eq!(stmt.execute(ROOMS).unwrap(), 3);
    assert_eq!(stmt.column_labels(), vec!["ID", "NAME", "RATE", "NOTE"]);

    let mut names = Vec::new();
    while let Some(row) = stmt.fetch(Seek::Next).unwrap() {
        names.push(row.get_by_label("name").and_then(HostValue::as_str).map(str::to_string));
    }
    assert_eq!(
        names,
        vec![
            Some("Aurora".to_string()),
            Some("Borealis".to_string()),
            Some("Cirrus".to_string())
        ]
    );
    assert_eq!(stmt.row_number(), 0);
}

#[test]
fn test_positional_and_associative_rows() {
    let server = rooms_server();
    let mut stmt = Statement::new(Box::new(server.statement()), ResultSetConfig::new()).unwrap();
    stmt.execute(ROOMS).unwrap();

    let row = stmt.fetch(Seek::Next).unwrap().unwrap();
    assert_eq!(
        row.values(),
        &[
            HostValue::Int32(1),
            HostValue::Text("Aurora".to_string()),
            HostValue::Double(99.5),
            HostValue::Null,
        ]
    );
    assert_eq!(row.nulls(), vec![false, false, false, true]);

    let nulls = row.null_map();
    assert_eq!(nulls.get("NOTE"), Some(&true));
    assert_eq!(nulls.get("RATE"), Some(&false));

    let map = row.into_map();
    assert_eq!(map.get("ID"), Some(&HostValue::Int32(1)));
    assert_eq!(map.get("NOTE"), Some(&HostValue::Null));
}

#[test]
fn test_previous_after_last_lands_on_last_row() {
    let server = rooms_server();
    let mut stmt = Statement::new(Box::new(server.statement()), scrollable()).unwrap();
    stmt.execute(ROOMS).unwrap();

    while stmt.fetch(Seek::Next).unwrap().is_some() {}
    let cursor = stmt.cursor().unwrap();
    assert_eq!(cursor.state(), CursorState::AfterLast);
    assert_eq!(cursor.seek(Seek::Previous).unwrap(), SeekOutcome::OnRow);
    assert_eq!(cursor.state(), CursorState::OnRow);
    assert_eq!(stmt.row_number(), 3);
}

#[test]
fn test_previous_after_last_on_empty_result() {
    let server = MemoryServer::new();
    server.register(
        "SELECT ID FROM EMPTY",
        Script::query(MemoryResult::new(vec![column("ID", SQLTYPE_INTEGER, 10)])),
    );
    let mut stmt = Statement::new(Box::new(server.statement()), scrollable()).unwrap();
    assert_eq!(stmt.execute("SELECT ID FROM EMPTY").unwrap(), 0);

    assert!(stmt.fetch(Seek::Next).unwrap().is_none());
    assert!(stmt.fetch(Seek::Previous).unwrap().is_none());
    assert_eq!(stmt.cursor().unwrap().state(), CursorState::BeforeFirst);
    assert_eq!(stmt.row_number(), 0);
}

#[test]
fn test_scrolling() {
    let server = rooms_server();
    let mut stmt = Statement::new(Box::new(server.statement()), scrollable()).unwrap();
    stmt.execute(ROOMS).unwrap();

    let id = |row: Option<sdbc_marshal::Row>| row.and_then(|r| r.get(0).cloned());
    assert_eq!(id(stmt.fetch(Seek::Last).unwrap()), Some(HostValue::Int32(3)));
    assert_eq!(id(stmt.fetch(Seek::First).unwrap()), Some(HostValue::Int32(1)));
    assert_eq!(id(stmt.fetch(Seek::Relative(1)).unwrap()), Some(HostValue::Int32(2)));
    assert_eq!(id(stmt.fetch(Seek::Absolute(-1)).unwrap()), Some(HostValue::Int32(3)));
    assert_eq!(stmt.row_number(), 3);

    assert!(stmt.fetch(Seek::Absolute(0)).unwrap().is_none());
    assert_eq!(stmt.cursor().unwrap().state(), CursorState::BeforeFirst);
    assert!(stmt.fetch(Seek::Absolute(10)).unwrap().is_none());
    assert_eq!(stmt.cursor().unwrap().state(), CursorState::AfterLast);
}

#[test]
fn test_forward_only_rejects_previous() {
    let server = rooms_server();
    let mut stmt = Statement::new(Box::new(server.statement()), ResultSetConfig::new()).unwrap();
    stmt.execute(ROOMS).unwrap();
    stmt.fetch(Seek::Next).unwrap();

    let err = stmt.fetch(Seek::Previous).unwrap_err();
    assert_eq!(err.server_code(), Some(ERR_FORWARD_ONLY));
    // The failed move does not change the position
    assert_eq!(stmt.cursor().unwrap().state(), CursorState::OnRow);
    assert_eq!(stmt.row_number(), 1);
}

#[test]
fn test_config_applied_before_execute() {
    let server = rooms_server();
    let config = ResultSetConfig::new()
        .with_cursor_name("ROOM_CURSOR")
        .with_max_rows(2)
        .with_concurrency(Concurrency::Updatable)
        .with_fetch_size(1)
        .unwrap();
    let mut stmt = Statement::new(Box::new(server.statement()), config).unwrap();

    assert_eq!(stmt.execute(ROOMS).unwrap(), 2);
    let settings = server.settings();
    assert_eq!(settings.cursor_name.as_deref(), Some("ROOM_CURSOR"));
    assert_eq!(settings.max_rows, 2);
    assert_eq!(settings.concurrency, Concurrency::Updatable);
    assert_eq!(settings.result_set_type, ResultSetType::ForwardOnly);
    assert_eq!(settings.fetch_size, Some(1));
}

#[test]
fn test_configure_merges_options() {
    let server = rooms_server();
    let mut stmt = Statement::new(
        Box::new(server.statement()),
        ResultSetConfig::new().with_max_rows(1),
    )
    .unwrap();
    stmt.configure(&scrollable());

    assert_eq!(stmt.execute(ROOMS).unwrap(), 1);
    assert_eq!(server.settings().result_set_type, ResultSetType::ScrollInsensitive);
    assert_eq!(stmt.config().max_rows, Some(1));
}

#[test]
fn test_reexecute_closes_previous_result() {
    let server = rooms_server();
    server.register("UPDATE ROOMS SET RATE = RATE * 2", Script::update(3));
    let mut stmt = Statement::new(Box::new(server.statement()), ResultSetConfig::new()).unwrap();

    stmt.execute(ROOMS).unwrap();
    stmt.execute(ROOMS).unwrap();
    assert_eq!(server.closed_result_sets(), 1);

    assert_eq!(stmt.execute("UPDATE ROOMS SET RATE = RATE * 2").unwrap(), 3);
    assert_eq!(server.closed_result_sets(), 2);
    assert!(!stmt.is_query());
    assert!(stmt.columns().is_empty());
}

#[test]
fn test_failed_execute_discards_previous_result() {
    let server = rooms_server();
    server.register("SELECT * FROM MISSING", Script::fail(-4004, "Unknown table name"));
    let mut stmt = Statement::new(Box::new(server.statement()), ResultSetConfig::new()).unwrap();
    stmt.execute(ROOMS).unwrap();

    match stmt.execute("SELECT * FROM MISSING") {
        Err(Error::Server { code, message }) => {
            assert_eq!(code, -4004);
            assert_eq!(message, "Unknown table name");
        }
        other => panic!("Expected Server error, got {:?}", other),
    }
    assert!(!stmt.is_query());
    assert!(matches!(stmt.fetch(Seek::Next), Err(Error::NoResultSet)));
}

#[test]
fn test_column_descriptions() {
    let server = rooms_server();
    let mut stmt = Statement::new(Box::new(server.statement()), ResultSetConfig::new()).unwrap();
    stmt.execute(ROOMS).unwrap();

    let rate = stmt.column(3).unwrap();
    assert_eq!(rate.label, "RATE");
    assert_eq!(rate.precision, 7);
    assert_eq!(rate.scale, 2);
    assert_eq!(rate.host_type, sdbc_marshal::HostType::Double);
    assert_eq!(rate.nullable, Some(true));
    assert!(matches!(
        stmt.column(5),
        Err(Error::ColumnOutOfRange { index: 5, count: 4 })
    ));
}

#[test]
fn test_batch() {
    let server = MemoryServer::new();
    server.register("INSERT INTO ROOMS (ID) VALUES (10)", Script::update(1));
    server.register("DELETE FROM ROOMS WHERE ID > 100", Script::update(4));
    server.register("CALL CLEANUP()", Script::call(|_| Ok(Vec::new())));
    server.register(ROOMS, Script::query(MemoryResult::default()));
    let mut stmt = Statement::new(Box::new(server.statement()), ResultSetConfig::new()).unwrap();

    let statuses = stmt
        .batch(&[
            "INSERT INTO ROOMS (ID) VALUES (10)",
            "DELETE FROM ROOMS WHERE ID > 100",
            "CALL CLEANUP()",
        ])
        .unwrap();
    assert_eq!(statuses, vec![1, 4, BATCH_SUCCESS_NO_INFO]);

    let err = stmt
        .batch(&["INSERT INTO ROOMS (ID) VALUES (10)", ROOMS])
        .unwrap_err();
    assert_eq!(err.server_code(), Some(ERR_QUERY_IN_BATCH));
}

#[test]
fn test_serial_keys() {
    let server = MemoryServer::new();
    server.register(
        "INSERT INTO GUESTS (NAME) SELECT NAME FROM VISITORS",
        Script::update(3).with_serials(41, 43),
    );
    let mut stmt = Statement::new(Box::new(server.statement()), ResultSetConfig::new()).unwrap();

    assert_eq!(stmt.serial(Serial::Last).unwrap(), None);
    stmt.execute("INSERT INTO GUESTS (NAME) SELECT NAME FROM VISITORS")
        .unwrap();
    assert_eq!(stmt.serial(Serial::First).unwrap(), Some(41));
    assert_eq!(stmt.serial(Serial::Last).unwrap(), Some(43));
}

#[test]
fn test_drop_releases_statement() {
    let server = rooms_server();
    {
        let mut stmt =
            Statement::new(Box::new(server.statement()), ResultSetConfig::new()).unwrap();
        stmt.execute(ROOMS).unwrap();
    }
    assert_eq!(server.released_statements(), 1);
    assert_eq!(server.closed_result_sets(), 1);
}

#[test]
fn test_result_without_columns_is_rejected() {
    let server = MemoryServer::new();
    server.register("SELECT FROM NOWHERE", Script::query(MemoryResult::default()));
    let mut stmt = Statement::new(Box::new(server.statement()), ResultSetConfig::new()).unwrap();

    assert!(matches!(stmt.execute("SELECT FROM NOWHERE"), Err(Error::NoColumns)));
    assert_eq!(server.closed_result_sets(), 1);
    assert!(!stmt.is_query());
}
