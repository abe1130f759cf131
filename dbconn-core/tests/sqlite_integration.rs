//! End-to-end tests against file-backed SQLite databases.

#![cfg(feature = "sqlite")]

use dbconn_core::adapters::{DriverConnector, create_connection};
use dbconn_core::console::{Console, Exit, ScriptedInput};
use dbconn_core::logging::LogLevelHandle;
use dbconn_core::session::{ConnectionHistory, ConnectionManager};
use dbconn_core::{
    ConnectionDescriptor, ConsoleConfig, DatabaseConnection, MetadataService, NormalizedType,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tracing_subscriber::filter::LevelFilter;

const TIMEOUT: Duration = Duration::from_secs(5);

/// Creates a database file and runs `statements` against it.
async fn seed(path: &Path, statements: &[&str]) {
    let url = format!("sqlite://{}?mode=rwc", path.display());
    let descriptor = ConnectionDescriptor::new(url, "", "");
    let conn = create_connection(&descriptor, TIMEOUT).await.unwrap();

    for sql in statements {
        conn.query(sql, 0).await.unwrap();
    }
    conn.close().await;
}

async fn orders_database(dir: &TempDir, rows: &[&str]) -> PathBuf {
    let path = dir.path().join("shop.db");
    let mut statements = vec![
        "CREATE TABLE orders (id INTEGER PRIMARY KEY, name VARCHAR(40) NOT NULL)",
        "CREATE TABLE customers (email TEXT, joined DATE)",
    ];
    statements.extend_from_slice(rows);
    seed(&path, &statements).await;
    path
}

async fn run_console(dir: &TempDir, lines: Vec<String>) -> (Exit, String) {
    let history_file = dir.path().join("connhistory.txt");
    let history = ConnectionHistory::load(&history_file).await.unwrap();
    let session = ConnectionManager::new(Box::new(DriverConnector::new(TIMEOUT)), history);
    let config = ConsoleConfig::default()
        .with_history_file(history_file)
        .with_export_dir(dir.path());

    let mut console = Console::new(
        session,
        config,
        ScriptedInput::new(lines),
        Vec::new(),
        LogLevelHandle::detached(LevelFilter::INFO),
    );

    let exit = console.run().await.unwrap();
    let (mut session, out) = console.into_parts();
    session.close().await;
    (exit, String::from_utf8(out).unwrap())
}

fn connect_line(path: &Path) -> String {
    format!("connect sqlite://{} admin secret", path.display())
}

#[tokio::test]
async fn test_sqlite_describe_orders() {
    let dir = TempDir::new().unwrap();
    let path = orders_database(&dir, &[]).await;

    let descriptor = ConnectionDescriptor::new(format!("sqlite://{}", path.display()), "", "");
    let conn = create_connection(&descriptor, TIMEOUT).await.unwrap();
    let metadata = MetadataService::new(conn.as_ref());

    let columns = metadata.list_columns("orders", true).await.unwrap();
    let rows: Vec<(u32, &str, &str, &str, &str)> = columns
        .iter()
        .map(|c| {
            (
                c.ordinal,
                c.name.as_str(),
                c.display_type.as_str(),
                c.nullable_label(),
                c.primary_key_label(),
            )
        })
        .collect();

    assert_eq!(
        rows,
        [
            (1, "id", "INTEGER", "NOT NULL", "PK"),
            (2, "name", "VARCHAR(40)", "NOT NULL", "-"),
        ]
    );
    assert_eq!(columns[1].normalized_type, NormalizedType::String);

    let mut tables = metadata.list_tables(None).await.unwrap();
    tables.sort();
    assert_eq!(tables, ["customers", "orders"]);
    assert_eq!(metadata.run_scalar_int_query("select count(*) from orders").await, 0);

    conn.close().await;
}

#[tokio::test]
async fn test_sqlite_export_empty_table_writes_header() {
    let dir = TempDir::new().unwrap();
    let path = orders_database(&dir, &[]).await;

    let (_, out) = run_console(&dir, vec![connect_line(&path), "export data orders".into()]).await;

    assert_eq!(
        out,
        "Exporting table data for orders...\nData saved to orders.csv\n"
    );
    let csv = std::fs::read_to_string(dir.path().join("orders.csv")).unwrap();
    assert_eq!(csv, "id,name\n");
}

#[tokio::test]
async fn test_sqlite_export_with_clause_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = orders_database(
        &dir,
        &[
            "INSERT INTO orders VALUES (1, 'Smith, Jane')",
            "INSERT INTO orders VALUES (2, 'line one\nline two')",
            "INSERT INTO orders VALUES (3, 'say \"hi\", then leave')",
            "INSERT INTO orders VALUES (4, 'plain')",
        ],
    )
    .await;

    run_console(
        &dir,
        vec![
            connect_line(&path),
            "export data orders where id < 4 order by id desc".into(),
        ],
    )
    .await;

    let contents = std::fs::read_to_string(dir.path().join("orders.csv")).unwrap();
    let mut reader = csv::Reader::from_reader(contents.as_bytes());
    let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
    assert_eq!(headers, ["id", "name"]);

    let records: Vec<Vec<String>> = reader
        .records()
        .map(|record| record.unwrap().iter().map(str::to_string).collect())
        .collect();
    assert_eq!(
        records,
        [
            vec!["3".to_string(), "say \"hi\", then leave".to_string()],
            vec!["2".to_string(), "line one\nline two".to_string()],
            vec!["1".to_string(), "Smith, Jane".to_string()],
        ]
    );
}

#[tokio::test]
async fn test_sqlite_console_session() {
    let dir = TempDir::new().unwrap();
    let path = orders_database(&dir, &["INSERT INTO orders VALUES (1, 'a')"]).await;
    let schema_file = dir.path().join("schema.xml");

    let (exit, out) = run_console(
        &dir,
        vec![
            connect_line(&path),
            "list tables".into(),
            "count tables".into(),
            "count rows orders".into(),
            "list schemas".into(),
            format!("export schema {}", schema_file.display()),
            format!("export schema {}", dir.path().display()),
            "quit".into(),
        ],
    )
    .await;

    assert_eq!(exit, Exit::Quit);
    assert_eq!(
        out,
        "customers\norders\n\
         Number of database tables: 2\n\
         The number of rows in table orders is 1\n\
         main\n\
         Generating the list of tables...\n\
         Database information saved to file\n\
         Generating the list of tables...\n\
         The output file name is a directory. Stopping.\n\
         Shutting down\n"
    );

    let xml = std::fs::read_to_string(&schema_file).unwrap();
    let customers = xml.find("<table id=\"CUSTOMERS\">").unwrap();
    let orders = xml.find("<table id=\"ORDERS\">").unwrap();
    assert!(customers < orders);
    assert!(xml.contains("<col order=\"1\" type=\"INTEGER\" nullable=\"0\" pk=\"1\">id</col>\r\n"));
    assert!(xml.contains("<col order=\"2\" type=\"VARCHAR(40)\" nullable=\"0\" pk=\"0\">name</col>\r\n"));
    assert!(xml.contains("<col order=\"2\" type=\"DATE\" nullable=\"1\" pk=\"0\">joined</col>\r\n"));

    let history = std::fs::read_to_string(dir.path().join("connhistory.txt")).unwrap();
    assert_eq!(history, format!("sqlite://{}\n", path.display()));
}

#[tokio::test]
async fn test_sqlite_export_schema_of_empty_database() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.db");
    seed(&path, &["PRAGMA user_version = 1"]).await;
    let target = dir.path().join("schema.xml");

    let (_, out) = run_console(
        &dir,
        vec![connect_line(&path), format!("export schema {}", target.display())],
    )
    .await;

    assert_eq!(out, "Generating the list of tables...\nNo tables were found\n");
    assert!(!target.exists());
}
