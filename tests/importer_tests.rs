// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use finsight::{cli, commands::importer};
use rusqlite::Connection;
use std::io::Write;
use tempfile::NamedTempFile;

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE settings(key TEXT PRIMARY KEY, value TEXT NOT NULL);
        CREATE TABLE users(id INTEGER PRIMARY KEY, name TEXT NOT NULL UNIQUE, email TEXT);
        CREATE TABLE transactions(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            type TEXT NOT NULL,
            date TEXT NOT NULL,
            amount TEXT NOT NULL,
            category TEXT NOT NULL,
            note TEXT,
            gross_pay TEXT,
            total_tax TEXT,
            net_pay TEXT
        );
        "#,
    )
    .unwrap();
    conn.execute("INSERT INTO users(id,name) VALUES (1,'alex')", [])
        .unwrap();
    conn.execute(
        "INSERT INTO settings(key,value) VALUES('active_user','alex')",
        [],
    )
    .unwrap();
    conn
}

fn run_import(conn: &mut Connection, path: &str) -> anyhow::Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["finsight", "import", "transactions", "--path", path]);
    if let Some(("import", import_m)) = matches.subcommand() {
        importer::handle(conn, import_m)
    } else {
        panic!("no import subcommand");
    }
}

#[test]
fn imports_rows_with_tax_columns() {
    let mut conn = base_conn();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "date,type,amount,category,note,gross_pay,total_tax,net_pay\n\
         2025-02-03,expense,12.50,Groceries,weekly run,,,\n\
         2025-02-04,income,3000.00,Salary,,3000.00,600.00,2400.00"
    )
    .unwrap();
    file.flush().unwrap();

    run_import(&mut conn, file.path().to_str().unwrap()).unwrap();

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 2);

    let net: String = conn
        .query_row(
            "SELECT net_pay FROM transactions WHERE category='Salary'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(net, "2400.00");
}

#[test]
fn computes_net_when_column_missing() {
    let mut conn = base_conn();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "date,type,amount,category,note,gross_pay,total_tax,net_pay\n\
         2025-02-04,income,1000.00,Salary,,1000.00,100.00,"
    )
    .unwrap();
    file.flush().unwrap();

    run_import(&mut conn, file.path().to_str().unwrap()).unwrap();

    let net: String = conn
        .query_row("SELECT net_pay FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(net, "900.00");
}

#[test]
fn malformed_amount_coerces_to_zero() {
    let mut conn = base_conn();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "date,type,amount,category,note,gross_pay,total_tax,net_pay\n\
         2025-02-05,expense,oops,Groceries,,,,"
    )
    .unwrap();
    file.flush().unwrap();

    run_import(&mut conn, file.path().to_str().unwrap()).unwrap();

    let amount: String = conn
        .query_row("SELECT amount FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(amount, "0");
}

#[test]
fn importer_trims_cli_path_argument() {
    let mut conn = base_conn();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "date,type,amount,category,note\n2025-02-03,expense,5.00,Food,"
    )
    .unwrap();
    file.flush().unwrap();

    let padded = format!("  {}  ", file.path().to_str().unwrap());
    run_import(&mut conn, &padded).unwrap();

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn invalid_date_aborts_import() {
    let mut conn = base_conn();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "date,type,amount,category,note\nnot-a-date,expense,5.00,Food,"
    )
    .unwrap();
    file.flush().unwrap();

    assert!(run_import(&mut conn, file.path().to_str().unwrap()).is_err());
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}
