// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use finsight::commands::{config, users};
use finsight::{cli, utils};
use rusqlite::Connection;

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE settings(key TEXT PRIMARY KEY, value TEXT NOT NULL);
        CREATE TABLE users(id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL UNIQUE, email TEXT, created_at TEXT NOT NULL DEFAULT (datetime('now')));
        "#,
    )
    .unwrap();
    conn
}

fn run_user(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(args.iter().copied());
    if let Some(("user", user_m)) = matches.subcommand() {
        users::handle(conn, user_m)
    } else {
        panic!("no user subcommand");
    }
}

#[test]
fn first_user_becomes_active() {
    let conn = base_conn();
    run_user(&conn, &["finsight", "user", "add", "--name", "alex"]).unwrap();
    assert_eq!(utils::active_user_id(&conn).unwrap(), 1);

    run_user(&conn, &["finsight", "user", "add", "--name", "sam"]).unwrap();
    // Adding another user does not steal the session
    assert_eq!(utils::active_user_id(&conn).unwrap(), 1);
}

#[test]
fn switch_changes_active_user() {
    let conn = base_conn();
    run_user(&conn, &["finsight", "user", "add", "--name", "alex"]).unwrap();
    run_user(&conn, &["finsight", "user", "add", "--name", "sam"]).unwrap();
    run_user(&conn, &["finsight", "user", "switch", "--name", "sam"]).unwrap();
    assert_eq!(utils::active_user_id(&conn).unwrap(), 2);
}

#[test]
fn switch_to_unknown_user_errors() {
    let conn = base_conn();
    assert!(run_user(&conn, &["finsight", "user", "switch", "--name", "ghost"]).is_err());
}

#[test]
fn removing_active_user_clears_session() {
    let conn = base_conn();
    run_user(&conn, &["finsight", "user", "add", "--name", "alex"]).unwrap();
    run_user(&conn, &["finsight", "user", "rm", "--name", "alex"]).unwrap();
    assert!(utils::active_user_id(&conn).is_err());
}

#[test]
fn tax_exempt_list_is_overridable() {
    let conn = base_conn();
    assert!(utils::is_tax_exempt(&conn, "Uber Pay").unwrap());
    assert!(!utils::is_tax_exempt(&conn, "Salary").unwrap());

    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "finsight",
        "config",
        "set-tax-exempt",
        "--categories",
        "Scholarship, Gifts",
    ]);
    if let Some(("config", config_m)) = matches.subcommand() {
        config::handle(&conn, config_m).unwrap();
    } else {
        panic!("no config subcommand");
    }

    assert!(utils::is_tax_exempt(&conn, "scholarship").unwrap());
    assert!(!utils::is_tax_exempt(&conn, "Uber Pay").unwrap());
}
