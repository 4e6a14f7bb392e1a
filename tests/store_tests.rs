// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use finsight::analytics;
use finsight::commands::{doctor, transactions};
use finsight::models::TxnKind;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
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
    conn
}

#[test]
fn malformed_amount_loads_as_zero() {
    let conn = setup();
    conn.execute(
        "INSERT INTO transactions(user_id,type,date,amount,category) VALUES (1,'expense','2025-01-01','garbage','Food')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO transactions(user_id,type,date,amount,category) VALUES (1,'expense','2025-01-02','12.50','Food')",
        [],
    )
    .unwrap();

    let txns = transactions::load_for_user(&conn, 1).unwrap();
    assert_eq!(txns.len(), 2);
    assert_eq!(
        analytics::sum_by_kind(&txns, TxnKind::Expense),
        "12.50".parse::<Decimal>().unwrap()
    );
}

#[test]
fn load_orders_newest_first() {
    let conn = setup();
    for date in ["2025-01-05", "2025-01-20", "2025-01-10"] {
        conn.execute(
            "INSERT INTO transactions(user_id,type,date,amount,category) VALUES (1,'income',?1,'10','Gig')",
            [date],
        )
        .unwrap();
    }
    let txns = transactions::load_for_user(&conn, 1).unwrap();
    let dates: Vec<String> = txns.iter().map(|t| t.date.to_string()).collect();
    assert_eq!(dates, vec!["2025-01-20", "2025-01-10", "2025-01-05"]);
}

#[test]
fn doctor_passes_on_consistent_data() {
    let conn = setup();
    conn.execute(
        "INSERT INTO transactions(user_id,type,date,amount,category,gross_pay,total_tax,net_pay)
         VALUES (1,'income','2025-01-01','3000.00','Salary','3000.00','600.00','2400.00')",
        [],
    )
    .unwrap();
    assert!(doctor::scan(&conn).unwrap().is_empty());
}

#[test]
fn doctor_flags_tax_breakdown_mismatch() {
    let conn = setup();
    conn.execute(
        "INSERT INTO transactions(user_id,type,date,amount,category,gross_pay,total_tax,net_pay)
         VALUES (1,'income','2025-01-01','3000.00','Salary','3000.00','600.00','2500.00')",
        [],
    )
    .unwrap();
    let issues = doctor::scan(&conn).unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0][0], "tax_breakdown_mismatch");
}

#[test]
fn doctor_flags_negative_amounts_and_orphans() {
    let conn = setup();
    conn.execute(
        "INSERT INTO transactions(user_id,type,date,amount,category) VALUES (1,'expense','2025-01-01','-5','Food')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO transactions(user_id,type,date,amount,category) VALUES (99,'expense','2025-01-02','5','Food')",
        [],
    )
    .unwrap();
    let issues = doctor::scan(&conn).unwrap();
    let kinds: Vec<&str> = issues.iter().map(|i| i[0].as_str()).collect();
    assert!(kinds.contains(&"negative_amount"));
    assert!(kinds.contains(&"orphaned_transaction"));
}
