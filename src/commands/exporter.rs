// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics;
use crate::commands::transactions::load_for_user;
use crate::models::{TxnKind, User};
use crate::utils::active_user_id;
use anyhow::{anyhow, Result};
use rusqlite::{params, Connection};
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }

    let user_id = active_user_id(conn)?;
    let user: User = conn.query_row(
        "SELECT id, name, email FROM users WHERE id=?1",
        params![user_id],
        |r| {
            Ok(User {
                id: r.get(0)?,
                name: r.get(1)?,
                email: r.get(2)?,
            })
        },
    )?;
    let txns = load_for_user(conn, user_id)?;
    let count = txns.len();

    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record([
            "date",
            "type",
            "amount",
            "category",
            "note",
            "gross_pay",
            "total_tax",
            "net_pay",
        ])?;
        for t in &txns {
            wtr.write_record([
                t.date.to_string(),
                t.kind.to_string(),
                t.amount.to_string(),
                t.category.clone(),
                t.note.clone().unwrap_or_default(),
                t.gross_pay.map(|d| d.to_string()).unwrap_or_default(),
                t.total_tax.map(|d| d.to_string()).unwrap_or_default(),
                t.net_pay.map(|d| d.to_string()).unwrap_or_default(),
            ])?;
        }
        wtr.flush()?;
    } else {
        // Document shape: who exported, the raw records, and the headline
        // totals alongside them.
        let total_income = analytics::sum_by_kind(&txns, TxnKind::Income);
        let total_expense = analytics::sum_by_kind(&txns, TxnKind::Expense);
        let doc = json!({
            "export_date": chrono::Utc::now().to_rfc3339(),
            "user": user,
            "transactions": txns,
            "summary": {
                "total_transactions": count,
                "total_income": total_income,
                "total_expense": total_expense,
            },
        });
        std::fs::write(out, serde_json::to_string_pretty(&doc)?)?;
    }
    println!("Exported {} transactions to {}", count, out);
    Ok(())
}
