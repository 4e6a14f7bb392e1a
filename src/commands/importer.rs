// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{TaxBreakdown, TxnKind};
use crate::utils::{active_user_id, lenient_decimal, parse_date};
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => import_transactions(conn, sub),
        _ => Ok(()),
    }
}

// Columns: date,type,amount,category,note,gross_pay,total_tax,net_pay
// The tax columns are optional and only honored on income rows.
fn import_transactions(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let user_id = active_user_id(conn)?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let tx = conn.transaction()?;
    let mut count = 0usize;
    for result in rdr.records() {
        let rec = result?;
        let date_raw = rec.get(0).context("date missing")?.trim();
        let kind_raw = rec.get(1).context("type missing")?.trim();
        let amount_raw = rec.get(2).context("amount missing")?.trim();
        let category = rec.get(3).context("category missing")?.trim().to_string();
        let note = rec
            .get(4)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        let date = parse_date(date_raw)
            .with_context(|| format!("Invalid transaction date '{}'", date_raw))?;
        let kind: TxnKind = kind_raw.parse()?;
        // Amount text follows the store's lenient policy: malformed cells
        // load as zero instead of aborting the file.
        let amount = lenient_decimal(amount_raw);

        let breakdown = if kind == TxnKind::Income {
            let gross: Option<Decimal> = rec.get(5).and_then(|s| s.trim().parse().ok());
            gross.map(|g| {
                let tax = rec
                    .get(6)
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(Decimal::ZERO);
                match rec.get(7).and_then(|s| s.trim().parse::<Decimal>().ok()) {
                    Some(net) => TaxBreakdown {
                        gross_pay: g,
                        total_tax: tax,
                        net_pay: net,
                    },
                    None => TaxBreakdown::withheld(g, tax),
                }
            })
        } else {
            None
        };

        tx.execute(
            "INSERT INTO transactions(user_id, type, date, amount, category, note, gross_pay, total_tax, net_pay)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
            params![
                user_id,
                kind.as_str(),
                date.to_string(),
                amount.to_string(),
                category,
                note.as_deref(),
                breakdown.map(|b| b.gross_pay.to_string()),
                breakdown.map(|b| b.total_tax.to_string()),
                breakdown.map(|b| b.net_pay.to_string()),
            ],
        )?;
        count += 1;
    }
    tx.commit()?;
    println!("Imported {} transactions from {}", count, path);
    Ok(())
}
