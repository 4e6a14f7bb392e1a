// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{lenient_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = scan(conn)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

/// Issue/detail pairs for every consistency problem in the store.
pub fn scan(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) Income rows whose stored breakdown breaks net = gross - tax (2dp)
    let mut stmt = conn.prepare(
        "SELECT id, gross_pay, total_tax, net_pay FROM transactions
         WHERE type='income' AND gross_pay IS NOT NULL",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let gross = lenient_decimal(&r.get::<_, String>(1)?);
        let tax = r
            .get::<_, Option<String>>(2)?
            .map(|s| lenient_decimal(&s))
            .unwrap_or(Decimal::ZERO);
        let net = r
            .get::<_, Option<String>>(3)?
            .map(|s| lenient_decimal(&s))
            .unwrap_or(Decimal::ZERO);
        if (gross - tax).round_dp(2) != net.round_dp(2) {
            rows.push(vec![
                "tax_breakdown_mismatch".into(),
                format!("tx {}: net {} != gross {} - tax {}", id, net, gross, tax),
            ]);
        }
    }

    // 2) Negative stored amounts
    let mut stmt2 = conn.prepare("SELECT id, amount FROM transactions")?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        let amount = lenient_decimal(&r.get::<_, String>(1)?);
        if amount.is_sign_negative() && !amount.is_zero() {
            rows.push(vec![
                "negative_amount".into(),
                format!("tx {}: {}", id, amount),
            ]);
        }
    }

    // 3) Transactions owned by no registered user
    let mut stmt3 = conn.prepare(
        "SELECT t.id, t.user_id FROM transactions t
         LEFT JOIN users u ON t.user_id=u.id WHERE u.id IS NULL",
    )?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let id: i64 = r.get(0)?;
        let uid: i64 = r.get(1)?;
        rows.push(vec![
            "orphaned_transaction".into(),
            format!("tx {} (user {})", id, uid),
        ]);
    }

    Ok(rows)
}
