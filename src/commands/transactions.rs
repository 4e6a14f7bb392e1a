// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{TaxBreakdown, Transaction, TxnKind};
use crate::utils::{
    active_user_id, is_tax_exempt, lenient_decimal, maybe_print_json, parse_date, parse_decimal,
    pretty_table,
};
use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Breakdown recorded alongside an income amount. Tax-exempt categories
/// withhold nothing; without a stated tax the row carries no breakdown,
/// matching records that predate tax capture.
fn income_breakdown(
    conn: &Connection,
    category: &str,
    amount: Decimal,
    tax: Option<Decimal>,
) -> Result<Option<TaxBreakdown>> {
    if is_tax_exempt(conn, category)? {
        return Ok(Some(TaxBreakdown::exempt(amount)));
    }
    Ok(tax.map(|t| TaxBreakdown::withheld(amount, t)))
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = active_user_id(conn)?;
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let kind: TxnKind = sub.get_one::<String>("type").unwrap().parse()?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    let note = sub.get_one::<String>("note").map(|s| s.to_string());
    let tax = sub
        .get_one::<String>("tax")
        .map(|s| parse_decimal(s))
        .transpose()?;

    if amount.is_sign_negative() {
        return Err(anyhow!("Amount must be non-negative, got {}", amount));
    }
    if kind == TxnKind::Expense && tax.is_some() {
        return Err(anyhow!("--tax applies only to income transactions"));
    }

    let breakdown = match kind {
        TxnKind::Income => income_breakdown(conn, &category, amount, tax)?,
        TxnKind::Expense => None,
    };

    conn.execute(
        "INSERT INTO transactions(user_id, type, date, amount, category, note, gross_pay, total_tax, net_pay)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            user_id,
            kind.as_str(),
            date.to_string(),
            amount.to_string(),
            category,
            note,
            breakdown.map(|b| b.gross_pay.to_string()),
            breakdown.map(|b| b.total_tax.to_string()),
            breakdown.map(|b| b.net_pay.to_string()),
        ],
    )?;
    match breakdown {
        Some(b) => println!(
            "Recorded {} {} on {} ({}), net {}",
            kind, amount, date, category, b.net_pay
        ),
        None => println!("Recorded {} {} on {} ({})", kind, amount, date, category),
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.kind.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.note.clone(),
                    r.net_pay.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Type", "Amount", "Category", "Note", "Net"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub kind: String,
    pub amount: String,
    pub category: String,
    pub note: String,
    pub net_pay: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let user_id = active_user_id(conn)?;
    let mut sql = String::from(
        "SELECT id, date, type, amount, category, note, net_pay FROM transactions WHERE user_id=?",
    );
    let mut params_vec: Vec<String> = vec![user_id.to_string()];

    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(date,1,7)=?");
        params_vec.push(month.into());
    }
    if let Some(kind) = sub.get_one::<String>("type") {
        let kind: TxnKind = kind.parse()?;
        sql.push_str(" AND type=?");
        params_vec.push(kind.as_str().into());
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        sql.push_str(" AND category=?");
        params_vec.push(cat.into());
    }
    sql.push_str(" ORDER BY date DESC, id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::ToSql> = params_vec
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let mut rows = stmt.query(rusqlite::params_from_iter(params))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let date: String = r.get(1)?;
        let kind: String = r.get(2)?;
        let amount: String = r.get(3)?;
        let category: String = r.get(4)?;
        let note: Option<String> = r.get(5)?;
        let net_pay: Option<String> = r.get(6)?;
        data.push(TransactionRow {
            id,
            date,
            kind,
            amount,
            category,
            note: note.unwrap_or_default(),
            net_pay: net_pay.unwrap_or_default(),
        });
    }
    Ok(data)
}

/// Full transaction slice for one user, newest first. Feeds the aggregator;
/// malformed stored amounts load as zero so aggregation never fails on
/// bad data.
pub fn load_for_user(conn: &Connection, user_id: i64) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, type, date, amount, category, note, gross_pay, total_tax, net_pay
         FROM transactions WHERE user_id=?1 ORDER BY date DESC, id DESC",
    )?;
    let mut rows = stmt.query(params![user_id])?;

    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let uid: i64 = r.get(1)?;
        let kind_s: String = r.get(2)?;
        let date_s: String = r.get(3)?;
        let amount_s: String = r.get(4)?;
        let category: String = r.get(5)?;
        let note: Option<String> = r.get(6)?;
        let gross_s: Option<String> = r.get(7)?;
        let tax_s: Option<String> = r.get(8)?;
        let net_s: Option<String> = r.get(9)?;

        let kind: TxnKind = kind_s
            .parse()
            .with_context(|| format!("Transaction {} has unknown type", id))?;
        let date = parse_date(&date_s)
            .with_context(|| format!("Transaction {} has invalid date", id))?;
        out.push(Transaction {
            id,
            user_id: uid,
            kind,
            date,
            amount: lenient_decimal(&amount_s),
            category,
            note,
            gross_pay: gross_s.and_then(|s| s.parse().ok()),
            total_tax: tax_s.and_then(|s| s.parse().ok()),
            net_pay: net_s.and_then(|s| s.parse().ok()),
        });
    }
    Ok(out)
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = active_user_id(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();

    let txns = load_for_user(conn, user_id)?;
    let existing = txns
        .into_iter()
        .find(|t| t.id == id)
        .with_context(|| format!("Transaction {} not found", id))?;

    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => existing.date,
    };
    let amount = match sub.get_one::<String>("amount") {
        Some(s) => parse_decimal(s)?,
        None => existing.amount,
    };
    if amount.is_sign_negative() {
        return Err(anyhow!("Amount must be non-negative, got {}", amount));
    }
    let category = sub
        .get_one::<String>("category")
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| existing.category.clone());
    let note = sub
        .get_one::<String>("note")
        .map(|s| s.to_string())
        .or_else(|| existing.note.clone());
    let tax = sub
        .get_one::<String>("tax")
        .map(|s| parse_decimal(s))
        .transpose()?;

    if existing.kind == TxnKind::Expense && tax.is_some() {
        return Err(anyhow!("--tax applies only to income transactions"));
    }

    // Re-derive the breakdown whenever amount, category or tax changed so
    // the stored net stays gross - tax.
    let breakdown = match existing.kind {
        TxnKind::Income => {
            let effective_tax = tax.or(existing.total_tax);
            income_breakdown(conn, &category, amount, effective_tax)?
        }
        TxnKind::Expense => None,
    };

    conn.execute(
        "UPDATE transactions SET date=?1, amount=?2, category=?3, note=?4,
         gross_pay=?5, total_tax=?6, net_pay=?7 WHERE id=?8 AND user_id=?9",
        params![
            date.to_string(),
            amount.to_string(),
            category,
            note,
            breakdown.map(|b| b.gross_pay.to_string()),
            breakdown.map(|b| b.total_tax.to_string()),
            breakdown.map(|b| b.net_pay.to_string()),
            id,
            user_id,
        ],
    )?;
    println!("Updated transaction {}", id);
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = active_user_id(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let removed = conn.execute(
        "DELETE FROM transactions WHERE id=?1 AND user_id=?2",
        params![id, user_id],
    )?;
    if removed == 0 {
        return Err(anyhow!("Transaction {} not found", id));
    }
    println!("Deleted transaction {}", id);
    Ok(())
}
