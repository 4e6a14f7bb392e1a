// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<String> {
    chrono::NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok(s.to_string())
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Permissive numeric read for stored/imported amount text. Malformed or
/// empty input contributes zero instead of failing the whole read.
pub fn lenient_decimal(s: &str) -> Decimal {
    s.trim().parse::<Decimal>().unwrap_or(Decimal::ZERO)
}

/// YYYY-MM key of the month immediately before `month`.
pub fn previous_month(month: &str) -> Result<String> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", month))?;
    let prev = first - chrono::Days::new(1);
    Ok(prev.format("%Y-%m").to_string())
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

pub fn id_for_user(conn: &Connection, name: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM users WHERE name=?1")?;
    let id: i64 = stmt
        .query_row(params![name], |r| r.get(0))
        .with_context(|| format!("User '{}' not found", name))?;
    Ok(id)
}

// Active-user session setting
pub fn active_user_id(conn: &Connection) -> Result<i64> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key='active_user'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    let name = v.context("No active user; run 'finsight user switch --name <name>'")?;
    id_for_user(conn, &name)
}

pub fn set_active_user(conn: &Connection, name: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('active_user', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![name],
    )?;
    Ok(())
}

/// Income categories that withhold no tax. Stored as a comma-separated
/// settings value; defaults to the gig-pay category the data started with.
pub fn tax_exempt_categories(conn: &Connection) -> Result<Vec<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key='tax_exempt_categories'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    let raw = v.unwrap_or_else(|| "Uber Pay".to_string());
    Ok(raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

pub fn set_tax_exempt_categories(conn: &Connection, list: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('tax_exempt_categories', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![list],
    )?;
    Ok(())
}

pub fn is_tax_exempt(conn: &Connection, category: &str) -> Result<bool> {
    let list = tax_exempt_categories(conn)?;
    Ok(list.iter().any(|c| c.eq_ignore_ascii_case(category)))
}
