// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics;
use crate::commands::transactions::load_for_user;
use crate::models::{Transaction, TxnKind};
use crate::utils::{active_user_id, maybe_print_json, parse_month, pretty_table, previous_month};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("monthly", sub)) => monthly(conn, sub)?,
        Some(("yearly", sub)) => yearly(conn, sub)?,
        Some(("daily", sub)) => daily(conn, sub)?,
        Some(("categories", sub)) => categories(conn, sub)?,
        Some(("savings", sub)) => savings(conn, sub)?,
        Some(("taxes", sub)) => taxes(conn, sub)?,
        Some(("weekdays", sub)) => weekdays(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn load_all(conn: &Connection) -> Result<Vec<Transaction>> {
    let user_id = active_user_id(conn)?;
    load_for_user(conn, user_id)
}

#[derive(Serialize)]
struct Summary {
    period: String,
    income: Decimal,
    expense: Decimal,
    savings: Decimal,
    savings_rate_pct: Decimal,
    avg_expense: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    income_trend_pct: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expense_trend_pct: Option<Decimal>,
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let txns = load_all(conn)?;

    let s = if let Some(month) = sub.get_one::<String>("month") {
        let month = parse_month(month)?;
        let cur = analytics::in_month(&txns, &month);
        let prev = analytics::in_month(&txns, &previous_month(&month)?);
        let income = analytics::sum_by_kind(&cur, TxnKind::Income);
        let expense = analytics::sum_by_kind(&cur, TxnKind::Expense);
        let prev_income = analytics::sum_by_kind(&prev, TxnKind::Income);
        let prev_expense = analytics::sum_by_kind(&prev, TxnKind::Expense);
        Summary {
            period: month,
            income,
            expense,
            savings: income - expense,
            savings_rate_pct: analytics::savings_rate(income, expense).round_dp(1),
            avg_expense: analytics::average_expense(&cur),
            income_trend_pct: Some(analytics::trend_delta(income, prev_income).round_dp(1)),
            expense_trend_pct: Some(analytics::trend_delta(expense, prev_expense).round_dp(1)),
        }
    } else {
        let income = analytics::sum_by_kind(&txns, TxnKind::Income);
        let expense = analytics::sum_by_kind(&txns, TxnKind::Expense);
        Summary {
            period: "all".to_string(),
            income,
            expense,
            savings: income - expense,
            savings_rate_pct: analytics::savings_rate(income, expense).round_dp(1),
            avg_expense: analytics::average_expense(&txns),
            income_trend_pct: None,
            expense_trend_pct: None,
        }
    };

    if !maybe_print_json(json_flag, jsonl_flag, &s)? {
        let mut rows = vec![
            vec!["Period".to_string(), s.period.clone()],
            vec!["Income".to_string(), format!("{:.2}", s.income)],
            vec!["Expense".to_string(), format!("{:.2}", s.expense)],
            vec!["Savings".to_string(), format!("{:.2}", s.savings)],
            vec![
                "Savings rate".to_string(),
                format!("{}%", s.savings_rate_pct),
            ],
            vec!["Avg expense".to_string(), format!("{:.2}", s.avg_expense)],
        ];
        if let Some(t) = s.income_trend_pct {
            rows.push(vec!["Income vs prev month".to_string(), format!("{}%", t)]);
        }
        if let Some(t) = s.expense_trend_pct {
            rows.push(vec!["Expense vs prev month".to_string(), format!("{}%", t)]);
        }
        println!("{}", pretty_table(&["Metric", "Value"], rows));
    }
    Ok(())
}

fn monthly(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let txns = load_all(conn)?;
    let mut buckets = analytics::by_month(&txns);
    buckets.sort_by(|a, b| a.key.cmp(&b.key));
    if !maybe_print_json(json_flag, jsonl_flag, &buckets)? {
        let rows: Vec<Vec<String>> = buckets
            .iter()
            .map(|b| {
                vec![
                    b.label.clone(),
                    format!("{:.2}", b.income),
                    format!("{:.2}", b.expense),
                    format!("{:.2}", b.income - b.expense),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Savings"], rows)
        );
    }
    Ok(())
}

fn yearly(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let txns = load_all(conn)?;
    let buckets = analytics::by_year(&txns);
    if !maybe_print_json(json_flag, jsonl_flag, &buckets)? {
        let rows: Vec<Vec<String>> = buckets
            .iter()
            .map(|b| {
                vec![
                    b.year.to_string(),
                    format!("{:.2}", b.income),
                    format!("{:.2}", b.expense),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Year", "Income", "Expense"], rows));
    }
    Ok(())
}

fn daily(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut txns = load_all(conn)?;
    if let Some(month) = sub.get_one::<String>("month") {
        let month = parse_month(month)?;
        txns = analytics::in_month(&txns, &month);
    }
    let mut buckets = analytics::by_day(&txns);
    buckets.sort_by(|a, b| a.date.cmp(&b.date));
    if !maybe_print_json(json_flag, jsonl_flag, &buckets)? {
        let rows: Vec<Vec<String>> = buckets
            .iter()
            .map(|b| {
                vec![
                    b.date.clone(),
                    format!("{:.2}", b.income),
                    format!("{:.2}", b.expense),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Date", "Income", "Expense"], rows));
    }
    Ok(())
}

#[derive(Serialize)]
struct CategoryRow {
    category: String,
    amount: Decimal,
    share_pct: Decimal,
}

fn categories(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut txns = load_all(conn)?;
    if let Some(month) = sub.get_one::<String>("month") {
        let month = parse_month(month)?;
        txns = analytics::in_month(&txns, &month);
    }
    let totals = analytics::spending_by_category(&txns);
    let overall: Decimal = totals.iter().map(|c| c.amount).sum();
    let mut data: Vec<CategoryRow> = totals
        .into_iter()
        .map(|c| CategoryRow {
            share_pct: if overall.is_zero() {
                Decimal::ZERO
            } else {
                (c.amount / overall * Decimal::ONE_HUNDRED).round_dp(1)
            },
            category: c.category,
            amount: c.amount,
        })
        .collect();
    if let Some(top) = sub.get_one::<usize>("top") {
        data.truncate(*top);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|c| {
                vec![
                    c.category.clone(),
                    format!("{:.2}", c.amount),
                    format!("{}%", c.share_pct),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Spent", "Share"], rows));
    }
    Ok(())
}

fn savings(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let txns = load_all(conn)?;
    let series = analytics::savings_series(&txns);
    if !maybe_print_json(json_flag, jsonl_flag, &series)? {
        let rows: Vec<Vec<String>> = series
            .iter()
            .map(|p| vec![p.label.clone(), format!("{:.2}", p.savings)])
            .collect();
        println!("{}", pretty_table(&["Month", "Savings"], rows));
    }
    Ok(())
}

fn taxes(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let txns = load_all(conn)?;
    let s = analytics::tax_summary(&txns);
    if !maybe_print_json(json_flag, jsonl_flag, &s)? {
        let rows = vec![
            vec!["Gross pay".to_string(), format!("{:.2}", s.gross_pay)],
            vec!["Total tax".to_string(), format!("{:.2}", s.total_tax)],
            vec!["Net pay".to_string(), format!("{:.2}", s.net_pay)],
            vec!["Tax share".to_string(), format!("{}%", s.tax_pct.round_dp(1))],
            vec!["Net share".to_string(), format!("{}%", s.net_pct.round_dp(1))],
        ];
        println!("{}", pretty_table(&["Metric", "Value"], rows));
    }
    Ok(())
}

fn weekdays(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let txns = load_all(conn)?;
    let spend = analytics::spending_by_weekday(&txns);
    if !maybe_print_json(json_flag, jsonl_flag, &spend)? {
        let rows: Vec<Vec<String>> = spend
            .iter()
            .map(|w| vec![w.weekday.clone(), format!("{:.2}", w.amount)])
            .collect();
        println!("{}", pretty_table(&["Weekday", "Spent"], rows));
    }
    Ok(())
}
