// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Transaction, TxnKind};
use chrono::{Datelike, Weekday};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct MonthBucket {
    pub key: String, // YYYY-MM
    pub label: String,
    pub income: Decimal,
    pub expense: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct YearBucket {
    pub year: i32,
    pub income: Decimal,
    pub expense: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayBucket {
    pub date: String, // YYYY-MM-DD
    pub income: Decimal,
    pub expense: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekdaySpend {
    pub weekday: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct SavingsPoint {
    pub key: String, // YYYY-MM
    pub label: String,
    pub savings: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaxSummary {
    pub gross_pay: Decimal,
    pub total_tax: Decimal,
    pub net_pay: Decimal,
    pub tax_pct: Decimal,
    pub net_pct: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Warning,
    Success,
    Info,
}

#[derive(Debug, Clone, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
}

/// `part / whole * 100`, zero when the denominator is zero.
fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        part / whole * Decimal::ONE_HUNDRED
    }
}

pub fn sum_by_kind(txns: &[Transaction], kind: TxnKind) -> Decimal {
    txns.iter()
        .filter(|t| t.kind == kind)
        .map(|t| t.amount)
        .sum()
}

pub fn net_savings(txns: &[Transaction]) -> Decimal {
    sum_by_kind(txns, TxnKind::Income) - sum_by_kind(txns, TxnKind::Expense)
}

/// `(income - expense) / income * 100`, zero when there is no income.
pub fn savings_rate(income: Decimal, expense: Decimal) -> Decimal {
    percent_of(income - expense, income)
}

/// Percent change between two period sums. Zero when the previous period
/// is zero; the saturation keeps the value total rather than mathematically
/// faithful.
pub fn trend_delta(current: Decimal, previous: Decimal) -> Decimal {
    percent_of(current - previous, previous)
}

/// Income/expense totals per calendar month, in first-seen order. Callers
/// that need chronology sort by `key` before presenting.
pub fn by_month(txns: &[Transaction]) -> Vec<MonthBucket> {
    let mut buckets: Vec<MonthBucket> = Vec::new();
    for t in txns {
        let key = t.date.format("%Y-%m").to_string();
        let idx = buckets.iter().position(|b| b.key == key).unwrap_or_else(|| {
            buckets.push(MonthBucket {
                key,
                label: t.date.format("%b %Y").to_string(),
                income: Decimal::ZERO,
                expense: Decimal::ZERO,
            });
            buckets.len() - 1
        });
        match t.kind {
            TxnKind::Income => buckets[idx].income += t.amount,
            TxnKind::Expense => buckets[idx].expense += t.amount,
        }
    }
    buckets
}

/// Income/expense totals per calendar year, ascending.
pub fn by_year(txns: &[Transaction]) -> Vec<YearBucket> {
    let mut buckets: Vec<YearBucket> = Vec::new();
    for t in txns {
        let year = t.date.year();
        let idx = buckets.iter().position(|b| b.year == year).unwrap_or_else(|| {
            buckets.push(YearBucket {
                year,
                income: Decimal::ZERO,
                expense: Decimal::ZERO,
            });
            buckets.len() - 1
        });
        match t.kind {
            TxnKind::Income => buckets[idx].income += t.amount,
            TxnKind::Expense => buckets[idx].expense += t.amount,
        }
    }
    buckets.sort_by_key(|b| b.year);
    buckets
}

/// Income/expense totals per calendar date, in first-seen order.
pub fn by_day(txns: &[Transaction]) -> Vec<DayBucket> {
    let mut buckets: Vec<DayBucket> = Vec::new();
    for t in txns {
        let date = t.date.format("%Y-%m-%d").to_string();
        let idx = buckets
            .iter()
            .position(|b| b.date == date)
            .unwrap_or_else(|| {
                buckets.push(DayBucket {
                    date,
                    income: Decimal::ZERO,
                    expense: Decimal::ZERO,
                });
                buckets.len() - 1
            });
        match t.kind {
            TxnKind::Income => buckets[idx].income += t.amount,
            TxnKind::Expense => buckets[idx].expense += t.amount,
        }
    }
    buckets
}

/// Expense totals per category, largest first. Caller truncates to top-N.
pub fn spending_by_category(txns: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for t in txns.iter().filter(|t| t.kind == TxnKind::Expense) {
        match totals.iter_mut().find(|c| c.category == t.category) {
            Some(c) => c.amount += t.amount,
            None => totals.push(CategoryTotal {
                category: t.category.clone(),
                amount: t.amount,
            }),
        }
    }
    totals.sort_by(|a, b| b.amount.cmp(&a.amount));
    totals
}

fn weekday_label(w: Weekday) -> &'static str {
    match w {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Expense totals per weekday, always seven entries Mon..Sun.
pub fn spending_by_weekday(txns: &[Transaction]) -> Vec<WeekdaySpend> {
    let mut spend = [Decimal::ZERO; 7];
    for t in txns.iter().filter(|t| t.kind == TxnKind::Expense) {
        spend[t.date.weekday().num_days_from_monday() as usize] += t.amount;
    }
    [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ]
    .iter()
    .map(|w| WeekdaySpend {
        weekday: weekday_label(*w).to_string(),
        amount: spend[w.num_days_from_monday() as usize],
    })
    .collect()
}

/// Monthly `income - expense`, chronological.
pub fn savings_series(txns: &[Transaction]) -> Vec<SavingsPoint> {
    let mut buckets = by_month(txns);
    buckets.sort_by(|a, b| a.key.cmp(&b.key));
    buckets
        .into_iter()
        .map(|b| SavingsPoint {
            key: b.key,
            label: b.label,
            savings: b.income - b.expense,
        })
        .collect()
}

/// Gross/tax/net totals over income transactions. Rows without a recorded
/// breakdown count fully as net income with zero tax.
pub fn tax_summary(txns: &[Transaction]) -> TaxSummary {
    let mut gross = Decimal::ZERO;
    let mut tax = Decimal::ZERO;
    let mut net = Decimal::ZERO;
    for t in txns.iter().filter(|t| t.kind == TxnKind::Income) {
        let (g, x, n) = t.tax_contribution();
        gross += g;
        tax += x;
        net += n;
    }
    TaxSummary {
        gross_pay: gross.round_dp(2),
        total_tax: tax.round_dp(2),
        net_pay: net.round_dp(2),
        tax_pct: percent_of(tax, gross),
        net_pct: percent_of(net, gross),
    }
}

/// Expense total divided by expense count, zero for an empty list.
pub fn average_expense(txns: &[Transaction]) -> Decimal {
    let expenses: Vec<&Transaction> = txns.iter().filter(|t| t.kind == TxnKind::Expense).collect();
    if expenses.is_empty() {
        return Decimal::ZERO;
    }
    let total: Decimal = expenses.iter().map(|t| t.amount).sum();
    (total / Decimal::from(expenses.len())).round_dp(2)
}

/// Transactions whose date falls in the given YYYY-MM period.
pub fn in_month(txns: &[Transaction], month: &str) -> Vec<Transaction> {
    txns.iter()
        .filter(|t| t.date.format("%Y-%m").to_string() == month)
        .cloned()
        .collect()
}

/// Qualitative observations derived from the aggregates. Pure text; the
/// kind ranks severity for display.
pub fn insights(txns: &[Transaction]) -> Vec<Insight> {
    let mut out = Vec::new();

    let total_income = sum_by_kind(txns, TxnKind::Income);
    let total_expense = sum_by_kind(txns, TxnKind::Expense);
    let categories = spending_by_category(txns);

    if let Some(top) = categories.first() {
        let pct = percent_of(top.amount, total_expense).round_dp(0);
        out.push(Insight {
            kind: InsightKind::Warning,
            title: "Highest Spending Area".to_string(),
            message: format!(
                "{} accounts for {}% of your expenses ({}). Consider ways to reduce this category.",
                top.category,
                pct,
                top.amount.round_dp(2)
            ),
        });
    }

    if !total_income.is_zero() {
        let rate = savings_rate(total_income, total_expense).round_dp(1);
        if rate < Decimal::TEN {
            out.push(Insight {
                kind: InsightKind::Warning,
                title: "Low Savings Rate".to_string(),
                message: format!(
                    "Your savings rate is {}%. Financial experts recommend saving at least 20% of your income. Try cutting discretionary spending.",
                    rate
                ),
            });
        } else if rate > Decimal::from(30) {
            out.push(Insight {
                kind: InsightKind::Success,
                title: "Excellent Savings!".to_string(),
                message: format!(
                    "You're saving {}% of your income! You're on track for strong financial health. Keep it up!",
                    rate
                ),
            });
        }
    }

    if categories.len() >= 3 {
        let top3: Decimal = categories.iter().take(3).map(|c| c.amount).sum();
        let names: Vec<&str> = categories
            .iter()
            .take(3)
            .map(|c| c.category.as_str())
            .collect();
        out.push(Insight {
            kind: InsightKind::Info,
            title: "Spending Concentration".to_string(),
            message: format!(
                "Your top 3 categories ({}) represent {}% of total spending.",
                names.join(", "),
                percent_of(top3, total_expense).round_dp(0)
            ),
        });
    }

    let avg_daily = (total_expense / Decimal::from(30)).round_dp(2);
    let suggested = (avg_daily * Decimal::new(8, 1)).round_dp(2);
    out.push(Insight {
        kind: InsightKind::Info,
        title: "Daily Budget Suggestion".to_string(),
        message: format!(
            "Your average daily spending is {}. Try setting a daily budget of {} to reduce expenses by 20%.",
            avg_daily, suggested
        ),
    });

    out
}
