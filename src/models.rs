// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxnKind {
    Income,
    Expense,
}

#[derive(Debug, Error)]
#[error("Invalid transaction type '{0}', expected income|expense")]
pub struct ParseTxnKindError(String);

impl TxnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxnKind::Income => "income",
            TxnKind::Expense => "expense",
        }
    }
}

impl FromStr for TxnKind {
    type Err = ParseTxnKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TxnKind::Income),
            "expense" => Ok(TxnKind::Expense),
            _ => Err(ParseTxnKindError(s.to_string())),
        }
    }
}

impl fmt::Display for TxnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub kind: TxnKind,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: String,
    pub note: Option<String>,
    pub gross_pay: Option<Decimal>,
    pub total_tax: Option<Decimal>,
    pub net_pay: Option<Decimal>,
}

/// Gross/tax/net triple recorded alongside an income transaction.
/// Net is gross minus withheld tax rounded to cents; tax-exempt categories
/// withhold nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaxBreakdown {
    pub gross_pay: Decimal,
    pub total_tax: Decimal,
    pub net_pay: Decimal,
}

impl TaxBreakdown {
    pub fn withheld(gross: Decimal, tax: Decimal) -> Self {
        TaxBreakdown {
            gross_pay: gross,
            total_tax: tax,
            net_pay: (gross - tax).round_dp(2),
        }
    }

    pub fn exempt(gross: Decimal) -> Self {
        TaxBreakdown {
            gross_pay: gross,
            total_tax: Decimal::ZERO,
            net_pay: gross,
        }
    }
}

impl Transaction {
    /// Gross/tax/net this record contributes to the income summary. Rows
    /// recorded before tax capture existed carry no breakdown and count
    /// fully as net income.
    pub fn tax_contribution(&self) -> (Decimal, Decimal, Decimal) {
        match self.gross_pay {
            Some(gross) => (
                gross,
                self.total_tax.unwrap_or(Decimal::ZERO),
                self.net_pay.unwrap_or(self.amount),
            ),
            None => (self.amount, Decimal::ZERO, self.amount),
        }
    }
}
