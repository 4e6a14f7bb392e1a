// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{pretty_table, set_tax_exempt_categories, tax_exempt_categories};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let active: Option<String> = conn
                .query_row(
                    "SELECT value FROM settings WHERE key='active_user'",
                    [],
                    |r| r.get(0),
                )
                .optional()?;
            let exempt = tax_exempt_categories(conn)?;
            let rows = vec![
                vec![
                    "active_user".to_string(),
                    active.unwrap_or_else(|| "(none)".to_string()),
                ],
                vec!["tax_exempt_categories".to_string(), exempt.join(", ")],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        Some(("set-tax-exempt", sub)) => {
            let list = sub.get_one::<String>("categories").unwrap();
            set_tax_exempt_categories(conn, list)?;
            println!("Tax-exempt categories set to: {}", list);
        }
        _ => {}
    }
    Ok(())
}
