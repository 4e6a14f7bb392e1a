// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics;
use crate::commands::transactions::load_for_user;
use crate::utils::{active_user_id, maybe_print_json, parse_month, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");
    let user_id = active_user_id(conn)?;
    let mut txns = load_for_user(conn, user_id)?;
    if let Some(month) = m.get_one::<String>("month") {
        let month = parse_month(month)?;
        txns = analytics::in_month(&txns, &month);
    }
    let items = analytics::insights(&txns);
    if !maybe_print_json(json_flag, jsonl_flag, &items)? {
        let rows: Vec<Vec<String>> = items
            .iter()
            .map(|i| {
                vec![
                    format!("{:?}", i.kind).to_lowercase(),
                    i.title.clone(),
                    i.message.clone(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Kind", "Insight", "Detail"], rows));
    }
    Ok(())
}
