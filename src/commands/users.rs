// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{id_for_user, pretty_table, set_active_user};
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let email = sub.get_one::<String>("email").map(|s| s.to_string());
            conn.execute(
                "INSERT INTO users(name, email) VALUES (?1, ?2)",
                params![name, email],
            )?;
            let active: Option<String> = conn
                .query_row(
                    "SELECT value FROM settings WHERE key='active_user'",
                    [],
                    |r| r.get(0),
                )
                .optional()?;
            if active.is_none() {
                set_active_user(conn, name)?;
                println!("Added user '{}' (now active)", name);
            } else {
                println!("Added user '{}'", name);
            }
        }
        Some(("list", _)) => {
            let active: Option<String> = conn
                .query_row(
                    "SELECT value FROM settings WHERE key='active_user'",
                    [],
                    |r| r.get(0),
                )
                .optional()?;
            let mut stmt =
                conn.prepare("SELECT name, email, created_at FROM users ORDER BY name")?;
            let rows = stmt.query_map([], |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, Option<String>>(1)?,
                    r.get::<_, String>(2)?,
                ))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (n, e, cr) = row?;
                let mark = if active.as_deref() == Some(n.as_str()) {
                    "*".to_string()
                } else {
                    String::new()
                };
                data.push(vec![n, e.unwrap_or_default(), cr, mark]);
            }
            println!(
                "{}",
                pretty_table(&["Name", "Email", "Created", "Active"], data)
            );
        }
        Some(("switch", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            id_for_user(conn, name)?;
            set_active_user(conn, name)?;
            println!("Active user is now '{}'", name);
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let removed = conn.execute("DELETE FROM users WHERE name=?1", params![name])?;
            if removed == 0 {
                println!("No user named '{}'", name);
            } else {
                conn.execute(
                    "DELETE FROM settings WHERE key='active_user' AND value=?1",
                    params![name],
                )?;
                println!("Removed user '{}' and their transactions", name);
            }
        }
        _ => {}
    }
    Ok(())
}
