// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn output_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON instead of a table"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .value_name("YYYY-MM")
        .help("Restrict to a calendar month")
}

pub fn build_cli() -> Command {
    Command::new("finsight")
        .about("Personal income/expense tracking with tax-adjusted income and spending insights")
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Initialize the local database"))
        .subcommand(
            Command::new("user")
                .about("Manage local users and the active-user session")
                .subcommand(
                    Command::new("add")
                        .about("Register a user")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("email").long("email")),
                )
                .subcommand(Command::new("list").about("List registered users"))
                .subcommand(
                    Command::new("switch")
                        .about("Make a user the active user")
                        .arg(Arg::new("name").long("name").required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Remove a user and all of their transactions")
                        .arg(Arg::new("name").long("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and inspect transactions for the active user")
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction")
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .value_name("YYYY-MM-DD")
                                .required(true),
                        )
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_name("income|expense")
                                .required(true),
                        )
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("note").long("note"))
                        .arg(
                            Arg::new("tax")
                                .long("tax")
                                .value_name("AMOUNT")
                                .help("Tax withheld per the pay stub (income only)"),
                        ),
                )
                .subcommand(
                    output_flags(
                        Command::new("list")
                            .about("List transactions")
                            .arg(month_arg())
                            .arg(Arg::new("type").long("type").value_name("income|expense"))
                            .arg(Arg::new("category").long("category"))
                            .arg(
                                Arg::new("limit")
                                    .long("limit")
                                    .value_parser(value_parser!(usize)),
                            ),
                    ),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Update fields of a transaction")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("date").long("date").value_name("YYYY-MM-DD"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("note").long("note"))
                        .arg(Arg::new("tax").long("tax").value_name("AMOUNT")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        ),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Aggregated views over the active user's transactions")
                .subcommand(output_flags(
                    Command::new("summary")
                        .about("Income, expense, savings and trend vs the previous month")
                        .arg(month_arg()),
                ))
                .subcommand(output_flags(
                    Command::new("monthly").about("Income/expense totals per month"),
                ))
                .subcommand(output_flags(
                    Command::new("yearly").about("Income/expense totals per year"),
                ))
                .subcommand(output_flags(
                    Command::new("daily")
                        .about("Income/expense totals per day")
                        .arg(month_arg()),
                ))
                .subcommand(output_flags(
                    Command::new("categories")
                        .about("Expense breakdown by category, largest first")
                        .arg(month_arg())
                        .arg(
                            Arg::new("top")
                                .long("top")
                                .value_parser(value_parser!(usize))
                                .help("Keep only the N largest categories"),
                        ),
                ))
                .subcommand(output_flags(
                    Command::new("savings").about("Monthly savings series"),
                ))
                .subcommand(output_flags(
                    Command::new("taxes").about("Gross/tax/net income summary"),
                ))
                .subcommand(output_flags(
                    Command::new("weekdays").about("Expense totals per weekday"),
                )),
        )
        .subcommand(output_flags(
            Command::new("insights")
                .about("Derived observations about spending and savings")
                .arg(month_arg()),
        ))
        .subcommand(
            Command::new("import")
                .about("Import data from files")
                .subcommand(
                    Command::new("transactions")
                        .about("Import transactions from CSV")
                        .arg(Arg::new("path").long("path").required(true)),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export data to files")
                .subcommand(
                    Command::new("transactions")
                        .about("Export the active user's transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .value_name("csv|json")
                                .required(true),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Inspect or change settings")
                .subcommand(Command::new("show").about("Show current settings"))
                .subcommand(
                    Command::new("set-tax-exempt")
                        .about("Set the comma-separated list of tax-exempt income categories")
                        .arg(Arg::new("categories").long("categories").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check stored data for consistency issues"))
}
