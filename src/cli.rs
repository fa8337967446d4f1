// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, arg, command, value_parser};

fn list_flags(cmd: Command) -> Command {
    cmd.arg(arg!(--json "Print as pretty JSON").action(ArgAction::SetTrue))
        .arg(
            arg!(--jsonl "Print one JSON object per line")
                .action(ArgAction::SetTrue)
                .conflicts_with("json"),
        )
}

fn range_args(cmd: Command) -> Command {
    cmd.arg(arg!(--from <DATE> "Range start (YYYY-MM-DD), inclusive").required(true))
        .arg(arg!(--to <DATE> "Range end (YYYY-MM-DD), inclusive").required(true))
}

fn filter_args(cmd: Command) -> Command {
    cmd.arg(arg!(--status <STATUS> "pending|paid|overdue"))
        .arg(Arg::new("type").long("type").value_name("TYPE").help("income|expense"))
        .arg(arg!(--category <ID> "Category id"))
        .arg(arg!(--account <ID> "Account id"))
        .arg(arg!(--tag <TAG> "Tag name"))
}

pub fn build_cli() -> Command {
    command!()
        .name("hubledger")
        .about("Expand fixed and installment transactions into calendar occurrences")
        .arg(arg!(--ledger <PATH> "Ledger JSON file").global(true))
        .arg(arg!(--config <PATH> "Settings JSON file").global(true))
        .arg(arg!(--"log-level" <LEVEL> "error|warn|info|debug|trace").global(true))
        .arg(
            arg!(--"max-lookahead-years" <YEARS> "Years after the anchor a series may run")
                .value_parser(value_parser!(u32))
                .global(true),
        )
        .subcommand(
            list_flags(filter_args(range_args(
                Command::new("expand").about("List occurrences in a date range"),
            )))
            .arg(arg!(--limit <N> "Show at most N rows").value_parser(value_parser!(usize)))
            .arg(
                arg!(--strict "Fail on records that break the ledger invariants")
                    .action(ArgAction::SetTrue),
            ),
        )
        .subcommand(
            list_flags(
                Command::new("installments")
                    .about("Progress of an installment series")
                    .arg(arg!(--id <ID> "Root transaction id").required(true))
                    .arg(arg!(--"as-of" <DATE> "Reference date (default today)")),
            ),
        )
        .subcommand(list_flags(
            Command::new("check").about("Validate every ledger record"),
        ))
        .subcommand(
            Command::new("export")
                .about("Export expanded occurrences")
                .subcommand(
                    filter_args(range_args(Command::new("occurrences")))
                        .arg(arg!(--format <FMT> "csv|json").default_value("csv"))
                        .arg(arg!(--out <PATH> "Output file").required(true)),
                ),
        )
        .subcommand(
            Command::new("new")
                .about("Build a validated root transaction and print it as JSON")
                .arg(arg!(--id <ID>).required(true))
                .arg(arg!(--user <ID>).required(true))
                .arg(arg!(--account <ID>).required(true))
                .arg(arg!(--category <ID>))
                .arg(Arg::new("type").long("type").value_name("TYPE").required(true))
                .arg(arg!(--description <TEXT>).required(true))
                .arg(arg!(--amount <AMOUNT>).required(true))
                .arg(arg!(--due <DATE>).required(true))
                .arg(arg!(--status <STATUS>))
                .arg(arg!(--"paid-date" <DATE>))
                .arg(arg!(--notes <TEXT>))
                .arg(arg!(--fixed "Repeat every month").action(ArgAction::SetTrue))
                .arg(
                    arg!(--installments <N>)
                        .value_parser(value_parser!(i64))
                        .conflicts_with("fixed"),
                )
                .arg(arg!(--tag <TAG>).action(ArgAction::Append)),
        )
        .subcommand(
            Command::new("cancel")
                .about("Skip one occurrence of a series; prints the updated root")
                .arg(arg!(--occurrence <ID> "Occurrence id, e.g. rent::2024-03").required(true)),
        )
        .subcommand(
            Command::new("restore")
                .about("Undo a cancelled occurrence; prints the updated root")
                .arg(arg!(--occurrence <ID>).required(true)),
        )
        .subcommand(
            Command::new("override")
                .about("Edit or pay one occurrence; prints the override record")
                .arg(arg!(--occurrence <ID>).required(true))
                .arg(arg!(--id <ID> "Id for a new override row"))
                .arg(arg!(--amount <AMOUNT>))
                .arg(arg!(--description <TEXT>))
                .arg(arg!(--status <STATUS>))
                .arg(arg!(--"paid-date" <DATE>))
                .arg(arg!(--due <DATE>))
                .arg(arg!(--notes <TEXT>)),
        )
}
