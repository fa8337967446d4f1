// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};

use super::Session;
use crate::models::InstallmentInfo;
use crate::utils::{fmt_money, maybe_print_json, parse_date, pretty_table};

pub fn handle(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let info = query_info(session, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &info)? {
        let rows = vec![
            vec!["Installments".into(), info.total.to_string()],
            vec!["Paid".into(), info.paid.to_string()],
            vec!["Pending".into(), info.pending.to_string()],
            vec!["Cancelled".into(), info.cancelled.to_string()],
            vec![
                "Current".into(),
                format!("{}/{}", info.current_installment, info.total),
            ],
            vec!["Start".into(), info.start_date.to_string()],
            vec!["End".into(), info.end_date.to_string()],
            vec!["Per installment".into(), fmt_money(&info.installment_amount)],
            vec!["Total".into(), fmt_money(&info.total_amount)],
        ];
        println!("{}", pretty_table(&["Field", "Value"], rows));
    }
    Ok(())
}

pub fn query_info(session: &Session, sub: &clap::ArgMatches) -> Result<InstallmentInfo> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let as_of = match sub.get_one::<String>("as-of") {
        Some(s) => parse_date(s)?,
        None => chrono::Local::now().date_naive(),
    };
    let ledger = session.ledger()?;
    let root = ledger
        .find(id)
        .ok_or_else(|| anyhow!("Transaction '{}' not found", id))?;
    let overrides = ledger.overrides_of(&root.id);
    session
        .expander()
        .installment_info(root, &overrides, as_of)
        .ok_or_else(|| anyhow!("Transaction '{}' is not an installment series", id))
}
