// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use tracing::info;

use super::{Session, filter_from, range_from};
use crate::filters::{Totals, sort_by_due_desc};
use crate::models::VirtualOccurrence;
use crate::records::validate_record;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

pub fn handle(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_occurrences(session, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data.iter().map(table_row).collect();
        println!(
            "{}",
            pretty_table(
                &["Due", "Description", "Type", "Amount", "Status", "Part", "Source", "Id"],
                rows,
            )
        );
        let totals = Totals::of(&data);
        println!(
            "Income {}  Expense {}  Net {}",
            fmt_money(&totals.income),
            fmt_money(&totals.expense),
            fmt_money(&totals.net)
        );
    }
    Ok(())
}

/// Expanded, filtered occurrences, latest due date first.
pub fn query_occurrences(
    session: &Session,
    sub: &clap::ArgMatches,
) -> Result<Vec<VirtualOccurrence>> {
    let ledger = session.ledger()?;
    if sub.get_flag("strict") {
        for record in ledger.records() {
            validate_record(record)
                .with_context(|| format!("Ledger record '{}' is malformed", record.id))?;
        }
    }
    let (from, to) = range_from(sub)?;
    if from > to {
        info!(%from, %to, "empty range");
    }
    let filter = filter_from(sub)?;

    let expanded = session.expander().expand_transactions(ledger.records(), from, to);
    let mut data = filter.apply(expanded);
    sort_by_due_desc(&mut data);
    if let Some(limit) = sub.get_one::<usize>("limit") {
        data.truncate(*limit);
    }
    Ok(data)
}

pub(crate) fn source_label(o: &VirtualOccurrence) -> &'static str {
    if o.is_override {
        "override"
    } else if o.is_virtual {
        "virtual"
    } else {
        "stored"
    }
}

pub(crate) fn part_label(o: &VirtualOccurrence) -> String {
    match (o.current_installment, o.installments) {
        (Some(cur), Some(total)) => format!("{}/{}", cur, total),
        _ if o.is_fixed => "fixed".to_string(),
        _ => String::new(),
    }
}

fn table_row(o: &VirtualOccurrence) -> Vec<String> {
    vec![
        o.due_date.to_string(),
        o.description.clone(),
        o.r#type.as_str().to_string(),
        fmt_money(&o.amount),
        o.status.as_str().to_string(),
        part_label(o),
        source_label(o).to_string(),
        o.id.to_string(),
    ]
}
