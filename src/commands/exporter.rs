// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use serde_json::json;

use super::{Session, filter_from, range_from};
use crate::filters::sort_by_due_desc;
use crate::models::VirtualOccurrence;

pub fn handle(session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("occurrences", sub)) => export_occurrences(session, sub),
        _ => Ok(()),
    }
}

fn export_occurrences(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();

    let ledger = session.ledger()?;
    let (from, to) = range_from(sub)?;
    let filter = filter_from(sub)?;
    let mut data = filter.apply(session.expander().expand_transactions(ledger.records(), from, to));
    sort_by_due_desc(&mut data);

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id",
                "parentId",
                "realId",
                "dueDate",
                "type",
                "description",
                "amount",
                "status",
                "currentInstallment",
                "installments",
                "isVirtual",
                "isOverride",
                "account",
                "category",
                "tags",
            ])?;
            for o in &data {
                wtr.write_record(csv_row(o))?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = data
                .iter()
                .map(|o| {
                    json!({
                        "id": o.id, "parentId": o.parent_id, "realId": o.real_id,
                        "dueDate": o.due_date, "type": o.r#type, "description": o.description,
                        "amount": o.amount, "status": o.status,
                        "currentInstallment": o.current_installment, "installments": o.installments,
                        "isVirtual": o.is_virtual, "isOverride": o.is_override,
                        "account": o.account_id, "category": o.category_id, "tags": o.tags
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    println!("Exported {} occurrences to {}", data.len(), out);
    Ok(())
}

fn csv_row(o: &VirtualOccurrence) -> Vec<String> {
    let opt = |v: Option<u32>| v.map(|n| n.to_string()).unwrap_or_default();
    vec![
        o.id.to_string(),
        o.parent_id.clone(),
        o.real_id.clone().unwrap_or_default(),
        o.due_date.to_string(),
        o.r#type.as_str().to_string(),
        o.description.clone(),
        o.amount.to_string(),
        o.status.as_str().to_string(),
        opt(o.current_installment),
        opt(o.installments),
        o.is_virtual.to_string(),
        o.is_override.to_string(),
        o.account_id.clone(),
        o.category_id.clone().unwrap_or_default(),
        o.tags.join(";"),
    ]
}
