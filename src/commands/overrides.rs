// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};

use super::Session;
use crate::models::{Transaction, TransactionStatus};
use crate::records::{OccurrenceChanges, override_occurrence};
use crate::utils::{parse_choice, parse_date, parse_decimal, parse_occurrence_id};

pub fn handle(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let row = build(session, sub)?;
    println!("{}", serde_json::to_string_pretty(&row)?);
    Ok(())
}

pub fn build(session: &Session, sub: &clap::ArgMatches) -> Result<Transaction> {
    let text = |name: &str| sub.get_one::<String>(name).map(|s| s.trim().to_string());

    let changes = OccurrenceChanges {
        amount: text("amount").map(|s| parse_decimal(&s)).transpose()?,
        description: text("description"),
        status: text("status")
            .map(|s| parse_choice::<TransactionStatus>(&s))
            .transpose()?,
        paid_date: text("paid-date").map(|s| parse_date(&s)).transpose()?,
        due_date: text("due").map(|s| parse_date(&s)).transpose()?,
        notes: text("notes"),
    };
    if changes == OccurrenceChanges::default() {
        bail!("Nothing to change; pass at least one of --amount, --description, --status, --paid-date, --due, --notes");
    }

    let occurrence = parse_occurrence_id(sub.get_one::<String>("occurrence").unwrap())?;
    let ledger = session.ledger()?;
    let (root, month) = ledger.resolve_occurrence(&occurrence)?;
    let existing = ledger.find_override(&root.id, month);
    let new_id = match (existing, text("id")) {
        (Some(row), _) => row.id.clone(),
        (None, Some(id)) if !id.is_empty() => id,
        (None, _) => bail!("Occurrence {} has no override yet; pass --id for the new row", occurrence),
    };
    Ok(override_occurrence(root, month, existing, &new_id, &changes)?)
}
