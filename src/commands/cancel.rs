// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing::info;

use super::Session;
use crate::models::Transaction;
use crate::records::{cancel_occurrence, restore_occurrence};
use crate::utils::parse_occurrence_id;

pub fn handle_cancel(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let updated = cancel(session, sub)?;
    println!("{}", serde_json::to_string_pretty(&updated)?);
    Ok(())
}

pub fn handle_restore(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let updated = restore(session, sub)?;
    println!("{}", serde_json::to_string_pretty(&updated)?);
    Ok(())
}

pub fn cancel(session: &Session, sub: &clap::ArgMatches) -> Result<Transaction> {
    let id = parse_occurrence_id(sub.get_one::<String>("occurrence").unwrap())?;
    let ledger = session.ledger()?;
    let (root, month) = ledger.resolve_occurrence(&id)?;
    if ledger.find_override(&root.id, month).is_some() {
        info!(root = %root.id, %month, "cancelled month still has an override row");
    }
    Ok(cancel_occurrence(root, month)?)
}

pub fn restore(session: &Session, sub: &clap::ArgMatches) -> Result<Transaction> {
    let id = parse_occurrence_id(sub.get_one::<String>("occurrence").unwrap())?;
    let ledger = session.ledger()?;
    let (root, month) = ledger.resolve_occurrence(&id)?;
    Ok(restore_occurrence(root, month)?)
}
