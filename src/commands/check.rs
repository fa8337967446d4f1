// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashSet;

use super::Session;
use crate::ledger::Ledger;
use crate::records::validate_record;
use crate::utils::{maybe_print_json, pretty_table};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub id: String,
    pub issue: String,
}

pub fn handle(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let issues = find_issues(&session.ledger()?);
    if !maybe_print_json(json_flag, jsonl_flag, &issues)? {
        if issues.is_empty() {
            println!("check: no issues found");
        } else {
            let rows = issues
                .iter()
                .map(|i| vec![i.id.clone(), i.issue.clone()])
                .collect();
            println!("{}", pretty_table(&["Transaction", "Issue"], rows));
        }
    }
    Ok(())
}

pub fn find_issues(ledger: &Ledger) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();
    let mut override_months = HashSet::new();

    for record in ledger.records() {
        if !seen.insert(record.id.as_str()) {
            issues.push(Issue {
                id: record.id.clone(),
                issue: "duplicate id".into(),
            });
        }
        if let Err(e) = validate_record(record) {
            issues.push(Issue {
                id: record.id.clone(),
                issue: e.to_string(),
            });
            continue;
        }
        let Some(parent) = record.parent_transaction_id.as_deref() else {
            continue;
        };
        match ledger.find(parent) {
            None => issues.push(Issue {
                id: record.id.clone(),
                issue: format!("parent '{}' not found", parent),
            }),
            Some(root) if !root.is_recurring() => issues.push(Issue {
                id: record.id.clone(),
                issue: format!("parent '{}' is not a recurring series", parent),
            }),
            Some(_) => {}
        }
        if let Some(month) = record.override_month() {
            if !override_months.insert((parent, month)) {
                issues.push(Issue {
                    id: record.id.clone(),
                    issue: format!("second override for {} of '{}'", month, parent),
                });
            }
        }
    }
    issues
}
