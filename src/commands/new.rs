// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::models::{Transaction, TransactionStatus};
use crate::records::TransactionDraft;
use crate::utils::{parse_choice, parse_date, parse_decimal};

pub fn handle(sub: &clap::ArgMatches) -> Result<()> {
    let record = build(sub)?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

pub fn build(sub: &clap::ArgMatches) -> Result<Transaction> {
    let text = |name: &str| sub.get_one::<String>(name).map(|s| s.trim().to_string());

    let draft = TransactionDraft {
        id: text("id").unwrap(),
        user_id: text("user").unwrap(),
        account_id: text("account").unwrap(),
        category_id: text("category").filter(|s| !s.is_empty()),
        r#type: parse_choice(&text("type").unwrap())?,
        description: text("description").unwrap(),
        amount: parse_decimal(&text("amount").unwrap())?,
        due_date: parse_date(&text("due").unwrap())?,
        paid_date: text("paid-date").map(|s| parse_date(&s)).transpose()?,
        status: match text("status") {
            Some(s) => parse_choice::<TransactionStatus>(&s)?,
            None => TransactionStatus::Pending,
        },
        notes: text("notes"),
        is_fixed: sub.get_flag("fixed"),
        installments: sub.get_one::<i64>("installments").copied(),
        tags: sub
            .get_many::<String>("tag")
            .map(|tags| tags.map(|t| t.trim().to_string()).collect())
            .unwrap_or_default(),
    };
    Ok(draft.build()?)
}
