// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{TransactionStatus, TransactionType, VirtualOccurrence};

/// Field filters applied after expansion, since an override can change the
/// status or category a root would have reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccurrenceFilter {
    pub status: Option<TransactionStatus>,
    pub r#type: Option<TransactionType>,
    pub category_id: Option<String>,
    pub account_id: Option<String>,
    pub tag: Option<String>,
}

impl OccurrenceFilter {
    pub fn matches(&self, o: &VirtualOccurrence) -> bool {
        self.status.is_none_or(|s| o.status == s)
            && self.r#type.is_none_or(|t| o.r#type == t)
            && self
                .category_id
                .as_deref()
                .is_none_or(|c| o.category_id.as_deref() == Some(c))
            && self.account_id.as_deref().is_none_or(|a| o.account_id == a)
            && self
                .tag
                .as_deref()
                .is_none_or(|t| o.tags.iter().any(|tag| tag.eq_ignore_ascii_case(t)))
    }

    pub fn apply(&self, occurrences: Vec<VirtualOccurrence>) -> Vec<VirtualOccurrence> {
        occurrences.into_iter().filter(|o| self.matches(o)).collect()
    }
}

/// Latest due date first; equal dates fall back to the id text
/// (`rent::2024-03` next to real ids) so output is stable.
pub fn sort_by_due_desc(occurrences: &mut [VirtualOccurrence]) {
    occurrences.sort_by_cached_key(|o| (std::cmp::Reverse(o.due_date), o.id.to_string()));
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

impl Totals {
    pub fn of(occurrences: &[VirtualOccurrence]) -> Self {
        let mut totals = Totals::default();
        for o in occurrences {
            match o.r#type {
                TransactionType::Income => totals.income += o.amount,
                TransactionType::Expense => totals.expense += o.amount,
            }
        }
        totals.net = totals.income - totals.expense;
        totals
    }
}
