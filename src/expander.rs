// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Projection of stored root transactions into the calendar.
//!
//! A fixed or installment root is walked month by month from its anchor
//! date. Each month either yields a synthetic occurrence built from the root,
//! the override row stored for that month, or nothing when the month was
//! cancelled. Nothing here touches storage; callers hand in the rows and get
//! plain values back.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::iter::FusedIterator;
use tracing::{debug, trace, warn};

use crate::models::{
    InstallmentInfo, OccurrenceId, Transaction, TransactionStatus, VirtualOccurrence,
};
use crate::month::MonthKey;

pub const DEFAULT_MAX_LOOKAHEAD_YEARS: u32 = 10;

/// Overrides of one root, keyed by the month they replace.
pub type OverrideIndex<'a> = HashMap<MonthKey, &'a Transaction>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandOptions {
    /// A walk stops once it reaches a year more than this many years after
    /// the anchor year, whatever the requested range.
    pub max_lookahead_years: u32,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            max_lookahead_years: DEFAULT_MAX_LOOKAHEAD_YEARS,
        }
    }
}

/// Closed interval test.
pub fn in_range(date: NaiveDate, range_start: NaiveDate, range_end: NaiveDate) -> bool {
    range_start <= date && date <= range_end
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCandidate {
    /// 1-based position in the series.
    pub index: u32,
    pub month: MonthKey,
    pub date: NaiveDate,
}

/// Lazy month-by-month walk of a recurring root. Finite for installment
/// series and bounded by the lookahead cap otherwise. Clone it to restart.
#[derive(Debug, Clone)]
pub struct MonthWalk {
    anchor: MonthKey,
    day: u32,
    cap: Option<u32>,
    max_lookahead_years: Option<u32>,
    next_index: u32,
    done: bool,
}

impl MonthWalk {
    pub fn new(root: &Transaction, options: &ExpandOptions) -> Self {
        Self::with_lookahead(root, Some(options.max_lookahead_years))
    }

    pub fn with_lookahead(root: &Transaction, max_lookahead_years: Option<u32>) -> Self {
        Self {
            anchor: MonthKey::from_date(root.anchor_date()),
            day: root.preferred_day(),
            cap: root.installment_count(),
            max_lookahead_years,
            next_index: 1,
            done: false,
        }
    }
}

impl Iterator for MonthWalk {
    type Item = MonthCandidate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let index = self.next_index;
        if self.cap.is_some_and(|cap| index > cap) {
            self.done = true;
            return None;
        }
        let month = self.anchor.add_months(index - 1);
        if let Some(years) = self.max_lookahead_years {
            if i64::from(month.year()) - i64::from(self.anchor.year()) > i64::from(years) {
                debug!(anchor = %self.anchor, %month, "lookahead cap reached");
                self.done = true;
                return None;
            }
        }
        match index.checked_add(1) {
            Some(next) => self.next_index = next,
            None => self.done = true,
        }
        Some(MonthCandidate {
            index,
            month,
            date: month.clamped_date(self.day),
        })
    }
}

impl FusedIterator for MonthWalk {}

#[derive(Debug, Clone, Copy, Default)]
pub struct Expander {
    options: ExpandOptions,
}

impl Expander {
    pub fn new(options: ExpandOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExpandOptions {
        &self.options
    }

    /// Occurrences of one root inside `[range_start, range_end]`, in month order.
    /// `overrides` must only hold rows belonging to `root`.
    pub fn expand_transaction(
        &self,
        root: &Transaction,
        range_start: NaiveDate,
        range_end: NaiveDate,
        overrides: &OverrideIndex<'_>,
    ) -> Vec<VirtualOccurrence> {
        if !root.is_recurring() {
            if in_range(root.due_date, range_start, range_end) {
                return vec![single_occurrence(root)];
            }
            return Vec::new();
        }

        let mut out = Vec::new();
        for candidate in MonthWalk::new(root, &self.options) {
            if candidate.date > range_end {
                break;
            }
            if root.is_cancelled(&candidate.month) {
                trace!(root = %root.id, month = %candidate.month, "cancelled");
                continue;
            }
            if candidate.date < range_start {
                continue;
            }
            let occurrence = match overrides.get(&candidate.month) {
                Some(row) => override_occurrence(root, row, &candidate),
                None => synthetic_occurrence(root, &candidate),
            };
            trace!(id = %occurrence.id, due = %occurrence.due_date, "occurrence");
            out.push(occurrence);
        }
        out
    }

    /// Expands every root in `records`, pairing each with its overrides.
    /// Output is grouped per root; callers sort it themselves.
    pub fn expand_transactions(
        &self,
        records: &[Transaction],
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> Vec<VirtualOccurrence> {
        let mut roots = Vec::new();
        let mut index: HashMap<&str, OverrideIndex<'_>> = HashMap::new();
        for record in records {
            if record.is_root() && !record.is_override {
                roots.push(record);
                continue;
            }
            match (record.parent_transaction_id.as_deref(), record.override_month()) {
                (Some(parent), Some(month)) => {
                    index.entry(parent).or_default().insert(month, record);
                }
                _ => warn!(id = %record.id, "skipping record that is neither a root nor an override"),
            }
        }
        debug!(
            roots = roots.len(),
            parents_with_overrides = index.len(),
            %range_start,
            %range_end,
            "expanding transactions"
        );

        let empty = OverrideIndex::new();
        roots
            .into_iter()
            .flat_map(|root| {
                let overrides = index.get(root.id.as_str()).unwrap_or(&empty);
                self.expand_transaction(root, range_start, range_end, overrides)
            })
            .collect()
    }

    /// Progress summary of an installment series, or `None` for anything else.
    /// The whole series is walked; the lookahead cap only bounds open-ended
    /// fixed series.
    pub fn installment_info(
        &self,
        root: &Transaction,
        overrides: &[Transaction],
        reference_date: NaiveDate,
    ) -> Option<InstallmentInfo> {
        let total = root.installment_count()?;
        let by_month: OverrideIndex<'_> = overrides
            .iter()
            .filter(|o| o.parent_transaction_id.as_deref() == Some(root.id.as_str()))
            .filter_map(|o| o.override_month().map(|m| (m, o)))
            .collect();

        let mut paid = 0;
        let mut cancelled = 0;
        let mut current = None;
        let mut end_date = root.anchor_date();
        for candidate in MonthWalk::with_lookahead(root, None) {
            end_date = candidate.date;
            if root.is_cancelled(&candidate.month) {
                cancelled += 1;
                continue;
            }
            let is_paid = by_month
                .get(&candidate.month)
                .is_some_and(|o| o.status == TransactionStatus::Paid);
            if is_paid {
                paid += 1;
            } else if current.is_none() && candidate.date >= reference_date {
                current = Some(candidate.index);
            }
        }

        Some(InstallmentInfo {
            total,
            paid,
            pending: total - paid - cancelled,
            cancelled,
            current_installment: current.unwrap_or(total),
            start_date: root.anchor_date(),
            end_date,
            installment_amount: root.amount,
            total_amount: root.amount * rust_decimal::Decimal::from(total),
        })
    }
}

pub fn expand_transaction(
    root: &Transaction,
    range_start: NaiveDate,
    range_end: NaiveDate,
    overrides: &OverrideIndex<'_>,
) -> Vec<VirtualOccurrence> {
    Expander::default().expand_transaction(root, range_start, range_end, overrides)
}

pub fn expand_transactions(
    records: &[Transaction],
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> Vec<VirtualOccurrence> {
    Expander::default().expand_transactions(records, range_start, range_end)
}

pub fn installment_info(
    root: &Transaction,
    overrides: &[Transaction],
    reference_date: NaiveDate,
) -> Option<InstallmentInfo> {
    Expander::default().installment_info(root, overrides, reference_date)
}

fn single_occurrence(root: &Transaction) -> VirtualOccurrence {
    VirtualOccurrence {
        id: OccurrenceId::Real(root.id.clone()),
        parent_id: root.id.clone(),
        real_id: Some(root.id.clone()),
        month_key: MonthKey::from_date(root.due_date),
        user_id: root.user_id.clone(),
        account_id: root.account_id.clone(),
        category_id: root.category_id.clone(),
        r#type: root.r#type,
        description: root.description.clone(),
        amount: root.amount,
        due_date: root.due_date,
        paid_date: root.paid_date,
        status: root.status,
        notes: root.notes.clone(),
        tags: root.tags.clone(),
        is_fixed: false,
        installments: None,
        current_installment: None,
        is_virtual: false,
        is_override: false,
    }
}

// Synthetic months are always reported as pending, even in the past.
fn synthetic_occurrence(root: &Transaction, candidate: &MonthCandidate) -> VirtualOccurrence {
    VirtualOccurrence {
        id: OccurrenceId::Synthetic {
            parent_id: root.id.clone(),
            month: candidate.month,
        },
        parent_id: root.id.clone(),
        real_id: None,
        month_key: candidate.month,
        user_id: root.user_id.clone(),
        account_id: root.account_id.clone(),
        category_id: root.category_id.clone(),
        r#type: root.r#type,
        description: root.description.clone(),
        amount: root.amount,
        due_date: candidate.date,
        paid_date: None,
        status: TransactionStatus::Pending,
        notes: root.notes.clone(),
        tags: root.tags.clone(),
        is_fixed: root.is_fixed,
        installments: root.installment_count(),
        current_installment: root.is_installment().then_some(candidate.index),
        is_virtual: true,
        is_override: false,
    }
}

fn override_occurrence(
    root: &Transaction,
    row: &Transaction,
    candidate: &MonthCandidate,
) -> VirtualOccurrence {
    VirtualOccurrence {
        id: OccurrenceId::Real(row.id.clone()),
        parent_id: root.id.clone(),
        real_id: Some(row.id.clone()),
        month_key: candidate.month,
        user_id: row.user_id.clone(),
        account_id: row.account_id.clone(),
        category_id: row.category_id.clone(),
        r#type: row.r#type,
        description: row.description.clone(),
        amount: row.amount,
        due_date: row.due_date,
        paid_date: row.paid_date,
        status: row.status,
        notes: row.notes.clone(),
        tags: row.tags.clone(),
        is_fixed: root.is_fixed,
        installments: root.installment_count(),
        current_installment: root.is_installment().then_some(candidate.index),
        is_virtual: false,
        is_override: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionType;
    use rust_decimal::Decimal;
    use std::collections::BTreeSet;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn fixed(start: NaiveDate) -> Transaction {
        Transaction {
            id: "rent".into(),
            user_id: "u1".into(),
            account_id: "checking".into(),
            category_id: None,
            r#type: TransactionType::Expense,
            description: "Rent".into(),
            amount: Decimal::from(100),
            due_date: start,
            paid_date: None,
            status: TransactionStatus::Pending,
            notes: None,
            is_fixed: true,
            installments: None,
            start_date: Some(start),
            end_date: None,
            day_of_month: Some(chrono::Datelike::day(&start)),
            cancelled_occurrences: BTreeSet::new(),
            tags: Vec::new(),
            is_override: false,
            parent_transaction_id: None,
            override_for_date: None,
        }
    }

    #[test]
    fn walk_is_restartable() {
        let root = fixed(d(2024, 1, 31));
        let walk = MonthWalk::new(&root, &ExpandOptions::default());
        let first: Vec<_> = walk.clone().take(3).map(|c| c.date).collect();
        let again: Vec<_> = walk.take(3).map(|c| c.date).collect();
        assert_eq!(first, vec![d(2024, 1, 31), d(2024, 2, 29), d(2024, 3, 31)]);
        assert_eq!(first, again);
    }

    #[test]
    fn walk_stops_at_installment_cap() {
        let mut root = fixed(d(2024, 1, 10));
        root.is_fixed = false;
        root.installments = Some(3);
        let indexes: Vec<_> = MonthWalk::new(&root, &ExpandOptions::default())
            .map(|c| c.index)
            .collect();
        assert_eq!(indexes, vec![1, 2, 3]);
    }

    #[test]
    fn walk_ends_cleanly_at_the_last_index() {
        let root = fixed(d(2024, 1, 10));
        let mut walk = MonthWalk {
            next_index: u32::MAX,
            cap: Some(u32::MAX),
            ..MonthWalk::with_lookahead(&root, None)
        };
        assert_eq!(walk.next().map(|c| c.index), Some(u32::MAX));
        assert!(walk.next().is_none());
    }

    #[test]
    fn walk_stops_after_lookahead_years() {
        let root = fixed(d(2024, 6, 1));
        let options = ExpandOptions {
            max_lookahead_years: 1,
        };
        let walk: Vec<_> = MonthWalk::new(&root, &options).collect();
        // June 2024 through December 2025.
        assert_eq!(walk.len(), 19);
        assert_eq!(walk.last().unwrap().month.to_string(), "2025-12");
    }

    #[test]
    fn range_is_closed() {
        assert!(in_range(d(2024, 1, 1), d(2024, 1, 1), d(2024, 1, 31)));
        assert!(in_range(d(2024, 1, 31), d(2024, 1, 1), d(2024, 1, 31)));
        assert!(!in_range(d(2024, 2, 1), d(2024, 1, 1), d(2024, 1, 31)));
    }

    #[test]
    fn cancelled_month_before_range_does_not_stop_walk() {
        let mut root = fixed(d(2024, 1, 15));
        root.cancelled_occurrences.insert("2024-01".parse().unwrap());
        let out = expand_transaction(&root, d(2024, 1, 1), d(2024, 2, 28), &OverrideIndex::new());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].due_date, d(2024, 2, 15));
    }
}
