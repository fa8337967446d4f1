// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::collections::BTreeSet;

use crate::error::RecordError;
use crate::models::{OccurrenceId, Transaction, TransactionStatus, TransactionType};
use crate::month::MonthKey;

/// Longest installment series accepted, one hundred years of monthly parts.
pub const MAX_INSTALLMENTS: i64 = 1200;

/// User input for a new root transaction, before the recurrence fields are derived.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub id: String,
    pub user_id: String,
    pub account_id: String,
    pub category_id: Option<String>,
    pub r#type: TransactionType,
    pub description: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    pub status: TransactionStatus,
    pub notes: Option<String>,
    pub is_fixed: bool,
    pub installments: Option<i64>,
    pub tags: Vec<String>,
}

impl TransactionDraft {
    /// Validates the draft and snapshots the recurrence day, start and end
    /// dates. `installments` of 1 is stored as a single transaction.
    pub fn build(self) -> Result<Transaction, RecordError> {
        let id = self.id;
        check_id(&id)?;
        let description = self.description.trim().to_string();
        if description.is_empty() {
            return Err(RecordError::EmptyDescription { id });
        }
        if self.amount.is_sign_negative() && !self.amount.is_zero() {
            return Err(RecordError::NegativeAmount { id });
        }
        let installments = match self.installments {
            Some(n) if n < 1 => return Err(RecordError::InstallmentsTooFew { id, installments: n }),
            Some(n) if n > MAX_INSTALLMENTS => {
                return Err(RecordError::InstallmentsTooMany {
                    id,
                    installments: n,
                    max: MAX_INSTALLMENTS,
                });
            }
            Some(1) | None => None,
            Some(n) => Some(n),
        };
        if self.is_fixed && installments.is_some() {
            return Err(RecordError::FixedWithInstallments { id });
        }

        let recurring = self.is_fixed || installments.is_some();
        let day = self.due_date.day();
        let end_date = match installments {
            Some(n) => {
                let offset = u32::try_from(n - 1).map_err(|_| RecordError::InstallmentsTooMany {
                    id: id.clone(),
                    installments: n,
                    max: MAX_INSTALLMENTS,
                })?;
                Some(
                    MonthKey::from_date(self.due_date)
                        .add_months(offset)
                        .clamped_date(day),
                )
            }
            None => None,
        };

        Ok(Transaction {
            id,
            user_id: self.user_id,
            account_id: self.account_id,
            category_id: self.category_id,
            r#type: self.r#type,
            description,
            amount: self.amount,
            due_date: self.due_date,
            paid_date: self.paid_date,
            status: self.status,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
            is_fixed: self.is_fixed,
            installments,
            start_date: recurring.then_some(self.due_date),
            end_date,
            day_of_month: recurring.then_some(day),
            cancelled_occurrences: BTreeSet::new(),
            tags: self.tags,
            is_override: false,
            parent_transaction_id: None,
            override_for_date: None,
        })
    }
}

/// Checks a stored row against the root/override invariants.
pub fn validate_record(record: &Transaction) -> Result<(), RecordError> {
    let id = || record.id.clone();

    if record.is_override || record.parent_transaction_id.is_some() {
        if record.parent_transaction_id.is_none() {
            return Err(RecordError::OverrideMissingParent { id: id() });
        }
        if !record.is_override {
            return Err(RecordError::NotMarkedOverride { id: id() });
        }
        if record.override_for_date.is_none() {
            return Err(RecordError::OverrideMissingMonth { id: id() });
        }
        if record.is_fixed
            || record.installments.is_some()
            || !record.cancelled_occurrences.is_empty()
        {
            return Err(RecordError::OverrideWithRecurrence { id: id() });
        }
        return validate_common(record);
    }

    validate_common(record)?;
    if let Some(n) = record.installments {
        if n <= 1 {
            return Err(RecordError::InstallmentsTooFew {
                id: id(),
                installments: n,
            });
        }
        if n > MAX_INSTALLMENTS {
            return Err(RecordError::InstallmentsTooMany {
                id: id(),
                installments: n,
                max: MAX_INSTALLMENTS,
            });
        }
        if record.is_fixed {
            return Err(RecordError::FixedWithInstallments { id: id() });
        }
    }
    if let Some(day) = record.day_of_month {
        if !(1..=31).contains(&day) {
            return Err(RecordError::DayOfMonthOutOfRange { id: id(), day });
        }
    }

    if record.is_recurring() {
        if record.is_fixed && record.end_date.is_some() {
            return Err(RecordError::FixedWithEndDate { id: id() });
        }
        if record.start_date.is_none() {
            return Err(RecordError::MissingStartDate { id: id() });
        }
        if record.day_of_month.is_none() {
            return Err(RecordError::MissingDayOfMonth { id: id() });
        }
    } else if record.start_date.is_some()
        || record.end_date.is_some()
        || record.day_of_month.is_some()
        || !record.cancelled_occurrences.is_empty()
    {
        return Err(RecordError::UnexpectedRecurrence { id: id() });
    }
    Ok(())
}

fn check_id(id: &str) -> Result<(), RecordError> {
    if id.contains(OccurrenceId::SEPARATOR) {
        return Err(RecordError::IdContainsSeparator { id: id.to_string() });
    }
    Ok(())
}

fn validate_common(record: &Transaction) -> Result<(), RecordError> {
    check_id(&record.id)?;
    if record.description.trim().is_empty() {
        return Err(RecordError::EmptyDescription {
            id: record.id.clone(),
        });
    }
    if record.amount.is_sign_negative() && !record.amount.is_zero() {
        return Err(RecordError::NegativeAmount {
            id: record.id.clone(),
        });
    }
    Ok(())
}

fn check_month_in_series(root: &Transaction, month: MonthKey) -> Result<(), RecordError> {
    if !root.is_recurring() {
        return Err(RecordError::NotRecurring {
            id: root.id.clone(),
        });
    }
    let offset = MonthKey::from_date(root.anchor_date()).months_until(&month);
    let past_end = root
        .installment_count()
        .is_some_and(|n| offset >= i64::from(n));
    if offset < 0 || past_end {
        return Err(RecordError::MonthOutsideSeries {
            id: root.id.clone(),
            month,
        });
    }
    Ok(())
}

/// Returns `root` with `month` marked as skipped.
pub fn cancel_occurrence(root: &Transaction, month: MonthKey) -> Result<Transaction, RecordError> {
    check_month_in_series(root, month)?;
    let mut updated = root.clone();
    updated.cancelled_occurrences.insert(month);
    Ok(updated)
}

/// Returns `root` with `month` no longer skipped.
pub fn restore_occurrence(root: &Transaction, month: MonthKey) -> Result<Transaction, RecordError> {
    if !root.is_recurring() {
        return Err(RecordError::NotRecurring {
            id: root.id.clone(),
        });
    }
    let mut updated = root.clone();
    updated.cancelled_occurrences.remove(&month);
    Ok(updated)
}

/// Field edits applied to one month of a series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OccurrenceChanges {
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub status: Option<TransactionStatus>,
    pub paid_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Builds the override row for `month` of `root`. When `existing` is given it
/// is patched in place of a new row and keeps its id; otherwise `new_id` is used.
pub fn override_occurrence(
    root: &Transaction,
    month: MonthKey,
    existing: Option<&Transaction>,
    new_id: &str,
    changes: &OccurrenceChanges,
) -> Result<Transaction, RecordError> {
    check_month_in_series(root, month)?;
    if root.is_cancelled(&month) {
        return Err(RecordError::MonthCancelled {
            id: root.id.clone(),
            month,
        });
    }

    let mut row = match existing {
        Some(existing) => existing.clone(),
        None => Transaction {
            id: new_id.to_string(),
            user_id: root.user_id.clone(),
            account_id: root.account_id.clone(),
            category_id: root.category_id.clone(),
            r#type: root.r#type,
            description: root.description.clone(),
            amount: root.amount,
            due_date: month.clamped_date(root.preferred_day()),
            paid_date: None,
            status: TransactionStatus::Pending,
            notes: root.notes.clone(),
            is_fixed: false,
            installments: None,
            start_date: None,
            end_date: None,
            day_of_month: None,
            cancelled_occurrences: BTreeSet::new(),
            tags: root.tags.clone(),
            is_override: true,
            parent_transaction_id: Some(root.id.clone()),
            override_for_date: Some(month.first_day()),
        },
    };

    if let Some(amount) = changes.amount {
        row.amount = amount;
    }
    if let Some(description) = &changes.description {
        row.description = description.trim().to_string();
    }
    if let Some(due_date) = changes.due_date {
        row.due_date = due_date;
    }
    if let Some(notes) = &changes.notes {
        row.notes = Some(notes.clone()).filter(|n| !n.trim().is_empty());
    }
    if let Some(status) = changes.status {
        row.status = status;
        if status != TransactionStatus::Paid {
            row.paid_date = None;
        }
    }
    if let Some(paid_date) = changes.paid_date {
        row.paid_date = Some(paid_date);
    }
    if row.status == TransactionStatus::Paid && row.paid_date.is_none() {
        row.paid_date = Some(row.due_date);
    }

    validate_common(&row)?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn draft() -> TransactionDraft {
        TransactionDraft {
            id: "t1".into(),
            user_id: "u1".into(),
            account_id: "acc".into(),
            category_id: Some("home".into()),
            r#type: TransactionType::Expense,
            description: "  Sofa  ".into(),
            amount: Decimal::from(250),
            due_date: d(2024, 1, 31),
            paid_date: None,
            status: TransactionStatus::Pending,
            notes: Some("   ".into()),
            is_fixed: false,
            installments: Some(4),
            tags: vec!["furniture".into()],
        }
    }

    #[test]
    fn installment_draft_snapshots_recurrence() {
        let t = draft().build().unwrap();
        assert_eq!(t.description, "Sofa");
        assert_eq!(t.notes, None);
        assert_eq!(t.installments, Some(4));
        assert_eq!(t.start_date, Some(d(2024, 1, 31)));
        assert_eq!(t.day_of_month, Some(31));
        assert_eq!(t.end_date, Some(d(2024, 4, 30)));
        assert!(validate_record(&t).is_ok());
    }

    #[test]
    fn single_installment_is_stored_as_single() {
        let mut input = draft();
        input.installments = Some(1);
        let t = input.build().unwrap();
        assert_eq!(t.installments, None);
        assert_eq!(t.start_date, None);
        assert_eq!(t.day_of_month, None);
        assert!(!t.is_recurring());
    }

    #[test]
    fn fixed_with_installments_is_rejected() {
        let mut input = draft();
        input.is_fixed = true;
        assert!(matches!(
            input.build(),
            Err(RecordError::FixedWithInstallments { .. })
        ));
    }

    #[test]
    fn validate_catches_malformed_roots() {
        let mut t = draft().build().unwrap();
        t.installments = Some(1);
        assert!(matches!(
            validate_record(&t),
            Err(RecordError::InstallmentsTooFew { installments: 1, .. })
        ));

        let mut t = draft().build().unwrap();
        t.start_date = None;
        assert!(matches!(
            validate_record(&t),
            Err(RecordError::MissingStartDate { .. })
        ));

        let mut t = draft().build().unwrap();
        t.day_of_month = Some(32);
        assert!(matches!(
            validate_record(&t),
            Err(RecordError::DayOfMonthOutOfRange { day: 32, .. })
        ));
    }

    #[test]
    fn cancel_rejects_month_past_series_end() {
        let t = draft().build().unwrap();
        let may = MonthKey::new(2024, 5).unwrap();
        assert!(matches!(
            cancel_occurrence(&t, may),
            Err(RecordError::MonthOutsideSeries { .. })
        ));
        let apr = MonthKey::new(2024, 4).unwrap();
        assert!(cancel_occurrence(&t, apr).unwrap().is_cancelled(&apr));
    }

    #[test]
    fn paying_an_occurrence_defaults_paid_date() {
        let t = draft().build().unwrap();
        let feb = MonthKey::new(2024, 2).unwrap();
        let changes = OccurrenceChanges {
            status: Some(TransactionStatus::Paid),
            ..Default::default()
        };
        let row = override_occurrence(&t, feb, None, "o1", &changes).unwrap();
        assert_eq!(row.due_date, d(2024, 2, 29));
        assert_eq!(row.paid_date, Some(d(2024, 2, 29)));
        assert_eq!(row.override_for_date, Some(d(2024, 2, 1)));
        assert!(validate_record(&row).is_ok());
    }
}
