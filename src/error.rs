// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

use crate::month::MonthKey;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MonthKeyError {
    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidFormat(String),
    #[error("Invalid month number {month} in '{input}'")]
    MonthOutOfRange { input: String, month: u32 },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OccurrenceIdError {
    #[error("Occurrence id is empty")]
    Empty,
    #[error("Occurrence id '{0}' has an empty parent id")]
    EmptyParent(String),
    #[error("Occurrence id '{id}' has an invalid month: {source}")]
    InvalidMonth {
        id: String,
        #[source]
        source: MonthKeyError,
    },
}

/// Violations of the record invariants, raised where records are created or loaded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("Transaction [{id}] has {installments} installments, an installment series needs more than 1")]
    InstallmentsTooFew { id: String, installments: i64 },
    #[error("Transaction [{id}] has {installments} installments, at most {max} are allowed")]
    InstallmentsTooMany { id: String, installments: i64, max: i64 },
    #[error("Transaction [{id}] cannot be both fixed and an installment series")]
    FixedWithInstallments { id: String },
    #[error("Fixed transaction [{id}] cannot carry an end date")]
    FixedWithEndDate { id: String },
    #[error("Recurring transaction [{id}] is missing its start date")]
    MissingStartDate { id: String },
    #[error("Recurring transaction [{id}] is missing its day of month")]
    MissingDayOfMonth { id: String },
    #[error("Transaction [{id}] has day of month {day}, expected 1-31")]
    DayOfMonthOutOfRange { id: String, day: u32 },
    #[error("Single transaction [{id}] carries recurrence fields")]
    UnexpectedRecurrence { id: String },
    #[error("Override [{id}] has no parent transaction")]
    OverrideMissingParent { id: String },
    #[error("Override [{id}] has no override month")]
    OverrideMissingMonth { id: String },
    #[error("Transaction [{id}] has a parent but is not marked as an override")]
    NotMarkedOverride { id: String },
    #[error("Override [{id}] cannot itself recur")]
    OverrideWithRecurrence { id: String },
    #[error("Transaction [{id}] is not a recurring series")]
    NotRecurring { id: String },
    #[error("Month {month} is outside the series of transaction [{id}]")]
    MonthOutsideSeries { id: String, month: MonthKey },
    #[error("Month {month} of transaction [{id}] is cancelled, restore it before overriding")]
    MonthCancelled { id: String, month: MonthKey },
    #[error("Transaction id [{id}] cannot contain '::'")]
    IdContainsSeparator { id: String },
    #[error("Transaction [{id}] has a negative amount, use the transaction type for direction")]
    NegativeAmount { id: String },
    #[error("Transaction [{id}] has an empty description")]
    EmptyDescription { id: String },
}
