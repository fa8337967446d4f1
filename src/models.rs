// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::OccurrenceIdError;
use crate::month::MonthKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INCOME" => Ok(Self::Income),
            "EXPENSE" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {} (valid: income, expense)", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Overdue => "OVERDUE",
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "PAID" => Ok(Self::Paid),
            "OVERDUE" => Ok(Self::Overdue),
            _ => Err(format!(
                "Unknown status: {} (valid: pending, paid, overdue)",
                s
            )),
        }
    }
}

/// A stored transaction row. Roots and overrides share this shape; an
/// override is told apart by `is_override` plus its parent and month fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(rename = "type")]
    pub r#type: TransactionType,
    pub description: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub paid_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: TransactionStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_fixed: bool,
    #[serde(default)]
    pub installments: Option<i64>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub day_of_month: Option<u32>,
    #[serde(default)]
    pub cancelled_occurrences: BTreeSet<MonthKey>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_override: bool,
    #[serde(default)]
    pub parent_transaction_id: Option<String>,
    #[serde(default)]
    pub override_for_date: Option<NaiveDate>,
}

impl Transaction {
    pub fn is_root(&self) -> bool {
        self.parent_transaction_id.is_none()
    }

    /// Month this row replaces, when it is a well-formed override.
    pub fn override_month(&self) -> Option<MonthKey> {
        if !self.is_override || self.parent_transaction_id.is_none() {
            return None;
        }
        self.override_for_date.map(MonthKey::from_date)
    }

    pub fn installment_count(&self) -> Option<u32> {
        self.installments
            .filter(|n| *n > 1)
            .and_then(|n| u32::try_from(n).ok())
    }

    pub fn is_installment(&self) -> bool {
        self.installment_count().is_some()
    }

    pub fn is_recurring(&self) -> bool {
        self.is_fixed || self.is_installment()
    }

    pub fn anchor_date(&self) -> NaiveDate {
        self.start_date.unwrap_or(self.due_date)
    }

    pub fn preferred_day(&self) -> u32 {
        self.day_of_month
            .unwrap_or_else(|| self.anchor_date().day())
    }

    pub fn is_cancelled(&self, month: &MonthKey) -> bool {
        self.cancelled_occurrences.contains(month)
    }
}

/// Identity of a virtual occurrence: a persisted row, or a parent plus month
/// that only exists when expanded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OccurrenceId {
    Real(String),
    Synthetic { parent_id: String, month: MonthKey },
}

impl OccurrenceId {
    pub const SEPARATOR: &'static str = "::";

    pub fn parse(s: &str) -> Result<Self, OccurrenceIdError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(OccurrenceIdError::Empty);
        }
        match s.rsplit_once(Self::SEPARATOR) {
            None => Ok(Self::Real(s.to_string())),
            Some((parent, month)) => {
                if parent.is_empty() {
                    return Err(OccurrenceIdError::EmptyParent(s.to_string()));
                }
                let month = month.parse().map_err(|source| OccurrenceIdError::InvalidMonth {
                    id: s.to_string(),
                    source,
                })?;
                Ok(Self::Synthetic {
                    parent_id: parent.to_string(),
                    month,
                })
            }
        }
    }

    pub fn real_id(&self) -> Option<&str> {
        match self {
            Self::Real(id) => Some(id),
            Self::Synthetic { .. } => None,
        }
    }
}

impl fmt::Display for OccurrenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real(id) => f.write_str(id),
            Self::Synthetic { parent_id, month } => {
                write!(f, "{}{}{}", parent_id, Self::SEPARATOR, month)
            }
        }
    }
}

impl Serialize for OccurrenceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OccurrenceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        OccurrenceId::parse(&value).map_err(de::Error::custom)
    }
}

/// One month of a series (or a single transaction) as seen by a caller.
/// Computed per query and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualOccurrence {
    pub id: OccurrenceId,
    pub parent_id: String,
    pub real_id: Option<String>,
    pub month_key: MonthKey,
    pub user_id: String,
    pub account_id: String,
    pub category_id: Option<String>,
    #[serde(rename = "type")]
    pub r#type: TransactionType,
    pub description: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    pub status: TransactionStatus,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub is_fixed: bool,
    pub installments: Option<u32>,
    pub current_installment: Option<u32>,
    pub is_virtual: bool,
    pub is_override: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentInfo {
    pub total: u32,
    pub paid: u32,
    pub pending: u32,
    pub cancelled: u32,
    pub current_installment: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub installment_amount: Decimal,
    pub total_amount: Decimal,
}
