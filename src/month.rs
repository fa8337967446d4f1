// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;
use std::str::FromStr;

use crate::error::MonthKeyError;

static MONTH_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})$").expect("month key pattern is valid"));

/// Calendar month identity used to correlate overrides and cancellations with
/// an occurrence. Renders as `YYYY-MM`; `month0` is zero based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month0: u32,
}

impl MonthKey {
    /// `month` is 1-12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self {
                year,
                month0: month - 1,
            })
        } else {
            None
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month0: date.month0(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month0 + 1
    }

    pub fn month0(&self) -> u32 {
        self.month0
    }

    pub fn add_months(&self, months: u32) -> Self {
        let total = self.year as i64 * 12 + self.month0 as i64 + months as i64;
        Self {
            year: total.div_euclid(12) as i32,
            month0: total.rem_euclid(12) as u32,
        }
    }

    /// Signed number of months from `self` to `other`.
    pub fn months_until(&self, other: &MonthKey) -> i64 {
        (other.year as i64 * 12 + other.month0 as i64) - (self.year as i64 * 12 + self.month0 as i64)
    }

    pub fn first_day(&self) -> NaiveDate {
        self.clamped_date(1)
    }

    pub fn days_in_month(&self) -> u32 {
        days_in_month(self.year, self.month())
    }

    /// Date in this month on `day`, pulled back to the last day when the month is shorter.
    pub fn clamped_date(&self, day: u32) -> NaiveDate {
        let day = day.clamp(1, self.days_in_month());
        // Years beyond chrono's range sort after every real date.
        NaiveDate::from_ymd_opt(self.year, self.month(), day).unwrap_or(NaiveDate::MAX)
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month())
    }
}

impl FromStr for MonthKey {
    type Err = MonthKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let caps = MONTH_KEY_RE
            .captures(s)
            .ok_or_else(|| MonthKeyError::InvalidFormat(s.to_string()))?;
        let year: i32 = caps[1]
            .parse()
            .map_err(|_| MonthKeyError::InvalidFormat(s.to_string()))?;
        let month: u32 = caps[2]
            .parse()
            .map_err(|_| MonthKeyError::InvalidFormat(s.to_string()))?;
        MonthKey::new(year, month).ok_or_else(|| MonthKeyError::MonthOutOfRange {
            input: s.to_string(),
            month,
        })
    }
}

impl Serialize for MonthKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        MonthKey::from_str(&value).map_err(de::Error::custom)
    }
}
