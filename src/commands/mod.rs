// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cancel;
pub mod check;
pub mod expand;
pub mod exporter;
pub mod installments;
pub mod new;
pub mod overrides;

use anyhow::{Context, Result};
use clap::ArgMatches;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

use crate::config::{self, Settings};
use crate::expander::Expander;
use crate::filters::OccurrenceFilter;
use crate::ledger::Ledger;
use crate::logging::parse_log_level;
use crate::utils::{parse_choice, parse_date};

/// Settings and ledger location resolved from the config file and global flags.
#[derive(Debug, Clone)]
pub struct Session {
    pub settings: Settings,
    pub ledger_path: Option<PathBuf>,
}

impl Session {
    pub fn from_matches(m: &ArgMatches) -> Result<Self> {
        let explicit = m.get_one::<String>("config").map(PathBuf::from);
        let mut settings = config::load(explicit.as_deref())?;
        if let Some(years) = m.get_one::<u32>("max-lookahead-years") {
            settings.max_lookahead_years = *years;
        }
        if let Some(level) = m.get_one::<String>("log-level") {
            settings.log_level = level.trim().to_string();
        }
        let ledger_path = m
            .get_one::<String>("ledger")
            .map(|s| PathBuf::from(s.trim()))
            .or_else(|| settings.default_ledger.clone());
        Ok(Self {
            settings,
            ledger_path,
        })
    }

    pub fn log_level(&self) -> LevelFilter {
        parse_log_level(&self.settings.log_level).unwrap_or_else(|| {
            eprintln!(
                "Invalid log level '{}', defaulting to 'warn'",
                self.settings.log_level
            );
            LevelFilter::WARN
        })
    }

    pub fn ledger(&self) -> Result<Ledger> {
        let path = self
            .ledger_path
            .as_ref()
            .context("No ledger given; pass --ledger or set defaultLedger in the config")?;
        Ledger::load(path)
    }

    pub fn expander(&self) -> Expander {
        Expander::new(self.settings.expand_options())
    }
}

pub fn range_from(sub: &ArgMatches) -> Result<(chrono::NaiveDate, chrono::NaiveDate)> {
    let from = parse_date(sub.get_one::<String>("from").unwrap())?;
    let to = parse_date(sub.get_one::<String>("to").unwrap())?;
    Ok((from, to))
}

pub fn filter_from(sub: &ArgMatches) -> Result<OccurrenceFilter> {
    let text = |name: &str| {
        sub.get_one::<String>(name)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };
    Ok(OccurrenceFilter {
        status: text("status").map(|s| parse_choice(&s)).transpose()?,
        r#type: text("type").map(|s| parse_choice(&s)).transpose()?,
        category_id: text("category"),
        account_id: text("account"),
        tag: text("tag"),
    })
}
