// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::expander::{DEFAULT_MAX_LOOKAHEAD_YEARS, ExpandOptions};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Hubledger", "hubledger"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub max_lookahead_years: u32,
    pub log_level: String,
    pub default_ledger: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_lookahead_years: DEFAULT_MAX_LOOKAHEAD_YEARS,
            log_level: "warn".to_string(),
            default_ledger: None,
        }
    }
}

impl Settings {
    pub fn expand_options(&self) -> ExpandOptions {
        ExpandOptions {
            max_lookahead_years: self.max_lookahead_years,
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from(APP.0, APP.1, APP.2).map(|proj| proj.config_dir().join("config.json"))
}

pub fn load_from(path: &Path) -> Result<Settings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Open config {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid config JSON in {}", path.display()))
}

/// Explicit path first, then the platform config file when present, else defaults.
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        return load_from(path);
    }
    match config_path() {
        Some(path) if path.exists() => load_from(&path),
        _ => Ok(Settings::default()),
    }
}
