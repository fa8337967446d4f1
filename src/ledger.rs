// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::models::{OccurrenceId, Transaction};
use crate::month::MonthKey;

/// The rows a caller fetched from storage, held in memory for expansion.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    records: Vec<Transaction>,
}

impl Ledger {
    pub fn new(records: Vec<Transaction>) -> Self {
        Self { records }
    }

    /// Reads a JSON array of transaction records.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Open ledger {}", path.display()))?;
        let records: Vec<Transaction> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid ledger JSON in {}", path.display()))?;
        debug!(path = %path.display(), records = records.len(), "ledger loaded");
        Ok(Self { records })
    }

    pub fn records(&self) -> &[Transaction] {
        &self.records
    }

    pub fn find(&self, id: &str) -> Option<&Transaction> {
        self.records.iter().find(|t| t.id == id)
    }

    pub fn overrides_of(&self, parent_id: &str) -> Vec<Transaction> {
        self.records
            .iter()
            .filter(|t| t.is_override && t.parent_transaction_id.as_deref() == Some(parent_id))
            .cloned()
            .collect()
    }

    pub fn find_override(&self, parent_id: &str, month: MonthKey) -> Option<&Transaction> {
        self.records
            .iter()
            .filter(|t| t.parent_transaction_id.as_deref() == Some(parent_id))
            .filter(|t| t.override_month() == Some(month))
            .last()
    }

    /// Maps an occurrence id back to its root and month. A real id may name
    /// an override row; a real id naming a root is not a series occurrence.
    pub fn resolve_occurrence(&self, id: &OccurrenceId) -> Result<(&Transaction, MonthKey)> {
        match id {
            OccurrenceId::Synthetic { parent_id, month } => {
                let root = self
                    .find(parent_id)
                    .ok_or_else(|| anyhow!("Transaction '{}' not found", parent_id))?;
                Ok((root, *month))
            }
            OccurrenceId::Real(real) => {
                let row = self
                    .find(real)
                    .ok_or_else(|| anyhow!("Transaction '{}' not found", real))?;
                let (parent, month) = row
                    .parent_transaction_id
                    .as_deref()
                    .zip(row.override_month())
                    .ok_or_else(|| anyhow!("Transaction '{}' is not an occurrence of a series", real))?;
                let root = self
                    .find(parent)
                    .ok_or_else(|| anyhow!("Parent transaction '{}' not found", parent))?;
                Ok((root, month))
            }
        }
    }
}
