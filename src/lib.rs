// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod expander;
pub mod filters;
pub mod ledger;
pub mod logging;
pub mod models;
pub mod month;
pub mod records;
pub mod utils;

pub use expander::{
    ExpandOptions, Expander, expand_transaction, expand_transactions, installment_info,
};
pub use models::{OccurrenceId, Transaction, VirtualOccurrence};
pub use month::MonthKey;
