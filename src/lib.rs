#![doc(test(attr(deny(warnings))))]

//! SpendSavvy Core expands one-off and recurring expenses and income into the dated
//! occurrences and totals a report window shows, and ships a small record store and
//! CLI around that engine.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("SpendSavvy tracing initialized.");
    });
}
