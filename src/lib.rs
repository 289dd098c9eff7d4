#![doc(test(attr(deny(warnings))))]

//! FinanzaPro core: users, categories, movements and budgets stored in a flat
//! key-value store, plus the domain rules (auto-categorization, filtering,
//! monthly aggregation) and a scriptable shell on top.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("FinanzaPro tracing initialized.");
    });
}
