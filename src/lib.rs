#![doc(test(attr(deny(warnings))))]

//! Subscription Core tracks recurring payments and works out how much of each
//! one lands in a given calendar month or year. The date arithmetic lives in
//! [`schedule`] and [`allocation`]; persistence, reminders and the CLI sit on top.

pub mod allocation;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod notifications;
pub mod schedule;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Subscription Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
