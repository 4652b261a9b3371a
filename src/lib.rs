#![doc(test(attr(deny(warnings))))]

//! Bizdash Core holds the state logic behind a small-business dashboard:
//! income and expense logs, an appointment calendar and the headline
//! figures derived from them.

pub mod cli;
pub mod config;
pub mod currency;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Bizdash Core tracing initialized.");
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
