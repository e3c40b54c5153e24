//! Tracing subscriber setup.
//!
//! Filtering follows `RUST_LOG` (default `info`). User text only appears in
//! `debug` events.

use crate::config::LogFormat;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

const APP_NAME: &str = "faqbot";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber. Logs go to stderr so stdout stays free for
/// the console transport. Calling it twice is harmless; the second call is ignored.
pub fn init_tracing(format: LogFormat) {
    let result = match format {
        LogFormat::Pretty => Registry::default()
            .with(env_filter())
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => Registry::default()
            .with(env_filter())
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Bunyan => Registry::default()
            .with(env_filter())
            .with(JsonStorageLayer)
            .with(BunyanFormattingLayer::new(APP_NAME.to_string(), std::io::stderr))
            .try_init(),
    };
    if let Err(e) = result {
        tracing::debug!("Tracing already initialised: {}", e);
    }
}
