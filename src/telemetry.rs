// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Structured logging setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_DIRECTIVES: &str = "exercise_tracker=debug,info";

/// Initialize structured JSON logging.
///
/// `RUST_LOG` overrides the default filter. Returns `false` if a global
/// subscriber was already installed, which leaves that subscriber in place.
pub fn init_logging() -> bool {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .try_init()
        .is_ok()
}
