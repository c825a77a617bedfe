// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use env_logger::Env;

static LOG_FILTER_VARIABLE: &str = "CERTISCAN_LOG";

static DEFAULT_LOG_FILTER: &str = "warn";

/// Installs panic handlers and a bare logger, whose verbosity follows CERTISCAN_LOG (warnings by default)
pub fn setup_troubleshooting() {
    better_panic::install();
    human_panic::setup_panic!();

    let filters = Env::new().filter_or(LOG_FILTER_VARIABLE, DEFAULT_LOG_FILTER);

    env_logger::Builder::from_env(filters)
        .format_timestamp(None)
        .format_module_path(false)
        .format_level(false)
        .format_target(false)
        .init();
}
