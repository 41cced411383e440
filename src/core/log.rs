//! Diagnostic logging. User-facing activity is written to the activity file by
//! the stores; it is only echoed here when running verbose.
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, filter::Targets, fmt, prelude::*};

const ACTIVITY_TARGET: &str = "stockwatch::activity";

pub fn init_logging(verbose: bool) {
    let (level_filter, level) = if verbose {
        (LevelFilter::DEBUG, "debug")
    } else {
        (LevelFilter::WARN, "warn")
    };
    let activity_filter = if verbose {
        LevelFilter::INFO
    } else {
        LevelFilter::OFF
    };
    let app_filter = Targets::new()
        .with_target("stockwatch", level_filter)
        .with_target(ACTIVITY_TARGET, activity_filter);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries tables, diagnostics go to stderr
    let pretty = verbose.then(|| {
        fmt::layer()
            .pretty()
            .without_time()
            .with_writer(std::io::stderr)
    });
    let compact = (!verbose).then(|| {
        fmt::layer()
            .compact()
            .without_time()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(pretty)
        .with(compact)
        .with(app_filter)
        .with(env_filter)
        .init();
}
