//! Tracing configuration for hotpaste
//!
//! ## Behavior / 行为
//!
//! - **Development**: debug level, stdout and file
//! - **Production**: info level, stdout and file
//! - **Environment filter**: `RUST_LOG` overrides the defaults
//!
//! Line format: `2025-01-15 10:30:45.123 INFO [file.rs:42] [target] message`

use std::{fs, io, sync::OnceLock};

use hp_app::app_paths::AppPaths;
use hp_core::ports::AppDirsPort;
use hp_platform::app_dirs::DirsAppDirsAdapter;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, prelude::*, registry};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Default filter directives when `RUST_LOG` is not set.
fn build_filter_directives(is_dev: bool) -> Vec<String> {
    let level = if is_dev { "debug" } else { "info" };
    vec![
        level.to_string(),
        format!("hp_core={level}"),
        format!("hp_app={level}"),
        format!("hp_infra={level}"),
        format!("hp_platform={level}"),
        "notify=warn".to_string(), // file watcher internals
        "zbus=warn".to_string(),   // desktop notification bus on Linux
    ]
}

/// Register the global subscriber. Call once, before anything logs.
///
/// If the log file cannot be opened, logging continues on stdout only.
pub fn init_tracing_subscriber() -> anyhow::Result<()> {
    let is_dev = is_development();

    let filter_directives = build_filter_directives(is_dev);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter_directives.join(",")));

    let stdout_writer: BoxMakeWriter = BoxMakeWriter::new(io::stdout);
    let file_writer = match build_file_writer() {
        Ok(writer) => Some(writer),
        Err(err) => {
            eprintln!("Failed to initialize file logging, falling back to stdout: {err}");
            None
        }
    };

    let stdout_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(
            "%Y-%m-%d %H:%M:%S%.3f".to_string(),
        ))
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(stdout_writer);

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_timer(fmt::time::ChronoUtc::new(
                "%Y-%m-%d %H:%M:%S%.3f".to_string(),
            ))
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
    });

    let subscriber = registry().with(env_filter).with(stdout_layer);

    if let Some(layer) = file_layer {
        subscriber.with(layer).try_init()?;
    } else {
        subscriber.try_init()?;
    }

    Ok(())
}

fn build_file_writer() -> anyhow::Result<NonBlocking> {
    let app_dirs = DirsAppDirsAdapter::new().get_app_dirs()?;
    let paths = AppPaths::from_app_dirs(&app_dirs);
    fs::create_dir_all(&paths.logs_dir)?;

    let file_appender = tracing_appender::rolling::never(&paths.logs_dir, "hotpaste.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    LOG_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Tracing log guard already initialized"))?;

    Ok(non_blocking)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dev_directives_are_debug() {
        let directives = build_filter_directives(true);
        assert_eq!(directives[0], "debug");
        assert!(directives.contains(&"hp_app=debug".to_string()));
    }

    #[test]
    fn release_directives_are_info_and_parse() {
        let directives = build_filter_directives(false);
        assert_eq!(directives[0], "info");
        assert!(tracing_subscriber::EnvFilter::try_new(directives.join(",")).is_ok());
    }
}
