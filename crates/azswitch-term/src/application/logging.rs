use std::env;
use std::fs;
use std::path;

use anyhow::anyhow;
use anyhow::Context;
use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::configuration::Config;

/// `RUST_LOG` wins over the configured level when set.
pub fn build_filter(log_level: &str, env_directives: Option<String>) -> Result<EnvFilter> {
    if let Some(directives) = env_directives.filter(|e| !e.trim().is_empty()) {
        return EnvFilter::try_new(&directives)
            .with_context(|| format!("invalid RUST_LOG directives: {directives}"));
    }

    return EnvFilter::try_new(log_level)
        .with_context(|| format!("invalid log level: {log_level}"));
}

/// Sends JSON logs to the configured file. The terminal belongs to the UI, so
/// nothing is written to stdout or stderr. Keep the guard alive until exit or
/// buffered lines are lost.
pub fn init(config: &Config) -> Result<WorkerGuard> {
    let filter = build_filter(&config.log_level, env::var("RUST_LOG").ok())?;

    let dir = config
        .log_file
        .parent()
        .filter(|e| !e.as_os_str().is_empty())
        .unwrap_or_else(|| path::Path::new("."));
    let Some(file_name) = config.log_file.file_name() else {
        return Err(anyhow!(
            "log file has no file name: {}",
            config.log_file.display()
        ));
    };

    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|err| return anyhow!("failed to initialize logging: {err}"))?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_file = %config.log_file.display(),
        "logging initialized"
    );

    return Ok(guard);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_prefers_env() {
        let filter = build_filter("info", Some("azswitch_term=trace".to_string())).unwrap();
        assert_eq!(filter.to_string(), "azswitch_term=trace");

        let filter = build_filter("debug", Some("  ".to_string())).unwrap();
        assert_eq!(filter.to_string(), "debug");

        let filter = build_filter("warn", None).unwrap();
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn test_build_filter_rejects_garbage() {
        assert!(build_filter("azswitch_term=loudest", None).is_err());
    }
}
