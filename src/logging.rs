use anyhow::{anyhow, Result};
use std::io::IsTerminal;
use std::path::Path;
use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Log file name inside the data directory
pub const LOG_FILE_NAME: &str = "taskpad.log";

/// Where log lines go
pub enum LogTarget<'a> {
    /// Plain commands print to stderr
    Stderr,
    /// The TUI owns the terminal, so logs go to a file in the data directory
    File(&'a Path),
}

/// Level used when RUST_LOG is not set
pub fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Keep the returned guard alive until exit so
/// buffered file output is flushed.
pub fn init_tracing(verbose: u8, target: LogTarget<'_>) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level(verbose)))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let (init_result, guard) = match target {
        LogTarget::Stderr => {
            let result = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(true)
                .with_level(true)
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .try_init();
            (result, None)
        }
        LogTarget::File(dir) => {
            let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let result = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(true)
                .with_level(true)
                .with_writer(writer)
                .with_ansi(false)
                .try_init();
            (result, Some(guard))
        }
    };

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(0), "warn");
        assert_eq!(default_level(1), "info");
        assert_eq!(default_level(2), "debug");
        assert_eq!(default_level(3), "trace");
        assert_eq!(default_level(9), "trace");
    }
}
