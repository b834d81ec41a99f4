use std::{path::Path, sync::LazyLock};

use anyhow::{anyhow, Result};
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::{Builder, Rotation};
use tracing_subscriber::{
    fmt::{format::FmtSpan, writer::MakeWriterExt},
    EnvFilter,
};

pub const CLI_PREFIX: &str = "cli";
pub const DAEMON_PREFIX: &str = "daemon";
const KEPT_LOG_FILES: usize = 5;
const FALLBACK_LEVEL: &str = "debug";

/// Installs the global subscriber. Logs go into daily rotated files inside `log_dir`, and
/// optionally to stdout as well.
pub fn enable_logging(
    prefix: &str,
    log_dir: &Path,
    log_level: Option<LevelFilter>,
    show_std: bool,
) -> Result<()> {
    let files = Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(KEPT_LOG_FILES)
        .filename_prefix(prefix)
        .build(log_dir)?;
    let console = std::io::stdout.with_filter(move |_| show_std);

    let directives = filter_directives(log_level, std::env::var("RUST_LOG").ok());

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directives))
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(console.and(files))
        .pretty()
        .try_init()
        .map_err(|e| anyhow!("Failed to install logger {e}"))
}

/// A level, from the flag or a bare `RUST_LOG`, applies to keyrace's own events only. Any other
/// `RUST_LOG` is already a list of directives and is used as is.
fn filter_directives(log_level: Option<LevelFilter>, rust_log: Option<String>) -> String {
    if let Some(level) = log_level {
        return crate_directive(&level.to_string());
    }
    match rust_log.filter(|v| !v.trim().is_empty()) {
        Some(value) if value.trim().parse::<LevelFilter>().is_ok() => crate_directive(value.trim()),
        Some(directives) => directives,
        None => crate_directive(FALLBACK_LEVEL),
    }
}

fn crate_directive(level: &str) -> String {
    format!("{}={level}", env!("CARGO_PKG_NAME").replace('-', "_"))
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .pretty()
        .try_init();
});

#[cfg(test)]
mod tests {
    use tracing::level_filters::LevelFilter;

    use super::filter_directives;

    #[test]
    fn test_levels_apply_to_own_events() {
        assert_eq!(filter_directives(Some(LevelFilter::INFO), None), "keyrace=info");
        assert_eq!(
            filter_directives(Some(LevelFilter::WARN), Some("trace".into())),
            "keyrace=warn"
        );
        assert_eq!(filter_directives(None, Some("trace".into())), "keyrace=trace");
        assert_eq!(filter_directives(None, None), "keyrace=debug");
        assert_eq!(filter_directives(None, Some("  ".into())), "keyrace=debug");
    }

    #[test]
    fn test_rust_log_directives_pass_through() {
        assert_eq!(
            filter_directives(None, Some("keyrace=info,reqwest=warn".into())),
            "keyrace=info,reqwest=warn"
        );
    }
}
