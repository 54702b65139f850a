use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Name of the per-user state directory under `$HOME`.
pub const STATE_DIR: &str = ".claude-meter";
/// Default log file name inside `~/.claude-meter/logs/`.
pub const LOG_FILE_NAME: &str = "claude-meter.log";

// ── Directory bootstrap ────────────────────────────────────────────────────────

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Ensure `~/.claude-meter/` and `~/.claude-meter/logs/` exist.
pub fn ensure_directories() -> anyhow::Result<PathBuf> {
    ensure_directories_in(&home_dir())
}

/// Create the state hierarchy under `home` and return the state directory.
pub fn ensure_directories_in(home: &Path) -> anyhow::Result<PathBuf> {
    let state_dir = home.join(STATE_DIR);
    std::fs::create_dir_all(state_dir.join("logs"))?;
    Ok(state_dir)
}

/// `~/.claude-meter/logs/claude-meter.log`
pub fn default_log_path() -> PathBuf {
    home_dir().join(STATE_DIR).join("logs").join(LOG_FILE_NAME)
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Where log records go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Append to a file; used while the TUI owns the terminal.
    File(PathBuf),
    Stderr,
}

/// Map a `--log-level` name to an [`EnvFilter`] directive.
pub fn level_directive(log_level: &str) -> &'static str {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "WARNING" | "WARN" => "warn",
        "ERROR" | "CRITICAL" => "error",
        _ => "info",
    }
}

/// Initialise the global `tracing` subscriber.
///
/// `RUST_LOG`, when set, takes precedence over `log_level`.
pub fn setup_logging(log_level: &str, target: LogTarget) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_directive(log_level)));

    match target {
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        LogTarget::Stderr => {
            let layer = fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
    }

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ── ensure_directories ────────────────────────────────────────────────────

    #[test]
    fn test_ensure_directories() {
        let tmp = TempDir::new().expect("tempdir");
        let state_dir = ensure_directories_in(tmp.path()).expect("should succeed");

        assert_eq!(state_dir, tmp.path().join(".claude-meter"));
        assert!(state_dir.is_dir(), ".claude-meter dir must exist");
        assert!(state_dir.join("logs").is_dir(), "logs subdir must exist");
    }

    #[test]
    fn test_ensure_directories_is_idempotent() {
        let tmp = TempDir::new().expect("tempdir");
        ensure_directories_in(tmp.path()).expect("first");
        ensure_directories_in(tmp.path()).expect("second");
    }

    #[test]
    fn test_default_log_path_shape() {
        let path = default_log_path();
        assert!(path.ends_with(".claude-meter/logs/claude-meter.log"));
    }

    // ── level_directive ───────────────────────────────────────────────────────

    #[test]
    fn test_level_directive_mapping() {
        assert_eq!(level_directive("DEBUG"), "debug");
        assert_eq!(level_directive("INFO"), "info");
        assert_eq!(level_directive("WARNING"), "warn");
        assert_eq!(level_directive("ERROR"), "error");
        assert_eq!(level_directive("CRITICAL"), "error");
        assert_eq!(level_directive("debug"), "debug");
        assert_eq!(level_directive("verbose"), "info");
    }
}
