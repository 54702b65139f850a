use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by Claude Meter.
#[derive(Error, Debug)]
pub enum MeterError {
    /// The `claude` executable could not be located.
    #[error("Executable not found: {0}")]
    ExecutableNotFound(String),

    /// A pseudo-terminal could not be opened, written, or read.
    #[error("PTY error: {0}")]
    Pty(String),

    /// The helper process could not be started.
    #[error("Failed to launch helper {path}: {source}")]
    HelperLaunch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The helper process exited unsuccessfully.
    #[error("Helper failed ({status}): {message}")]
    HelperFailed { status: String, message: String },

    /// The helper printed something that is not a usage report.
    #[error("Malformed usage report: {0}")]
    MalformedReport(String),

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the meter crates.
pub type Result<T> = std::result::Result<T, MeterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_executable_not_found() {
        let err = MeterError::ExecutableNotFound("claude".to_string());
        assert_eq!(err.to_string(), "Executable not found: claude");
    }

    #[test]
    fn test_error_display_helper_launch() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = MeterError::HelperLaunch {
            path: PathBuf::from("/bin/sh"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to launch helper"));
        assert!(msg.contains("/bin/sh"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_helper_failed() {
        let err = MeterError::HelperFailed {
            status: "exit status: 1".to_string(),
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Helper failed (exit status: 1): boom");
    }

    #[test]
    fn test_error_display_malformed_report() {
        let err = MeterError::MalformedReport("empty output".to_string());
        assert_eq!(err.to_string(), "Malformed usage report: empty output");
    }

    #[test]
    fn test_error_display_pty() {
        let err = MeterError::Pty("openpty failed".to_string());
        assert_eq!(err.to_string(), "PTY error: openpty failed");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: MeterError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: MeterError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }

    #[test]
    fn test_error_from_anyhow_is_transparent() {
        let err: MeterError = anyhow::anyhow!("pty backend unavailable").into();
        assert_eq!(err.to_string(), "pty backend unavailable");
    }
}
