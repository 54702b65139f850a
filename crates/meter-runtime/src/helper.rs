//! Out-of-process sampling through a throwaway shell script.
//!
//! Every sample (re)writes `claude_meter_usage_helper.sh` into the temp
//! directory and runs it with `/bin/sh`. The script re-executes this binary's
//! hidden `probe` mode, which owns the PTY for the duration of one capture.
//! Keeping the PTY in a child process means a hung `claude` can never wedge
//! the sampler.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use meter_core::error::{MeterError, Result};
use meter_core::models::{ProbeFailure, UsageReport};

use crate::probe::NESTED_SESSION_ENV;

/// File name of the helper script inside the temp directory.
pub const HELPER_FILE_NAME: &str = "claude_meter_usage_helper.sh";
/// Interpreter used to run the helper.
pub const DEFAULT_INTERPRETER: &str = "/bin/sh";
/// Environment variable through which the `claude` override reaches the probe.
pub const CLAUDE_PATH_ENV: &str = "CLAUDE_METER_CLAUDE";

// ── Script ────────────────────────────────────────────────────────────────────

/// Quote `s` for a POSIX shell.
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Body of the helper script that execs `exe probe`.
pub fn helper_script(exe: &Path) -> String {
    format!(
        "#!/bin/sh\n\
         # Written by claude-meter before every sample.\n\
         unset {NESTED_SESSION_ENV}\n\
         exec {} probe\n",
        shell_quote(&exe.to_string_lossy())
    )
}

/// Write the helper script into `dir`, replacing any previous copy.
pub fn write_helper_script(dir: &Path, exe: &Path) -> Result<PathBuf> {
    let path = dir.join(HELPER_FILE_NAME);
    let tmp = path.with_extension("sh.tmp");
    std::fs::write(&tmp, helper_script(exe))?;
    std::fs::rename(&tmp, &path)?;
    Ok(path)
}

// ── Launcher ──────────────────────────────────────────────────────────────────

/// Runs the helper script and decodes its output.
#[derive(Debug, Clone)]
pub struct HelperLauncher {
    interpreter: PathBuf,
    script_dir: PathBuf,
    exe: PathBuf,
    claude_path: Option<PathBuf>,
}

impl HelperLauncher {
    /// Launcher that re-executes `exe` from the system temp directory.
    pub fn new(exe: PathBuf, claude_path: Option<PathBuf>) -> Self {
        Self {
            interpreter: PathBuf::from(DEFAULT_INTERPRETER),
            script_dir: std::env::temp_dir(),
            exe,
            claude_path,
        }
    }

    /// Launcher for the currently running binary.
    pub fn for_current_exe(claude_path: Option<PathBuf>) -> Result<Self> {
        let exe = std::env::current_exe()?;
        Ok(Self::new(exe, claude_path))
    }

    pub fn with_script_dir(mut self, dir: PathBuf) -> Self {
        self.script_dir = dir;
        self
    }

    pub fn with_interpreter(mut self, interpreter: PathBuf) -> Self {
        self.interpreter = interpreter;
        self
    }

    /// Run one helper process to completion.
    pub async fn run(&self) -> Result<UsageReport> {
        let script = write_helper_script(&self.script_dir, &self.exe)?;

        let mut cmd = tokio::process::Command::new(&self.interpreter);
        cmd.arg(&script)
            .env_remove(NESTED_SESSION_ENV)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(claude) = &self.claude_path {
            cmd.env(CLAUDE_PATH_ENV, claude);
        }

        tracing::debug!("launching helper {}", script.display());
        let output = cmd.output().await.map_err(|source| MeterError::HelperLaunch {
            path: self.interpreter.clone(),
            source,
        })?;

        decode_helper_output(
            output.status.success(),
            &output.status.to_string(),
            &output.stdout,
            &output.stderr,
        )
    }
}

/// Interpret a finished helper's exit state and captured streams.
///
/// Success requires a zero exit and a [`UsageReport`] on the last non-empty
/// stdout line. A failing helper's message comes from its `{"error": …}`
/// stderr line, or the raw stderr when that is not JSON.
pub fn decode_helper_output(
    success: bool,
    status: &str,
    stdout: &[u8],
    stderr: &[u8],
) -> Result<UsageReport> {
    if !success {
        let err_text = String::from_utf8_lossy(stderr);
        let message = match last_line(&err_text) {
            Some(line) => serde_json::from_str::<ProbeFailure>(line)
                .map(|f| f.error)
                .unwrap_or_else(|_| line.to_string()),
            None => "no output".to_string(),
        };
        return Err(MeterError::HelperFailed {
            status: status.to_string(),
            message,
        });
    }

    let out_text = String::from_utf8_lossy(stdout);
    let line = last_line(&out_text)
        .ok_or_else(|| MeterError::MalformedReport("helper printed nothing".to_string()))?;
    serde_json::from_str(line).map_err(|e| MeterError::MalformedReport(format!("{e}: {line}")))
}

fn last_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).rfind(|l| !l.is_empty())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
