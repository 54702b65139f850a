//! In-PTY capture of the `claude` CLI's `/usage` screen.
//!
//! This is the body of the hidden `claude-meter probe` mode. It starts the
//! CLI on a wide pseudo-terminal, types `/usage`, submits it, lets the report
//! render, kills the CLI, and prints the parsed [`UsageReport`] as one JSON
//! line. Failures are printed as a [`ProbeFailure`] object on stderr.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use meter_core::error::{MeterError, Result};
use meter_core::models::{ProbeFailure, UsageReport};
use meter_core::parser::parse_usage_output;
use portable_pty::{native_pty_system, ChildKiller, CommandBuilder, PtySize};

/// Literal command typed into the CLI.
pub const USAGE_COMMAND: &[u8] = b"/usage";
/// Keystroke that submits the command.
pub const SUBMIT_KEY: &[u8] = b"\r";
/// Where Homebrew installs the CLI on Apple Silicon.
pub const FALLBACK_CLAUDE_PATH: &str = "/opt/homebrew/bin/claude";
/// Set inside a Claude Code session; the CLI refuses to nest when present.
pub const NESTED_SESSION_ENV: &str = "CLAUDECODE";

/// PTY geometry and timing for one capture.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// The `claude` executable.
    pub claude: PathBuf,
    pub rows: u16,
    /// Wide enough that the report never wraps.
    pub cols: u16,
    /// Time for the CLI to start and draw its prompt.
    pub warmup: Duration,
    /// Pause between typing the command and submitting it.
    pub submit_wait: Duration,
    /// Time for the usage report to render.
    pub render_wait: Duration,
}

impl ProbeConfig {
    pub fn new(claude: PathBuf) -> Self {
        Self {
            claude,
            rows: 50,
            cols: 220,
            warmup: Duration::from_secs(8),
            submit_wait: Duration::from_millis(1500),
            render_wait: Duration::from_secs(4),
        }
    }
}

// ── Executable lookup ─────────────────────────────────────────────────────────

/// Search `PATH` for an executable file called `name`.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Pick the `claude` binary: explicit path, then `PATH`, then the Homebrew
/// location.
pub fn resolve_claude(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return if is_executable(path) {
            Ok(path.to_path_buf())
        } else {
            Err(MeterError::ExecutableNotFound(path.display().to_string()))
        };
    }

    if let Some(found) = find_executable("claude") {
        return Ok(found);
    }

    let fallback = PathBuf::from(FALLBACK_CLAUDE_PATH);
    if is_executable(&fallback) {
        return Ok(fallback);
    }

    Err(MeterError::ExecutableNotFound("claude".to_string()))
}

// ── Capture ───────────────────────────────────────────────────────────────────

/// Run the `/usage` interaction and return every byte the CLI wrote.
///
/// The child is always killed and reaped before returning, whether or not
/// the interaction succeeded.
pub fn capture_usage_screen(config: &ProbeConfig) -> Result<Vec<u8>> {
    let pty_system = native_pty_system();
    let pair = pty_system
        .openpty(PtySize {
            rows: config.rows,
            cols: config.cols,
            pixel_width: 0,
            pixel_height: 0,
        })
        .map_err(|e| MeterError::Pty(format!("failed to open PTY: {e}")))?;

    let mut cmd = CommandBuilder::new(&config.claude);
    cmd.env_remove(NESTED_SESSION_ENV);
    if let Ok(cwd) = std::env::current_dir() {
        cmd.cwd(cwd);
    }

    let mut child = pair
        .slave
        .spawn_command(cmd)
        .map_err(|e| MeterError::Pty(format!("failed to spawn {}: {e}", config.claude.display())))?;
    // Only the child should hold the slave side, so reads see EOF once it dies.
    drop(pair.slave);

    tracing::debug!(
        "spawned {} with PID {:?}",
        config.claude.display(),
        child.process_id()
    );

    let reader = pair
        .master
        .try_clone_reader()
        .map_err(|e| MeterError::Pty(format!("failed to clone PTY reader: {e}")))?;
    let mut writer = pair
        .master
        .take_writer()
        .map_err(|e| MeterError::Pty(format!("failed to take PTY writer: {e}")))?;

    let (chunks, reader_thread) = spawn_reader(reader);
    let mut buf = Vec::new();

    let interaction = (|| -> Result<()> {
        drain(&chunks, &mut buf, config.warmup);
        send(&mut writer, USAGE_COMMAND)?;
        drain(&chunks, &mut buf, config.submit_wait);
        send(&mut writer, SUBMIT_KEY)?;
        drain(&chunks, &mut buf, config.render_wait);
        Ok(())
    })();

    if let Err(e) = child.kill() {
        tracing::debug!("kill after capture failed (child already gone?): {}", e);
    }
    if let Err(e) = child.wait() {
        tracing::debug!("wait after kill failed: {}", e);
    }
    drop(writer);
    drop(pair.master);

    join_thread_with_timeout(reader_thread, Duration::from_millis(500));
    buf.extend(chunks.try_iter().flatten());

    interaction.map(|()| buf)
}

/// Pump PTY output into a channel so the main thread can wait with deadlines.
fn spawn_reader(mut reader: Box<dyn Read + Send>) -> (Receiver<Vec<u8>>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel();
    let handle = thread::spawn(move || {
        let mut chunk = [0u8; 8192];
        loop {
            match reader.read(&mut chunk) {
                Ok(0) => break, // EOF
                Ok(n) => {
                    if tx.send(chunk[..n].to_vec()).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    // EIO once the child side is closed.
                    tracing::debug!("PTY read ended: {}", e);
                    break;
                }
            }
        }
    });
    (rx, handle)
}

/// Collect output for `window`, returning early if the reader has finished.
fn drain(chunks: &Receiver<Vec<u8>>, buf: &mut Vec<u8>, window: Duration) {
    let deadline = Instant::now() + window;
    loop {
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        match chunks.recv_timeout(deadline - now) {
            Ok(chunk) => buf.extend_from_slice(&chunk),
            Err(RecvTimeoutError::Timeout) => return,
            Err(RecvTimeoutError::Disconnected) => return,
        }
    }
}

fn send(writer: &mut dyn Write, bytes: &[u8]) -> Result<()> {
    writer
        .write_all(bytes)
        .and_then(|()| writer.flush())
        .map_err(|e| MeterError::Pty(format!("failed to write to PTY: {e}")))
}

/// Join a thread with a timeout, abandoning it if it doesn't finish in time.
fn join_thread_with_timeout<T>(handle: JoinHandle<T>, timeout: Duration) {
    let start = Instant::now();
    loop {
        if handle.is_finished() {
            let _ = handle.join();
            return;
        }
        if start.elapsed() >= timeout {
            tracing::debug!("PTY reader did not stop; abandoning thread");
            return;
        }
        thread::sleep(Duration::from_millis(10));
    }
}

// ── Probe entry point ─────────────────────────────────────────────────────────

/// Run a full probe and speak the helper protocol on `out` / `err`.
///
/// Returns the process exit code: `0` with a report line on `out`, or `1`
/// with a `{"error": …}` line on `err`.
pub fn run_probe<O: Write, E: Write>(config: Result<ProbeConfig>, out: &mut O, err: &mut E) -> i32 {
    match config.and_then(|cfg| capture_usage_screen(&cfg)) {
        Ok(buf) => {
            let report = parse_usage_output(&buf);
            match serde_json::to_string(&report) {
                Ok(line) => {
                    let _ = writeln!(out, "{line}");
                    let _ = out.flush();
                    0
                }
                Err(e) => report_failure(err, &e.to_string()),
            }
        }
        Err(e) => report_failure(err, &e.to_string()),
    }
}

/// Probe configuration for the resolved `claude` binary.
pub fn probe_config(explicit: Option<&Path>) -> Result<ProbeConfig> {
    resolve_claude(explicit).map(ProbeConfig::new)
}

fn report_failure<E: Write>(err: &mut E, message: &str) -> i32 {
    let failure = ProbeFailure {
        error: message.to_string(),
    };
    let line = serde_json::to_string(&failure)
        .unwrap_or_else(|_| r#"{"error":"unknown failure"}"#.to_string());
    let _ = writeln!(err, "{line}");
    let _ = err.flush();
    1
}

// ── Tests ─────────────────────────────────────────────────────────────────────
