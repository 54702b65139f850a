use clap::{CommandFactory, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::i18n::Language;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Rate-limit gauge for the Claude Code CLI
#[derive(Parser, Debug, Clone)]
#[command(
    name = "claude-meter",
    about = "Rate-limit gauge for the Claude Code CLI",
    version
)]
pub struct Settings {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Seconds between usage samples (5-3600)
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u64).range(5..=3600))]
    pub refresh_interval: u64,

    /// Path to the claude executable (searched on PATH if omitted)
    #[arg(long, env = "CLAUDE_METER_CLAUDE")]
    pub claude_path: Option<PathBuf>,

    /// Display language (remembered for next time)
    #[arg(long, value_parser = ["en", "ko"])]
    pub language: Option<String>,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

/// Non-interactive modes.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Take a single sample and print the snapshot as JSON
    Once,
    /// Capture the claude /usage screen and print the raw report
    #[command(hide = true)]
    Probe,
}

// ── Preferences ────────────────────────────────────────────────────────────────

/// Persisted user preferences saved to `~/.claude-meter/preferences.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Preferences {
    #[serde(default)]
    pub language: Language,
}

impl Preferences {
    /// Return the default path to the preferences file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the preferences path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".claude-meter").join("preferences.json")
    }

    /// Load preferences from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write preferences to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        // Write to a temp file then rename for atomicity.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments and resolve the display language against the
    /// persisted preferences.
    pub fn load() -> (Self, Preferences) {
        Self::load_impl(std::env::args_os().collect(), &Preferences::config_path())
    }

    /// Full implementation – accepts args and an explicit preferences path so
    /// that tests can redirect to a temporary directory.
    ///
    /// An explicit `--language` wins over the stored value and is written
    /// back so the next run starts in the same language.
    pub fn load_impl(args: Vec<std::ffi::OsString>, prefs_path: &Path) -> (Self, Preferences) {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);
        let mut prefs = Preferences::load_from(prefs_path);

        if is_arg_explicitly_set(&matches, "language") {
            if let Some(lang) = settings.language.as_deref().and_then(Language::from_code) {
                prefs.language = lang;
                if let Err(e) = prefs.save_to(prefs_path) {
                    tracing::warn!(error = %e, "failed to persist language preference");
                }
            }
        }

        // --debug overrides log level.
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        (settings, prefs)
    }
}

// ── Helper: check if an arg was explicitly set on the command line ─────────────

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
