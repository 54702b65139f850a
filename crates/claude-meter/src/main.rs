mod bootstrap;

use std::process::ExitCode;

use anyhow::{Context, Result};
use bootstrap::LogTarget;
use meter_core::settings::{Command, Preferences, Settings};
use meter_runtime::helper::HelperLauncher;
use meter_runtime::orchestrator::MeterOrchestrator;
use meter_runtime::probe;
use meter_runtime::sampler::UsageSampler;
use meter_ui::app::App;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let (settings, prefs) = Settings::load();

    match settings.command {
        // stderr belongs to the helper protocol here, so no logging.
        Some(Command::Probe) => Ok(run_probe(&settings)),
        Some(Command::Once) => {
            bootstrap::setup_logging(&settings.log_level, LogTarget::Stderr)?;
            run_once(&settings).await
        }
        None => {
            bootstrap::ensure_directories()?;
            let log_path = settings
                .log_file
                .clone()
                .unwrap_or_else(bootstrap::default_log_path);
            bootstrap::setup_logging(&settings.log_level, LogTarget::File(log_path))?;
            run_meter(&settings, prefs).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_probe(settings: &Settings) -> ExitCode {
    let config = probe::probe_config(settings.claude_path.as_deref());
    let code = probe::run_probe(config, &mut std::io::stdout(), &mut std::io::stderr());
    if code == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn run_once(settings: &Settings) -> Result<ExitCode> {
    let launcher = HelperLauncher::for_current_exe(settings.claude_path.clone())?;
    let sampler = UsageSampler::new(launcher);

    tracing::info!("taking a single usage sample");
    let outcome = sampler
        .try_sample()
        .await
        .context("a sample is already in flight")?;

    match outcome {
        Ok(snapshot) => {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::error!(error = %e, "usage sample failed");
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run_meter(settings: &Settings, prefs: Preferences) -> Result<()> {
    tracing::info!("Claude Meter v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Refresh interval: {}s, Theme: {}, Language: {}",
        settings.refresh_interval,
        settings.theme,
        prefs.language.code()
    );

    let launcher = HelperLauncher::for_current_exe(settings.claude_path.clone())?;
    let (rx, handle) = MeterOrchestrator::new(settings.refresh_interval, launcher).start();

    let app = App::new(
        &settings.theme,
        prefs.language,
        Some(Preferences::config_path()),
    );

    // The TUI exits on 'q' / Ctrl+C itself; the signal arm covers signals
    // that arrive outside raw mode.
    tokio::select! {
        result = app.run(rx, &handle) => {
            handle.abort();
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received; shutting down sampling task");
            handle.abort();
        }
    }

    tracing::info!("Claude Meter stopped");
    Ok(())
}
