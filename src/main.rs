//! CardioRisk: heart disease risk form
//!
//! Main entry point for the terminal application.

use anyhow::Result;
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cardiorisk::adapters::sanitize::SanitizingMakeWriter;
use cardiorisk::config::AppConfig;
use cardiorisk::tui::App;

fn main() -> Result<()> {
    let config = AppConfig::from_env();

    // Writing logs to the terminal would corrupt the TUI (alternate screen).
    // Auto mode: interactive TTY logs to a file, otherwise to stdout.
    let use_file = config.log_mode.use_file(std::io::stdout().is_terminal());

    let (writer, _guard) = if use_file {
        if let Some(parent) = config.log_file.parent() {
            // Best-effort: a missing directory surfaces on open below.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(SanitizingMakeWriter::new(writer, config.sanitize_max_bytes)),
        )
        .init();

    tracing::info!("Starting CardioRisk...");

    // Artifacts load before the terminal enters raw mode
    let mut app = App::new(&config)?;
    app.run()?;

    tracing::info!("CardioRisk shutdown complete.");
    Ok(())
}
