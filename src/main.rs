mod action;
mod api;
mod app;
mod catalog;
mod cli;
mod components;
mod engine;
mod error;
mod event;
mod modes;
mod output;
mod prefs;
mod registry;
mod session;

use std::path::PathBuf;

use color_eyre::eyre::Result;
use tracing_appender::non_blocking::WorkerGuard;

use cli::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse_args();
    let _log_guard = init_logging(&cli)?;

    // The draw loop is synchronous; the runtime only hosts the spawned
    // backend calls, so entering it around the loop is enough.
    let runtime = tokio::runtime::Runtime::new()?;
    let _enter = runtime.enter();

    let mut app = app::App::with_cli(&cli)?;
    app.bootstrap();
    app.run()?;

    Ok(())
}

/// Log to a file under the user data directory; stdout belongs to the TUI.
fn init_logging(cli: &Cli) -> Result<WorkerGuard> {
    let log_dir = directories::BaseDirs::new()
        .map(|base| base.data_local_dir().join("babelterm"))
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&log_dir)?;

    let appender = tracing_appender::rolling::never(&log_dir, "babelterm.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    tracing::info!("Starting babelterm against {}", cli.server);
    Ok(guard)
}
