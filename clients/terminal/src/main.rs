use crate::app::App;
use color_eyre::eyre::WrapErr;
use std::{fs::File, sync::Mutex};
use tracing_subscriber::EnvFilter;

pub mod app;
pub mod event;
pub mod ui;

/// Environment variable naming the log file; logging is off when unset
const LOG_PATH_VAR: &str = "RALLY_LOG";

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_logging()?;

    let terminal = ratatui::init();
    let result = App::new().and_then(|app| app.run(terminal));
    ratatui::restore();
    result
}

/// The terminal owns stdout, so logs only ever go to a file
fn init_logging() -> color_eyre::Result<()> {
    let Some(path) = std::env::var_os(LOG_PATH_VAR) else {
        return Ok(());
    };

    let file = File::create(&path)
        .wrap_err_with(|| format!("failed to create log file {}", path.to_string_lossy()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
