//! Binary entry point: load configuration, start logging, open the library
//! database and drive the Ratatui event loop until the user exits.
use anyhow::Context;
use library_desk::{init_logging, run_app, App, Config, Store};
use tracing::info;

/// Returning a `Result` bubbles fatal startup problems (unreadable config,
/// database that cannot be opened) up to the terminal.
fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    let _log_guard = init_logging(&config.log_level, &config.log_dir()?)?;

    let db_path = config.database_path()?;
    let store = Store::open(&db_path)
        .with_context(|| format!("cannot use database at {}", db_path.display()))?;
    info!(policy = ?config.validation, "starting library desk");

    let mut app = App::new(store, config.validation);
    let result = run_app(&mut app);

    app.into_store().close()?;
    result
}
