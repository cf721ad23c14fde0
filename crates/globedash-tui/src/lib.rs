//! Full-screen country dashboard.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod overlays;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stdout};

use anyhow::Result;
pub use features::{auth, dashboard};
use globedash_core::config::{Config, paths};
use globedash_core::logging::{self, LogTarget};
use globedash_core::session::{AuthContext, FileStore};
pub use runtime::TuiRuntime;

use crate::state::SessionStore;

/// Runs the interactive dashboard until the user quits.
///
/// Logs go to `<home>/logs/globedash.log` while the terminal is in use.
/// Must be called from within a tokio runtime; the country fetch is spawned on it.
///
/// # Errors
/// Returns an error if stdout is not a terminal or terminal I/O fails.
pub fn run_dashboard(config: &Config) -> Result<()> {
    if !stdout().is_terminal() {
        anyhow::bail!(
            "The dashboard requires a terminal.\n\
             Use `globedash countries` for non-interactive output."
        );
    }

    let _log_guard = logging::init(LogTarget::File(&paths::logs_dir()), &config.log_level)?;
    tracing::info!(api = %config.api_base_url, "starting dashboard");

    let store: SessionStore = Box::new(FileStore::default_location());
    let auth = AuthContext::new(store, config.restore_identity);

    let mut runtime = TuiRuntime::new(config.clone(), auth)?;
    runtime.run()?;
    drop(runtime);

    tracing::info!("dashboard closed");
    Ok(())
}
