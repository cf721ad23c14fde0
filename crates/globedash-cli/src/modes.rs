//! Interactive mode.
//!
//! The full-screen dashboard lives behind the `tui` feature.

#[cfg(not(feature = "tui"))]
use anyhow::Result;
#[cfg(not(feature = "tui"))]
use globedash_core::config::Config;
#[cfg(feature = "tui")]
pub use globedash_tui::run_dashboard;

#[cfg(not(feature = "tui"))]
pub fn run_dashboard(_config: &Config) -> Result<()> {
    anyhow::bail!("TUI support is disabled in this build (feature \"tui\").");
}
