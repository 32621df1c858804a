//! Terminal user interface for namesake.
//!
//! Interactive browser for asset groups that share a filename, built with
//! ratatui. The TUI is a thin adapter: it issues [`namesake_core::Session`]
//! commands and renders what the session reports.
//!
//! # Usage
//!
//! ```rust,no_run
//! use namesake_tui::{TuiConfig, UserSettings};
//!
//! let settings = UserSettings::load();
//! namesake_tui::run(TuiConfig::from_settings(&settings, "/path/to/project")).unwrap();
//! ```
//!
//! # Keyboard Navigation
//!
//! - `j`/`k` - Move down/up
//! - `h`/`l`/`o` - Collapse/expand group
//! - `Space` - Select member
//! - `r` - Rename selected members
//! - `[`/`]` - Previous/next page
//! - `/` - Search, `Backspace` clears it
//! - `d` - Toggle duplicates only
//! - `?` - Help
//! - `q` - Quit

pub mod app;
mod event;
mod theme;
mod ui;

use std::path::PathBuf;

use namesake_core::ScanConfig;

pub use app::state::UserSettings;
pub use app::{App, AppResult};
pub use theme::{Theme, ThemeVariant};

/// Startup configuration for the TUI.
#[derive(Debug, Clone)]
pub struct TuiConfig {
    /// What to scan.
    pub scan: ScanConfig,
    /// Initial duplicates-only filter.
    pub duplicates_only: bool,
    /// Initial theme.
    pub theme: ThemeVariant,
}

impl TuiConfig {
    /// Configuration for `root` taken from the user's settings.
    pub fn from_settings(settings: &UserSettings, root: impl Into<PathBuf>) -> Self {
        Self {
            scan: settings.scan_config(root),
            duplicates_only: settings.duplicates_only,
            theme: settings.theme,
        }
    }
}

/// Run the TUI application.
pub fn run(config: TuiConfig) -> AppResult<()> {
    // Open the project before taking over the terminal so errors print normally
    let app = App::new(config)?;

    let rt = tokio::runtime::Runtime::new()?;

    let terminal = ratatui::init();
    let result = rt.block_on(app.run(terminal));
    ratatui::restore();

    // Shutdown runtime immediately to cancel background tasks
    rt.shutdown_timeout(std::time::Duration::from_millis(100));

    result
}
