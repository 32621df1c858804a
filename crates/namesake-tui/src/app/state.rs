//! Application state types and enums.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use namesake_core::{GroupKey, ScanConfig, ScanProgress, Session, SessionError};
use namesake_scan::ProjectHost;

use crate::theme::ThemeVariant;

/// Application mode representing the current UI state.
/// Scanning is not a mode; it runs in the background and the UI keeps
/// accepting input in Normal mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    #[default]
    Normal,
    Help,
    /// Typing a search term.
    Search,
    /// Typing the new base name for the selected members.
    Renaming,
    Quit,
}

/// One line of the group list on the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    /// Group header.
    Group { key: GroupKey },
    /// Member `index` of an expanded group.
    Member { key: GroupKey, index: usize },
}

impl Row {
    /// Key of the group the row belongs to.
    pub fn key(&self) -> &GroupKey {
        match self {
            Self::Group { key } | Self::Member { key, .. } => key,
        }
    }
}

/// Outcome of the last command, shown in the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub success: bool,
    pub text: String,
}

impl StatusMessage {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            success: true,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            success: false,
            text: text.into(),
        }
    }
}

/// Result from a background scan.
pub enum ScanResult {
    Progress(ScanProgress),
    /// The scan finished; the session comes back with it.
    Complete {
        session: Box<Session<ProjectHost>>,
        result: Result<usize, SessionError>,
    },
    /// The scan task died and took the session with it.
    Failed(SessionError),
}

/// Persistent user settings stored in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    /// Show only groups with more than one member on startup.
    pub duplicates_only: bool,
    /// Recognized asset extensions, including the leading dot.
    pub extensions: Vec<String>,
    /// Project-relative prefixes that are never scanned.
    pub excluded_prefixes: Vec<String>,
    /// Color theme.
    pub theme: ThemeVariant,
}

impl Default for UserSettings {
    fn default() -> Self {
        let scan = ScanConfig::default();
        Self {
            duplicates_only: true,
            extensions: scan.extensions,
            excluded_prefixes: scan.excluded_prefixes,
            theme: ThemeVariant::default(),
        }
    }
}

impl UserSettings {
    /// Get the config file path.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("namesake").join("settings.toml"))
    }

    /// Load settings from disk, or return defaults.
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load settings from `path`. Missing or malformed files yield defaults.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match toml::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed settings");
                Self::default()
            }
        }
    }

    /// Save settings to disk.
    pub fn save(&self) -> std::io::Result<()> {
        let path = Self::config_path().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "No config directory")
        })?;
        self.save_to(&path)
    }

    /// Save settings to `path`, creating parent directories.
    pub fn save_to(&self, path: &std::path::Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        std::fs::write(path, content)
    }

    /// Scan configuration for `root` using these settings.
    ///
    /// Invalid extension lists fall back to the defaults.
    pub fn scan_config(&self, root: impl Into<PathBuf>) -> ScanConfig {
        let root = root.into();
        ScanConfig::builder()
            .root(root.clone())
            .extensions(self.extensions.clone())
            .excluded_prefixes(self.excluded_prefixes.clone())
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "invalid scan settings, using defaults");
                ScanConfig::new(root)
            })
    }
}
