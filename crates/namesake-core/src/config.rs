//! Scan configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::names::{file_name, split_extension};

/// Configuration for scanning a project.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Project root.
    #[builder(default = "PathBuf::from(\".\")")]
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Recognized extensions, including the leading dot. Matched exactly.
    #[builder(default = "default_extensions()")]
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Project-relative path prefixes that are never scanned.
    #[builder(default = "default_excluded_prefixes()")]
    #[serde(default = "default_excluded_prefixes")]
    pub excluded_prefixes: Vec<String>,

    /// Directory names skipped while walking the project (gitignore-lite syntax).
    #[builder(default = "default_ignore_patterns()")]
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,

    /// Report progress every N paths.
    #[builder(default = "30")]
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,

    /// Follow symbolic links.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Include hidden files (starting with .).
    #[builder(default = "false")]
    #[serde(default)]
    pub include_hidden: bool,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_extensions() -> Vec<String> {
    vec![".png".to_string(), ".jpg".to_string()]
}

fn default_excluded_prefixes() -> Vec<String> {
    vec!["Package".to_string()]
}

fn default_ignore_patterns() -> Vec<String> {
    ["Library", "Temp", "Logs", "obj"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_progress_interval() -> usize {
    30
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root
            && root.as_os_str().is_empty()
        {
            return Err("Root path cannot be empty".to_string());
        }
        if let Some(ref extensions) = self.extensions {
            if extensions.is_empty() {
                return Err("At least one extension is required".to_string());
            }
            if let Some(bad) = extensions.iter().find(|e| !e.starts_with('.') || e.len() < 2) {
                return Err(format!("Extension '{bad}' must look like '.png'"));
            }
        }
        if self.progress_interval == Some(0) {
            return Err("Progress interval must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a config with defaults for the given project root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: default_extensions(),
            excluded_prefixes: default_excluded_prefixes(),
            ignore_patterns: default_ignore_patterns(),
            progress_interval: default_progress_interval(),
            follow_symlinks: false,
            include_hidden: false,
        }
    }

    /// Whether a project-relative path is a recognized, non-excluded asset.
    pub fn accepts(&self, path: &str) -> bool {
        if self.excluded_prefixes.iter().any(|p| path.starts_with(p.as_str())) {
            return false;
        }
        let (_, ext) = split_extension(file_name(path));
        self.extensions.iter().any(|e| e == ext)
    }

    /// Check if a directory entry should be skipped based on patterns.
    pub fn should_ignore(&self, name: &str) -> bool {
        self.ignore_patterns.iter().any(|pattern| {
            if let Some(prefix) = pattern.strip_suffix('*') {
                name.starts_with(prefix)
            } else if let Some(suffix) = pattern.strip_prefix('*') {
                name.ends_with(suffix)
            } else {
                name == pattern
            }
        })
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
