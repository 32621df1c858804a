//! Filesystem host and scan driver for namesake.
//!
//! # Overview
//!
//! `namesake-scan` connects the pure grouping model in `namesake-core` to a
//! project directory on disk:
//!
//! - **[`ProjectHost`]** enumerates files with jwalk, stats them for previews
//!   and renames them together with their `.meta` sidecars
//! - **[`ProjectScanner`]** runs a session scan and broadcasts progress
//!
//! # Example
//!
//! ```rust,no_run
//! use namesake_scan::{ProjectHost, ProjectScanner, ScanConfig, Session};
//!
//! let config = ScanConfig::new("/path/to/project");
//! let host = ProjectHost::open(config.clone()).unwrap();
//! let mut session = Session::new(host, config);
//!
//! let scanner = ProjectScanner::new();
//! let groups = scanner.scan(&mut session).unwrap();
//! println!("{groups} duplicate groups");
//! ```
//!
//! # Progress Monitoring
//!
//! ```rust,no_run
//! use namesake_scan::ProjectScanner;
//!
//! let scanner = ProjectScanner::new();
//! let mut progress_rx = scanner.subscribe();
//!
//! tokio::spawn(async move {
//!     while let Ok(progress) = progress_rx.recv().await {
//!         println!("{}/{}", progress.processed, progress.total);
//!     }
//! });
//! ```

mod host;
mod scanner;

pub use host::{ProjectHost, SIDECAR_EXTENSION};
pub use scanner::ProjectScanner;

// Re-export core types for convenience
pub use namesake_core::{
    AssetGroups, AssetHost, FilterParams, HostError, ScanConfig, ScanProgress, Session,
    SessionError,
};
