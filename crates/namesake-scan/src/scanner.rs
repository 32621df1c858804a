//! Scan driver that broadcasts progress.

use std::time::Instant;

use tokio::sync::broadcast;
use tracing::info;

use namesake_core::{AssetHost, ScanProgress, Session, SessionError};

/// Drives [`Session::scan`] and publishes [`ScanProgress`] to subscribers.
pub struct ProjectScanner {
    progress_tx: broadcast::Sender<ScanProgress>,
}

impl ProjectScanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self { progress_tx }
    }

    /// Subscribe to scan progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    /// Rescan the session's host, broadcasting progress.
    ///
    /// Returns the number of groups found.
    pub fn scan<H: AssetHost>(&self, session: &mut Session<H>) -> Result<usize, SessionError> {
        self.scan_with(session, |_| {})
    }

    /// Like [`ProjectScanner::scan`], also calling `on_progress` for every update.
    pub fn scan_with<H, F>(
        &self,
        session: &mut Session<H>,
        mut on_progress: F,
    ) -> Result<usize, SessionError>
    where
        H: AssetHost,
        F: FnMut(&ScanProgress),
    {
        let start = Instant::now();

        let groups = session.scan_with_progress(|progress| {
            // No receivers is fine.
            let _ = self.progress_tx.send(progress.clone());
            on_progress(progress);
        })?;

        info!(
            groups = groups,
            assets = session.groups().record_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "scan complete"
        );
        Ok(groups)
    }
}

impl Default for ProjectScanner {
    fn default() -> Self {
        Self::new()
    }
}
