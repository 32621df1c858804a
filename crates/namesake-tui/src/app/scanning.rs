//! Background scanning.

use tokio::sync::mpsc;

use namesake_core::{HostError, Session, SessionError};
use namesake_scan::{ProjectHost, ProjectScanner};

use super::constants::SCAN_CHANNEL_SIZE;
use super::state::ScanResult;

/// Start a background rescan of `session`.
///
/// The session moves into the scan task and comes back in
/// [`ScanResult::Complete`]. Progress updates arrive before it.
pub fn start_scan(mut session: Session<ProjectHost>) -> mpsc::Receiver<ScanResult> {
    let (tx, rx) = mpsc::channel(SCAN_CHANNEL_SIZE);

    tokio::spawn(async move {
        let scanner = ProjectScanner::new();
        let mut progress_rx = scanner.subscribe();

        // Forward progress updates
        let tx_progress = tx.clone();
        let progress_task = tokio::spawn(async move {
            while let Ok(progress) = progress_rx.recv().await {
                if tx_progress.send(ScanResult::Progress(progress)).await.is_err() {
                    break;
                }
            }
        });

        // jwalk walks on its own thread pool; keep it off the async workers
        let joined = tokio::task::spawn_blocking(move || {
            let result = scanner.scan(&mut session);
            (session, result)
        })
        .await;

        progress_task.abort();

        match joined {
            Ok((session, result)) => {
                let _ = tx
                    .send(ScanResult::Complete {
                        session: Box::new(session),
                        result,
                    })
                    .await;
            }
            Err(e) => {
                // The session was lost with the task; the app reports it and
                // reopens the project.
                tracing::error!(error = %e, "scan task failed");
                let _ = tx
                    .send(ScanResult::Failed(SessionError::Host(HostError::other(
                        e.to_string(),
                    ))))
                    .await;
            }
        }
    });

    rx
}
