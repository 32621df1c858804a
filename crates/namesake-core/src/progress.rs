//! Scan progress reporting.

use serde::Serialize;

/// Progress snapshot emitted while grouping paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanProgress {
    /// Paths grouped so far.
    pub processed: usize,
    /// Total paths that passed the extension/prefix filter.
    pub total: usize,
    /// Path that was just processed.
    pub current_path: String,
}

impl ScanProgress {
    /// Completed fraction in `0.0..=1.0`. An empty scan counts as complete.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.processed as f64 / self.total as f64
        }
    }

    /// Whether every path has been processed.
    pub fn is_complete(&self) -> bool {
        self.processed >= self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction() {
        let progress = ScanProgress {
            processed: 15,
            total: 60,
            current_path: "Assets/a.png".into(),
        };
        assert!((progress.fraction() - 0.25).abs() < f64::EPSILON);
        assert!(!progress.is_complete());

        assert_eq!(ScanProgress::default().fraction(), 1.0);
        assert!(ScanProgress::default().is_complete());
    }
}
