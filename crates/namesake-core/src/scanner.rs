//! Grouping of project paths by filename.

use tracing::debug;

use crate::config::ScanConfig;
use crate::group::AssetGroups;
use crate::progress::ScanProgress;
use crate::record::AssetRecord;

/// Turns a flat list of project-relative paths into filename groups.
#[derive(Debug, Clone)]
pub struct AssetScanner<'a> {
    config: &'a ScanConfig,
}

impl<'a> AssetScanner<'a> {
    /// Create a scanner using the given config's extension and prefix filters.
    pub fn new(config: &'a ScanConfig) -> Self {
        Self { config }
    }

    /// Group paths without progress reporting.
    pub fn scan<I, S>(&self, paths: I) -> AssetGroups
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scan_with_progress(paths, |_| {})
    }

    /// Group paths, reporting progress every `progress_interval` paths and once at the end.
    ///
    /// Paths are filtered, then sorted lexicographically, so the resulting
    /// group order is the same for the same set of files.
    pub fn scan_with_progress<I, S, F>(&self, paths: I, mut on_progress: F) -> AssetGroups
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: FnMut(&ScanProgress),
    {
        let mut accepted: Vec<String> = paths
            .into_iter()
            .map(Into::into)
            .filter(|p| self.config.accepts(p))
            .collect();
        accepted.sort();

        let total = accepted.len();
        let interval = self.config.progress_interval.max(1);
        let mut groups = AssetGroups::new();
        let mut progress = ScanProgress {
            processed: 0,
            total,
            current_path: String::new(),
        };

        for (index, path) in accepted.into_iter().enumerate() {
            if index % interval == 0 {
                progress.processed = index + 1;
                progress.current_path.clone_from(&path);
                on_progress(&progress);
            }
            groups.insert(AssetRecord::new(path));
        }

        progress.processed = total;
        on_progress(&progress);

        debug!(
            groups = groups.len(),
            records = total,
            "grouped assets by filename"
        );
        groups
    }
}
