//! Asset records and thumbnail handles.

use std::path::PathBuf;
use std::time::SystemTime;

use serde::Serialize;

use crate::error::HostError;
use crate::host::AssetHost;
use crate::names::file_name;

/// Displayable handle for an asset, resolved by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Thumbnail {
    /// Location the host resolved the asset to.
    pub location: PathBuf,
    /// File size in bytes.
    pub size: u64,
    /// Last modification time, when the host knows it.
    pub modified: Option<SystemTime>,
}

impl Thumbnail {
    /// Create a new thumbnail handle.
    pub fn new(location: impl Into<PathBuf>, size: u64, modified: Option<SystemTime>) -> Self {
        Self {
            location: location.into(),
            size,
            modified,
        }
    }
}

/// One discovered asset file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetRecord {
    path: String,
    #[serde(skip)]
    thumbnail: Option<Thumbnail>,
    selected: bool,
}

impl AssetRecord {
    /// Create an unselected record with no thumbnail resolved yet.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            thumbnail: None,
            selected: false,
        }
    }

    /// Project-relative path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Filename including extension; equal to the key of the owning group.
    pub fn file_name(&self) -> &str {
        file_name(&self.path)
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Flip the selection flag, returning the new value.
    pub fn toggle_selected(&mut self) -> bool {
        self.selected = !self.selected;
        self.selected
    }

    /// Thumbnail if it has been resolved already.
    pub fn thumbnail(&self) -> Option<&Thumbnail> {
        self.thumbnail.as_ref()
    }

    /// Resolve the thumbnail on first use and cache it for the record's lifetime.
    pub fn resolve_thumbnail<H: AssetHost + ?Sized>(
        &mut self,
        host: &H,
    ) -> Result<&Thumbnail, HostError> {
        if self.thumbnail.is_none() {
            self.thumbnail = Some(host.thumbnail(&self.path)?);
        }
        self.thumbnail
            .as_ref()
            .ok_or_else(|| HostError::other("thumbnail cache is empty"))
    }

    /// Point the record at a new path. Drops the cached thumbnail and clears selection.
    pub(crate) fn relocate(&mut self, path: String) {
        self.path = path;
        self.thumbnail = None;
        self.selected = false;
    }
}
