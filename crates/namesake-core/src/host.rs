//! The host seam: everything that touches real files.

use std::cell::Cell;
use std::collections::HashSet;
use std::path::PathBuf;

use crate::error::HostError;
use crate::names::{file_name, parent_dir, split_extension};
use crate::record::Thumbnail;

/// Asset-management environment the core delegates I/O to.
pub trait AssetHost {
    /// Enumerate project-relative asset paths, in any order.
    fn asset_paths(&self) -> Result<Vec<String>, HostError>;

    /// Resolve a path to a displayable handle.
    fn thumbnail(&self, path: &str) -> Result<Thumbnail, HostError>;

    /// Rename the asset at `path` to `new_base_name` plus its original extension.
    ///
    /// Must not overwrite an existing asset. Returns the new project-relative path.
    fn rename_asset(&mut self, path: &str, new_base_name: &str) -> Result<String, HostError>;

    /// Flush pending changes.
    fn save(&mut self) -> Result<(), HostError>;
}

impl<H: AssetHost + ?Sized> AssetHost for Box<H> {
    fn asset_paths(&self) -> Result<Vec<String>, HostError> {
        (**self).asset_paths()
    }

    fn thumbnail(&self, path: &str) -> Result<Thumbnail, HostError> {
        (**self).thumbnail(path)
    }

    fn rename_asset(&mut self, path: &str, new_base_name: &str) -> Result<String, HostError> {
        (**self).rename_asset(path, new_base_name)
    }

    fn save(&mut self) -> Result<(), HostError> {
        (**self).save()
    }
}

/// Host that keeps the project in memory.
///
/// Useful for previews and dry runs. Failures can be injected per path to
/// exercise error handling.
#[derive(Debug, Default)]
pub struct MemoryHost {
    paths: Vec<String>,
    failing_renames: HashSet<String>,
    fail_save: bool,
    renames: Vec<(String, String)>,
    saves: usize,
    thumbnail_requests: Cell<usize>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host pre-populated with the given paths.
    pub fn with_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Make every rename of `path` fail.
    pub fn fail_rename_of(&mut self, path: impl Into<String>) {
        self.failing_renames.insert(path.into());
    }

    /// Make [`AssetHost::save`] fail.
    pub fn fail_save(&mut self, fail: bool) {
        self.fail_save = fail;
    }

    /// Current paths.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Successful renames as `(from, to)` pairs, in order.
    pub fn renames(&self) -> &[(String, String)] {
        &self.renames
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.saves
    }

    /// Number of thumbnail lookups served.
    pub fn thumbnail_requests(&self) -> usize {
        self.thumbnail_requests.get()
    }
}

impl AssetHost for MemoryHost {
    fn asset_paths(&self) -> Result<Vec<String>, HostError> {
        Ok(self.paths.clone())
    }

    fn thumbnail(&self, path: &str) -> Result<Thumbnail, HostError> {
        if !self.paths.iter().any(|p| p == path) {
            return Err(HostError::NotFound { path: path.into() });
        }
        self.thumbnail_requests.set(self.thumbnail_requests.get() + 1);
        Ok(Thumbnail::new(PathBuf::from(path), 0, None))
    }

    fn rename_asset(&mut self, path: &str, new_base_name: &str) -> Result<String, HostError> {
        if self.failing_renames.contains(path) {
            return Err(HostError::other(format!("rename of {path} rejected")));
        }
        let index = self
            .paths
            .iter()
            .position(|p| p == path)
            .ok_or_else(|| HostError::NotFound { path: path.into() })?;

        let (_, ext) = split_extension(file_name(path));
        let dir = parent_dir(path);
        let new_path = if dir.is_empty() {
            format!("{new_base_name}{ext}")
        } else {
            format!("{dir}/{new_base_name}{ext}")
        };

        if new_path != path && self.paths.contains(&new_path) {
            return Err(HostError::AlreadyExists {
                path: new_path.into(),
            });
        }

        self.paths[index].clone_from(&new_path);
        self.renames.push((path.to_string(), new_path.clone()));
        Ok(new_path)
    }

    fn save(&mut self) -> Result<(), HostError> {
        if self.fail_save {
            return Err(HostError::other("save rejected"));
        }
        self.saves += 1;
        Ok(())
    }
}
