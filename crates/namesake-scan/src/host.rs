//! Filesystem-backed asset host.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;
use tracing::{debug, warn};

use namesake_core::{
    AssetHost, HostError, ScanConfig, Thumbnail, file_name, parent_dir, split_extension,
    validate_base_name,
};

/// Extension of the sidecar files that travel with an asset.
pub const SIDECAR_EXTENSION: &str = ".meta";

/// Asset host over a project directory on disk.
///
/// Paths handed out and accepted are relative to the project root and use
/// `/` as separator. Renames move the asset's `.meta` sidecar along with it
/// and never overwrite an existing file.
#[derive(Debug, Clone)]
pub struct ProjectHost {
    root: PathBuf,
    config: ScanConfig,
    pending_renames: usize,
}

impl ProjectHost {
    /// Open the project at `config.root`.
    pub fn open(config: ScanConfig) -> Result<Self, HostError> {
        let root = config
            .root
            .canonicalize()
            .map_err(|e| HostError::io(&config.root, e))?;

        if !root.is_dir() {
            return Err(HostError::NotADirectory { path: root });
        }

        Ok(Self {
            root,
            config,
            pending_renames: 0,
        })
    }

    /// Canonical project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Absolute location of a project-relative path.
    pub fn absolute(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    /// Project-relative form of `path`, or `None` outside the root or when a
    /// component is not valid UTF-8.
    fn relative(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let parts = rel
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<Vec<_>>>()?;
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("/"))
        }
    }
}

impl AssetHost for ProjectHost {
    fn asset_paths(&self) -> Result<Vec<String>, HostError> {
        let ignore = self.config.clone();

        let walker = WalkDir::new(&self.root)
            .skip_hidden(!self.config.include_hidden)
            .follow_links(self.config.follow_symlinks)
            .process_read_dir(move |_depth, _path, _state, children| {
                children.retain(|entry| match entry {
                    Ok(e) => {
                        !(e.file_type().is_dir()
                            && ignore.should_ignore(&e.file_name().to_string_lossy()))
                    }
                    Err(_) => true,
                });
            });

        let mut paths = Vec::new();
        let mut skipped = 0usize;

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    skipped += 1;
                    warn!(
                        path = ?err.path(),
                        error = %err,
                        "skipping unreadable entry"
                    );
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            match self.relative(&path) {
                Some(rel) => paths.push(rel),
                None => {
                    skipped += 1;
                    warn!(path = ?path, "skipping path that is not valid UTF-8");
                }
            }
        }

        debug!(
            root = %self.root.display(),
            files = paths.len(),
            skipped,
            "enumerated project files"
        );
        Ok(paths)
    }

    fn thumbnail(&self, path: &str) -> Result<Thumbnail, HostError> {
        let location = self.absolute(path);
        let metadata = fs::metadata(&location).map_err(|e| HostError::io(&location, e))?;
        Ok(Thumbnail::new(
            location,
            metadata.len(),
            metadata.modified().ok(),
        ))
    }

    fn rename_asset(&mut self, path: &str, new_base_name: &str) -> Result<String, HostError> {
        validate_base_name(new_base_name)
            .map_err(|reason| HostError::other(format!("'{new_base_name}': {reason}")))?;

        let source = self.absolute(path);
        if !source.is_file() {
            return Err(HostError::NotFound { path: source });
        }

        let (_, ext) = split_extension(file_name(path));
        let new_name = format!("{new_base_name}{ext}");
        let dir = parent_dir(path);
        let new_path = if dir.is_empty() {
            new_name
        } else {
            format!("{dir}/{new_name}")
        };

        let destination = self.absolute(&new_path);
        if destination == source {
            return Ok(path.to_string());
        }
        // A case-only rename on a case-insensitive filesystem sees itself
        let case_only = is_case_variant(&source, &destination);
        if destination.exists() && !case_only {
            return Err(HostError::AlreadyExists { path: destination });
        }

        let source_meta = sidecar(&source);
        let destination_meta = sidecar(&destination);
        let move_meta = source_meta.is_file();
        if move_meta && destination_meta.exists() && !case_only {
            return Err(HostError::AlreadyExists {
                path: destination_meta,
            });
        }

        fs::rename(&source, &destination).map_err(|e| HostError::io(&source, e))?;

        if move_meta {
            if let Err(e) = fs::rename(&source_meta, &destination_meta) {
                if let Err(rollback) = fs::rename(&destination, &source) {
                    warn!(
                        path = %destination.display(),
                        error = %rollback,
                        "could not roll back asset after sidecar rename failed"
                    );
                }
                return Err(HostError::io(&source_meta, e));
            }
        }

        self.pending_renames += 1;
        debug!(from = path, to = %new_path, sidecar = move_meta, "renamed asset on disk");
        Ok(new_path)
    }

    fn save(&mut self) -> Result<(), HostError> {
        // Renames hit the filesystem immediately; nothing is buffered.
        debug!(renames = self.pending_renames, "save");
        self.pending_renames = 0;
        Ok(())
    }
}

/// `<path>.meta`
fn sidecar(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(SIDECAR_EXTENSION);
    PathBuf::from(name)
}

/// Whether `destination` names the same directory entry as `source` with
/// only the letter case changed.
fn is_case_variant(source: &Path, destination: &Path) -> bool {
    let (Some(from), Some(to)) = (source.file_name(), destination.file_name()) else {
        return false;
    };
    if from == to || from.to_string_lossy().to_lowercase() != to.to_string_lossy().to_lowercase() {
        return false;
    }
    same_entry(source, destination)
}

#[cfg(unix)]
fn same_entry(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::symlink_metadata(a), fs::symlink_metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn same_entry(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sidecar_path() {
        assert_eq!(
            sidecar(Path::new("/p/Assets/icon.png")),
            PathBuf::from("/p/Assets/icon.png.meta")
        );
    }

    #[test]
    fn test_open_rejects_files() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.png");
        fs::write(&file, b"x").unwrap();

        let err = ProjectHost::open(ScanConfig::new(&file)).unwrap_err();
        assert!(matches!(err, HostError::NotADirectory { .. }));

        let err = ProjectHost::open(ScanConfig::new(temp.path().join("missing"))).unwrap_err();
        assert!(matches!(err, HostError::NotFound { .. }));
    }

    #[test]
    fn test_relative_paths_use_forward_slashes() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("Assets/ui")).unwrap();
        fs::write(temp.path().join("Assets/ui/icon.png"), b"x").unwrap();

        let host = ProjectHost::open(ScanConfig::new(temp.path())).unwrap();
        let paths = host.asset_paths().unwrap();
        assert_eq!(paths, vec!["Assets/ui/icon.png"]);
    }

    #[test]
    fn test_case_variant_requires_same_entry() {
        let temp = TempDir::new().unwrap();
        let lower = temp.path().join("icon.png");
        let upper = temp.path().join("Icon.png");
        fs::write(&lower, b"x").unwrap();

        // Identical name is not a case change
        assert!(!is_case_variant(&lower, &lower));

        // Case-insensitive filesystems already resolve `Icon.png` to the file
        if !upper.exists() {
            assert!(!is_case_variant(&lower, &upper));
            fs::hard_link(&lower, &upper).unwrap();
        }
        assert!(is_case_variant(&lower, &upper));

        // Same inode but a different name is still a distinct asset
        let other = temp.path().join("other.png");
        fs::hard_link(&lower, &other).unwrap();
        assert!(!is_case_variant(&lower, &other));
    }

    #[test]
    fn test_rename_to_distinct_hard_link_is_rejected() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("icon.png"), b"x").unwrap();
        fs::hard_link(temp.path().join("icon.png"), temp.path().join("other.png")).unwrap();

        let mut host = ProjectHost::open(ScanConfig::new(temp.path())).unwrap();
        let err = host.rename_asset("icon.png", "other").unwrap_err();
        assert!(matches!(err, HostError::AlreadyExists { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_paths_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("icon.png"), b"x").unwrap();
        let bad = temp.path().join(OsStr::from_bytes(b"bad\xff.png"));
        if fs::write(&bad, b"x").is_err() {
            // Filesystem refuses non-UTF-8 names
            return;
        }

        let host = ProjectHost::open(ScanConfig::new(temp.path())).unwrap();
        assert_eq!(host.relative(&host.root().join(OsStr::from_bytes(b"bad\xff.png"))), None);
        assert_eq!(host.asset_paths().unwrap(), vec!["icon.png"]);
    }
}
