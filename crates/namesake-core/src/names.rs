//! Filename helpers for project-relative paths.
//!
//! Asset paths are plain strings using `/` (hosts may hand back `\` on
//! Windows, which is accepted as a separator too).

/// Final path component.
pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Everything before the final path component, without the trailing separator.
pub fn parent_dir(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(i) => &path[..i],
        None => "",
    }
}

/// Split a filename into base name and extension (extension keeps its dot).
///
/// `"icon.png"` gives `("icon", ".png")`, `"archive.tar.gz"` gives
/// `("archive.tar", ".gz")`, and a name without a dot has an empty extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(i) if i + 1 < name.len() => (&name[..i], &name[i..]),
        _ => (name, ""),
    }
}

/// Longest filename, extension included, most filesystems accept.
pub const MAX_NAME_LEN: usize = 255;

/// Validate a base name for cross-platform use as a filename.
pub fn validate_base_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".into());
    }

    if name.len() > MAX_NAME_LEN {
        return Err(format!("Name is too long (max {MAX_NAME_LEN} bytes)"));
    }

    for c in ['/', '\\', '\0'] {
        if name.contains(c) {
            return Err(format!("Name cannot contain '{}'", c.escape_default()));
        }
    }

    #[cfg(target_os = "windows")]
    {
        for c in [':', '*', '?', '"', '<', '>', '|'] {
            if name.contains(c) {
                return Err(format!("Name cannot contain '{c}'"));
            }
        }
    }

    if name == "." || name == ".." {
        return Err("'.' and '..' are reserved names".into());
    }

    if name.starts_with(' ') || name.ends_with(' ') {
        return Err("Name cannot start or end with spaces".into());
    }

    if name.ends_with('.') {
        return Err("Name cannot end with a dot".into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("Assets/ui/icon.png"), "icon.png");
        assert_eq!(file_name("icon.png"), "icon.png");
        assert_eq!(file_name("Assets\\ui\\icon.png"), "icon.png");
    }

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir("Assets/ui/icon.png"), "Assets/ui");
        assert_eq!(parent_dir("icon.png"), "");
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("icon.png"), ("icon", ".png"));
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_extension("README"), ("README", ""));
        assert_eq!(split_extension("trailing."), ("trailing.", ""));
    }

    #[test]
    fn test_validate_base_name() {
        assert!(validate_base_name("icon_large").is_ok());
        assert!(validate_base_name("icon large").is_ok());
        assert!(validate_base_name("v1.2").is_ok());

        assert!(validate_base_name("").is_err());
        assert!(validate_base_name("ui/icon").is_err());
        assert!(validate_base_name("ui\\icon").is_err());
        assert!(validate_base_name(".").is_err());
        assert!(validate_base_name("..").is_err());
        assert!(validate_base_name(" icon").is_err());
        assert!(validate_base_name("icon.").is_err());
        assert!(validate_base_name(&"a".repeat(256)).is_err());
    }
}
