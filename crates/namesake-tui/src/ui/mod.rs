//! UI components and widgets.

mod help;
pub mod modals;

pub use help::HelpOverlay;

/// Format a byte size in human-readable form.
pub fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Format a timestamp relative to now.
pub fn format_relative_time(time: std::time::SystemTime) -> String {
    let now = std::time::SystemTime::now();
    match now.duration_since(time) {
        Ok(duration) => {
            let secs = duration.as_secs();
            if secs < 60 {
                "just now".to_string()
            } else if secs < 3600 {
                format!("{}m ago", secs / 60)
            } else if secs < 86400 {
                format!("{}h ago", secs / 3600)
            } else if secs < 2592000 {
                format!("{}d ago", secs / 86400)
            } else if secs < 31536000 {
                format!("{}mo ago", secs / 2592000)
            } else {
                format!("{}y ago", secs / 31536000)
            }
        }
        Err(_) => "in future".to_string(),
    }
}

/// Keep the end of `text`, prefixing `...` when it is longer than `max_width` characters.
pub fn truncate_left(text: &str, max_width: usize) -> String {
    let count = text.chars().count();
    if count <= max_width {
        return text.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let tail: String = text.chars().skip(count - (max_width - 3)).collect();
    format!("...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    #[test]
    fn test_format_relative_time() {
        let now = SystemTime::now();
        assert_eq!(format_relative_time(now), "just now");
        assert_eq!(format_relative_time(now - Duration::from_secs(7200)), "2h ago");
        assert_eq!(
            format_relative_time(now + Duration::from_secs(3600)),
            "in future"
        );
    }

    #[test]
    fn test_truncate_left() {
        assert_eq!(truncate_left("Assets/ui/icon.png", 40), "Assets/ui/icon.png");
        assert_eq!(truncate_left("Assets/ui/icon.png", 11), "...icon.png");
        assert_eq!(truncate_left("Assets", 2), "..");
    }
}
