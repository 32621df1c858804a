//! Flattening the current page into list rows.

use std::ops::Range;

use namesake_core::GroupEntry;

use super::constants::MEMBER_WINDOW;
use super::state::Row;

/// Visible member range of an expanded group with `len` members scrolled to `scroll`.
pub fn member_window(len: usize, scroll: usize) -> Range<usize> {
    let start = scroll.min(len.saturating_sub(MEMBER_WINDOW));
    start..(start + MEMBER_WINDOW).min(len)
}

/// Group headers, each followed by its visible members when expanded.
pub fn build_rows(entries: &[GroupEntry<'_>]) -> Vec<Row> {
    let mut rows = Vec::new();
    for entry in entries {
        rows.push(Row::Group {
            key: entry.key.clone(),
        });
        if entry.ui.expanded {
            for index in member_window(entry.members.len(), entry.ui.scroll) {
                rows.push(Row::Member {
                    key: entry.key.clone(),
                    index,
                });
            }
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use namesake_core::{MemoryHost, ScanConfig, Session};

    #[test]
    fn test_member_window() {
        assert_eq!(member_window(3, 0), 0..3);
        assert_eq!(member_window(20, 0), 0..MEMBER_WINDOW);
        assert_eq!(member_window(20, 5), 5..5 + MEMBER_WINDOW);
        // Scroll past the end is pulled back to a full window
        assert_eq!(member_window(20, 19), 20 - MEMBER_WINDOW..20);
        assert_eq!(member_window(0, 4), 0..0);
    }

    #[test]
    fn test_rows_follow_expansion() {
        let mut session = Session::new(
            MemoryHost::with_paths(["a/x.png", "b/x.png", "a/y.png", "b/y.png", "c/y.png"]),
            ScanConfig::default(),
        );
        session.scan().unwrap();
        assert_eq!(build_rows(&session.current_entries()).len(), 2);

        session.set_expanded("y.png", true).unwrap();
        let rows = build_rows(&session.current_entries());
        assert_eq!(rows.len(), 5);
        assert_eq!(
            rows[4],
            Row::Member {
                key: "y.png".into(),
                index: 2
            }
        );
    }
}
