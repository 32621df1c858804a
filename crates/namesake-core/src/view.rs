//! The filtered view and its per-group UI state.

use indexmap::IndexMap;
use serde::Serialize;

use crate::group::GroupKey;
use crate::names::split_extension;

/// UI state for one group in the filtered view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupUiState {
    /// Whether the member list is shown.
    pub expanded: bool,
    /// Scroll offset within the member list.
    pub scroll: usize,
    /// Base name typed into the rename field.
    pub pending_name: String,
}

impl GroupUiState {
    /// Collapsed, unscrolled state with the given pending name.
    pub fn new(pending_name: impl Into<String>) -> Self {
        Self {
            expanded: false,
            scroll: 0,
            pending_name: pending_name.into(),
        }
    }

    /// Fresh state for a group key: pending name is the key's base name.
    pub fn for_key(key: &str) -> Self {
        Self::new(split_extension(key).0)
    }
}

/// Ordered subset of group keys with their UI state.
///
/// Iteration order is display order. UI state lives next to the key, so it
/// cannot drift out of alignment with the groups it describes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilteredView {
    entries: IndexMap<GroupKey, GroupUiState>,
}

impl FilteredView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a view with fresh UI state for every key.
    pub fn from_keys<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = GroupKey>,
    {
        let entries = keys
            .into_iter()
            .map(|key| {
                let state = GroupUiState::for_key(&key);
                (key, state)
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &GroupUiState)> {
        self.entries.iter()
    }

    pub fn get(&self, key: &str) -> Option<&GroupUiState> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut GroupUiState> {
        self.entries.get_mut(key)
    }

    /// Position of a key in display order.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.entries.get_index_of(key)
    }

    /// Entries in `range`, clamped to the view.
    pub fn slice(
        &self,
        range: std::ops::Range<usize>,
    ) -> impl Iterator<Item = (&GroupKey, &GroupUiState)> {
        let start = range.start.min(self.len());
        let end = range.end.clamp(start, self.len());
        self.entries.iter().skip(start).take(end - start)
    }

    /// Append a collapsed entry if the key is not in the view yet.
    ///
    /// Returns `true` when a new entry was added.
    pub fn ensure(&mut self, key: GroupKey, pending_name: &str) -> bool {
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, GroupUiState::new(pending_name));
        true
    }

    /// Drop a key and its UI state, keeping the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<GroupUiState> {
        self.entries.shift_remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_keys_resets_state() {
        let view = FilteredView::from_keys(["b.png".into(), "a.jpg".into()]);

        assert_eq!(view.len(), 2);
        assert_eq!(view.index_of("a.jpg"), Some(1));
        let state = view.get("b.png").unwrap();
        assert!(!state.expanded);
        assert_eq!(state.scroll, 0);
        assert_eq!(state.pending_name, "b");
    }

    #[test]
    fn test_ensure_and_remove() {
        let mut view = FilteredView::from_keys(["b.png".into()]);

        assert!(view.ensure("c.png".into(), "c"));
        assert!(!view.ensure("c.png".into(), "other"));
        assert_eq!(view.get("c.png").unwrap().pending_name, "c");

        assert!(view.remove("b.png").is_some());
        let keys: Vec<_> = view.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["c.png"]);
    }

    #[test]
    fn test_slice_clamps() {
        let view = FilteredView::from_keys(["a.png".into(), "b.png".into(), "c.png".into()]);

        let keys: Vec<_> = view.slice(1..10).map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["b.png", "c.png"]);
        assert_eq!(view.slice(5..8).count(), 0);
    }
}
