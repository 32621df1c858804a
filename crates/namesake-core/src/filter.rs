//! Filter engine: duplicates-only and case-insensitive search.

use serde::{Deserialize, Serialize};

use crate::group::AssetGroups;
use crate::view::FilteredView;

/// Parameters for deriving a filtered view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterParams {
    /// Keep only groups with more than one member.
    pub duplicates_only: bool,
    /// Case-insensitive substring the key must contain. Empty matches everything.
    pub search: String,
}

impl FilterParams {
    pub fn new(duplicates_only: bool, search: impl Into<String>) -> Self {
        Self {
            duplicates_only,
            search: search.into(),
        }
    }
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            duplicates_only: true,
            search: String::new(),
        }
    }
}

/// Derive a filtered view from the source groups.
///
/// Pure: the source is never touched and the same inputs always produce the
/// same view, including order. Every entry gets fresh UI state.
pub fn filter(groups: &AssetGroups, params: &FilterParams) -> FilteredView {
    let needle = params.search.to_lowercase();

    let keys = groups
        .iter()
        .filter(|(_, members)| !params.duplicates_only || members.len() > 1)
        .filter(|(key, _)| needle.is_empty() || key.to_lowercase().contains(&needle))
        .map(|(key, _)| key.clone());

    FilteredView::from_keys(keys)
}
