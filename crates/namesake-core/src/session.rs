//! Session: the command API that front-ends drive.

use serde::Serialize;
use tracing::debug;

use crate::config::ScanConfig;
use crate::error::SessionError;
use crate::filter::{FilterParams, filter};
use crate::group::{AssetGroups, GroupKey};
use crate::host::AssetHost;
use crate::names::split_extension;
use crate::page::Pager;
use crate::progress::ScanProgress;
use crate::record::{AssetRecord, Thumbnail};
use crate::rename::{RenameOutcome, rename_selected};
use crate::scanner::AssetScanner;
use crate::view::{FilteredView, GroupUiState};

/// Scan results, filter state and pagination for one project.
///
/// Every command runs to completion before returning. Commands that change
/// the filter parameters rebuild the view and reset all per-group UI state.
pub struct Session<H> {
    host: H,
    config: ScanConfig,
    groups: AssetGroups,
    view: FilteredView,
    params: FilterParams,
    pager: Pager,
}

/// A group on the current page, as seen by a renderer.
#[derive(Debug, Clone, Copy)]
pub struct GroupEntry<'a> {
    pub key: &'a GroupKey,
    pub members: &'a [AssetRecord],
    pub ui: &'a GroupUiState,
}

/// Serializable snapshot of one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSnapshot {
    pub key: String,
    pub members: Vec<MemberSnapshot>,
    pub expanded: bool,
    pub pending_name: String,
}

/// Serializable snapshot of one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberSnapshot {
    pub path: String,
    pub selected: bool,
}

/// Serializable snapshot of the current page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub total_groups: usize,
    pub total_assets: usize,
    pub filtered_groups: usize,
    pub duplicates_only: bool,
    pub search: String,
    pub page: usize,
    pub page_count: usize,
    pub groups: Vec<GroupSnapshot>,
}

impl<H: AssetHost> Session<H> {
    /// Create an empty session. Nothing is scanned until [`Session::scan`].
    pub fn new(host: H, config: ScanConfig) -> Self {
        Self {
            host,
            config,
            groups: AssetGroups::new(),
            view: FilteredView::new(),
            params: FilterParams::default(),
            pager: Pager::new(),
        }
    }

    /// Use the given filter parameters instead of the defaults.
    pub fn with_filter(mut self, params: FilterParams) -> Self {
        self.params = params;
        self.refilter();
        self
    }

    /// Use a custom pager (page size).
    pub fn with_pager(mut self, pager: Pager) -> Self {
        self.pager = pager;
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn groups(&self) -> &AssetGroups {
        &self.groups
    }

    pub fn view(&self) -> &FilteredView {
        &self.view
    }

    pub fn params(&self) -> &FilterParams {
        &self.params
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    /// Enumerate assets through the host and rebuild groups and view.
    ///
    /// Returns the number of groups found.
    pub fn scan(&mut self) -> Result<usize, SessionError> {
        self.scan_with_progress(|_| {})
    }

    /// Like [`Session::scan`], reporting grouping progress.
    pub fn scan_with_progress<F>(&mut self, on_progress: F) -> Result<usize, SessionError>
    where
        F: FnMut(&ScanProgress),
    {
        let paths = self.host.asset_paths()?;
        self.groups = AssetScanner::new(&self.config).scan_with_progress(paths, on_progress);
        self.refilter();
        Ok(self.groups.len())
    }

    /// Rebuild the view from the groups with the current parameters.
    pub fn refilter(&mut self) {
        self.view = filter(&self.groups, &self.params);
        self.pager.reset();
        debug!(
            groups = self.groups.len(),
            shown = self.view.len(),
            duplicates_only = self.params.duplicates_only,
            search = %self.params.search,
            "rebuilt filtered view"
        );
    }

    /// Apply a search term. An empty term shows everything.
    pub fn search(&mut self, term: impl Into<String>) {
        self.params.search = term.into();
        self.refilter();
    }

    /// Clear the search term.
    pub fn reset_search(&mut self) {
        self.params.search.clear();
        self.refilter();
    }

    pub fn set_duplicates_only(&mut self, duplicates_only: bool) {
        self.params.duplicates_only = duplicates_only;
        self.refilter();
    }

    /// Flip duplicates-only, returning the new value.
    pub fn toggle_duplicates_only(&mut self) -> bool {
        self.set_duplicates_only(!self.params.duplicates_only);
        self.params.duplicates_only
    }

    pub fn current_page(&self) -> usize {
        self.pager.current()
    }

    pub fn page_count(&self) -> usize {
        self.pager.page_count(self.view.len())
    }

    pub fn has_next_page(&self) -> bool {
        self.pager.has_next(self.view.len())
    }

    pub fn has_prev_page(&self) -> bool {
        self.pager.has_prev()
    }

    /// Next page; no-op at the last page.
    pub fn next_page(&mut self) -> bool {
        self.pager.next(self.view.len())
    }

    /// Previous page; no-op at page 0.
    pub fn prev_page(&mut self) -> bool {
        self.pager.prev()
    }

    /// Jump to a page, clamped to the valid range.
    pub fn set_page(&mut self, page: usize) {
        self.pager.set_page(page, self.view.len());
    }

    /// Groups on page `page`, in view order.
    pub fn page(&self, page: usize) -> Vec<GroupEntry<'_>> {
        let range = self.pager.page_range(page, self.view.len());
        self.view
            .slice(range)
            .filter_map(|(key, ui)| {
                self.groups
                    .get(key)
                    .map(|members| GroupEntry { key, members, ui })
            })
            .collect()
    }

    /// Groups on the current page.
    pub fn current_entries(&self) -> Vec<GroupEntry<'_>> {
        self.page(self.pager.current())
    }

    /// Expand or collapse a group. Expanding resets the pending name to the key's base name.
    pub fn toggle_expanded(&mut self, key: &str) -> Result<bool, SessionError> {
        let ui = self.ui_mut(key)?;
        ui.expanded = !ui.expanded;
        if ui.expanded {
            ui.pending_name = split_extension(key).0.to_string();
        }
        Ok(ui.expanded)
    }

    pub fn set_expanded(&mut self, key: &str, expanded: bool) -> Result<(), SessionError> {
        let is_expanded = self.ui_mut(key)?.expanded;
        if is_expanded != expanded {
            self.toggle_expanded(key)?;
        }
        Ok(())
    }

    pub fn set_scroll(&mut self, key: &str, scroll: usize) -> Result<(), SessionError> {
        self.ui_mut(key)?.scroll = scroll;
        Ok(())
    }

    pub fn set_pending_name(
        &mut self,
        key: &str,
        name: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.ui_mut(key)?.pending_name = name.into();
        Ok(())
    }

    /// Set the selection flag of one member.
    pub fn set_selected(
        &mut self,
        key: &str,
        index: usize,
        selected: bool,
    ) -> Result<(), SessionError> {
        self.member_mut(key, index)?.set_selected(selected);
        Ok(())
    }

    /// Flip the selection flag of one member, returning the new value.
    pub fn toggle_selected(&mut self, key: &str, index: usize) -> Result<bool, SessionError> {
        Ok(self.member_mut(key, index)?.toggle_selected())
    }

    /// Select or deselect every member of a group.
    pub fn select_all(&mut self, key: &str, selected: bool) -> Result<(), SessionError> {
        let members = self
            .groups
            .members_mut(key)
            .ok_or_else(|| SessionError::UnknownGroup { key: key.into() })?;
        members.iter_mut().for_each(|m| m.set_selected(selected));
        Ok(())
    }

    /// Select the member whose path is `path`.
    pub fn select_path(&mut self, key: &str, path: &str) -> Result<(), SessionError> {
        let members = self
            .groups
            .members_mut(key)
            .ok_or_else(|| SessionError::UnknownGroup { key: key.into() })?;
        let member = members
            .iter_mut()
            .find(|m| m.path() == path)
            .ok_or_else(|| SessionError::UnknownPath {
                key: key.into(),
                path: path.to_string(),
            })?;
        member.set_selected(true);
        Ok(())
    }

    /// Thumbnail of a member, resolved through the host on first use.
    pub fn thumbnail(&mut self, key: &str, index: usize) -> Result<&Thumbnail, SessionError> {
        let record = self
            .groups
            .member_mut(key, index)
            .ok_or_else(|| SessionError::UnknownMember {
                key: key.into(),
                index,
            })?;
        Ok(record.resolve_thumbnail(&self.host)?)
    }

    /// Rename the selected members of `key` to the group's pending name.
    pub fn rename_selected(&mut self, key: &str) -> Result<RenameOutcome, SessionError> {
        let name = self
            .view
            .get(key)
            .map(|ui| ui.pending_name.clone())
            .ok_or_else(|| SessionError::UnknownGroup { key: key.into() })?;
        self.rename_selected_to(key, &name)
    }

    /// Rename the selected members of `key` to `new_base_name`.
    ///
    /// Mutates groups and view in place rather than re-filtering, so the view
    /// can hold groups the current filters would exclude until the next
    /// refilter.
    pub fn rename_selected_to(
        &mut self,
        key: &str,
        new_base_name: &str,
    ) -> Result<RenameOutcome, SessionError> {
        let result = rename_selected(
            &mut self.groups,
            &mut self.view,
            &mut self.host,
            key,
            new_base_name,
        );
        self.pager.clamp(self.view.len());
        result
    }

    /// Serializable snapshot of the current page.
    pub fn snapshot(&self) -> SessionSnapshot {
        let groups = self
            .current_entries()
            .into_iter()
            .map(|entry| GroupSnapshot {
                key: entry.key.to_string(),
                members: entry
                    .members
                    .iter()
                    .map(|m| MemberSnapshot {
                        path: m.path().to_string(),
                        selected: m.is_selected(),
                    })
                    .collect(),
                expanded: entry.ui.expanded,
                pending_name: entry.ui.pending_name.clone(),
            })
            .collect();

        SessionSnapshot {
            total_groups: self.groups.len(),
            total_assets: self.groups.record_count(),
            filtered_groups: self.view.len(),
            duplicates_only: self.params.duplicates_only,
            search: self.params.search.clone(),
            page: self.pager.current(),
            page_count: self.page_count(),
            groups,
        }
    }

    fn ui_mut(&mut self, key: &str) -> Result<&mut GroupUiState, SessionError> {
        self.view
            .get_mut(key)
            .ok_or_else(|| SessionError::UnknownGroup { key: key.into() })
    }

    fn member_mut(&mut self, key: &str, index: usize) -> Result<&mut AssetRecord, SessionError> {
        if !self.groups.contains_key(key) {
            return Err(SessionError::UnknownGroup { key: key.into() });
        }
        self.groups
            .member_mut(key, index)
            .ok_or_else(|| SessionError::UnknownMember {
                key: key.into(),
                index,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;

    fn session(paths: &[&str]) -> Session<MemoryHost> {
        let mut session = Session::new(
            MemoryHost::with_paths(paths.iter().copied()),
            ScanConfig::default(),
        );
        session.scan().unwrap();
        session
    }

    #[test]
    fn test_defaults_to_duplicates_only() {
        let session = session(&["Assets/a.png", "Assets/x/b.png", "Assets/y/b.png"]);
        assert!(session.params().duplicates_only);
        assert_eq!(session.groups().len(), 2);
        assert_eq!(session.view().len(), 1);
    }

    #[test]
    fn test_refilter_resets_ui_state() {
        let commands: [(&str, fn(&mut Session<MemoryHost>)); 4] = [
            ("search", |s| s.search("b")),
            ("reset_search", |s| s.reset_search()),
            ("set_duplicates_only", |s| s.set_duplicates_only(false)),
            ("toggle_duplicates_only", |s| {
                s.toggle_duplicates_only();
            }),
        ];

        for (name, command) in commands {
            let mut session = session(&["Assets/x/b.png", "Assets/y/b.png"]);
            session.toggle_expanded("b.png").unwrap();
            session.set_pending_name("b.png", "typed").unwrap();
            session.set_scroll("b.png", 4).unwrap();

            command(&mut session);
            let ui = session.view().get("b.png").unwrap();
            assert!(!ui.expanded, "{name} kept expansion");
            assert_eq!(ui.scroll, 0, "{name} kept scroll");
            assert_eq!(ui.pending_name, "b", "{name} kept pending name");
        }
    }

    #[test]
    fn test_expand_resets_pending_name() {
        let mut session = session(&["Assets/x/b.png", "Assets/y/b.png"]);
        session.set_pending_name("b.png", "typed").unwrap();

        assert!(session.toggle_expanded("b.png").unwrap());
        assert_eq!(session.view().get("b.png").unwrap().pending_name, "b");

        session.set_pending_name("b.png", "typed").unwrap();
        assert!(!session.toggle_expanded("b.png").unwrap());
        assert_eq!(session.view().get("b.png").unwrap().pending_name, "typed");
    }

    #[test]
    fn test_refilter_resets_page() {
        let paths: Vec<String> = (0..70)
            .flat_map(|i| [format!("Assets/x/{i:02}.png"), format!("Assets/y/{i:02}.png")])
            .collect();
        let refs: Vec<&str> = paths.iter().map(String::as_str).collect();
        let mut session = session(&refs);

        assert_eq!(session.page_count(), 3);
        assert!(session.next_page());
        assert!(session.next_page());
        assert!(!session.next_page());
        assert_eq!(session.current_entries().len(), 10);

        session.search("0");
        assert_eq!(session.current_page(), 0);
    }

    #[test]
    fn test_unknown_keys_are_errors() {
        let mut session = session(&["Assets/x/b.png", "Assets/y/b.png"]);
        assert!(matches!(
            session.toggle_expanded("nope.png"),
            Err(SessionError::UnknownGroup { .. })
        ));
        assert!(matches!(
            session.toggle_selected("b.png", 9),
            Err(SessionError::UnknownMember { .. })
        ));
        assert!(session.select_path("b.png", "Assets/z/b.png").is_err());
    }

    #[test]
    fn test_rename_uses_pending_name() {
        let mut session = session(&["Assets/x/b.png", "Assets/y/b.png"]);
        session.toggle_selected("b.png", 1).unwrap();
        session.set_pending_name("b.png", "renamed").unwrap();

        let outcome = session.rename_selected("b.png").unwrap();
        assert_eq!(outcome.target_key, "renamed.png");
        assert_eq!(
            session.groups().get("renamed.png").unwrap()[0].path(),
            "Assets/y/renamed.png"
        );
    }

    #[test]
    fn test_snapshot() {
        let mut session = session(&["Assets/a.png", "Assets/x/b.png", "Assets/y/b.png"]);
        session.set_selected("b.png", 0, true).unwrap();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.total_groups, 2);
        assert_eq!(snapshot.total_assets, 3);
        assert_eq!(snapshot.filtered_groups, 1);
        assert_eq!(snapshot.page_count, 1);
        assert_eq!(snapshot.groups[0].key, "b.png");
        assert!(snapshot.groups[0].members[0].selected);
        assert!(!snapshot.groups[0].members[1].selected);
    }
}
