//! Rename operation for the selected members of a group.

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{HostError, SessionError};
use crate::group::{AssetGroups, GroupKey};
use crate::host::AssetHost;
use crate::names::{MAX_NAME_LEN, split_extension, validate_base_name};
use crate::view::FilteredView;

/// One member that was renamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenamedAsset {
    pub from: String,
    pub to: String,
}

/// What a rename did to the groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameOutcome {
    /// Group the members were taken from.
    pub source_key: GroupKey,
    /// Group the members were filed under.
    pub target_key: GroupKey,
    /// Members that moved, in the order they were renamed.
    pub renamed: Vec<RenamedAsset>,
    /// The target group already existed and the members were merged into it.
    pub merged: bool,
    /// The source group ran out of members and was removed.
    pub source_removed: bool,
}

/// Rename every selected member of `key` to `new_base_name` + the group's extension.
///
/// Each member is renamed by the host first and only then moved from the
/// source group to the target group, so local state never claims a rename
/// the host did not perform. If the target group already exists the members
/// are merged into it; otherwise it is created along with a collapsed view
/// entry. An emptied source group is removed from both `groups` and `view`.
///
/// On a host failure the members renamed so far stay moved, the failing and
/// remaining members keep their selection, and the error is returned.
pub fn rename_selected<H: AssetHost + ?Sized>(
    groups: &mut AssetGroups,
    view: &mut FilteredView,
    host: &mut H,
    key: &str,
    new_base_name: &str,
) -> Result<RenameOutcome, SessionError> {
    validate_base_name(new_base_name).map_err(|reason| SessionError::InvalidName {
        name: new_base_name.to_string(),
        reason,
    })?;

    let members = groups.get(key).ok_or_else(|| SessionError::UnknownGroup {
        key: key.into(),
    })?;
    if !members.iter().any(|m| m.is_selected()) {
        return Err(SessionError::NothingSelected { key: key.into() });
    }

    let (_, ext) = split_extension(key);
    let target_key = GroupKey::from(format!("{new_base_name}{ext}"));
    if target_key.len() > MAX_NAME_LEN {
        return Err(SessionError::InvalidName {
            name: new_base_name.to_string(),
            reason: format!("Name is too long with {ext} (max {MAX_NAME_LEN} bytes)"),
        });
    }

    let mut outcome = RenameOutcome {
        source_key: key.into(),
        target_key: target_key.clone(),
        renamed: Vec::new(),
        merged: target_key != key && groups.contains_key(&target_key),
        source_removed: false,
    };

    if target_key == key {
        if let Some(members) = groups.members_mut(key) {
            members.iter_mut().for_each(|m| m.set_selected(false));
        }
        return Ok(outcome);
    }

    let mut failure: Option<HostError> = None;

    while let Some(index) = groups
        .get(key)
        .and_then(|members| members.iter().position(|m| m.is_selected()))
    {
        let from = match groups.get(key) {
            Some(members) => members[index].path().to_string(),
            None => break,
        };

        let to = match host.rename_asset(&from, new_base_name) {
            Ok(to) => to,
            Err(e) => {
                warn!(path = %from, error = %e, "host rename failed");
                failure = Some(e);
                break;
            }
        };

        let Some(mut record) = groups.take_member(key, index) else {
            break;
        };
        record.relocate(to.clone());
        let filed_under = groups.insert(record);
        view.ensure(filed_under, new_base_name);

        outcome.renamed.push(RenamedAsset { from, to });
    }

    if !groups.contains_key(key) {
        view.remove(key);
        outcome.source_removed = true;
    }

    if !outcome.renamed.is_empty() {
        info!(
            from = %outcome.source_key,
            to = %outcome.target_key,
            count = outcome.renamed.len(),
            merged = outcome.merged,
            "renamed assets"
        );
        let saved = host.save();
        if let Some(e) = failure {
            if let Err(save_err) = saved {
                warn!(error = %save_err, "save after partial rename failed");
            }
            return Err(e.into());
        }
        saved?;
    } else if let Some(e) = failure {
        return Err(e.into());
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterParams, filter};
    use crate::host::MemoryHost;
    use crate::record::AssetRecord;

    fn setup(paths: &[&str]) -> (AssetGroups, FilteredView, MemoryHost) {
        let groups: AssetGroups = paths.iter().copied().map(AssetRecord::new).collect();
        let view = filter(&groups, &FilterParams::new(false, ""));
        (groups, view, MemoryHost::with_paths(paths.iter().copied()))
    }

    fn select(groups: &mut AssetGroups, key: &str, index: usize) {
        groups.member_mut(key, index).unwrap().set_selected(true);
    }

    #[test]
    fn test_rename_moves_selected_members() {
        let (mut groups, mut view, mut host) =
            setup(&["Assets/x/b.png", "Assets/y/b.png", "Assets/z/b.png"]);
        select(&mut groups, "b.png", 0);
        select(&mut groups, "b.png", 2);

        let outcome = rename_selected(&mut groups, &mut view, &mut host, "b.png", "foo").unwrap();

        assert_eq!(outcome.target_key, "foo.png");
        assert_eq!(outcome.renamed.len(), 2);
        assert!(!outcome.merged);
        assert!(!outcome.source_removed);

        let foo = groups.get("foo.png").unwrap();
        assert_eq!(foo.len(), 2);
        assert_eq!(foo[0].path(), "Assets/x/foo.png");
        assert_eq!(foo[1].path(), "Assets/z/foo.png");
        assert!(foo.iter().all(|r| !r.is_selected()));
        assert_eq!(groups.get("b.png").unwrap().len(), 1);

        let state = view.get("foo.png").unwrap();
        assert!(!state.expanded);
        assert_eq!(state.scroll, 0);
        assert_eq!(state.pending_name, "foo");
        assert_eq!(host.saves(), 1);
    }

    #[test]
    fn test_rename_merges_into_existing_group() {
        let (mut groups, mut view, mut host) =
            setup(&["Assets/x/b.png", "Assets/y/b.png", "Assets/w/c.png"]);
        select(&mut groups, "b.png", 1);

        let outcome = rename_selected(&mut groups, &mut view, &mut host, "b.png", "c").unwrap();

        assert!(outcome.merged);
        let c: Vec<_> = groups.get("c.png").unwrap().iter().map(|r| r.path()).collect();
        assert_eq!(c, vec!["Assets/w/c.png", "Assets/y/c.png"]);
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_renaming_every_member_removes_source() {
        let (mut groups, mut view, mut host) = setup(&["Assets/x/b.png", "Assets/y/b.png"]);
        select(&mut groups, "b.png", 0);
        select(&mut groups, "b.png", 1);

        let outcome = rename_selected(&mut groups, &mut view, &mut host, "b.png", "d").unwrap();

        assert!(outcome.source_removed);
        assert!(!groups.contains_key("b.png"));
        assert!(!view.contains("b.png"));
        assert_eq!(view.keys().map(|k| k.as_str()).collect::<Vec<_>>(), vec!["d.png"]);
    }

    #[test]
    fn test_validation_happens_before_mutation() {
        let (mut groups, mut view, mut host) = setup(&["Assets/x/b.png", "Assets/y/b.png"]);
        let before = groups.clone();

        let err = rename_selected(&mut groups, &mut view, &mut host, "b.png", "d").unwrap_err();
        assert!(matches!(err, SessionError::NothingSelected { .. }));

        select(&mut groups, "b.png", 0);
        let err = rename_selected(&mut groups, &mut view, &mut host, "b.png", "a/b").unwrap_err();
        assert!(matches!(err, SessionError::InvalidName { .. }));

        let err = rename_selected(&mut groups, &mut view, &mut host, "zz.png", "d").unwrap_err();
        assert!(matches!(err, SessionError::UnknownGroup { .. }));

        assert_eq!(groups.get("b.png").unwrap().len(), before.get("b.png").unwrap().len());
        assert!(host.renames().is_empty());
    }

    #[test]
    fn test_length_limit_includes_extension() {
        let (mut groups, mut view, mut host) = setup(&["Assets/x/b.png", "Assets/y/b.png"]);
        select(&mut groups, "b.png", 0);

        // Fits as a base name, but not once ".png" is appended
        let long = "a".repeat(MAX_NAME_LEN - 3);
        assert!(validate_base_name(&long).is_ok());
        let err = rename_selected(&mut groups, &mut view, &mut host, "b.png", &long).unwrap_err();
        assert!(matches!(err, SessionError::InvalidName { .. }));
        assert!(host.renames().is_empty());
        assert_eq!(groups.get("b.png").unwrap().len(), 2);
        assert!(groups.get("b.png").unwrap()[0].is_selected());

        let fits = "a".repeat(MAX_NAME_LEN - 4);
        let outcome = rename_selected(&mut groups, &mut view, &mut host, "b.png", &fits).unwrap();
        assert_eq!(outcome.target_key.len(), MAX_NAME_LEN);
    }

    #[test]
    fn test_same_name_clears_selection_only() {
        let (mut groups, mut view, mut host) = setup(&["Assets/x/b.png", "Assets/y/b.png"]);
        select(&mut groups, "b.png", 0);

        let outcome = rename_selected(&mut groups, &mut view, &mut host, "b.png", "b").unwrap();

        assert!(outcome.renamed.is_empty());
        assert!(groups.get("b.png").unwrap().iter().all(|r| !r.is_selected()));
        assert!(host.renames().is_empty());
        assert_eq!(host.saves(), 0);
    }

    #[test]
    fn test_host_failure_keeps_failing_member() {
        let (mut groups, mut view, mut host) =
            setup(&["Assets/x/b.png", "Assets/y/b.png", "Assets/z/b.png"]);
        select(&mut groups, "b.png", 0);
        select(&mut groups, "b.png", 1);
        host.fail_rename_of("Assets/y/b.png");

        let err = rename_selected(&mut groups, &mut view, &mut host, "b.png", "e").unwrap_err();
        assert!(err.is_host_failure());

        // The first member really moved.
        assert_eq!(groups.get("e.png").unwrap()[0].path(), "Assets/x/e.png");
        // The failing one stays put and stays selected.
        let b = groups.get("b.png").unwrap();
        assert_eq!(b.len(), 2);
        assert_eq!(b[0].path(), "Assets/y/b.png");
        assert!(b[0].is_selected());
        // Completed renames were still flushed.
        assert_eq!(host.saves(), 1);
    }

    #[test]
    fn test_first_member_failure_changes_nothing() {
        let (mut groups, mut view, mut host) = setup(&["Assets/x/b.png", "Assets/y/b.png"]);
        select(&mut groups, "b.png", 0);
        host.fail_rename_of("Assets/x/b.png");
        let before = groups.clone();
        let view_before = view.clone();

        assert!(rename_selected(&mut groups, &mut view, &mut host, "b.png", "e").is_err());
        assert_eq!(groups, before);
        assert_eq!(view, view_before);
        assert_eq!(host.saves(), 0);
    }

    #[test]
    fn test_save_failure_is_reported() {
        let (mut groups, mut view, mut host) = setup(&["Assets/x/b.png", "Assets/y/b.png"]);
        select(&mut groups, "b.png", 0);
        host.fail_save(true);

        let err = rename_selected(&mut groups, &mut view, &mut host, "b.png", "e").unwrap_err();
        assert!(err.is_host_failure());
        // The rename itself happened.
        assert!(groups.contains_key("e.png"));
    }
}
