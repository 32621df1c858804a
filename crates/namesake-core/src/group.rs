//! Filename-keyed groups of asset records.

use compact_str::CompactString;
use indexmap::IndexMap;
use serde::Serialize;

use crate::record::AssetRecord;

/// Group key: a filename including its extension.
pub type GroupKey = CompactString;

/// Ordered mapping from filename to the records sharing it.
///
/// Insertion order is preserved. Every record in a group has a filename
/// equal to the group's key, and no group is ever left empty: removing the
/// last member removes the group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AssetGroups {
    groups: IndexMap<GroupKey, Vec<AssetRecord>>,
}

impl AssetGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of records across all groups.
    pub fn record_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.groups.contains_key(key)
    }

    /// Members of a group, in insertion order.
    pub fn get(&self, key: &str) -> Option<&[AssetRecord]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    /// Mutable access to a single member.
    pub fn member_mut(&mut self, key: &str, index: usize) -> Option<&mut AssetRecord> {
        self.groups.get_mut(key).and_then(|members| members.get_mut(index))
    }

    /// Mutable access to every member of a group.
    pub fn members_mut(&mut self, key: &str) -> Option<&mut [AssetRecord]> {
        self.groups.get_mut(key).map(Vec::as_mut_slice)
    }

    /// Iterate over groups in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &[AssetRecord])> {
        self.groups.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> {
        self.groups.keys()
    }

    /// Append a record to the group keyed by its filename, creating the group if needed.
    ///
    /// Returns the key the record was filed under.
    pub fn insert(&mut self, record: AssetRecord) -> GroupKey {
        let key = GroupKey::from(record.file_name());
        self.groups.entry(key.clone()).or_default().push(record);
        key
    }

    /// Remove and return a member. Drops the group when it becomes empty.
    pub fn take_member(&mut self, key: &str, index: usize) -> Option<AssetRecord> {
        let members = self.groups.get_mut(key)?;
        if index >= members.len() {
            return None;
        }
        let record = members.remove(index);
        if members.is_empty() {
            self.groups.shift_remove(key);
        }
        Some(record)
    }

    /// Remove a whole group, keeping the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<Vec<AssetRecord>> {
        self.groups.shift_remove(key)
    }
}

impl FromIterator<AssetRecord> for AssetGroups {
    fn from_iter<I: IntoIterator<Item = AssetRecord>>(iter: I) -> Self {
        let mut groups = Self::new();
        for record in iter {
            groups.insert(record);
        }
        groups
    }
}
