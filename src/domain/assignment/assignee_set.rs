//! Assignee sets and the assignment diff.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::foundation::AccountId;

/// Unordered set of accounts assigned to a work item.
///
/// Backed by a `BTreeSet` so iteration is deterministic; order carries no
/// meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssigneeSet(BTreeSet<AccountId>);

impl AssigneeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &AccountId) -> bool {
        self.0.contains(id)
    }

    pub fn insert(&mut self, id: AccountId) -> bool {
        self.0.insert(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccountId> {
        self.0.iter()
    }

    /// Accounts in `self` that were not in `previous`.
    ///
    /// Edge-triggered: retained assignees are never reported, removed ones
    /// are ignored.
    pub fn newly_assigned(&self, previous: &AssigneeSet) -> AssigneeSet {
        AssigneeSet(self.0.difference(&previous.0).copied().collect())
    }
}

impl FromIterator<AccountId> for AssigneeSet {
    fn from_iter<I: IntoIterator<Item = AccountId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for AssigneeSet {
    type Item = AccountId;
    type IntoIter = std::collections::btree_set::IntoIter<AccountId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
