//! Group membership indexing.
//!
//! One pass over the parsed records produces three insertion-ordered views
//! of group membership: everyone, admins only, and standard users only.
//! Group order follows first occurrence of each group name in the input;
//! member order follows input row order.

use crate::records::UserRecord;
use std::collections::{HashMap, HashSet};

/// Insertion-ordered mapping from group name to member usernames.
///
/// Duplicate (group, user) events from the input are kept as-is; the index
/// records what the rows said, it does not correct them.
#[derive(Clone, Debug, Default)]
pub struct GroupIndex {
    order: Vec<String>,
    members: HashMap<String, Vec<String>>,
}

impl GroupIndex {
    fn push(&mut self, group: &str, username: &str) {
        if !self.members.contains_key(group) {
            self.order.push(group.to_string());
        }
        self.members
            .entry(group.to_string())
            .or_default()
            .push(username.to_string());
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Group names in first-occurrence order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn members(&self, group: &str) -> Option<&[String]> {
        self.members.get(group).map(Vec::as_slice)
    }

    /// Iterate `(group, members)` in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.order
            .iter()
            .map(|name| (name.as_str(), self.members[name].as_slice()))
    }
}

/// The three membership views built from one record stream.
#[derive(Clone, Debug, Default)]
pub struct MembershipIndex {
    pub all: GroupIndex,
    pub admins: GroupIndex,
    pub standard: GroupIndex,
}

/// Build the membership views in a single pass over `records`.
pub fn index_groups(records: &[UserRecord], admin_ids: &HashSet<String>) -> MembershipIndex {
    let mut index = MembershipIndex::default();
    for record in records {
        let is_admin = admin_ids.contains(&record.username);
        for group in &record.groups {
            index.all.push(group, &record.username);
            if is_admin {
                index.admins.push(group, &record.username);
            } else {
                index.standard.push(group, &record.username);
            }
        }
    }
    index
}
