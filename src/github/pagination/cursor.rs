//! Per-branch pagination cursors.

use std::collections::HashMap;

use super::envelope::PageEnvelope;

/// Identifies one branch of one repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BranchKey {
    repository: String,
    branch: String,
}

impl BranchKey {
    /// Creates a key for `branch` in `repository`.
    #[must_use]
    pub fn new(repository: &str, branch: &str) -> Self {
        Self {
            repository: repository.to_owned(),
            branch: branch.to_owned(),
        }
    }

    /// Repository name.
    #[must_use]
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Branch name.
    #[must_use]
    pub fn branch(&self) -> &str {
        &self.branch
    }
}

/// Last known page position for each branch whose commits were fetched.
///
/// A branch without a cursor has an unknown total, so only its first page
/// can be requested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationCursors {
    cursors: HashMap<BranchKey, PageEnvelope>,
}

impl PaginationCursors {
    /// Creates an empty cursor table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor for `key`, if its commits have been fetched.
    #[must_use]
    pub fn get(&self, key: &BranchKey) -> Option<PageEnvelope> {
        self.cursors.get(key).copied()
    }

    /// Total pages known for `key`.
    #[must_use]
    pub fn total_num_pages(&self, key: &BranchKey) -> Option<u32> {
        self.get(key).map(|cursor| cursor.total_num_pages())
    }

    /// Overwrites the cursor for `key`.
    pub fn record(&mut self, key: BranchKey, envelope: PageEnvelope) {
        self.cursors.insert(key, envelope);
    }

    /// Drops every cursor belonging to `repository`.
    pub fn clear_repository(&mut self, repository: &str) {
        self.cursors.retain(|key, _| key.repository != repository);
    }

    /// Drops all cursors.
    pub fn clear(&mut self) {
        self.cursors.clear();
    }

    /// Number of branches with a cursor.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    /// Returns true if no branch has a cursor.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::{BranchKey, PaginationCursors};
    use crate::github::pagination::PageEnvelope;

    #[fixture]
    fn cursors() -> PaginationCursors {
        let mut cursors = PaginationCursors::new();
        cursors.record(
            BranchKey::new("repoA", "main"),
            PageEnvelope::new(1, 4).expect("valid envelope"),
        );
        cursors.record(
            BranchKey::new("repoA", "dev"),
            PageEnvelope::new(2, 2).expect("valid envelope"),
        );
        cursors.record(
            BranchKey::new("repoB", "main"),
            PageEnvelope::new(1, 9).expect("valid envelope"),
        );
        cursors
    }

    #[rstest]
    fn cursors_are_independent_per_branch(cursors: PaginationCursors) {
        assert_eq!(cursors.total_num_pages(&BranchKey::new("repoA", "main")), Some(4));
        assert_eq!(cursors.total_num_pages(&BranchKey::new("repoB", "main")), Some(9));
        assert_eq!(cursors.total_num_pages(&BranchKey::new("repoB", "dev")), None);
    }

    #[rstest]
    fn record_overwrites_previous_cursor(mut cursors: PaginationCursors) {
        let key = BranchKey::new("repoA", "main");
        cursors.record(key.clone(), PageEnvelope::new(3, 6).expect("valid envelope"));

        let cursor = cursors.get(&key).expect("cursor should exist");
        assert_eq!(cursor.page_num(), 3);
        assert_eq!(cursor.total_num_pages(), 6);
    }

    #[rstest]
    fn clearing_a_repository_keeps_others(mut cursors: PaginationCursors) {
        cursors.clear_repository("repoA");

        assert_eq!(cursors.len(), 1);
        assert!(cursors.get(&BranchKey::new("repoB", "main")).is_some());
    }
}
