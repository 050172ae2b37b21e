//! Previously used issue keys, in first-seen order.

use crate::types::IssueKey;

/// Deduplicated list of issue keys with an up/down recall cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueHistory {
    entries: Vec<IssueKey>,
    /// Index of the recalled entry while navigating.
    cursor: Option<usize>,
}

impl IssueHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a history from stored keys, dropping repeats.
    pub fn from_keys(keys: impl IntoIterator<Item = IssueKey>) -> Self {
        let mut history = Self::new();
        for key in keys {
            history.record(key);
        }
        history
    }

    /// Appends `key` unless it is already known. Returns `true` if added.
    pub fn record(&mut self, key: IssueKey) -> bool {
        if self.contains(&key) {
            return false;
        }
        self.entries.push(key);
        true
    }

    pub fn contains(&self, key: &IssueKey) -> bool {
        self.entries.contains(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IssueKey> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[IssueKey] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Recall navigation.
impl IssueHistory {
    /// Steps towards older entries, starting from the newest.
    /// Stays on the oldest entry once reached.
    pub fn recall_previous(&mut self) -> Option<&IssueKey> {
        if self.entries.is_empty() {
            return None;
        }

        let index = match self.cursor {
            None => self.entries.len() - 1,
            Some(index) => index.saturating_sub(1),
        };
        self.cursor = Some(index);
        self.entries.get(index)
    }

    /// Steps towards newer entries. Moving past the newest entry ends
    /// navigation and returns `None`.
    pub fn recall_next(&mut self) -> Option<&IssueKey> {
        let index = self.cursor?;
        if index + 1 < self.entries.len() {
            self.cursor = Some(index + 1);
            self.entries.get(index + 1)
        } else {
            self.cursor = None;
            None
        }
    }

    /// The entry currently recalled, if navigating.
    pub fn recalled(&self) -> Option<&IssueKey> {
        self.cursor.and_then(|index| self.entries.get(index))
    }

    pub fn reset_recall(&mut self) {
        self.cursor = None;
    }
}

#[cfg(test)]
mod tests;
