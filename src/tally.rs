use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// String-keyed accumulator that remembers first-insertion order.
///
/// Summaries sort with a stable sort over this order, so entries with equal
/// metrics come out in the order their key was first encountered.
#[derive(Debug, Clone)]
pub struct Tally<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

impl<V: Default> Tally<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Get the value for `key`, inserting `V::default()` on first sight
    pub fn entry(&mut self, key: &str) -> &mut V {
        let slot = match self.index.get(key) {
            Some(&slot) => slot,
            None => {
                let slot = self.entries.len();
                self.entries.push((key.to_string(), V::default()));
                self.index.insert(key.to_string(), slot);
                slot
            }
        };
        &mut self.entries[slot].1
    }
}

impl<V> Tally<V> {
    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    /// Entries in first-encountered order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Default> Default for Tally<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Running view total and video count for one category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub total_views: i64,
    pub count: u64,
}

impl CategoryStats {
    /// Record one contributing video
    pub fn add(&mut self, views: i64) {
        self.total_views = self.total_views.saturating_add(views);
        self.count += 1;
    }
}
