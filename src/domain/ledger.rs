//! History ledger of committed draws

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::{CategoryId, Draw, DrawValue};

/// A committed draw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// 1-based commit order
    pub position: usize,
    pub category: CategoryId,
    pub value: DrawValue,
    pub committed_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn draw(&self) -> Draw {
        Draw {
            category: self.category.clone(),
            value: self.value.clone(),
        }
    }
}

/// Append-only record of commits, in commit order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryLedger {
    entries: Vec<HistoryEntry>,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a draw, assigning the next position
    pub fn append(&mut self, draw: Draw, committed_at: DateTime<Utc>) -> &HistoryEntry {
        let entry = HistoryEntry {
            position: self.entries.len() + 1,
            category: draw.category,
            value: draw.value,
            committed_at,
        };
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    /// Entries in commit order; the iterator can be cloned to restart
    pub fn all(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }

    /// Numbers committed from one category, in commit order
    pub fn committed<'a>(&'a self, category: &'a CategoryId) -> impl Iterator<Item = u32> + 'a {
        self.entries
            .iter()
            .filter(move |e| &e.category == category)
            .map(|e| e.value.number)
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'a> IntoIterator for &'a HistoryLedger {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
