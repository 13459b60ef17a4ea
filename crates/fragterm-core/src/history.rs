use std::collections::HashMap;

use crate::fragment::Fragment;
use crate::Direction;

/// Append-only log of fragment snapshots, one list per fragment name.
///
/// A snapshot is taken after every successful run. Snapshot `k` of a
/// fragment carries `revision == Some(k)`.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    entries: HashMap<String, Vec<Fragment>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a copy of `fragment` and point its live revision at it.
    pub fn record(&mut self, fragment: &mut Fragment) -> usize {
        let list = self.entries.entry(fragment.name.clone()).or_default();
        let revision = list.len();
        fragment.revision = Some(revision);
        list.push(fragment.clone());
        tracing::debug!("recorded {} r {}", fragment.name, revision);
        revision
    }

    /// Copy of the snapshot one step away from `current`, if there is one.
    ///
    /// A fragment that never ran successfully (`current == None`) can only
    /// step forward, onto the first snapshot.
    pub fn navigate(
        &self,
        name: &str,
        current: Option<usize>,
        direction: Direction,
    ) -> Option<Fragment> {
        let list = self.entries.get(name)?;
        let target = match (direction, current) {
            (Direction::Up, Some(rev)) => rev.checked_sub(1)?,
            (Direction::Up, None) => return None,
            (Direction::Down, Some(rev)) => rev + 1,
            (Direction::Down, None) => 0,
            _ => return None,
        };
        list.get(target).cloned()
    }

    pub fn get(&self, name: &str, revision: usize) -> Option<&Fragment> {
        self.entries.get(name).and_then(|list| list.get(revision))
    }

    pub fn len(&self, name: &str) -> usize {
        self.entries.get(name).map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }

    /// Move a fragment's history to its new name. An existing history under
    /// the new name is replaced.
    pub fn rename(&mut self, old: &str, new: &str) {
        if let Some(mut list) = self.entries.remove(old) {
            for snapshot in &mut list {
                snapshot.name = new.to_string();
            }
            self.entries.insert(new.to_string(), list);
        }
    }
}
