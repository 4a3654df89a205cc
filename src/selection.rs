//! The set of plants currently chosen for the garden plan.
//!
//! This is the source of truth for the request payload and the "N selected"
//! counter. Rendered grid entries carry their own `selected` flag for
//! display; `sync_visual_state` reconciles those flags after any bulk
//! rebuild so highlighting never drifts from actual membership.

use std::collections::HashSet;

/// A rendered catalog entry's visual handle. The grid is rebuilt whenever
/// the catalog or the active filter changes; selection state is then
/// reconciled onto it.
#[derive(Debug, Clone)]
pub struct GridEntry {
    pub name: String,
    pub plant_type: String,
    pub ai_sourced: bool,
    pub selected: bool,
}

#[derive(Debug, Default)]
pub struct SelectionSet {
    names: HashSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership for `name` and return the new state. No validation
    /// against the catalog: toggling an unknown name is permitted and the
    /// caller's responsibility to avoid.
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.names.remove(name) {
            false
        } else {
            self.names.insert(name.to_string());
            true
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn count(&self) -> usize {
        self.names.len()
    }

    /// Selected names in a stable order for the request payload.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.names.iter().cloned().collect();
        names.sort();
        names
    }

    /// Reconciliation pass: set every rendered entry's `selected` flag to
    /// match actual membership. Must run after any bulk re-render of the
    /// catalog grid.
    pub fn sync_visual_state(&self, entries: &mut [GridEntry]) {
        for entry in entries {
            entry.selected = self.names.contains(&entry.name);
        }
    }
}
