use std::collections::BTreeSet;
use crate::core::filters::SecondaryFilter;
use crate::models::{ResultRow, SearchResult, SelectionState};

/// Rows currently shown, re-indexed from 0
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplaySet {
    rows: Vec<ResultRow>,
}

impl DisplaySet {
    pub fn new(rows: Vec<ResultRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&ResultRow> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_any_email(&self) -> bool {
        self.rows.iter().any(|r| r.school.has_email())
    }
}

/// Build the display rows for a result
pub fn apply_secondary_filter(result: &SearchResult, filter: SecondaryFilter) -> DisplaySet {
    DisplaySet::new(
        result
            .rows
            .iter()
            .filter(|row| filter.keeps(row))
            .cloned()
            .collect(),
    )
}

/// Checked display rows, by position
///
/// Indices are positional, so the tracker is bound to the size of the display
/// set it was created for and must be replaced whenever that set is rebuilt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    indices: BTreeSet<usize>,
    total: usize,
}

impl Selection {
    pub fn new(total: usize) -> Self {
        Self {
            indices: BTreeSet::new(),
            total,
        }
    }

    pub fn for_display(display: &DisplaySet) -> Self {
        Self::new(display.len())
    }

    /// Flip one row. Out-of-range indices are ignored.
    pub fn toggle(&mut self, index: usize) {
        if index >= self.total {
            return;
        }
        if !self.indices.remove(&index) {
            self.indices.insert(index);
        }
    }

    pub fn select_all(&mut self) {
        self.indices = (0..self.total).collect();
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }

    pub fn count(&self) -> usize {
        self.indices.len()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// Selected indices in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    pub fn is_all_checked(&self) -> bool {
        self.total > 0 && self.count() == self.total
    }

    pub fn is_indeterminate(&self) -> bool {
        self.count() > 0 && self.count() < self.total
    }

    /// Header checkbox and copy button state for the given display rows
    pub fn state(&self, display: &DisplaySet) -> SelectionState {
        SelectionState {
            count: self.count(),
            total: self.total,
            all_checked: self.is_all_checked(),
            indeterminate: self.is_indeterminate(),
            can_copy: !self.is_empty() || display.has_any_email(),
        }
    }
}
