//! Click-selection state for the table view. Selection is explicit state with
//! a pure toggle, decoupled from rendering.
//!
//! Note the deliberate asymmetry carried over from the observed behavior: a
//! cell counts as "selected" (and a click deselects) only when its row AND
//! column are both in the sets, while highlighting is applied per-row and
//! per-column independently.

use std::collections::BTreeSet;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Selection {
    rows: BTreeSet<usize>,
    cols: BTreeSet<usize>,
}

impl Selection {
    /// Toggle the clicked cell, returning the new selection state.
    pub fn toggle(&self, row: usize, col: usize) -> Selection {
        let mut next = self.clone();
        if next.rows.contains(&row) && next.cols.contains(&col) {
            next.rows.remove(&row);
            next.cols.remove(&col);
        } else {
            next.rows.insert(row);
            next.cols.insert(col);
        }
        next
    }

    pub fn row_highlighted(&self, row: usize) -> bool {
        self.rows.contains(&row)
    }

    pub fn col_highlighted(&self, col: usize) -> bool {
        self.cols.contains(&col)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.cols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_selects_row_and_column() {
        let selection = Selection::default().toggle(2, 3);
        assert!(selection.row_highlighted(2));
        assert!(selection.col_highlighted(3));
        assert!(!selection.row_highlighted(3));
        assert!(!selection.col_highlighted(2));
    }

    #[test]
    fn second_toggle_deselects() {
        let selection = Selection::default().toggle(2, 3).toggle(2, 3);
        assert!(selection.is_empty());
    }

    #[test]
    fn highlight_applies_either_axis() {
        // Selecting (1, 1) then clicking (1, 5): row 1 is already selected, but
        // column 5 is not, so the click selects rather than deselects.
        let selection = Selection::default().toggle(1, 1).toggle(1, 5);
        assert!(selection.row_highlighted(1));
        assert!(selection.col_highlighted(1));
        assert!(selection.col_highlighted(5));
    }

    #[test]
    fn deselect_removes_one_index_per_axis() {
        let selection = Selection::default().toggle(1, 1).toggle(2, 1);
        // (1, 1) is selected on both axes, so toggling it deselects row 1 and
        // column 1, leaving row 2 highlighted with no column.
        let selection = selection.toggle(1, 1);
        assert!(!selection.row_highlighted(1));
        assert!(selection.row_highlighted(2));
        assert!(!selection.col_highlighted(1));
    }

    #[test]
    fn toggle_does_not_mutate_input() {
        let original = Selection::default().toggle(0, 0);
        let _ = original.toggle(9, 9);
        assert!(original.row_highlighted(0));
        assert!(!original.row_highlighted(9));
    }
}
