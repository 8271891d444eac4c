//! FILENAME: core/projection-engine/src/view.rs
//! Table View - a materialised window of a projected table.
//!
//! The engine itself never builds the whole table. A view holds the labels
//! and values of one rectangular window, plus the size of the full table so
//! a front end can lay out scroll bars.

use dataset::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableView {
    /// Table row of the first row in this window.
    pub first_row: usize,

    /// Table column of the first column in this window.
    pub first_column: usize,

    /// Row count of the full table.
    pub total_rows: usize,

    /// Column count of the full table.
    pub total_columns: usize,

    /// One label per window column.
    pub column_labels: Vec<String>,

    /// One label per window row.
    pub row_labels: Vec<String>,

    /// Indexed as cells[row][col], relative to the window.
    pub cells: Vec<Vec<Value>>,
}

impl TableView {
    pub fn new(first_row: usize, first_column: usize, total_rows: usize, total_columns: usize) -> Self {
        TableView {
            first_row,
            first_column,
            total_rows,
            total_columns,
            column_labels: Vec::new(),
            row_labels: Vec::new(),
            cells: Vec::new(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_labels.len()
    }

    /// Cell at a window-relative position.
    pub fn cell(&self, row: usize, column: usize) -> Option<&Value> {
        self.cells.get(row)?.get(column)
    }

    /// True when the window covers the whole table.
    pub fn is_complete(&self) -> bool {
        self.first_row == 0
            && self.first_column == 0
            && self.row_count() == self.total_rows
            && self.column_count() == self.total_columns
    }
}
