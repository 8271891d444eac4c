//! FILENAME: core/projection-engine/src/definition.rs
//! Table Definition - The serializable configuration.
//!
//! This module contains all the types needed to DESCRIBE a projected table.
//! These structures are designed to be:
//! - Serializable (for saving/loading user layouts)
//! - Immutable snapshots of user intent
//!
//! The order string is kept in its short letter-coded form so saved layouts
//! stay readable; it is parsed once when an engine is built.

use dataset::FieldDescriptor;
use order_parser::{OrderResult, OrderSpec};
use serde::{Deserialize, Serialize};

/// Unique identifier for a table definition.
pub type TableId = u32;

// ============================================================================
// GROUP SELECTION
// ============================================================================

/// Which groups of each data set take part in the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GroupSelection {
    /// Every group index that exists in at least one data set.
    #[default]
    All,
    /// These group indices, in this order.
    Explicit(Vec<usize>),
}

// ============================================================================
// LAYOUT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableLayout {
    /// Distance in columns between two stored column checkpoints.
    pub checkpoint_stride: usize,

    /// Text between the parts of a row or column label.
    pub label_separator: String,

    /// Field names are cut to this many characters in labels.
    pub field_label_width: usize,

    /// Emit a record of column labels before the body.
    pub show_column_header: bool,

    /// Start every body record with its row label.
    pub show_row_labels: bool,
}

impl Default for TableLayout {
    fn default() -> Self {
        TableLayout {
            checkpoint_stride: 20,
            label_separator: ":".to_string(),
            field_label_width: 4,
            show_column_header: true,
            show_row_labels: false,
        }
    }
}

// ============================================================================
// MERGE OPTIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    /// Two sample coordinates closer than the average sample interval
    /// divided by this number are treated as the same point.
    pub tolerance_divisor: f64,
}

impl Default for MergeOptions {
    fn default() -> Self {
        MergeOptions {
            tolerance_divisor: 20.0,
        }
    }
}

// ============================================================================
// TABLE DEFINITION
// ============================================================================

/// The complete, serializable definition of a projected table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub id: TableId,

    /// User-friendly name for this table.
    #[serde(default)]
    pub name: Option<String>,

    /// Order string, e.g. "HGT,F".
    pub order: String,

    /// Fields on the Field axis, in display order.
    pub fields: Vec<FieldDescriptor>,

    #[serde(default)]
    pub selection: GroupSelection,

    #[serde(default)]
    pub layout: TableLayout,

    #[serde(default)]
    pub merge: MergeOptions,

    /// Version for cache invalidation.
    #[serde(default)]
    pub version: u64,
}

impl TableDefinition {
    pub fn new(id: TableId, order: impl Into<String>) -> Self {
        TableDefinition {
            id,
            name: None,
            order: order.into(),
            fields: Vec::new(),
            selection: GroupSelection::All,
            layout: TableLayout::default(),
            merge: MergeOptions::default(),
            version: 0,
        }
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn with_selection(mut self, selection: GroupSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_layout(mut self, layout: TableLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn parse_order(&self) -> OrderResult<OrderSpec> {
        order_parser::parse(&self.order)
    }

    /// Marks the definition as changed.
    pub fn bump_version(&mut self) {
        self.version += 1;
    }
}
