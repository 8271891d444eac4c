//! FILENAME: core/projection-engine/src/error.rs

use order_parser::OrderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid order: {0}")]
    Order(#[from] OrderError),

    #[error("No data sets to show")]
    NoDatasets,

    #[error("No fields selected")]
    NoFields,

    #[error("The group selection is empty")]
    EmptySelection,

    #[error("Group {group} does not exist in any data set")]
    UnknownGroup { group: usize },

    #[error("Cell ({row}, {column}) is outside the {rows} x {columns} table")]
    IndexOutOfRange {
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },

    #[error("Table enumeration was cancelled")]
    Cancelled,

    #[error("Presentation sink failed: {0}")]
    Sink(#[from] std::io::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
