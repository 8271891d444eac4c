//! FILENAME: core/projection-engine/src/lib.rs
//! Table projection subsystem.
//!
//! This crate turns a collection of scattering data sets into a 2-D table
//! whose rows and columns are nested axes chosen by an order string such as
//! "HGT,F". It depends on `dataset` for the data model and on `order-parser`
//! for the order grammar.
//!
//! Layers:
//! - `definition`: Serializable configuration (what the table IS)
//! - `cardinality`: Axis space snapshot (HOW big each axis is)
//! - `engine`: Random access by (row, column) (HOW we find a cell)
//! - `nested` / `stream`: One-pass enumeration into a sink (HOW we dump)
//! - `view`: Renderable window for a front end (WHAT we display)

pub mod cancel;
pub mod cardinality;
pub mod definition;
pub mod engine;
pub mod error;
pub mod merge;
pub mod nested;
pub mod sink;
pub mod stream;
pub mod tuple;
pub mod view;

pub use cancel::CancelToken;
pub use cardinality::{needs_merged_grid, AxisSpace, DetectorGrid};
pub use definition::*;
pub use engine::ProjectionEngine;
pub use error::{EngineError, EngineResult};
pub use merge::{merge_sequences, SequenceMerge};
pub use nested::{LevelHandler, LoopOutcome, NestedLoops, RangeLevel, TupleVisitor};
pub use sink::{GridSink, PresentationSink};
pub use stream::{stream_table, StreamStats};
pub use tuple::Tuple;
pub use view::TableView;
