//! FILENAME: core/dataset/src/lib.rs
//! PURPOSE: Main library entry point for the scattering data model.
//! CONTEXT: Re-exports public types and modules for use by other crates.

pub mod catalog;
pub mod field;
pub mod model;
pub mod source;
pub mod value;

// Re-export commonly used types at the crate root
pub use catalog::{field_catalog, find_field, select_fields};
pub use field::{
    ComputedQuantity, DatasetQuantity, FieldCategory, FieldDescriptor, FieldKind, GroupQuantity,
    SampleQuantity,
};
pub use model::{Attribute, DataCollection, DataSet, Group};
pub use source::{AxisSource, ValueResolver};
pub use value::Value;
