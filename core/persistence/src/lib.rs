//! FILENAME: core/persistence/src/lib.rs
//! Table Persistence Module
//!
//! Handles writing projected tables as tab-separated text (file or console)
//! and saving and loading table definitions as JSON.

mod definition_io;
mod error;
mod text_writer;

pub use definition_io::{load_definition, save_definition, SavedTables};
pub use error::PersistenceError;
pub use text_writer::{
    dump_table, dump_to_console, dump_to_writer, write_provenance, TextSink,
};
