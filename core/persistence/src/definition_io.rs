//! FILENAME: core/persistence/src/definition_io.rs
//! PURPOSE: Saving and loading table definitions as JSON.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::{debug, warn};
use projection_engine::TableDefinition;
use serde::{Deserialize, Serialize};

use crate::PersistenceError;

/// Several table definitions stored together, e.g. every table of a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedTables {
    pub tables: Vec<TableDefinition>,
}

impl SavedTables {
    pub fn new(tables: Vec<TableDefinition>) -> Self {
        Self { tables }
    }

    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        Ok(serde_json::from_str(json)?)
    }
}

pub fn save_definition(definition: &TableDefinition, path: &Path) -> Result<(), PersistenceError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, definition)?;
    writer.flush()?;
    debug!(target: "persistence", "saved table {} to {}", definition.id, path.display());
    Ok(())
}

/// Loads a definition. Its order string is checked here so that a bad file
/// is reported on load rather than when the table is built.
pub fn load_definition(path: &Path) -> Result<TableDefinition, PersistenceError> {
    let reader = BufReader::new(File::open(path)?);
    let definition: TableDefinition = serde_json::from_reader(reader)?;
    if let Err(e) = definition.parse_order() {
        warn!(target: "persistence", "{} holds an invalid order: {}", path.display(), e);
        return Err(PersistenceError::Engine(e.into()));
    }
    Ok(definition)
}
