//! FILENAME: core/projection-engine/src/sink.rs
//! PURPOSE: Where streamed table records go.
//! CONTEXT: The streaming driver emits one field at a time and closes each
//! record explicitly. Text dumps, consoles and in-memory grids all sit
//! behind this one trait.

use std::io;

use dataset::Value;

pub trait PresentationSink {
    fn emit_field(&mut self, value: &Value) -> io::Result<()>;

    fn end_record(&mut self) -> io::Result<()>;
}

impl<T: PresentationSink + ?Sized> PresentationSink for &mut T {
    fn emit_field(&mut self, value: &Value) -> io::Result<()> {
        (**self).emit_field(value)
    }

    fn end_record(&mut self) -> io::Result<()> {
        (**self).end_record()
    }
}

/// Collects records in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridSink {
    records: Vec<Vec<Value>>,
    current: Vec<Value>,
}

impl GridSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed records, in emission order.
    pub fn records(&self) -> &[Vec<Value>] {
        &self.records
    }

    /// Completed records plus any unterminated trailing one.
    pub fn into_records(mut self) -> Vec<Vec<Value>> {
        if !self.current.is_empty() {
            self.records.push(std::mem::take(&mut self.current));
        }
        self.records
    }

    pub fn field_count(&self) -> usize {
        self.records.iter().map(Vec::len).sum::<usize>() + self.current.len()
    }
}

impl PresentationSink for GridSink {
    fn emit_field(&mut self, value: &Value) -> io::Result<()> {
        self.current.push(value.clone());
        Ok(())
    }

    fn end_record(&mut self) -> io::Result<()> {
        self.records.push(std::mem::take(&mut self.current));
        Ok(())
    }
}
