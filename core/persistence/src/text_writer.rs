//! FILENAME: core/persistence/src/text_writer.rs
//! PURPOSE: Tab-separated text dumps of projected tables.
//! CONTEXT: A dump is a provenance header (data-set titles, selected groups,
//! operation logs) followed by the streamed table. The same writer serves
//! files and the console; anything implementing `Write` will do.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use dataset::{AxisSource, Value, ValueResolver};
use log::info;
use projection_engine::{stream_table, CancelToken, PresentationSink, ProjectionEngine, StreamStats};

use crate::PersistenceError;

/// Group index lists longer than this are cut short in the header.
const MAX_LISTED_GROUPS: usize = 100;

/// Continuation of a multi-line operation log inside the header.
const LOG_CONTINUATION: &str = "\n#             ";

// ============================================================================
// TEXT SINK
// ============================================================================

/// Writes fields separated by tabs and records terminated by newlines.
pub struct TextSink<W: Write> {
    writer: W,
    line_start: bool,
}

impl<W: Write> TextSink<W> {
    pub fn new(writer: W) -> Self {
        TextSink {
            writer,
            line_start: true,
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> PresentationSink for TextSink<W> {
    fn emit_field(&mut self, value: &Value) -> io::Result<()> {
        if !self.line_start {
            self.writer.write_all(b"\t")?;
        }
        self.line_start = false;
        self.writer.write_all(value.display_value().as_bytes())
    }

    fn end_record(&mut self) -> io::Result<()> {
        self.line_start = true;
        self.writer.write_all(b"\n")
    }
}

// ============================================================================
// PROVENANCE HEADER
// ============================================================================

/// "[0,1,2]", cut after the first hundred entries.
fn format_indices(groups: &[usize]) -> String {
    if groups.is_empty() {
        return "NO SELECTED INDICES".to_string();
    }
    let mut listed: Vec<String> = groups
        .iter()
        .take(MAX_LISTED_GROUPS)
        .map(usize::to_string)
        .collect();
    if groups.len() > MAX_LISTED_GROUPS {
        listed.push("......".to_string());
    }
    format!("[{}]", listed.join(","))
}

fn header_line<K: PresentationSink + ?Sized>(sink: &mut K, text: String) -> io::Result<()> {
    sink.emit_field(&Value::Text(text))?;
    sink.end_record()
}

/// Writes the `#`-prefixed provenance block for every data set of `source`.
pub fn write_provenance<S, K>(sink: &mut K, source: &S, selected_groups: &[usize]) -> io::Result<()>
where
    S: AxisSource + ?Sized,
    K: PresentationSink + ?Sized,
{
    let titles: Vec<String> = (0..source.dataset_count())
        .map(|ds| source.dataset_title(ds))
        .collect();
    let plural = if titles.len() > 1 { "s" } else { "" };
    header_line(sink, format!("#Data Set{}:{}", plural, titles.join(" ; ")))?;

    header_line(sink, "#Selected Groups".to_string())?;
    let indices = format_indices(selected_groups);
    for title in &titles {
        header_line(sink, format!("#     {}:{}", title, indices))?;
    }

    header_line(sink, "#Operations".to_string())?;
    for (ds, title) in titles.iter().enumerate() {
        let log = source.operation_log(ds).join(LOG_CONTINUATION);
        header_line(sink, format!("#     {}:{}", title, log))?;
    }
    Ok(())
}

// ============================================================================
// DUMPS
// ============================================================================

/// Writes the provenance header and the whole table to `writer`.
pub fn dump_to_writer<S, R, W>(
    engine: &mut ProjectionEngine<'_, S>,
    resolver: &R,
    writer: W,
    cancel: &CancelToken,
) -> Result<StreamStats, PersistenceError>
where
    S: AxisSource + ?Sized,
    R: ValueResolver + ?Sized,
    W: Write,
{
    let mut sink = TextSink::new(writer);
    write_provenance(&mut sink, engine.source(), engine.selected_groups())?;
    let stats = stream_table(engine, resolver, &mut sink, cancel)?;
    sink.flush()?;
    Ok(stats)
}

/// Dumps the table into a new file at `path`, replacing any existing one.
pub fn dump_table<S, R>(
    engine: &mut ProjectionEngine<'_, S>,
    resolver: &R,
    path: &Path,
    cancel: &CancelToken,
) -> Result<StreamStats, PersistenceError>
where
    S: AxisSource + ?Sized,
    R: ValueResolver + ?Sized,
{
    let file = BufWriter::new(File::create(path)?);
    let stats = dump_to_writer(engine, resolver, file, cancel)?;
    info!(
        target: "persistence",
        "wrote {} records of table {} to {}",
        stats.records,
        engine.order(),
        path.display()
    );
    Ok(stats)
}

/// Dumps the table to standard output.
pub fn dump_to_console<S, R>(
    engine: &mut ProjectionEngine<'_, S>,
    resolver: &R,
    cancel: &CancelToken,
) -> Result<StreamStats, PersistenceError>
where
    S: AxisSource + ?Sized,
    R: ValueResolver + ?Sized,
{
    let stdout = io::stdout();
    dump_to_writer(engine, resolver, stdout.lock(), cancel)
}
