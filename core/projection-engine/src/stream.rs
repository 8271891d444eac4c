//! FILENAME: core/projection-engine/src/stream.rs
//! PURPOSE: Streams a whole table into a PresentationSink in one pass.
//! CONTEXT: Random access through the engine pays for a descent per cell.
//! A full dump instead runs the nested loops over the natural axis list,
//! nested as the order dictates, and writes each visible cell as it comes.
//! The output matches what `ProjectionEngine::view` shows for the full table.

use std::io;
use std::ops::ControlFlow;

use dataset::{AxisSource, Value, ValueResolver};
use log::{debug, info, warn};
use order_parser::{Axis, Dimension};

use crate::cancel::CancelToken;
use crate::cardinality::AxisSpace;
use crate::engine::{ProjectionEngine, TableContext};
use crate::error::{EngineError, EngineResult};
use crate::nested::{LevelHandler, LoopOutcome, NestedLoops, RangeLevel, TupleVisitor};
use crate::sink::PresentationSink;
use crate::tuple::Tuple;

/// What a streaming pass wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub records: usize,
    /// Every field written, labels included.
    pub fields: usize,
}

// ============================================================================
// LEVELS
// ============================================================================

/// One axis of the natural list, bounded by its cardinality under the outer
/// levels. A pinned level only ever yields 0.
struct AxisLevel<'h> {
    space: &'h AxisSpace,
    natural: &'h [Axis],
    axis: Axis,
    pinned: bool,
    range: RangeLevel,
}

impl LevelHandler for AxisLevel<'_> {
    fn start(&mut self, current: &[usize]) -> Option<usize> {
        let bound = if self.pinned {
            1
        } else {
            let outer = Tuple::from_levels(self.natural, current);
            self.space.cardinality(self.axis, &outer)
        };
        self.range = RangeLevel::new(bound);
        self.range.start(current)
    }

    fn next(&mut self) -> Option<usize> {
        self.range.next()
    }
}

fn build_loops<'h>(space: &'h AxisSpace, pin_rows: bool) -> NestedLoops<'h> {
    let order = space.order();
    let natural = order.natural_axes();
    let handlers = natural
        .iter()
        .map(|axis| {
            let pinned = !order.contains(*axis)
                || (pin_rows && order.position(*axis).map(|(d, _)| d) == Some(Dimension::Rows));
            Box::new(AxisLevel {
                space,
                natural,
                axis: *axis,
                pinned,
                range: RangeLevel::new(0),
            }) as Box<dyn LevelHandler + 'h>
        })
        .collect();
    let loops = NestedLoops::new(handlers, order.permutation(natural));

    // every row of the table ends when its outermost column axis runs out
    let outermost_column = order
        .column_axes()
        .first()
        .and_then(|axis| natural.iter().position(|n| n == axis));
    match outermost_column {
        Some(level) => loops.with_end_record(level),
        None => loops,
    }
}

// ============================================================================
// VISITOR
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq)]
enum Pass {
    Header,
    Body,
}

struct StreamVisitor<'v, 'c, S: ?Sized, R: ?Sized, K> {
    ctx: &'v TableContext<'c, S>,
    resolver: &'v R,
    sink: &'v mut K,
    natural: &'static [Axis],
    pass: Pass,
    /// Fields written since the last end of record.
    open: bool,
    stats: StreamStats,
    error: Option<io::Error>,
}

impl<S, R, K> StreamVisitor<'_, '_, S, R, K>
where
    S: AxisSource + ?Sized,
    R: ValueResolver + ?Sized,
    K: PresentationSink,
{
    fn emit(&mut self, value: &Value) -> ControlFlow<()> {
        match self.sink.emit_field(value) {
            Ok(()) => {
                self.open = true;
                self.stats.fields += 1;
                ControlFlow::Continue(())
            }
            Err(e) => {
                self.error = Some(e);
                ControlFlow::Break(())
            }
        }
    }
}

impl<S, R, K> TupleVisitor for StreamVisitor<'_, '_, S, R, K>
where
    S: AxisSource + ?Sized,
    R: ValueResolver + ?Sized,
    K: PresentationSink,
{
    fn visit(&mut self, levels: &[usize]) -> ControlFlow<()> {
        let tuple = Tuple::from_levels(self.natural, levels);
        let space = self.ctx.space;
        if space.is_duplicate(Dimension::Columns, &tuple) {
            return ControlFlow::Continue(());
        }
        match self.pass {
            Pass::Header => {
                if !self.open && self.ctx.layout.show_row_labels {
                    self.emit(&Value::Empty)?;
                }
                let label = self.ctx.label(Dimension::Columns, &tuple);
                self.emit(&Value::Text(label))
            }
            Pass::Body => {
                if space.is_duplicate(Dimension::Rows, &tuple) {
                    return ControlFlow::Continue(());
                }
                if !self.open && self.ctx.layout.show_row_labels {
                    let label = self.ctx.label(Dimension::Rows, &tuple);
                    self.emit(&Value::Text(label))?;
                }
                let value = self.ctx.value(self.resolver, &tuple);
                self.emit(&value)
            }
        }
    }

    fn end_record(&mut self) -> ControlFlow<()> {
        if !self.open {
            return ControlFlow::Continue(());
        }
        self.open = false;
        match self.sink.end_record() {
            Ok(()) => {
                self.stats.records += 1;
                ControlFlow::Continue(())
            }
            Err(e) => {
                self.error = Some(e);
                ControlFlow::Break(())
            }
        }
    }
}

// ============================================================================
// DRIVER
// ============================================================================

/// Writes the table behind `engine` into `sink`: an optional header record
/// of column labels, then one record per visible row. Empty records are
/// never written.
pub fn stream_table<S, R, K>(
    engine: &mut ProjectionEngine<'_, S>,
    resolver: &R,
    sink: &mut K,
    cancel: &CancelToken,
) -> EngineResult<StreamStats>
where
    S: AxisSource + ?Sized,
    R: ValueResolver + ?Sized,
    K: PresentationSink,
{
    let ctx = engine.context();
    let order = ctx.space.order();
    info!(target: "stream", "streaming table {}", order);

    let mut visitor = StreamVisitor {
        ctx: &ctx,
        resolver,
        sink,
        natural: order.natural_axes(),
        pass: Pass::Header,
        open: false,
        stats: StreamStats::default(),
        error: None,
    };

    let passes: &[Pass] = if ctx.layout.show_column_header {
        &[Pass::Header, Pass::Body]
    } else {
        &[Pass::Body]
    };
    for pass in passes {
        visitor.pass = *pass;
        let mut loops = build_loops(ctx.space, *pass == Pass::Header);
        let outcome = loops.run(&mut visitor, cancel);
        if outcome == LoopOutcome::Cancelled {
            warn!(
                target: "stream",
                "streaming {} cancelled after {} records",
                order,
                visitor.stats.records
            );
            return Err(EngineError::Cancelled);
        }
        if let Some(e) = visitor.error.take() {
            return Err(EngineError::Sink(e));
        }
    }

    debug!(
        target: "stream",
        "{} records, {} fields written for {}",
        visitor.stats.records,
        visitor.stats.fields,
        order
    );
    Ok(visitor.stats)
}
