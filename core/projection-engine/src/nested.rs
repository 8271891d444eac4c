//! FILENAME: core/projection-engine/src/nested.rs
//! PURPOSE: Generic nested loops over independently bounded counters.
//! CONTEXT: Each logical level supplies its own values through a
//! LevelHandler. The caller picks the nesting (outermost first) as a
//! permutation of the levels, and a visitor sees every complete tuple.
//! The streaming table driver is built on this, but nothing here knows
//! about tables.
//!
//! Semantics are those of an odometer: the innermost level advances first;
//! when a level is exhausted the next outer level advances and every inner
//! level is restarted. A level that yields nothing at all carries straight
//! outward. The walk ends when the outermost level is exhausted.

use std::ops::ControlFlow;

use crate::cancel::CancelToken;

/// Source of the values of one level.
pub trait LevelHandler {
    /// Restarts the level and returns its first value, or None if the level
    /// is empty in this context. `current` holds the values of all levels,
    /// indexed by logical level; only the outer levels are meaningful.
    fn start(&mut self, current: &[usize]) -> Option<usize>;

    /// The next value, or None once the level is exhausted.
    fn next(&mut self) -> Option<usize>;
}

/// Receives the tuples of a walk.
pub trait TupleVisitor {
    /// Called with the values of all levels, indexed by logical level.
    fn visit(&mut self, tuple: &[usize]) -> ControlFlow<()>;

    /// Called each time the end-of-record level completes a cycle.
    fn end_record(&mut self) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// How a walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopOutcome {
    Completed,
    /// The visitor asked to stop.
    Stopped,
    Cancelled,
}

/// A level running over `0..bound`, the same in every context.
#[derive(Debug, Clone)]
pub struct RangeLevel {
    bound: usize,
    next: usize,
}

impl RangeLevel {
    pub fn new(bound: usize) -> Self {
        RangeLevel { bound, next: 0 }
    }
}

impl LevelHandler for RangeLevel {
    fn start(&mut self, _current: &[usize]) -> Option<usize> {
        self.next = 0;
        self.next()
    }

    fn next(&mut self) -> Option<usize> {
        (self.next < self.bound).then(|| {
            self.next += 1;
            self.next - 1
        })
    }
}

pub struct NestedLoops<'h> {
    handlers: Vec<Box<dyn LevelHandler + 'h>>,
    order: Vec<usize>,
    end_record_level: Option<usize>,
}

impl<'h> NestedLoops<'h> {
    /// `order` lists logical levels from outermost to innermost.
    ///
    /// # Panics
    ///
    /// Panics if `order` is not a permutation of `0..handlers.len()`.
    pub fn new(handlers: Vec<Box<dyn LevelHandler + 'h>>, order: Vec<usize>) -> Self {
        assert_eq!(
            handlers.len(),
            order.len(),
            "nesting order must name every level exactly once"
        );
        let mut seen = vec![false; order.len()];
        for level in &order {
            assert!(
                *level < seen.len() && !std::mem::replace(&mut seen[*level], true),
                "nesting order {:?} is not a permutation",
                order
            );
        }
        NestedLoops {
            handlers,
            order,
            end_record_level: None,
        }
    }

    /// Flags a logical level whose completed cycles end a record.
    ///
    /// # Panics
    ///
    /// Panics if `level` is not a level of this walk.
    pub fn with_end_record(mut self, level: usize) -> Self {
        assert!(level < self.handlers.len(), "no level {}", level);
        self.end_record_level = Some(level);
        self
    }

    pub fn run<V: TupleVisitor + ?Sized>(
        &mut self,
        visitor: &mut V,
        cancel: &CancelToken,
    ) -> LoopOutcome {
        let n = self.order.len();
        let mut current = vec![0; n];
        if n == 0 {
            if cancel.is_cancelled() {
                return LoopOutcome::Cancelled;
            }
            return match visitor.visit(&current) {
                ControlFlow::Continue(()) => LoopOutcome::Completed,
                ControlFlow::Break(()) => LoopOutcome::Stopped,
            };
        }

        let mut depth = 0;
        let mut starting = true;
        loop {
            let level = self.order[depth];
            let value = if starting {
                self.handlers[level].start(&current)
            } else {
                self.handlers[level].next()
            };

            match value {
                Some(v) => {
                    current[level] = v;
                    if depth + 1 == n {
                        if cancel.is_cancelled() {
                            return LoopOutcome::Cancelled;
                        }
                        if visitor.visit(&current).is_break() {
                            return LoopOutcome::Stopped;
                        }
                        starting = false;
                    } else {
                        depth += 1;
                        starting = true;
                    }
                }
                None => {
                    // an empty level never started a cycle
                    if !starting
                        && self.end_record_level == Some(level)
                        && visitor.end_record().is_break()
                    {
                        return LoopOutcome::Stopped;
                    }
                    if depth == 0 {
                        return LoopOutcome::Completed;
                    }
                    depth -= 1;
                    starting = false;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        tuples: Vec<Vec<usize>>,
        records: usize,
        stop_after: Option<usize>,
    }

    impl TupleVisitor for Recorder {
        fn visit(&mut self, tuple: &[usize]) -> ControlFlow<()> {
            self.tuples.push(tuple.to_vec());
            match self.stop_after {
                Some(limit) if self.tuples.len() >= limit => ControlFlow::Break(()),
                _ => ControlFlow::Continue(()),
            }
        }

        fn end_record(&mut self) -> ControlFlow<()> {
            self.records += 1;
            ControlFlow::Continue(())
        }
    }

    fn ranges(bounds: &[usize]) -> Vec<Box<dyn LevelHandler>> {
        bounds
            .iter()
            .map(|b| Box::new(RangeLevel::new(*b)) as Box<dyn LevelHandler>)
            .collect()
    }

    /// Level whose size is the value of another level plus one.
    struct Triangle {
        outer: usize,
        inner: RangeLevel,
    }

    impl LevelHandler for Triangle {
        fn start(&mut self, current: &[usize]) -> Option<usize> {
            self.inner = RangeLevel::new(current[self.outer] + 1);
            self.inner.start(current)
        }

        fn next(&mut self) -> Option<usize> {
            self.inner.next()
        }
    }

    #[test]
    fn walks_in_the_given_order() {
        let mut loops = NestedLoops::new(ranges(&[2, 3]), vec![1, 0]);
        let mut rec = Recorder::default();
        assert_eq!(loops.run(&mut rec, &CancelToken::new()), LoopOutcome::Completed);
        assert_eq!(
            rec.tuples,
            vec![
                vec![0, 0],
                vec![1, 0],
                vec![0, 1],
                vec![1, 1],
                vec![0, 2],
                vec![1, 2],
            ]
        );
    }

    #[test]
    fn end_record_per_cycle() {
        let mut loops = NestedLoops::new(ranges(&[2, 3]), vec![0, 1]).with_end_record(1);
        let mut rec = Recorder::default();
        loops.run(&mut rec, &CancelToken::new());
        assert_eq!(rec.tuples.len(), 6);
        assert_eq!(rec.records, 2);
    }

    #[test]
    fn empty_levels_carry_outward() {
        let mut loops = NestedLoops::new(ranges(&[3, 0]), vec![0, 1]).with_end_record(1);
        let mut rec = Recorder::default();
        assert_eq!(loops.run(&mut rec, &CancelToken::new()), LoopOutcome::Completed);
        assert!(rec.tuples.is_empty());
        assert_eq!(rec.records, 0);
    }

    #[test]
    fn context_sensitive_levels_restart() {
        let handlers: Vec<Box<dyn LevelHandler>> = vec![
            Box::new(RangeLevel::new(3)),
            Box::new(Triangle {
                outer: 0,
                inner: RangeLevel::new(0),
            }),
        ];
        let mut loops = NestedLoops::new(handlers, vec![0, 1]);
        let mut rec = Recorder::default();
        loops.run(&mut rec, &CancelToken::new());
        assert_eq!(rec.tuples.len(), 1 + 2 + 3);
        assert_eq!(rec.tuples.last(), Some(&vec![2, 2]));
    }

    #[test]
    fn visitor_can_stop() {
        let mut loops = NestedLoops::new(ranges(&[4, 4]), vec![0, 1]);
        let mut rec = Recorder {
            stop_after: Some(5),
            ..Default::default()
        };
        assert_eq!(loops.run(&mut rec, &CancelToken::new()), LoopOutcome::Stopped);
        assert_eq!(rec.tuples.len(), 5);
    }

    #[test]
    fn cancellation_is_checked_before_visits() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut loops = NestedLoops::new(ranges(&[2]), vec![0]);
        let mut rec = Recorder::default();
        assert_eq!(loops.run(&mut rec, &cancel), LoopOutcome::Cancelled);
        assert!(rec.tuples.is_empty());
    }

    #[test]
    fn no_levels_visit_once() {
        let mut loops = NestedLoops::new(Vec::new(), Vec::new());
        let mut rec = Recorder::default();
        assert_eq!(loops.run(&mut rec, &CancelToken::new()), LoopOutcome::Completed);
        assert_eq!(rec.tuples, vec![Vec::<usize>::new()]);
    }

    #[test]
    #[should_panic(expected = "not a permutation")]
    fn rejects_repeated_levels() {
        NestedLoops::new(ranges(&[1, 1]), vec![0, 0]);
    }

    #[test]
    #[should_panic(expected = "exactly once")]
    fn rejects_length_mismatch() {
        NestedLoops::new(ranges(&[1, 1]), vec![0]);
    }
}
