//! FILENAME: core/projection-engine/src/tuple.rs
//! PURPOSE: One index per axis, identifying a single cell of the data space.
//! CONTEXT: Tuples are small and Copy. Recursive enumeration passes them by
//! value and derives children with `with`, so sibling branches never share a
//! mutable accumulator.

use order_parser::{Axis, AXIS_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tuple {
    slots: [usize; AXIS_COUNT],
}

impl Tuple {
    /// Every axis at index 0.
    pub fn origin() -> Self {
        Tuple {
            slots: [0; AXIS_COUNT],
        }
    }

    /// Builds a tuple from the values of a list of levels; axes not named in
    /// `axes` sit at 0.
    pub fn from_levels(axes: &[Axis], values: &[usize]) -> Self {
        axes.iter()
            .zip(values)
            .fold(Tuple::origin(), |tuple, (axis, value)| tuple.with(*axis, *value))
    }

    pub fn index(&self, axis: Axis) -> usize {
        self.slots[axis.slot()]
    }

    #[must_use]
    pub fn with(mut self, axis: Axis, index: usize) -> Self {
        self.slots[axis.slot()] = index;
        self
    }

    /// Puts every axis in `axes` back to index 0.
    #[must_use]
    pub fn reset(self, axes: &[Axis]) -> Self {
        axes.iter().fold(self, |tuple, axis| tuple.with(*axis, 0))
    }

    /// Takes the slots of `axes` from `other`, keeping everything else.
    #[must_use]
    pub fn overlay(mut self, other: &Tuple, axes: &[Axis]) -> Self {
        for axis in axes {
            self.slots[axis.slot()] = other.slots[axis.slot()];
        }
        self
    }
}

impl Default for Tuple {
    fn default() -> Self {
        Tuple::origin()
    }
}

impl std::fmt::Display for Tuple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, axis) in Axis::ALL.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", axis.code(), self.index(*axis))?;
        }
        Ok(())
    }
}
