//! FILENAME: core/projection-engine/src/merge.rs
//! PURPOSE: Tolerance-based union of sorted sample grids.
//! CONTEXT: When groups with different sample coordinates share one Time
//! axis, their grids are folded into a single sorted grid. Points closer
//! than a tolerance collapse into their midpoint.
//!
//! The tolerance of each fold step is derived from the grid accumulated so
//! far, so the result depends on the fold order. Callers fold data set by
//! data set, then in selection order, and that order is part of the result.

use log::debug;

use crate::definition::MergeOptions;

/// Tolerance for merging into `accumulated`: the average interval of the
/// sequence divided by `divisor`, i.e. `(last - first) / (len - 1) / divisor`.
/// Zero for fewer than two points, or when the result is negative or not
/// finite.
///
/// The interval count is used rather than the point count. With
/// `(last - first) / len / divisor` a two-point grid `[1, 2]` would get a
/// tolerance of 0.025 and keep 1.05 apart from 1.0 instead of folding the
/// pair into 1.025.
pub fn tolerance(accumulated: &[f64], divisor: f64) -> f64 {
    let (first, last) = match (accumulated.first(), accumulated.last()) {
        (Some(first), Some(last)) if accumulated.len() > 1 => (*first, *last),
        _ => return 0.0,
    };
    let delta = (last - first) / (accumulated.len() - 1) as f64 / divisor;
    if delta.is_finite() && delta >= 0.0 {
        delta
    } else {
        0.0
    }
}

/// Two-pointer union of two sorted sequences. Values within `tolerance` of
/// each other are replaced by their midpoint and both pointers advance.
///
/// A midpoint never passes the next pending point of either input, so the
/// output stays sorted even when one input holds points closer together than
/// `tolerance`.
pub fn merge_pair(a: &[f64], b: &[f64], tolerance: f64) -> Vec<f64> {
    let mut merged = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        let (x, y) = (a[i], b[j]);
        if x < y - tolerance {
            merged.push(x);
            i += 1;
        } else if x > y + tolerance {
            merged.push(y);
            j += 1;
        } else {
            let mut midpoint = (x + y) / 2.0;
            if let Some(next) = a.get(i + 1) {
                midpoint = midpoint.min(*next);
            }
            if let Some(next) = b.get(j + 1) {
                midpoint = midpoint.min(*next);
            }
            merged.push(midpoint);
            i += 1;
            j += 1;
        }
    }
    merged.extend_from_slice(&a[i..]);
    merged.extend_from_slice(&b[j..]);
    merged
}

/// Incremental fold of sample grids.
#[derive(Debug, Clone)]
pub struct SequenceMerge {
    divisor: f64,
    merged: Vec<f64>,
    inputs: usize,
}

impl SequenceMerge {
    pub fn new(options: &MergeOptions) -> Self {
        SequenceMerge {
            divisor: options.tolerance_divisor,
            merged: Vec::new(),
            inputs: 0,
        }
    }

    /// Folds one more sorted sequence into the accumulated grid.
    pub fn push(&mut self, sequence: &[f64]) {
        let tol = tolerance(&self.merged, self.divisor);
        self.merged = merge_pair(&self.merged, sequence, tol);
        self.inputs += 1;
    }

    pub fn finish(self) -> Vec<f64> {
        debug!(
            target: "merge",
            "merged {} grids into {} points",
            self.inputs,
            self.merged.len()
        );
        self.merged
    }
}

/// Folds `inputs` left to right.
pub fn merge_sequences<'s, I>(inputs: I, options: &MergeOptions) -> Vec<f64>
where
    I: IntoIterator<Item = &'s [f64]>,
{
    let mut merge = SequenceMerge::new(options);
    for sequence in inputs {
        merge.push(sequence);
    }
    merge.finish()
}

/// Smallest positive gap between neighbouring points, or None when there is
/// none (fewer than two distinct points).
pub fn min_spacing(grid: &[f64]) -> Option<f64> {
    grid.windows(2)
        .map(|pair| pair[1] - pair[0])
        .filter(|gap| *gap > 0.0)
        .fold(None, |min: Option<f64>, gap| match min {
            Some(m) if m <= gap => Some(m),
            _ => Some(gap),
        })
}

/// Index of the coordinate in sorted `coords` nearest to `x`, provided it is
/// no further away than `tolerance`.
pub fn nearest_within(coords: &[f64], x: f64, tolerance: f64) -> Option<usize> {
    let split = coords.partition_point(|c| *c < x);
    let before = split.checked_sub(1);
    let after = (split < coords.len()).then_some(split);
    let nearest = match (before, after) {
        (Some(b), Some(a)) => {
            if x - coords[b] <= coords[a] - x {
                b
            } else {
                a
            }
        }
        (Some(b), None) => b,
        (None, Some(a)) => a,
        (None, None) => return None,
    };
    ((coords[nearest] - x).abs() <= tolerance).then_some(nearest)
}
