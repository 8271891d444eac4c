//! FILENAME: core/projection-engine/src/cardinality.rs
//! PURPOSE: The shape of the data space behind one table.
//! CONTEXT: AxisSpace is built once per (order, fields, selection, merge
//! options) and answers, for any partially fixed tuple, how many indices an
//! axis runs over, which group a tuple points at, and whether a tuple would
//! only repeat a value shown elsewhere. It snapshots everything it needs from
//! the AxisSource so that enumeration never touches the source again.

use dataset::{AxisSource, FieldCategory, FieldDescriptor};
use log::{debug, warn};
use rustc_hash::FxHashMap;
use order_parser::{Axis, Dimension, OrderSpec};

use crate::definition::MergeOptions;
use crate::merge::{self, SequenceMerge};
use crate::tuple::Tuple;

// ============================================================================
// AXIS SETS
// ============================================================================

/// Small bit set of axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisSet(u8);

impl AxisSet {
    pub fn of(axes: &[Axis]) -> Self {
        AxisSet(axes.iter().fold(0, |bits, axis| bits | 1 << axis.slot()))
    }

    pub fn contains(self, axis: Axis) -> bool {
        self.0 & (1 << axis.slot()) != 0
    }
}

/// The axes whose index changes the value of a field.
fn relevant_axes(field: &FieldDescriptor, merged: bool) -> AxisSet {
    use Axis::*;
    match field.category() {
        FieldCategory::PerDataset => AxisSet::of(&[Dataset]),
        FieldCategory::PerGroup => AxisSet::of(&[Dataset, Group, DetectorRow, DetectorColumn]),
        FieldCategory::PerSample if merged && field.kind.is_shared_coordinate() => {
            AxisSet::of(&[Time])
        }
        FieldCategory::PerSample => {
            AxisSet::of(&[Dataset, Group, DetectorRow, DetectorColumn, Time])
        }
    }
}

// ============================================================================
// DETECTOR GRID
// ============================================================================

/// Placement of the selected groups on an area detector. Cells hold
/// positions in the selection; unoccupied cells are holes. Only occupied
/// cells are stored, so a few groups on a large detector stay cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorGrid {
    rows: usize,
    columns: usize,
    cells: FxHashMap<(usize, usize), usize>,
}

impl DetectorGrid {
    /// Lays out the selected groups of data set 0 by their detector cells.
    /// The first group claiming a cell keeps it. A cell whose extent does not
    /// fit in `usize` is left off the grid.
    fn build<S: AxisSource + ?Sized>(source: &S, selection: &[usize]) -> Self {
        let mut grid = DetectorGrid {
            rows: 0,
            columns: 0,
            cells: FxHashMap::default(),
        };
        for (pos, group) in selection.iter().enumerate() {
            let Some((r, c)) = source.detector_cell(0, *group) else {
                continue;
            };
            let (Some(rows), Some(columns)) = (r.checked_add(1), c.checked_add(1)) else {
                warn!(target: "projection", "group {} sits outside the detector at ({}, {})", group, r, c);
                continue;
            };
            grid.rows = grid.rows.max(rows);
            grid.columns = grid.columns.max(columns);
            grid.cells.entry((r, c)).or_insert(pos);
        }
        grid
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Selection position at (row, column), or None for a hole.
    pub fn position(&self, row: usize, column: usize) -> Option<usize> {
        self.cells.get(&(row, column)).copied()
    }

    /// Positions of the occupied cells inside the first `rows` x `columns`
    /// block, row by row.
    pub fn occupied(&self, rows: usize, columns: usize) -> Vec<usize> {
        let mut cells: Vec<(&(usize, usize), &usize)> = self
            .cells
            .iter()
            .filter(|((r, c), _)| *r < rows && *c < columns)
            .collect();
        cells.sort_unstable_by_key(|(cell, _)| **cell);
        cells.into_iter().map(|(_, pos)| *pos).collect()
    }
}

// ============================================================================
// AXIS SPACE
// ============================================================================

#[derive(Debug, Clone)]
pub struct AxisSpace {
    order: OrderSpec,
    dataset_count: usize,
    field_count: usize,
    /// Group index in each data set for every selection position.
    selection: Vec<usize>,
    /// Sample count per [data set][selection position]; None where the data
    /// set has no such group.
    sample_counts: Vec<Vec<Option<usize>>>,
    detector: Option<DetectorGrid>,
    group_dependent: bool,
    has_sample_field: bool,
    merged: Option<Vec<f64>>,
    /// Maximum distance between a merged grid point and the group sample
    /// standing in for it.
    match_tolerance: f64,
    relevance: Vec<AxisSet>,
    /// Dimension holding F.
    field_dimension: Dimension,
}

impl AxisSpace {
    /// Snapshots the structure of `source` for this table. `selection` holds
    /// group indices and must not be empty.
    pub fn build<S: AxisSource + ?Sized>(
        source: &S,
        order: &OrderSpec,
        fields: &[FieldDescriptor],
        selection: &[usize],
        merge_options: &MergeOptions,
    ) -> Self {
        let dataset_count = source.dataset_count();
        let has_sample_field = fields
            .iter()
            .any(|f| f.category() == FieldCategory::PerSample);
        let group_dependent = has_sample_field
            || fields.iter().any(|f| f.category() == FieldCategory::PerGroup);

        let sample_counts = (0..dataset_count)
            .map(|ds| {
                let groups = source.group_count(ds);
                selection
                    .iter()
                    .map(|g| (*g < groups).then(|| source.sample_count(ds, *g)))
                    .collect()
            })
            .collect();

        let detector = order
            .uses_detector_grid()
            .then(|| DetectorGrid::build(source, selection));

        let use_merged = has_sample_field && needs_merged_grid(order);
        let field_dimension = order
            .position(Axis::Field)
            .map_or(Dimension::Columns, |(dim, _)| dim);

        let mut space = AxisSpace {
            order: order.clone(),
            dataset_count,
            field_count: fields.len(),
            selection: selection.to_vec(),
            sample_counts,
            detector,
            group_dependent,
            has_sample_field,
            merged: None,
            match_tolerance: 0.0,
            relevance: fields.iter().map(|f| relevant_axes(f, use_merged)).collect(),
            field_dimension,
        };

        if use_merged {
            let grid = space.merge_visible_grids(source, merge_options);
            // a degenerate grid has no spacing; any sample is the nearest one
            space.match_tolerance = merge::min_spacing(&grid)
                .map(|s| s / 8.0)
                .filter(|t| t.is_finite() && *t > 0.0)
                .unwrap_or(f64::INFINITY);
            debug!(
                target: "projection",
                "order {} uses a merged grid of {} points",
                order,
                grid.len()
            );
            space.merged = Some(grid);
        }
        space
    }

    /// Folds the sample grids of every data set and selected group the table
    /// can reach, data set by data set.
    fn merge_visible_grids<S: AxisSource + ?Sized>(
        &self,
        source: &S,
        options: &MergeOptions,
    ) -> Vec<f64> {
        let datasets = if self.order.contains(Axis::Dataset) {
            self.dataset_count
        } else {
            self.dataset_count.min(1)
        };
        let positions: Vec<usize> = match &self.detector {
            Some(grid) => {
                // a detector axis left out of the order stays on its 0 line
                let rows = if self.order.contains(Axis::DetectorRow) {
                    grid.rows()
                } else {
                    grid.rows().min(1)
                };
                let columns = if self.order.contains(Axis::DetectorColumn) {
                    grid.columns()
                } else {
                    grid.columns().min(1)
                };
                grid.occupied(rows, columns)
            }
            None if self.order.contains(Axis::Group) => (0..self.selection.len()).collect(),
            None => vec![0],
        };

        let mut merge = SequenceMerge::new(options);
        for ds in 0..datasets {
            for pos in &positions {
                let coords = self
                    .group_index(ds, *pos)
                    .and_then(|g| source.sample_coordinates(ds, g));
                if let Some(coords) = coords {
                    merge.push(coords);
                }
            }
        }
        merge.finish()
    }

    pub fn order(&self) -> &OrderSpec {
        &self.order
    }

    pub fn merged_grid(&self) -> Option<&[f64]> {
        self.merged.as_deref()
    }

    pub fn uses_merged_grid(&self) -> bool {
        self.merged.is_some()
    }

    pub fn match_tolerance(&self) -> f64 {
        self.match_tolerance
    }

    pub fn detector_grid(&self) -> Option<&DetectorGrid> {
        self.detector.as_ref()
    }

    /// True when the axis only ever takes index 0 in this table: it is
    /// absent from the order, or no selected field varies along it.
    pub fn is_collapsed(&self, axis: Axis) -> bool {
        if !self.order.contains(axis) {
            return true;
        }
        match axis {
            Axis::Group | Axis::DetectorRow | Axis::DetectorColumn => !self.group_dependent,
            Axis::Time => !self.has_sample_field,
            Axis::Dataset | Axis::Field => false,
        }
    }

    /// Number of indices `axis` runs over, given the outer axes fixed in
    /// `tuple`.
    pub fn cardinality(&self, axis: Axis, tuple: &Tuple) -> usize {
        if self.is_collapsed(axis) {
            return 1;
        }
        match axis {
            Axis::Dataset => self.dataset_count,
            Axis::Field => self.field_count,
            Axis::Group => self.selection.len(),
            Axis::DetectorRow => self.detector.as_ref().map_or(0, DetectorGrid::rows),
            Axis::DetectorColumn => self.detector.as_ref().map_or(0, DetectorGrid::columns),
            Axis::Time => match &self.merged {
                Some(grid) => grid.len(),
                None => self
                    .selection_position(tuple)
                    .and_then(|pos| self.sample_count(tuple.index(Axis::Dataset), pos))
                    .unwrap_or(0),
            },
        }
    }

    /// Position in the selection the tuple points at, or None for a
    /// detector hole.
    pub fn selection_position(&self, tuple: &Tuple) -> Option<usize> {
        match &self.detector {
            Some(grid) => grid.position(
                tuple.index(Axis::DetectorRow),
                tuple.index(Axis::DetectorColumn),
            ),
            None => Some(tuple.index(Axis::Group)),
        }
    }

    /// Group index in `dataset` for a selection position, if that data set
    /// has the group.
    pub fn group_index(&self, dataset: usize, position: usize) -> Option<usize> {
        let group = *self.selection.get(position)?;
        self.sample_count(dataset, position).map(|_| group)
    }

    /// Group the tuple points at: (data set, group index).
    pub fn group_at(&self, tuple: &Tuple) -> Option<(usize, usize)> {
        let dataset = tuple.index(Axis::Dataset);
        let position = self.selection_position(tuple)?;
        self.group_index(dataset, position).map(|g| (dataset, g))
    }

    fn sample_count(&self, dataset: usize, position: usize) -> Option<usize> {
        *self.sample_counts.get(dataset)?.get(position)?
    }

    /// A half tuple of `dimension` is a duplicate when its field does not
    /// vary along some axis of that dimension whose index is not 0. Only the
    /// dimension holding F suppresses.
    pub fn is_duplicate(&self, dimension: Dimension, tuple: &Tuple) -> bool {
        if dimension != self.field_dimension {
            return false;
        }
        let Some(relevant) = self.relevance.get(tuple.index(Axis::Field)) else {
            return false;
        };
        self.order
            .axes(dimension)
            .iter()
            .any(|axis| *axis != Axis::Field && !relevant.contains(*axis) && tuple.index(*axis) != 0)
    }
}

/// The merged grid is needed when some axis the Time axis depends on is not
/// fixed before Time within Time's own dimension.
pub fn needs_merged_grid(order: &OrderSpec) -> bool {
    let Some((time_dim, time_depth)) = order.position(Axis::Time) else {
        return false;
    };
    [Axis::Dataset, Axis::Group, Axis::DetectorRow, Axis::DetectorColumn]
        .iter()
        .filter_map(|axis| order.position(*axis))
        .any(|(dim, depth)| dim != time_dim || depth > time_depth)
}
