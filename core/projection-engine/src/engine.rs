//! FILENAME: core/projection-engine/src/engine.rs
//! Projection Engine - random access into a projected table.
//!
//! This module takes an OrderSpec, the selected fields and group selection,
//! and a data source, and answers questions about the resulting 2-D table
//! without materialising it: how many rows and columns it has, which tuple
//! sits at (row, column), where a tuple lands, and what value a cell shows.
//!
//! Algorithm:
//! 1. Snapshot the axis space (cardinalities, merged grid, detector grid)
//! 2. Count each dimension recursively along its axes, memoising subtree
//!    counts and skipping duplicate tuples
//! 3. Rows: descend through the memoised counts
//! 4. Columns: walk forward leaf by leaf from the nearest stored checkpoint

use std::ops::Range;

use dataset::{
    AxisSource, FieldCategory, FieldDescriptor, FieldKind, SampleQuantity, Value, ValueResolver,
};
use log::{debug, info, warn};
use order_parser::{Axis, Dimension, OrderSpec};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::cancel::CancelToken;
use crate::cardinality::AxisSpace;
use crate::definition::{GroupSelection, MergeOptions, TableDefinition, TableLayout};
use crate::error::{EngineError, EngineResult};
use crate::merge;
use crate::tuple::Tuple;
use crate::view::TableView;

/// Subtree counts keyed by (dimension, depth, tuple normalised below depth).
type CountMemo = FxHashMap<(Dimension, usize, Tuple), usize>;

// ============================================================================
// WALKER
// ============================================================================

/// Counting and navigation over one dimension of the axis space.
struct Walker<'w> {
    space: &'w AxisSpace,
    memo: &'w mut CountMemo,
}

impl<'w> Walker<'w> {
    fn axes(&self, dimension: Dimension) -> &'w [Axis] {
        let space: &'w AxisSpace = self.space;
        space.order().axes(dimension)
    }

    fn is_leaf_visible(&self, dimension: Dimension, tuple: &Tuple) -> bool {
        !self.space.is_duplicate(dimension, tuple)
    }

    /// Number of visible leaves below `tuple` once the axes before `depth`
    /// are fixed.
    fn count(&mut self, dimension: Dimension, depth: usize, tuple: Tuple) -> usize {
        let axes = self.axes(dimension);
        if depth == axes.len() {
            return usize::from(self.is_leaf_visible(dimension, &tuple));
        }
        let key_tuple = tuple.reset(&axes[depth..]);
        if let Some(count) = self.memo.get(&(dimension, depth, key_tuple)) {
            return *count;
        }

        let axis = axes[depth];
        let n = self.space.cardinality(axis, &key_tuple);
        let total = if depth + 1 == axes.len() {
            (0..n)
                .filter(|i| self.is_leaf_visible(dimension, &key_tuple.with(axis, *i)))
                .count()
        } else {
            (0..n)
                .map(|i| self.count(dimension, depth + 1, key_tuple.with(axis, i)))
                .sum()
        };
        self.memo.insert((dimension, depth, key_tuple), total);
        total
    }

    /// The leaf with the given ordinal, by budget descent.
    fn descend(&mut self, dimension: Dimension, mut ordinal: usize) -> Option<Tuple> {
        let axes = self.axes(dimension);
        let mut tuple = Tuple::origin();
        for (depth, axis) in axes.iter().enumerate() {
            let n = self.space.cardinality(*axis, &tuple);
            let mut chosen = None;
            for i in 0..n {
                let child = tuple.with(*axis, i);
                let size = self.count(dimension, depth + 1, child);
                if ordinal < size {
                    chosen = Some(child);
                    break;
                }
                ordinal -= size;
            }
            tuple = chosen?;
        }
        Some(tuple)
    }

    /// First visible leaf below `tuple` with the axes before `depth` fixed.
    fn first_leaf(&mut self, dimension: Dimension, depth: usize, tuple: Tuple) -> Option<Tuple> {
        let axes = self.axes(dimension);
        let mut tuple = tuple.reset(&axes[depth..]);
        for d in depth..axes.len() {
            let axis = axes[d];
            let current = tuple;
            let n = self.space.cardinality(axis, &current);
            tuple = (0..n)
                .map(move |i| current.with(axis, i))
                .find(|child| self.count(dimension, d + 1, *child) > 0)?;
        }
        Some(tuple)
    }

    /// The visible leaf after `tuple`, odometer style.
    fn next_leaf(&mut self, dimension: Dimension, tuple: Tuple) -> Option<Tuple> {
        let axes = self.axes(dimension);
        for depth in (0..axes.len()).rev() {
            let axis = axes[depth];
            let n = self.space.cardinality(axis, &tuple);
            for i in tuple.index(axis) + 1..n {
                if let Some(leaf) = self.first_leaf(dimension, depth + 1, tuple.with(axis, i)) {
                    return Some(leaf);
                }
            }
        }
        None
    }

    /// Ordinal of the leaf `tuple` within its dimension, or None if the
    /// tuple is out of range or a duplicate.
    fn ordinal(&mut self, dimension: Dimension, tuple: &Tuple) -> Option<usize> {
        let axes = self.axes(dimension);
        let mut ordinal = 0;
        let mut prefix = Tuple::origin();
        for (depth, axis) in axes.iter().enumerate() {
            let index = tuple.index(*axis);
            if index >= self.space.cardinality(*axis, &prefix) {
                return None;
            }
            for i in 0..index {
                ordinal += self.count(dimension, depth + 1, prefix.with(*axis, i));
            }
            prefix = prefix.with(*axis, index);
        }
        self.is_leaf_visible(dimension, &prefix).then_some(ordinal)
    }
}

// ============================================================================
// TABLE CONTEXT
// ============================================================================

/// Read-only view of a prepared engine: enough to label and fill cells.
pub(crate) struct TableContext<'c, S: ?Sized> {
    pub(crate) source: &'c S,
    pub(crate) space: &'c AxisSpace,
    pub(crate) fields: &'c [FieldDescriptor],
    pub(crate) layout: &'c TableLayout,
}

impl<S: AxisSource + ?Sized> TableContext<'_, S> {
    /// Value of the cell at a fully fixed tuple.
    pub(crate) fn value<R: ValueResolver + ?Sized>(&self, resolver: &R, tuple: &Tuple) -> Value {
        let Some(field) = self.fields.get(tuple.index(Axis::Field)) else {
            return Value::Empty;
        };
        let dataset = tuple.index(Axis::Dataset);
        let time = tuple.index(Axis::Time);

        let resolved = match field.category() {
            FieldCategory::PerDataset => {
                let group = self.space.group_at(tuple).map_or(0, |(_, g)| g);
                resolver.resolve(dataset, group, 0, field)
            }
            FieldCategory::PerGroup => self
                .space
                .group_at(tuple)
                .and_then(|(ds, g)| resolver.resolve(ds, g, 0, field)),
            FieldCategory::PerSample => match self.space.merged_grid() {
                Some(grid) => self.merged_value(resolver, grid, tuple, field),
                None => self
                    .space
                    .group_at(tuple)
                    .and_then(|(ds, g)| resolver.resolve(ds, g, time, field)),
            },
        };
        resolved.unwrap_or_default()
    }

    /// Per-sample value on a merged grid: the shared coordinates come from
    /// the grid itself, everything else from the group's nearest sample.
    fn merged_value<R: ValueResolver + ?Sized>(
        &self,
        resolver: &R,
        grid: &[f64],
        tuple: &Tuple,
        field: &FieldDescriptor,
    ) -> Option<Value> {
        let m = tuple.index(Axis::Time);
        let point = *grid.get(m)?;
        match field.kind {
            FieldKind::Sample(SampleQuantity::X) => return Some(Value::Number(point)),
            FieldKind::Sample(SampleQuantity::Index) => return Some(Value::from(m)),
            _ => {}
        }
        let (ds, g) = self.space.group_at(tuple)?;
        let coords = self.source.sample_coordinates(ds, g)?;
        let sample = merge::nearest_within(coords, point, self.space.match_tolerance())?;
        resolver.resolve(ds, g, sample, field)
    }

    /// Label of a half tuple: one part per axis of the dimension, collapsed
    /// axes skipped.
    pub(crate) fn label(&self, dimension: Dimension, tuple: &Tuple) -> String {
        let parts: SmallVec<[String; 5]> = self
            .space
            .order()
            .axes(dimension)
            .iter()
            .filter(|axis| !self.space.is_collapsed(**axis))
            .map(|axis| self.label_part(*axis, tuple))
            .collect();
        parts.join(self.layout.label_separator.as_str())
    }

    fn label_part(&self, axis: Axis, tuple: &Tuple) -> String {
        let index = tuple.index(axis);
        match axis {
            Axis::Dataset => format!("Ds{}", index),
            Axis::Group => {
                let id = self
                    .space
                    .group_at(tuple)
                    .and_then(|(ds, g)| self.source.group_id(ds, g))
                    .or_else(|| self.first_group_id(tuple));
                match id {
                    Some(id) => format!("Grp{}", id),
                    None => "Grp?".to_string(),
                }
            }
            Axis::DetectorRow => format!("Row {}", index + 1),
            Axis::DetectorColumn => format!("Col {}", index + 1),
            Axis::Time => format!("Tm{}", index),
            Axis::Field => self
                .fields
                .get(index)
                .map(|f| f.abbreviated(self.layout.field_label_width).to_string())
                .unwrap_or_default(),
        }
    }

    /// Id of the selected group in the first data set that has it.
    fn first_group_id(&self, tuple: &Tuple) -> Option<i64> {
        let position = self.space.selection_position(tuple)?;
        (0..self.source.dataset_count()).find_map(|ds| {
            self.space
                .group_index(ds, position)
                .and_then(|g| self.source.group_id(ds, g))
        })
    }
}

// ============================================================================
// PROJECTION ENGINE
// ============================================================================

/// Random-access projection of a data source onto a table.
///
/// The engine borrows its source and owns every cache derived from it: the
/// axis space (with the merged grid), the subtree-count memo and the column
/// checkpoints. Replacing the selection or the merge options drops them all.
pub struct ProjectionEngine<'a, S: AxisSource + ?Sized> {
    source: &'a S,
    order: OrderSpec,
    fields: Vec<FieldDescriptor>,
    selection: GroupSelection,
    resolved_selection: Vec<usize>,
    merge: MergeOptions,
    layout: TableLayout,

    space: Option<AxisSpace>,
    memo: CountMemo,
    /// Column ordinal -> leaf, stored every `checkpoint_stride` columns.
    checkpoints: FxHashMap<usize, Tuple>,
    /// Last column resolved, so a left-to-right scan resumes without a
    /// checkpoint lookup.
    last_column: Option<(usize, Tuple)>,
}

impl<'a, S: AxisSource + ?Sized> ProjectionEngine<'a, S> {
    /// Builds an engine from a stored definition.
    pub fn new(source: &'a S, definition: &TableDefinition) -> EngineResult<Self> {
        let order = definition.parse_order()?;
        let mut engine = Self::with_parts(
            source,
            order,
            definition.fields.clone(),
            definition.selection.clone(),
        )?;
        engine.merge = definition.merge.clone();
        engine.layout = definition.layout.clone();
        Ok(engine)
    }

    /// Builds an engine with default layout and merge options.
    pub fn with_parts(
        source: &'a S,
        order: OrderSpec,
        fields: Vec<FieldDescriptor>,
        selection: GroupSelection,
    ) -> EngineResult<Self> {
        if source.dataset_count() == 0 {
            return Err(EngineError::NoDatasets);
        }
        if fields.is_empty() {
            return Err(EngineError::NoFields);
        }
        let resolved_selection = resolve_selection(source, &selection)?;
        info!(
            target: "projection",
            "table {} over {} data sets, {} groups, {} fields",
            order,
            source.dataset_count(),
            resolved_selection.len(),
            fields.len()
        );
        Ok(ProjectionEngine {
            source,
            order,
            fields,
            selection,
            resolved_selection,
            merge: MergeOptions::default(),
            layout: TableLayout::default(),
            space: None,
            memo: CountMemo::default(),
            checkpoints: FxHashMap::default(),
            last_column: None,
        })
    }

    pub fn order(&self) -> &OrderSpec {
        &self.order
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn selection(&self) -> &GroupSelection {
        &self.selection
    }

    /// Group indices the selection resolved to, in selection order.
    pub fn selected_groups(&self) -> &[usize] {
        &self.resolved_selection
    }

    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    pub fn source(&self) -> &'a S {
        self.source
    }

    /// Replaces the group selection. Every cache is rebuilt on next use.
    pub fn set_selection(&mut self, selection: GroupSelection) -> EngineResult<()> {
        self.resolved_selection = resolve_selection(self.source, &selection)?;
        self.selection = selection;
        self.invalidate();
        Ok(())
    }

    pub fn set_merge_options(&mut self, merge: MergeOptions) {
        self.merge = merge;
        self.invalidate();
    }

    /// Layout changes never alter counts, except the checkpoint stride.
    pub fn set_layout(&mut self, layout: TableLayout) {
        if layout.checkpoint_stride != self.layout.checkpoint_stride {
            self.checkpoints.clear();
            self.last_column = None;
        }
        self.layout = layout;
    }

    fn invalidate(&mut self) {
        debug!(target: "projection", "dropping cached axis space for {}", self.order);
        self.space = None;
        self.memo.clear();
        self.checkpoints.clear();
        self.last_column = None;
    }

    /// Splits the engine into a prepared read-only context, building the
    /// axis space on first use.
    pub(crate) fn context(&mut self) -> TableContext<'_, S> {
        let ProjectionEngine {
            source,
            order,
            fields,
            resolved_selection,
            merge,
            layout,
            space,
            ..
        } = self;
        let space = space.get_or_insert_with(|| {
            AxisSpace::build(*source, order, fields.as_slice(), resolved_selection.as_slice(), merge)
        });
        TableContext {
            source: *source,
            space,
            fields: fields.as_slice(),
            layout,
        }
    }

    fn space(&mut self) -> &AxisSpace {
        self.context().space
    }

    fn walker(&mut self) -> Walker<'_> {
        let ProjectionEngine {
            source,
            order,
            fields,
            resolved_selection,
            merge,
            space,
            memo,
            ..
        } = self;
        let space = space.get_or_insert_with(|| {
            AxisSpace::build(*source, order, fields.as_slice(), resolved_selection.as_slice(), merge)
        });
        Walker { space, memo }
    }

    /// True when the Time axis runs over the merged grid.
    pub fn uses_merged_grid(&mut self) -> bool {
        self.space().uses_merged_grid()
    }

    pub fn merged_grid(&mut self) -> Option<&[f64]> {
        self.space().merged_grid()
    }

    pub fn row_count(&mut self) -> usize {
        self.walker().count(Dimension::Rows, 0, Tuple::origin())
    }

    pub fn column_count(&mut self) -> usize {
        self.walker().count(Dimension::Columns, 0, Tuple::origin())
    }

    /// The full tuple shown at (row, column).
    pub fn resolve(&mut self, row: usize, column: usize) -> EngineResult<Tuple> {
        let rows = self.row_count();
        let columns = self.column_count();
        let out_of_range = || EngineError::IndexOutOfRange {
            row,
            column,
            rows,
            columns,
        };
        if row >= rows || column >= columns {
            return Err(out_of_range());
        }
        let row_tuple = self.row_tuple(row).ok_or_else(out_of_range)?;
        let column_tuple = self.column_tuple(column).ok_or_else(out_of_range)?;
        Ok(row_tuple.overlay(&column_tuple, self.order.column_axes()))
    }

    /// Resolves a row by budget descent through the memoised counts.
    fn row_tuple(&mut self, row: usize) -> Option<Tuple> {
        self.walker().descend(Dimension::Rows, row)
    }

    /// Resolves a column by walking from the nearest checkpoint, or from the
    /// previous column when it lies in the same block.
    fn column_tuple(&mut self, column: usize) -> Option<Tuple> {
        let stride = self.layout.checkpoint_stride.max(1);
        let block = column / stride;

        let resume = self
            .last_column
            .filter(|(last, _)| *last <= column && *last / stride == block);
        let (mut ordinal, mut tuple) = match resume {
            Some(found) => found,
            None => (block * stride, self.checkpoint(block, stride)?),
        };

        let mut walker = self.walker();
        while ordinal < column {
            tuple = walker.next_leaf(Dimension::Columns, tuple)?;
            ordinal += 1;
        }
        self.last_column = Some((column, tuple));
        Some(tuple)
    }

    /// Leaf at ordinal `block * stride`, filling missing checkpoints from the
    /// nearest stored one below.
    fn checkpoint(&mut self, block: usize, stride: usize) -> Option<Tuple> {
        if let Some(tuple) = self.checkpoints.get(&(block * stride)) {
            return Some(*tuple);
        }
        let nearest = (0..block)
            .rev()
            .find_map(|b| self.checkpoints.get(&(b * stride)).map(|t| (b, *t)));
        let (mut from, mut tuple) = match nearest {
            Some(found) => found,
            None => {
                let first = self.walker().first_leaf(Dimension::Columns, 0, Tuple::origin())?;
                self.checkpoints.insert(0, first);
                (0, first)
            }
        };
        while from < block {
            let mut walker = self.walker();
            for _ in 0..stride {
                tuple = walker.next_leaf(Dimension::Columns, tuple)?;
            }
            from += 1;
            self.checkpoints.insert(from * stride, tuple);
        }
        Some(tuple)
    }

    /// Inverse of `resolve`: the (row, column) where `tuple` is shown, if
    /// it is shown at all.
    pub fn locate(&mut self, tuple: &Tuple) -> Option<(usize, usize)> {
        let mut walker = self.walker();
        let row = walker.ordinal(Dimension::Rows, tuple)?;
        let column = walker.ordinal(Dimension::Columns, tuple)?;
        Some((row, column))
    }

    pub fn row_label(&mut self, row: usize) -> EngineResult<String> {
        let tuple = self.resolve(row, 0)?;
        Ok(self.context().label(Dimension::Rows, &tuple))
    }

    pub fn column_label(&mut self, column: usize) -> EngineResult<String> {
        let tuple = self.resolve(0, column)?;
        Ok(self.context().label(Dimension::Columns, &tuple))
    }

    /// Value shown at (row, column). Values the resolver cannot provide are
    /// `Value::Empty`.
    pub fn value_at<R: ValueResolver + ?Sized>(
        &mut self,
        resolver: &R,
        row: usize,
        column: usize,
    ) -> EngineResult<Value> {
        let tuple = self.resolve(row, column)?;
        Ok(self.context().value(resolver, &tuple))
    }

    /// Materialises a window of the table. Ranges are clipped to the table.
    pub fn view<R: ValueResolver + ?Sized>(
        &mut self,
        resolver: &R,
        rows: Range<usize>,
        columns: Range<usize>,
        cancel: &CancelToken,
    ) -> EngineResult<TableView> {
        let total_rows = self.row_count();
        let total_columns = self.column_count();
        let rows = rows.start.min(total_rows)..rows.end.min(total_rows);
        let columns = columns.start.min(total_columns)..columns.end.min(total_columns);

        let out_of_range = |row: usize, column: usize| EngineError::IndexOutOfRange {
            row,
            column,
            rows: total_rows,
            columns: total_columns,
        };
        let column_tuples = columns
            .clone()
            .map(|c| self.column_tuple(c).ok_or_else(|| out_of_range(0, c)))
            .collect::<EngineResult<Vec<_>>>()?;
        let mut view = TableView::new(rows.start, columns.start, total_rows, total_columns);
        {
            let ctx = self.context();
            view.column_labels = column_tuples
                .iter()
                .map(|t| ctx.label(Dimension::Columns, t))
                .collect();
        }

        for row in rows {
            if cancel.is_cancelled() {
                warn!(target: "projection", "view of {} cancelled at row {}", self.order, row);
                return Err(EngineError::Cancelled);
            }
            let row_tuple = self.row_tuple(row).ok_or_else(|| out_of_range(row, 0))?;
            let ctx = self.context();
            let column_axes = ctx.space.order().column_axes();
            view.row_labels.push(ctx.label(Dimension::Rows, &row_tuple));
            view.cells.push(
                column_tuples
                    .iter()
                    .map(|c| ctx.value(resolver, &row_tuple.overlay(c, column_axes)))
                    .collect(),
            );
        }
        Ok(view)
    }
}

/// Turns a selection into group indices, checking them against the source.
fn resolve_selection<S: AxisSource + ?Sized>(
    source: &S,
    selection: &GroupSelection,
) -> EngineResult<Vec<usize>> {
    let available = (0..source.dataset_count())
        .map(|ds| source.group_count(ds))
        .max()
        .unwrap_or(0);
    let groups = match selection {
        GroupSelection::All => (0..available).collect::<Vec<_>>(),
        GroupSelection::Explicit(groups) => {
            if let Some(bad) = groups.iter().find(|g| **g >= available) {
                return Err(EngineError::UnknownGroup { group: *bad });
            }
            groups.clone()
        }
    };
    if groups.is_empty() {
        return Err(EngineError::EmptySelection);
    }
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataset::{DataCollection, DataSet, DatasetQuantity, Group, GroupQuantity};

    fn two_groups() -> DataCollection {
        [DataSet::new("run")
            .with_group(
                Group::new(100, vec![1.0, 2.0], vec![10.0, 20.0]).with_errors(vec![1.0, 2.0]),
            )
            .with_group(
                Group::new(200, vec![1.0, 2.0], vec![30.0, 40.0]).with_errors(vec![3.0, 4.0]),
            )]
        .into_iter()
        .collect()
    }

    fn engine<'a>(
        source: &'a DataCollection,
        order: &str,
        fields: Vec<FieldDescriptor>,
    ) -> ProjectionEngine<'a, DataCollection> {
        let order = order_parser::parse(order).unwrap();
        ProjectionEngine::with_parts(source, order, fields, GroupSelection::All).unwrap()
    }

    fn y_and_error() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::sample(SampleQuantity::Y),
            FieldDescriptor::sample(SampleQuantity::Error),
        ]
    }

    #[test]
    fn counts_group_time_rows() {
        let data = two_groups();
        let mut e = engine(&data, "HGT,F", y_and_error());
        assert_eq!(e.row_count(), 4);
        assert_eq!(e.column_count(), 2);
        assert!(!e.uses_merged_grid());
    }

    #[test]
    fn resolves_and_fills_cells() {
        let data = two_groups();
        let mut e = engine(&data, "HGT,F", y_and_error());
        let t = e.resolve(3, 1).unwrap();
        assert_eq!(t.index(Axis::Group), 1);
        assert_eq!(t.index(Axis::Time), 1);
        assert_eq!(t.index(Axis::Field), 1);
        assert_eq!(e.value_at(&data, 3, 1).unwrap(), Value::Number(4.0));
        assert_eq!(e.value_at(&data, 2, 0).unwrap(), Value::Number(30.0));
    }

    #[test]
    fn out_of_range_is_an_error_value() {
        let data = two_groups();
        let mut e = engine(&data, "HGT,F", y_and_error());
        assert!(matches!(e.resolve(4, 0), Err(EngineError::IndexOutOfRange { .. })));
        assert!(matches!(e.resolve(0, 2), Err(EngineError::IndexOutOfRange { .. })));
    }

    #[test]
    fn labels() {
        let data = two_groups();
        let mut e = engine(&data, "HGT,F", y_and_error());
        assert_eq!(e.row_label(3).unwrap(), "Ds0:Grp200:Tm1");
        assert_eq!(e.column_label(0).unwrap(), "Y va");
        assert_eq!(e.column_label(1).unwrap(), "Erro");
    }

    #[test]
    fn construction_errors() {
        let data = two_groups();
        let order = order_parser::parse("HG,F").unwrap();
        let empty = DataCollection::new();
        assert!(matches!(
            ProjectionEngine::with_parts(&empty, order.clone(), y_and_error(), GroupSelection::All),
            Err(EngineError::NoDatasets)
        ));
        assert!(matches!(
            ProjectionEngine::with_parts(&data, order.clone(), vec![], GroupSelection::All),
            Err(EngineError::NoFields)
        ));
        let none = GroupSelection::Explicit(vec![]);
        assert!(matches!(
            ProjectionEngine::with_parts(&data, order.clone(), y_and_error(), none),
            Err(EngineError::EmptySelection)
        ));
        let unknown = GroupSelection::Explicit(vec![0, 7]);
        assert!(matches!(
            ProjectionEngine::with_parts(&data, order, y_and_error(), unknown),
            Err(EngineError::UnknownGroup { group: 7 })
        ));

        let bad = TableDefinition::new(1, "HG,G").with_fields(y_and_error());
        assert!(matches!(
            ProjectionEngine::new(&data, &bad),
            Err(EngineError::Order(_))
        ));
    }

    #[test]
    fn selection_change_invalidates_caches() {
        let data = two_groups();
        let mut e = engine(&data, "HGT,F", y_and_error());
        assert_eq!(e.row_count(), 4);
        e.set_selection(GroupSelection::Explicit(vec![1])).unwrap();
        assert_eq!(e.row_count(), 2);
        assert_eq!(e.value_at(&data, 0, 0).unwrap(), Value::Number(30.0));
        assert!(e.set_selection(GroupSelection::Explicit(vec![9])).is_err());
        // a failed change keeps the previous selection
        assert_eq!(e.selected_groups(), &[1]);
    }

    #[test]
    fn per_dataset_fields_collapse_group_axes() {
        let data = two_groups();
        let title = vec![FieldDescriptor::dataset(DatasetQuantity::Title)];
        let mut e = engine(&data, "HGT,F", title);
        assert_eq!(e.row_count(), 1);
        assert_eq!(e.row_label(0).unwrap(), "Ds0");
        assert_eq!(e.value_at(&data, 0, 0).unwrap(), Value::Text("run".into()));
    }

    #[test]
    fn group_fields_skip_time() {
        let data = two_groups();
        let mut e = engine(&data, "HG,TF", vec![FieldDescriptor::group(GroupQuantity::Id)]);
        assert_eq!(e.row_count(), 2);
        assert_eq!(e.column_count(), 1);
        assert_eq!(e.value_at(&data, 1, 0).unwrap(), Value::Integer(200));
    }

    #[test]
    fn view_window() {
        let data = two_groups();
        let mut e = engine(&data, "HGT,F", y_and_error());
        let view = e.view(&data, 1..10, 0..2, &CancelToken::new()).unwrap();
        assert_eq!(view.row_count(), 3);
        assert_eq!(view.column_count(), 2);
        assert_eq!(view.first_row, 1);
        assert_eq!(view.column_labels, vec!["Y va", "Erro"]);
        assert_eq!(view.cell(0, 0), Some(&Value::Number(20.0)));

        let cancel = CancelToken::new();
        cancel.cancel();
        assert!(matches!(
            e.view(&data, 0..4, 0..2, &cancel),
            Err(EngineError::Cancelled)
        ));
    }
}
