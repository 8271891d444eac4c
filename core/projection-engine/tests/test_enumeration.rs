//! FILENAME: tests/test_enumeration.rs
//! Whole-table checks: streaming and random access must describe the same
//! table, and every cell must map back to its own coordinates.

mod common;

use common::{
    body_only, definition, detector, mixed_fields, sample_fields, stream, two_runs,
    DETECTOR_ORDERS, GROUPED_ORDERS,
};
use dataset::{DataCollection, DataSet, FieldDescriptor, Group, Value};
use projection_engine::{CancelToken, ProjectionEngine, TableLayout};
use proptest::prelude::*;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn full_view(
    engine: &mut ProjectionEngine<'_, DataCollection>,
    data: &DataCollection,
) -> Vec<Value> {
    let (rows, cols) = (engine.row_count(), engine.column_count());
    let view = engine
        .view(data, 0..rows, 0..cols, &CancelToken::new())
        .expect("view");
    assert!(view.is_complete());
    view.cells.into_iter().flatten().collect()
}

/// Streamed body equals the random-access view, cell for cell.
fn check_stream_matches_view(data: &DataCollection, order: &str, fields: Vec<FieldDescriptor>) {
    let mut engine = ProjectionEngine::new(data, &body_only(order, fields)).unwrap();
    let (rows, cols) = (engine.row_count(), engine.column_count());
    let streamed: Vec<Value> = stream(&mut engine, data).into_iter().flatten().collect();
    assert_eq!(streamed.len(), rows * cols, "order {}", order);
    assert_eq!(streamed, full_view(&mut engine, data), "order {}", order);
}

/// locate(resolve(r, c)) == (r, c) for every cell.
fn check_round_trip(data: &DataCollection, order: &str, fields: Vec<FieldDescriptor>) {
    let mut engine = ProjectionEngine::new(data, &definition(order, fields)).unwrap();
    for r in 0..engine.row_count() {
        for c in 0..engine.column_count() {
            let tuple = engine.resolve(r, c).unwrap();
            assert_eq!(engine.locate(&tuple), Some((r, c)), "order {} tuple {}", order, tuple);
        }
    }
}

fn every_order() -> impl Iterator<Item = (&'static str, DataCollection)> {
    GROUPED_ORDERS
        .iter()
        .map(|o| (*o, two_runs()))
        .chain(DETECTOR_ORDERS.iter().map(|o| (*o, detector())))
}

// ============================================================================
// STREAM VERSUS RANDOM ACCESS
// ============================================================================

#[test]
fn test_stream_matches_view_for_every_order() {
    for (order, data) in every_order() {
        check_stream_matches_view(&data, order, sample_fields());
        check_stream_matches_view(&data, order, mixed_fields());
    }
}

#[test]
fn test_header_matches_column_labels() {
    for (order, data) in every_order() {
        let mut engine = ProjectionEngine::new(&data, &definition(order, mixed_fields())).unwrap();
        let labels: Vec<Value> = (0..engine.column_count())
            .map(|c| Value::Text(engine.column_label(c).unwrap()))
            .collect();
        let records = stream(&mut engine, &data);
        assert_eq!(records.first(), Some(&labels), "order {}", order);
        assert_eq!(records.len(), 1 + engine.row_count(), "order {}", order);
    }
}

#[test]
fn test_streamed_row_labels_match_engine() {
    let data = two_runs();
    let def = definition("HGT,F", sample_fields()).with_layout(TableLayout {
        show_row_labels: true,
        ..TableLayout::default()
    });
    let mut engine = ProjectionEngine::new(&data, &def).unwrap();
    let records = stream(&mut engine, &data);
    for (row, record) in records.iter().skip(1).enumerate() {
        assert_eq!(record[0], Value::Text(engine.row_label(row).unwrap()));
        assert_eq!(record.len(), 1 + engine.column_count());
    }
}

// ============================================================================
// ROUND TRIP
// ============================================================================

#[test]
fn test_round_trip_for_every_order() {
    for (order, data) in every_order() {
        check_round_trip(&data, order, sample_fields());
        check_round_trip(&data, order, mixed_fields());
    }
}

#[test]
fn test_hidden_tuples_have_no_position() {
    let data = two_runs();
    let mut engine = ProjectionEngine::new(&data, &definition("H,GF", mixed_fields())).unwrap();
    // the title of group 1 repeats the title of group 0
    let title_g1 = engine
        .resolve(0, 0)
        .unwrap()
        .with(order_parser::Axis::Group, 1);
    assert_eq!(engine.locate(&title_g1), None);
    let past_end = engine
        .resolve(0, 0)
        .unwrap()
        .with(order_parser::Axis::Dataset, 2);
    assert_eq!(engine.locate(&past_end), None);
}

// ============================================================================
// COLUMN CHECKPOINTS
// ============================================================================

#[test]
fn test_checkpoint_walks_match_across_strides() {
    let data = two_runs();
    let resolve_all = |stride: usize, columns: &[usize]| {
        let def = definition("H,GTF", sample_fields()).with_layout(TableLayout {
            checkpoint_stride: stride,
            ..TableLayout::default()
        });
        let mut engine = ProjectionEngine::new(&data, &def).unwrap();
        columns
            .iter()
            .map(|c| (*c, engine.resolve(0, *c).unwrap()))
            .collect::<std::collections::BTreeMap<_, _>>()
    };

    let mut probe = ProjectionEngine::new(&data, &definition("H,GTF", sample_fields())).unwrap();
    let cols = probe.column_count();
    assert!(cols > 10);

    let forward: Vec<usize> = (0..cols).collect();
    let backward: Vec<usize> = (0..cols).rev().collect();
    let jumping: Vec<usize> = (0..cols).step_by(3).chain((0..cols).step_by(5).rev()).collect();

    let reference = resolve_all(cols + 1, &forward);
    assert_eq!(resolve_all(1, &backward), reference);
    assert_eq!(resolve_all(2, &forward), reference);
    let jumped = resolve_all(4, &jumping);
    for (c, tuple) in jumped {
        assert_eq!(reference[&c], tuple, "column {}", c);
    }
}

// ============================================================================
// RANDOMISED TABLES
// ============================================================================

/// Sample counts per group per data set, each group with a small shift.
fn collection_strategy() -> impl Strategy<Value = DataCollection> {
    let group = (0usize..4, 0.0..0.5f64);
    prop::collection::vec(prop::collection::vec(group, 1..4), 1..3).prop_map(|sets| {
        sets.into_iter()
            .enumerate()
            .map(|(ds, groups)| {
                groups.into_iter().enumerate().fold(
                    DataSet::new(format!("set {}", ds)),
                    |set, (g, (samples, shift))| {
                        let x: Vec<f64> = (0..samples).map(|i| i as f64 + shift).collect();
                        let y: Vec<f64> = x.iter().map(|v| v * 10.0).collect();
                        set.with_group(
                            Group::new((ds * 10 + g) as i64, x, y).at_cell(g / 2, g % 2),
                        )
                    },
                )
            })
            .collect()
    })
}

fn order_strategy() -> impl Strategy<Value = &'static str> {
    let orders: Vec<&'static str> = GROUPED_ORDERS
        .iter()
        .chain(DETECTOR_ORDERS.iter())
        .copied()
        .collect();
    prop::sample::select(orders)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_random_tables_stream_like_views(data in collection_strategy(), order in order_strategy()) {
        let mut engine = ProjectionEngine::new(&data, &body_only(order, mixed_fields())).unwrap();
        let (rows, cols) = (engine.row_count(), engine.column_count());
        let streamed: Vec<Value> = stream(&mut engine, &data).into_iter().flatten().collect();
        prop_assert_eq!(streamed.len(), rows * cols);
        prop_assert_eq!(streamed, full_view(&mut engine, &data));
    }

    #[test]
    fn test_random_tables_round_trip(data in collection_strategy(), order in order_strategy()) {
        let mut engine = ProjectionEngine::new(&data, &definition(order, mixed_fields())).unwrap();
        for r in 0..engine.row_count() {
            for c in 0..engine.column_count() {
                let tuple = engine.resolve(r, c).unwrap();
                prop_assert_eq!(engine.locate(&tuple), Some((r, c)));
            }
        }
    }
}
