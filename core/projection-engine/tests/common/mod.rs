//! FILENAME: tests/common/mod.rs
//! Fixtures for projection engine integration tests.

#![allow(dead_code)]

use dataset::{
    DataCollection, DataSet, DatasetQuantity, FieldDescriptor, Group, GroupQuantity,
    SampleQuantity, Value,
};
use projection_engine::{
    stream_table, CancelToken, GridSink, GroupSelection, ProjectionEngine, TableDefinition,
    TableLayout,
};

/// Orders exercised by the whole-table checks.
pub const GROUPED_ORDERS: &[&str] = &[
    "HGT,F", "HG,TF", "HT,GF", "T,HGF", "F,HGT", "GF,HT", "TG,FH", "H,GF", "HG,F", "G,TF",
    "HF,GT",
];

pub const DETECTOR_ORDERS: &[&str] = &["HI,JF", "HIJT,F", "IJ,TF", "HIT,F", "J,IF", "FT,HJI"];

pub fn sample_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::sample(SampleQuantity::X),
        FieldDescriptor::sample(SampleQuantity::Y),
        FieldDescriptor::sample(SampleQuantity::Error),
    ]
}

/// One field of every category.
pub fn mixed_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::dataset(DatasetQuantity::Title),
        FieldDescriptor::group(GroupQuantity::Id),
        FieldDescriptor::sample(SampleQuantity::X),
        FieldDescriptor::sample(SampleQuantity::Y),
    ]
}

/// Two runs of three groups each. Group sample counts differ, and the second
/// run's coordinates are slightly shifted.
pub fn two_runs() -> DataCollection {
    let first = DataSet::new("run A")
        .with_group(
            Group::new(10, vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0]).with_errors(vec![0.1; 3]),
        )
        .with_group(Group::new(11, vec![1.0, 2.0], vec![4.0, 5.0]).with_errors(vec![0.2; 2]))
        .with_group(
            Group::new(12, vec![1.0, 2.0, 3.0, 4.0], vec![6.0, 7.0, 8.0, 9.0])
                .with_errors(vec![0.3; 4]),
        );
    let mut second = DataSet::new("run B")
        .with_group(Group::new(20, vec![1.01, 2.01, 3.01], vec![10.0, 11.0, 12.0]))
        .with_group(Group::new(21, vec![1.01], vec![13.0]))
        .with_group(Group::new(22, vec![1.01, 2.01], vec![14.0, 15.0]));
    second.log_operation("normalise to monitor");
    [first, second].into_iter().collect()
}

/// The classic two-set merge: [1, 2] and [1.05, 3].
pub fn merge_pair() -> DataCollection {
    [
        DataSet::new("low").with_group(Group::new(1, vec![1.0, 2.0], vec![10.0, 20.0])),
        DataSet::new("high").with_group(Group::new(2, vec![1.05, 3.0], vec![30.0, 40.0])),
    ]
    .into_iter()
    .collect()
}

/// One data set whose first group has two points closer than the merge
/// tolerance: [0, 0.01, 10] and [0.2].
pub fn crowded_groups() -> DataCollection {
    [DataSet::new("crowded")
        .with_group(Group::new(1, vec![0.0, 0.01, 10.0], vec![1.0, 2.0, 3.0]))
        .with_group(Group::new(2, vec![0.2], vec![9.0]))]
    .into_iter()
    .collect()
}

/// A 2 x 2 detector with one empty pixel at (1, 0).
pub fn detector() -> DataCollection {
    [DataSet::new("area")
        .with_group(Group::new(100, vec![1.0, 2.0], vec![1.0, 2.0]).at_cell(0, 0))
        .with_group(Group::new(101, vec![1.0, 2.0, 3.0], vec![3.0, 4.0, 5.0]).at_cell(0, 1))
        .with_group(Group::new(102, vec![1.0], vec![6.0]).at_cell(1, 1))]
    .into_iter()
    .collect()
}

pub fn definition(order: &str, fields: Vec<FieldDescriptor>) -> TableDefinition {
    TableDefinition::new(1, order)
        .with_fields(fields)
        .with_selection(GroupSelection::All)
}

/// Definition that streams body records only.
pub fn body_only(order: &str, fields: Vec<FieldDescriptor>) -> TableDefinition {
    definition(order, fields).with_layout(TableLayout {
        show_column_header: false,
        ..TableLayout::default()
    })
}

pub fn engine<'a>(
    data: &'a DataCollection,
    order: &str,
    fields: Vec<FieldDescriptor>,
) -> ProjectionEngine<'a, DataCollection> {
    ProjectionEngine::new(data, &definition(order, fields)).expect("valid definition")
}

/// Streams the table and returns its records.
pub fn stream(
    engine: &mut ProjectionEngine<'_, DataCollection>,
    data: &DataCollection,
) -> Vec<Vec<Value>> {
    let mut sink = GridSink::new();
    stream_table(engine, data, &mut sink, &CancelToken::new()).expect("stream");
    sink.into_records()
}

pub fn numbers(values: &[Value]) -> Vec<Option<f64>> {
    values.iter().map(Value::as_f64).collect()
}
