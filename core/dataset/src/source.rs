//! FILENAME: core/dataset/src/source.rs
//! PURPOSE: The two narrow contracts the projection engine reads data through.
//! CONTEXT: AxisSource answers the structural questions (how many data sets,
//! groups, samples; where a group sits on the detector). ValueResolver turns
//! a fully fixed (data set, group, time, field) coordinate into a value.
//! DataCollection implements both.

use crate::field::{
    ComputedQuantity, DatasetQuantity, FieldDescriptor, FieldKind, GroupQuantity, SampleQuantity,
};
use crate::model::DataCollection;
use crate::value::Value;

/// Structure of the data space.
pub trait AxisSource {
    fn dataset_count(&self) -> usize;

    fn group_count(&self, dataset: usize) -> usize;

    fn group_id(&self, dataset: usize, group: usize) -> Option<i64>;

    /// Sorted sample coordinates of a group.
    fn sample_coordinates(&self, dataset: usize, group: usize) -> Option<&[f64]>;

    /// (row, column) of a group on an area detector.
    fn detector_cell(&self, dataset: usize, group: usize) -> Option<(usize, usize)>;

    fn dataset_title(&self, dataset: usize) -> String {
        format!("Data Set {}", dataset)
    }

    fn operation_log(&self, _dataset: usize) -> Vec<String> {
        Vec::new()
    }

    fn sample_count(&self, dataset: usize, group: usize) -> usize {
        self.sample_coordinates(dataset, group).map_or(0, <[f64]>::len)
    }
}

/// Looks up the value of one field at one coordinate. `None` means the value
/// is not available there; tables render it empty.
pub trait ValueResolver {
    fn resolve(
        &self,
        dataset: usize,
        group: usize,
        time: usize,
        field: &FieldDescriptor,
    ) -> Option<Value>;
}

impl AxisSource for DataCollection {
    fn dataset_count(&self) -> usize {
        self.datasets.len()
    }

    fn group_count(&self, dataset: usize) -> usize {
        self.dataset(dataset).map_or(0, |ds| ds.groups.len())
    }

    fn group_id(&self, dataset: usize, group: usize) -> Option<i64> {
        self.group(dataset, group).map(|g| g.id)
    }

    fn sample_coordinates(&self, dataset: usize, group: usize) -> Option<&[f64]> {
        self.group(dataset, group).map(|g| g.x.as_slice())
    }

    fn detector_cell(&self, dataset: usize, group: usize) -> Option<(usize, usize)> {
        self.group(dataset, group)?.detector_cell
    }

    fn dataset_title(&self, dataset: usize) -> String {
        self.dataset(dataset)
            .map(|ds| ds.title.clone())
            .unwrap_or_default()
    }

    fn operation_log(&self, dataset: usize) -> Vec<String> {
        self.dataset(dataset)
            .map(|ds| ds.operation_log.clone())
            .unwrap_or_default()
    }
}

impl ValueResolver for DataCollection {
    fn resolve(
        &self,
        dataset: usize,
        group: usize,
        time: usize,
        field: &FieldDescriptor,
    ) -> Option<Value> {
        let ds = self.dataset(dataset)?;

        // Data-set level quantities need no group.
        match &field.kind {
            FieldKind::Dataset(DatasetQuantity::Index) => return Some(Value::from(dataset)),
            FieldKind::Dataset(DatasetQuantity::Title) => return Some(Value::from(ds.title.as_str())),
            FieldKind::Dataset(DatasetQuantity::Attribute(name)) => {
                return ds.attribute(name).map(|a| a.value.clone());
            }
            FieldKind::Computed(ComputedQuantity::GroupCount) => {
                return Some(Value::from(ds.groups.len()));
            }
            _ => {}
        }

        let g = ds.groups.get(group)?;
        match &field.kind {
            FieldKind::Sample(SampleQuantity::X) => g.x.get(time).copied().map(Value::Number),
            FieldKind::Sample(SampleQuantity::Y) => g.y.get(time).copied().map(Value::Number),
            FieldKind::Sample(SampleQuantity::Error) => {
                g.errors.as_ref()?.get(time).copied().map(Value::Number)
            }
            FieldKind::Sample(SampleQuantity::Index) => {
                (time < g.sample_count()).then(|| Value::from(time))
            }
            FieldKind::Computed(ComputedQuantity::SampleWidth) => {
                let here = g.x.get(time)?;
                let next = g.x.get(time + 1)?;
                Some(Value::Number(next - here))
            }
            FieldKind::Computed(ComputedQuantity::SampleCount) => {
                Some(Value::from(g.sample_count()))
            }
            FieldKind::Group(GroupQuantity::Index) => Some(Value::from(group)),
            FieldKind::Group(GroupQuantity::Id) => Some(Value::Integer(g.id)),
            FieldKind::Group(GroupQuantity::Attribute(name)) => {
                g.attribute(name).map(|a| a.value.clone())
            }
            FieldKind::Dataset(_) | FieldKind::Computed(ComputedQuantity::GroupCount) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DataSet, Group};

    fn collection() -> DataCollection {
        let mut ds = DataSet::new("Sample run")
            .with_group(
                Group::new(11, vec![1.0, 2.0, 4.0], vec![5.0, 6.0, 7.0])
                    .with_errors(vec![0.1, 0.2, 0.3])
                    .with_attribute("Raw Angle", 30.0),
            )
            .with_group(Group::new(12, vec![1.5], vec![9.0]).at_cell(2, 3))
            .with_attribute("Run", 4711i64);
        ds.log_operation("Loaded");
        [ds].into_iter().collect()
    }

    #[test]
    fn axis_source_structure() {
        let c = collection();
        assert_eq!(c.dataset_count(), 1);
        assert_eq!(c.group_count(0), 2);
        assert_eq!(c.group_count(5), 0);
        assert_eq!(c.group_id(0, 1), Some(12));
        assert_eq!(c.sample_count(0, 0), 3);
        assert_eq!(c.sample_count(0, 9), 0);
        assert_eq!(c.detector_cell(0, 1), Some((2, 3)));
        assert_eq!(c.detector_cell(0, 0), None);
        assert_eq!(c.dataset_title(0), "Sample run");
        assert_eq!(c.operation_log(0), vec!["Loaded".to_string()]);
    }

    #[test]
    fn resolves_sample_quantities() {
        let c = collection();
        let y = FieldDescriptor::sample(SampleQuantity::Y);
        let err = FieldDescriptor::sample(SampleQuantity::Error);
        let idx = FieldDescriptor::sample(SampleQuantity::Index);
        let width = FieldDescriptor::computed(ComputedQuantity::SampleWidth);

        assert_eq!(c.resolve(0, 0, 1, &y), Some(Value::Number(6.0)));
        assert_eq!(c.resolve(0, 0, 2, &err), Some(Value::Number(0.3)));
        assert_eq!(c.resolve(0, 1, 0, &err), None);
        assert_eq!(c.resolve(0, 0, 2, &idx), Some(Value::Integer(2)));
        assert_eq!(c.resolve(0, 0, 3, &idx), None);
        assert_eq!(c.resolve(0, 0, 1, &width), Some(Value::Number(2.0)));
        assert_eq!(c.resolve(0, 0, 2, &width), None);
    }

    #[test]
    fn resolves_group_and_dataset_quantities() {
        let c = collection();
        let id = FieldDescriptor::group(GroupQuantity::Id);
        let angle = FieldDescriptor::group(GroupQuantity::Attribute("Raw Angle".into()));
        let run = FieldDescriptor::dataset(DatasetQuantity::Attribute("Run".into()));
        let title = FieldDescriptor::dataset(DatasetQuantity::Title);
        let groups = FieldDescriptor::computed(ComputedQuantity::GroupCount);

        assert_eq!(c.resolve(0, 1, 0, &id), Some(Value::Integer(12)));
        assert_eq!(c.resolve(0, 0, 0, &angle), Some(Value::Number(30.0)));
        assert_eq!(c.resolve(0, 1, 0, &angle), None);
        assert_eq!(c.resolve(0, 0, 0, &run), Some(Value::Integer(4711)));
        assert_eq!(c.resolve(0, 99, 0, &title), Some(Value::Text("Sample run".into())));
        assert_eq!(c.resolve(0, 0, 0, &groups), Some(Value::Integer(2)));
        assert_eq!(c.resolve(3, 0, 0, &title), None);
    }
}
