//! FILENAME: core/dataset/src/model.rs
//! PURPOSE: In-memory data collection: data sets, groups and attributes.
//! CONTEXT: A data set holds the groups (spectra) measured together. Each
//! group carries its sample coordinates, intensities and optional errors plus
//! its placement on an area detector, if any. This is the concrete source the
//! projection engine reads through the AxisSource and ValueResolver traits.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A named metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: Value,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Attribute {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Looks up an attribute by name in a list.
pub(crate) fn find_attribute<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    attributes.iter().find(|a| a.name == name)
}

/// One measured spectrum.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    /// Sample coordinates, sorted ascending.
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    #[serde(default)]
    pub errors: Option<Vec<f64>>,
    /// (row, column) on an area detector.
    #[serde(default)]
    pub detector_cell: Option<(usize, usize)>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl Group {
    pub fn new(id: i64, x: Vec<f64>, y: Vec<f64>) -> Self {
        Group {
            id,
            x,
            y,
            ..Default::default()
        }
    }

    pub fn with_errors(mut self, errors: Vec<f64>) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn at_cell(mut self, row: usize, column: usize) -> Self {
        self.detector_cell = Some((row, column));
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.push(Attribute::new(name, value));
        self
    }

    pub fn sample_count(&self) -> usize {
        self.x.len()
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        find_attribute(&self.attributes, name)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataSet {
    pub title: String,
    pub groups: Vec<Group>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    /// Operations applied to the data, oldest first.
    #[serde(default)]
    pub operation_log: Vec<String>,
}

impl DataSet {
    pub fn new(title: impl Into<String>) -> Self {
        DataSet {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.push(Attribute::new(name, value));
        self
    }

    pub fn log_operation(&mut self, entry: impl Into<String>) {
        self.operation_log.push(entry.into());
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        find_attribute(&self.attributes, name)
    }
}

/// The data sets shown together in one table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataCollection {
    pub datasets: Vec<DataSet>,
}

impl DataCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, dataset: DataSet) {
        self.datasets.push(dataset);
    }

    pub fn dataset(&self, index: usize) -> Option<&DataSet> {
        self.datasets.get(index)
    }

    pub fn group(&self, dataset: usize, group: usize) -> Option<&Group> {
        self.datasets.get(dataset)?.groups.get(group)
    }
}

impl FromIterator<DataSet> for DataCollection {
    fn from_iter<T: IntoIterator<Item = DataSet>>(iter: T) -> Self {
        DataCollection {
            datasets: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_collection() {
        let mut ds = DataSet::new("run 1")
            .with_group(Group::new(7, vec![1.0, 2.0], vec![10.0, 20.0]).at_cell(0, 1))
            .with_attribute("Temperature", 4.2);
        ds.log_operation("Converted to wavelength");

        let collection: DataCollection = vec![ds].into_iter().collect();
        let group = collection.group(0, 0).unwrap();
        assert_eq!(group.id, 7);
        assert_eq!(group.sample_count(), 2);
        assert_eq!(group.detector_cell, Some((0, 1)));
        assert!(collection.group(0, 1).is_none());
        assert!(collection.group(1, 0).is_none());

        let ds = collection.dataset(0).unwrap();
        assert_eq!(ds.attribute("Temperature").unwrap().value, Value::Number(4.2));
        assert_eq!(ds.operation_log, vec!["Converted to wavelength".to_string()]);
    }

    #[test]
    fn group_attributes() {
        let group = Group::new(1, vec![], vec![]).with_attribute("Raw Angle", 0.5);
        assert!(group.attribute("Raw Angle").is_some());
        assert!(group.attribute("Missing").is_none());
    }
}
