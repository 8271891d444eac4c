//! FILENAME: core/dataset/src/field.rs
//! PURPOSE: Descriptors of the quantities a table can show.
//! CONTEXT: A field is one entry of the Field axis. Its kind is a closed
//! tagged variant; the category it carries decides both how a value is looked
//! up (which indices matter) and which table cells would only repeat it.

use serde::{Deserialize, Serialize};

/// How often a quantity varies across the data space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldCategory {
    /// One value per time sample of a group.
    PerSample,
    /// One value per group.
    PerGroup,
    /// One value per data set.
    PerDataset,
}

/// Quantities that vary along the time samples of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleQuantity {
    /// The sample coordinate (time of flight, wavelength, ...).
    X,
    /// The measured intensity.
    Y,
    /// The error estimate of the intensity.
    Error,
    /// Position of the sample within the group.
    Index,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupQuantity {
    /// Position of the group within its data set.
    Index,
    /// The group's id as recorded by the instrument.
    Id,
    /// A named attribute of the group.
    Attribute(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatasetQuantity {
    Index,
    Title,
    Attribute(String),
}

/// Quantities derived from the stored data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComputedQuantity {
    /// Distance to the next sample coordinate.
    SampleWidth,
    /// Number of samples in a group.
    SampleCount,
    /// Number of groups in a data set.
    GroupCount,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Sample(SampleQuantity),
    Group(GroupQuantity),
    Dataset(DatasetQuantity),
    Computed(ComputedQuantity),
}

impl FieldKind {
    pub fn category(&self) -> FieldCategory {
        match self {
            FieldKind::Sample(_) => FieldCategory::PerSample,
            FieldKind::Group(_) => FieldCategory::PerGroup,
            FieldKind::Dataset(_) => FieldCategory::PerDataset,
            FieldKind::Computed(ComputedQuantity::SampleWidth) => FieldCategory::PerSample,
            FieldKind::Computed(ComputedQuantity::SampleCount) => FieldCategory::PerGroup,
            FieldKind::Computed(ComputedQuantity::GroupCount) => FieldCategory::PerDataset,
        }
    }

    /// True for the quantities that are the same for every group once the
    /// sample grids have been merged: the coordinate itself and its index.
    pub fn is_shared_coordinate(&self) -> bool {
        matches!(
            self,
            FieldKind::Sample(SampleQuantity::X) | FieldKind::Sample(SampleQuantity::Index)
        )
    }

    /// The name this quantity is listed under.
    pub fn default_name(&self) -> String {
        match self {
            FieldKind::Sample(SampleQuantity::X) => "X values".to_string(),
            FieldKind::Sample(SampleQuantity::Y) => "Y values".to_string(),
            FieldKind::Sample(SampleQuantity::Error) => "Error values".to_string(),
            FieldKind::Sample(SampleQuantity::Index) => "XY index".to_string(),
            FieldKind::Group(GroupQuantity::Index) => "Group Index".to_string(),
            FieldKind::Group(GroupQuantity::Id) => "Group ID".to_string(),
            FieldKind::Group(GroupQuantity::Attribute(name)) => name.clone(),
            FieldKind::Dataset(DatasetQuantity::Index) => "Data Set Index".to_string(),
            FieldKind::Dataset(DatasetQuantity::Title) => "Title".to_string(),
            FieldKind::Dataset(DatasetQuantity::Attribute(name)) => name.clone(),
            FieldKind::Computed(ComputedQuantity::SampleWidth) => "Sample Width".to_string(),
            FieldKind::Computed(ComputedQuantity::SampleCount) => "Sample Count".to_string(),
            FieldKind::Computed(ComputedQuantity::GroupCount) => "Group Count".to_string(),
        }
    }
}

/// A selectable quantity: display name plus kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// Descriptor named after its kind.
    pub fn new(kind: FieldKind) -> Self {
        FieldDescriptor {
            name: kind.default_name(),
            kind,
        }
    }

    pub fn with_name(name: impl Into<String>, kind: FieldKind) -> Self {
        FieldDescriptor {
            name: name.into(),
            kind,
        }
    }

    pub fn sample(quantity: SampleQuantity) -> Self {
        Self::new(FieldKind::Sample(quantity))
    }

    pub fn group(quantity: GroupQuantity) -> Self {
        Self::new(FieldKind::Group(quantity))
    }

    pub fn dataset(quantity: DatasetQuantity) -> Self {
        Self::new(FieldKind::Dataset(quantity))
    }

    pub fn computed(quantity: ComputedQuantity) -> Self {
        Self::new(FieldKind::Computed(quantity))
    }

    pub fn category(&self) -> FieldCategory {
        self.kind.category()
    }

    /// Column-header form of the name: at most `width` characters.
    pub fn abbreviated(&self, width: usize) -> &str {
        match self.name.char_indices().nth(width) {
            Some((end, _)) => &self.name[..end],
            None => &self.name,
        }
    }
}
