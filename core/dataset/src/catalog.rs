//! FILENAME: core/dataset/src/catalog.rs
//! PURPOSE: Lists the fields a user can put on the Field axis.
//! CONTEXT: The fixed quantities come first, then the data set attributes and
//! the group attributes found in the collection (first occurrence order), then
//! the computed quantities.

use crate::field::{
    ComputedQuantity, DatasetQuantity, FieldDescriptor, FieldKind, GroupQuantity, SampleQuantity,
};
use crate::model::DataCollection;

/// All selectable fields of a collection.
pub fn field_catalog(collection: &DataCollection) -> Vec<FieldDescriptor> {
    let mut fields = vec![
        FieldDescriptor::sample(SampleQuantity::X),
        FieldDescriptor::sample(SampleQuantity::Y),
        FieldDescriptor::sample(SampleQuantity::Error),
        FieldDescriptor::sample(SampleQuantity::Index),
        FieldDescriptor::group(GroupQuantity::Index),
        FieldDescriptor::group(GroupQuantity::Id),
        FieldDescriptor::dataset(DatasetQuantity::Index),
        FieldDescriptor::dataset(DatasetQuantity::Title),
    ];

    let mut dataset_attrs: Vec<&str> = Vec::new();
    let mut group_attrs: Vec<&str> = Vec::new();
    for ds in &collection.datasets {
        for attr in &ds.attributes {
            if !dataset_attrs.contains(&attr.name.as_str()) {
                dataset_attrs.push(&attr.name);
            }
        }
        for group in &ds.groups {
            for attr in &group.attributes {
                if !group_attrs.contains(&attr.name.as_str()) {
                    group_attrs.push(&attr.name);
                }
            }
        }
    }

    fields.extend(
        dataset_attrs
            .into_iter()
            .map(|name| FieldDescriptor::dataset(DatasetQuantity::Attribute(name.to_string()))),
    );
    fields.extend(
        group_attrs
            .into_iter()
            .map(|name| FieldDescriptor::group(GroupQuantity::Attribute(name.to_string()))),
    );

    fields.push(FieldDescriptor::computed(ComputedQuantity::SampleWidth));
    fields.push(FieldDescriptor::computed(ComputedQuantity::SampleCount));
    fields.push(FieldDescriptor::computed(ComputedQuantity::GroupCount));
    fields
}

/// Finds a field by display name. Data set attributes shadow group
/// attributes of the same name.
pub fn find_field(collection: &DataCollection, name: &str) -> Option<FieldDescriptor> {
    field_catalog(collection)
        .into_iter()
        .find(|field| field.name == name)
}

/// Resolves a list of names, reporting the first unknown one.
pub fn select_fields<'n>(
    collection: &DataCollection,
    names: &[&'n str],
) -> Result<Vec<FieldDescriptor>, &'n str> {
    let catalog = field_catalog(collection);
    names
        .iter()
        .map(|name| {
            catalog
                .iter()
                .find(|field| field.name == *name)
                .cloned()
                .ok_or(*name)
        })
        .collect()
}

/// True if the catalog of `collection` offers a field of this kind.
pub fn offers(collection: &DataCollection, kind: &FieldKind) -> bool {
    field_catalog(collection).iter().any(|f| &f.kind == kind)
}
