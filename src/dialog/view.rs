//! Read-only projections rendered by the host for each dialog step.

use crate::catalog::{FieldCatalog, FieldDescriptor, FieldGroup, Vocabulary};
use crate::form_data::{ChangeItem, FormData};
use crate::options::{AccountSetOption, OptionIndex};

/// One selectable field on the edit step.
#[derive(Debug, Clone)]
pub struct EditField<'a, C, G> {
    pub descriptor: &'a FieldDescriptor<C, G>,
    pub value: &'a str,
    pub options: &'a [AccountSetOption<C>],
    /// No valid targets exist yet for the field's category.
    pub disabled: bool,
}

/// Fields of one group, in catalog order.
#[derive(Debug, Clone)]
pub struct EditSection<'a, C, G> {
    pub group: &'a FieldGroup<G>,
    pub fields: Vec<EditField<'a, C, G>>,
}

/// One change as shown on the confirm step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewEntry<C, G> {
    pub field: FieldDescriptor<C, G>,
    pub from: String,
    pub to: String,
    pub from_label: String,
    pub to_label: String,
}

impl<C, G> ReviewEntry<C, G> {
    pub fn from_is_empty(&self) -> bool {
        self.from.is_empty()
    }

    pub fn to_is_empty(&self) -> bool {
        self.to.is_empty()
    }
}

pub(crate) fn edit_sections<'a, C: Vocabulary, G: Vocabulary>(
    catalog: &'a FieldCatalog<C, G>,
    current: &'a FormData,
    options: &'a OptionIndex<C>,
) -> Vec<EditSection<'a, C, G>> {
    catalog
        .groups()
        .iter()
        .map(|group| EditSection {
            group,
            fields: catalog
                .fields_in_group(group.key)
                .map(|descriptor| {
                    let pool = options.options_for(descriptor.category);
                    EditField {
                        descriptor,
                        value: current.value(descriptor.key),
                        options: pool,
                        disabled: pool.is_empty(),
                    }
                })
                .collect(),
        })
        .collect()
}

pub(crate) fn review_entries<C: Vocabulary, G: Vocabulary>(
    changes: Vec<ChangeItem<C, G>>,
    options: &OptionIndex<C>,
) -> Vec<ReviewEntry<C, G>> {
    changes
        .into_iter()
        .map(|change| {
            let from_label = options.label_for(change.field.category, &change.from);
            let to_label = options.label_for(change.field.category, &change.to);
            ReviewEntry {
                field: change.field,
                from: change.from,
                to: change.to,
                from_label,
                to_label,
            }
        })
        .collect()
}
