//! Object-safe view of a [`ReconciliationDialog`], so hosts can drive any
//! module without knowing its vocabularies.

use async_trait::async_trait;

use crate::catalog::Vocabulary;
use crate::form_data::{FormData, ModuleConfig};
use crate::options::AccountSetRecord;

use super::{CommitOutcome, DialogError, DialogStep, ReconciliationDialog};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub key: &'static str,
    pub category: &'static str,
    pub value: String,
    /// Resolved label of the current value, or the raw value.
    pub label: String,
    pub options: Vec<OptionView>,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionView {
    pub group: &'static str,
    pub title_key: &'static str,
    pub fields: Vec<FieldView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeView {
    pub key: &'static str,
    pub category: &'static str,
    pub from: String,
    pub to: String,
    pub from_label: String,
    pub to_label: String,
}

#[async_trait]
pub trait DialogSession: Send {
    fn module_key(&self) -> &'static str;
    fn load_options(&mut self, source: Result<Vec<AccountSetRecord>, String>);
    fn options_errored(&self) -> bool;
    fn open(&mut self, config: Option<&ModuleConfig>) -> bool;
    fn is_open(&self) -> bool;
    fn step(&self) -> DialogStep;
    fn current(&self) -> &FormData;
    fn baseline(&self) -> &FormData;
    fn commit_error(&self) -> Option<&str>;
    fn is_committing(&self) -> bool;
    fn can_request_review(&self) -> bool;
    fn set_field_value(&mut self, key: &str, value: String) -> Result<(), DialogError>;
    /// Copies every field of `values` into the working values. Returns how
    /// many fields actually changed.
    fn apply(&mut self, values: &FormData) -> Result<usize, DialogError>;
    fn field(&self, key: &str) -> Option<FieldView>;
    fn sections(&self) -> Vec<SectionView>;
    fn review(&self) -> Vec<ChangeView>;
    fn request_review(&mut self) -> Result<(), DialogError>;
    fn go_back(&mut self) -> Result<(), DialogError>;
    async fn commit(&mut self) -> Result<CommitOutcome, DialogError>;
    fn close(&mut self);
}

#[async_trait]
impl<C: Vocabulary, G: Vocabulary> DialogSession for ReconciliationDialog<C, G> {
    fn module_key(&self) -> &'static str {
        self.module().key
    }

    fn load_options(&mut self, source: Result<Vec<AccountSetRecord>, String>) {
        ReconciliationDialog::load_options(self, source);
    }

    fn options_errored(&self) -> bool {
        ReconciliationDialog::options_errored(self)
    }

    fn open(&mut self, config: Option<&ModuleConfig>) -> bool {
        ReconciliationDialog::open(self, config)
    }

    fn is_open(&self) -> bool {
        ReconciliationDialog::is_open(self)
    }

    fn step(&self) -> DialogStep {
        ReconciliationDialog::step(self)
    }

    fn current(&self) -> &FormData {
        ReconciliationDialog::current(self)
    }

    fn baseline(&self) -> &FormData {
        ReconciliationDialog::baseline(self)
    }

    fn commit_error(&self) -> Option<&str> {
        ReconciliationDialog::commit_error(self)
    }

    fn is_committing(&self) -> bool {
        ReconciliationDialog::is_committing(self)
    }

    fn can_request_review(&self) -> bool {
        ReconciliationDialog::can_request_review(self)
    }

    fn set_field_value(&mut self, key: &str, value: String) -> Result<(), DialogError> {
        ReconciliationDialog::set_field_value(self, key, value)
    }

    fn apply(&mut self, values: &FormData) -> Result<usize, DialogError> {
        let mut changed = 0;
        for field in self.catalog().fields() {
            let Some(value) = values.get(field.key) else {
                continue;
            };
            if ReconciliationDialog::current(self).value(field.key) != value {
                ReconciliationDialog::set_field_value(self, field.key, value)?;
                changed += 1;
            }
        }
        Ok(changed)
    }

    fn field(&self, key: &str) -> Option<FieldView> {
        let descriptor = self.catalog().field(key)?;
        let value = ReconciliationDialog::current(self).value(key);
        let pool = self.options().options_for(descriptor.category);
        Some(FieldView {
            key: descriptor.key,
            category: descriptor.category.key(),
            value: value.to_string(),
            label: self.options().label_for(descriptor.category, value),
            options: pool
                .iter()
                .map(|option| OptionView {
                    value: option.value.clone(),
                    label: option.label.clone(),
                })
                .collect(),
            disabled: pool.is_empty(),
        })
    }

    fn sections(&self) -> Vec<SectionView> {
        self.edit_sections()
            .into_iter()
            .map(|section| SectionView {
                group: section.group.key.key(),
                title_key: section.group.title_key,
                fields: section
                    .fields
                    .iter()
                    .filter_map(|field| DialogSession::field(self, field.descriptor.key))
                    .collect(),
            })
            .collect()
    }

    fn review(&self) -> Vec<ChangeView> {
        self.review_entries()
            .into_iter()
            .map(|entry| ChangeView {
                key: entry.field.key,
                category: entry.field.category.key(),
                from: entry.from,
                to: entry.to,
                from_label: entry.from_label,
                to_label: entry.to_label,
            })
            .collect()
    }

    fn request_review(&mut self) -> Result<(), DialogError> {
        ReconciliationDialog::request_review(self)
    }

    fn go_back(&mut self) -> Result<(), DialogError> {
        ReconciliationDialog::go_back(self)
    }

    async fn commit(&mut self) -> Result<CommitOutcome, DialogError> {
        ReconciliationDialog::commit(self).await
    }

    fn close(&mut self) {
        ReconciliationDialog::close(self)
    }
}
