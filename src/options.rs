//! Selectable target accounts, grouped by account category.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Vocabulary;

/// One selectable target for a field of the matching category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSetOption<C> {
    pub value: String,
    pub label: String,
    pub category: C,
}

impl<C: Vocabulary> AccountSetOption<C> {
    pub fn new(value: impl Into<String>, label: impl Into<String>, category: C) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            category,
        }
    }
}

/// Account set as delivered by the option source, before it is bound to a
/// module vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSetRecord {
    pub account_set_id: Uuid,
    pub code: String,
    pub name: String,
    pub category: String,
}

impl AccountSetRecord {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            account_set_id: Uuid::new_v4(),
            code: code.into(),
            name: name.into(),
            category: category.into(),
        }
    }

    /// `"{name} - {code}"`, or just the name for code-less sets.
    pub fn label(&self) -> String {
        if self.code.is_empty() {
            self.name.clone()
        } else {
            format!("{} - {}", self.name, self.code)
        }
    }

    /// Binds the record to a module vocabulary. Records whose category the
    /// module does not know are dropped.
    pub fn to_option<C: Vocabulary>(&self) -> Option<AccountSetOption<C>> {
        C::from_key(&self.category)
            .map(|category| AccountSetOption::new(self.code.clone(), self.label(), category))
    }
}

/// Options partitioned by category, each bucket in input order.
#[derive(Debug, Clone)]
pub struct OptionIndex<C> {
    by_category: BTreeMap<C, Vec<AccountSetOption<C>>>,
}

impl<C: Vocabulary> Default for OptionIndex<C> {
    fn default() -> Self {
        Self {
            by_category: BTreeMap::new(),
        }
    }
}

impl<C: Vocabulary> OptionIndex<C> {
    pub fn from_records(records: &[AccountSetRecord]) -> Self {
        group_by_category(records.iter().filter_map(AccountSetRecord::to_option))
    }

    /// Options valid for `category`; empty when none were supplied.
    pub fn options_for(&self, category: C) -> &[AccountSetOption<C>] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Fields drawing from an empty pool cannot be edited.
    pub fn is_disabled(&self, category: C) -> bool {
        self.options_for(category).is_empty()
    }

    pub fn label_for(&self, category: C, value: &str) -> String {
        resolve_label(value, self.options_for(category))
    }

    pub fn categories(&self) -> impl Iterator<Item = C> + '_ {
        self.by_category.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.by_category.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Single pass; duplicates are kept as supplied.
pub fn group_by_category<C: Vocabulary>(
    options: impl IntoIterator<Item = AccountSetOption<C>>,
) -> OptionIndex<C> {
    let mut index = OptionIndex::default();
    for option in options {
        index
            .by_category
            .entry(option.category)
            .or_insert_with(Vec::new)
            .push(option);
    }
    index
}

/// Label of the first option matching `value`, else `value` itself.
pub fn resolve_label<C>(value: &str, options: &[AccountSetOption<C>]) -> String {
    options
        .iter()
        .find(|option| option.value == value)
        .map(|option| option.label.clone())
        .unwrap_or_else(|| value.to_string())
}
