//! Flat key/value projections of module configurations and the change set
//! between two of them.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::catalog::{FieldCatalog, FieldDescriptor, Vocabulary};

/// Working values for one catalog: every field key mapped to a string, where
/// the empty string means "unset".
///
/// Instances are only produced by the builders below, so the key-set always
/// equals the catalog key-set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormData {
    values: BTreeMap<String, String>,
}

impl FormData {
    fn from_catalog<C: Vocabulary, G: Vocabulary>(
        catalog: &FieldCatalog<C, G>,
        mut value_for_field: impl FnMut(&FieldDescriptor<C, G>) -> String,
    ) -> Self {
        let values = catalog
            .fields()
            .iter()
            .map(|field| (field.key.to_string(), value_for_field(field)))
            .collect();
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Value for `key`, treating an unknown key as unset.
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Overwrites an existing key. Returns `false` (and leaves the data
    /// untouched) when the key is not part of the mapping.
    pub(crate) fn assign(&mut self, key: &str, value: impl Into<String>) -> bool {
        match self.values.get_mut(key) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }
}

/// Read access to a persisted module configuration.
///
/// Implementations must answer only for the requested key; the builders never
/// enumerate the source, so properties outside the catalog are never read.
pub trait ConfigValues {
    fn config_value(&self, key: &str) -> Option<&str>;
}

impl ConfigValues for BTreeMap<String, Option<String>> {
    fn config_value(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|value| value.as_deref())
    }
}

impl ConfigValues for HashMap<String, Option<String>> {
    fn config_value(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|value| value.as_deref())
    }
}

impl ConfigValues for BTreeMap<String, String> {
    fn config_value(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl ConfigValues for serde_json::Map<String, serde_json::Value> {
    fn config_value(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(serde_json::Value::as_str)
    }
}

impl ConfigValues for FormData {
    fn config_value(&self, key: &str) -> Option<&str> {
        self.get(key)
    }
}

/// Persisted configuration record as returned by the configuration source:
/// a superset of a module's field keys mapped to string or null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleConfig {
    #[serde(flatten)]
    pub entries: BTreeMap<String, Option<String>>,
}

impl ModuleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), Some(value.into()));
        self
    }

    /// Builds a record from submitted values; unset fields are stored as null.
    pub fn from_form_data(data: &FormData) -> Self {
        let entries = data
            .iter()
            .map(|(key, value)| {
                let stored = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
                (key.to_string(), stored)
            })
            .collect();
        Self { entries }
    }
}

impl ConfigValues for ModuleConfig {
    fn config_value(&self, key: &str) -> Option<&str> {
        self.entries.config_value(key)
    }
}

/// A single field whose working value differs from the baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeItem<C, G> {
    pub field: FieldDescriptor<C, G>,
    pub from: String,
    pub to: String,
}

/// Maps every field key to the empty string.
pub fn empty_form_data<C: Vocabulary, G: Vocabulary>(catalog: &FieldCatalog<C, G>) -> FormData {
    FormData::from_catalog(catalog, |_| String::new())
}

/// Maps every field key to its documented default code.
pub fn default_form_data<C: Vocabulary, G: Vocabulary>(
    catalog: &FieldCatalog<C, G>,
) -> FormData {
    FormData::from_catalog(catalog, |field| field.default_code.to_string())
}

/// Projects a persisted configuration onto the catalog. Missing, null and
/// empty properties all read as unset.
pub fn form_data_from_config<C, G, M>(catalog: &FieldCatalog<C, G>, config: Option<&M>) -> FormData
where
    C: Vocabulary,
    G: Vocabulary,
    M: ConfigValues + ?Sized,
{
    let Some(config) = config else {
        return empty_form_data(catalog);
    };
    FormData::from_catalog(catalog, |field| {
        config
            .config_value(field.key)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .unwrap_or_default()
    })
}

/// Fields whose values differ, in catalog order. Comparison is exact.
pub fn compute_diff<C: Vocabulary, G: Vocabulary>(
    catalog: &FieldCatalog<C, G>,
    baseline: &FormData,
    current: &FormData,
) -> Vec<ChangeItem<C, G>> {
    catalog
        .fields()
        .iter()
        .filter_map(|field| {
            let from = baseline.value(field.key);
            let to = current.value(field.key);
            (from != to).then(|| ChangeItem {
                field: *field,
                from: from.to_string(),
                to: to.to_string(),
            })
        })
        .collect()
}
