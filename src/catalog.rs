//! Declarative field catalogs shared by every configurable module.
//!
//! A catalog is the ordered list of chart-of-accounts integration points a
//! module exposes. Field order is significant: it drives both the edit form and
//! the order in which changes are listed for review.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use thiserror::Error;

/// Closed set of string keys (account categories, field groups) a module
/// draws from. Keys are the stable camelCase identifiers used on the wire.
pub trait Vocabulary: Copy + Eq + Ord + Hash + fmt::Debug + Send + Sync + 'static {
    fn key(&self) -> &'static str;

    /// Every member, in declaration order.
    fn all() -> &'static [Self];

    fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|member| member.key() == key)
    }
}

/// Declarative description of a single configurable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor<C, G> {
    pub key: &'static str,
    pub category: C,
    pub group: G,
    /// Code suggested for never-configured modules.
    pub default_code: &'static str,
}

impl<C: Vocabulary, G: Vocabulary> FieldDescriptor<C, G> {
    pub fn new(key: &'static str, category: C, group: G) -> Self {
        Self {
            key,
            category,
            group,
            default_code: "",
        }
    }

    pub fn with_default(mut self, code: &'static str) -> Self {
        self.default_code = code;
        self
    }
}

/// Presentational section of the edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldGroup<G> {
    pub key: G,
    pub title_key: &'static str,
}

impl<G: Vocabulary> FieldGroup<G> {
    pub fn new(key: G, title_key: &'static str) -> Self {
        Self { key, title_key }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Field `{key}` is declared more than once in the `{module}` catalog")]
    DuplicateKey { module: &'static str, key: &'static str },
    #[error("Field `{key}` uses group `{group}` which the `{module}` catalog does not declare")]
    UndeclaredGroup {
        module: &'static str,
        key: &'static str,
        group: &'static str,
    },
}

/// Ordered, immutable field declarations for one module.
#[derive(Debug, Clone)]
pub struct FieldCatalog<C, G> {
    module: &'static str,
    fields: Vec<FieldDescriptor<C, G>>,
    groups: Vec<FieldGroup<G>>,
}

impl<C: Vocabulary, G: Vocabulary> FieldCatalog<C, G> {
    pub fn new(
        module: &'static str,
        fields: Vec<FieldDescriptor<C, G>>,
        groups: Vec<FieldGroup<G>>,
    ) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if !seen.insert(field.key) {
                return Err(CatalogError::DuplicateKey {
                    module,
                    key: field.key,
                });
            }
            if !groups.iter().any(|group| group.key == field.group) {
                return Err(CatalogError::UndeclaredGroup {
                    module,
                    key: field.key,
                    group: field.group.key(),
                });
            }
        }
        Ok(Self {
            module,
            fields,
            groups,
        })
    }

    pub fn module(&self) -> &'static str {
        self.module
    }

    pub fn fields(&self) -> &[FieldDescriptor<C, G>] {
        &self.fields
    }

    pub fn groups(&self) -> &[FieldGroup<G>] {
        &self.groups
    }

    pub fn field(&self, key: &str) -> Option<&FieldDescriptor<C, G>> {
        self.fields.iter().find(|field| field.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.key)
    }

    pub fn fields_in_group(&self, group: G) -> impl Iterator<Item = &FieldDescriptor<C, G>> + '_ {
        self.fields.iter().filter(move |field| field.group == group)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub enum TestCategory {
        Asset,
        Liability,
    }

    impl Vocabulary for TestCategory {
        fn key(&self) -> &'static str {
            match self {
                TestCategory::Asset => "asset",
                TestCategory::Liability => "liability",
            }
        }

        fn all() -> &'static [Self] {
            &[TestCategory::Asset, TestCategory::Liability]
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub enum TestGroup {
        Main,
        Extra,
    }

    impl Vocabulary for TestGroup {
        fn key(&self) -> &'static str {
            match self {
                TestGroup::Main => "main",
                TestGroup::Extra => "extra",
            }
        }

        fn all() -> &'static [Self] {
            &[TestGroup::Main, TestGroup::Extra]
        }
    }

    /// Two-field catalog `[a, b]`; `a` is an asset, `b` a liability.
    pub fn catalog_ab() -> FieldCatalog<TestCategory, TestGroup> {
        FieldCatalog::new(
            "test",
            vec![
                FieldDescriptor::new("a", TestCategory::Asset, TestGroup::Main)
                    .with_default("1000"),
                FieldDescriptor::new("b", TestCategory::Liability, TestGroup::Extra)
                    .with_default("2000"),
            ],
            vec![
                FieldGroup::new(TestGroup::Main, "main"),
                FieldGroup::new(TestGroup::Extra, "extra"),
            ],
        )
        .expect("valid test catalog")
    }
}
