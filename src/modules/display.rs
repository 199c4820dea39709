//! Read-only rendering of a persisted module configuration.

use crate::catalog::{FieldCatalog, Vocabulary};
use crate::form_data::ConfigValues;
use crate::options::AccountSetRecord;

/// Placeholder for a missing name or code.
pub const EMPTY_MARKER: &str = "\u{2014}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub field: &'static str,
    pub name: String,
    pub code: String,
    pub category: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarySection {
    pub group: &'static str,
    pub title_key: &'static str,
    pub rows: Vec<SummaryRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSummary {
    NotYetConfigured,
    Configured(Vec<SummarySection>),
}

impl ConfigSummary {
    pub fn is_configured(&self) -> bool {
        matches!(self, ConfigSummary::Configured(_))
    }
}

/// Groups the stored values by field group. Names come from the account set
/// of the field's category whose code matches the stored value.
pub fn summarize<C, G, M>(
    catalog: &FieldCatalog<C, G>,
    config: Option<&M>,
    records: &[AccountSetRecord],
) -> ConfigSummary
where
    C: Vocabulary,
    G: Vocabulary,
    M: ConfigValues + ?Sized,
{
    let Some(config) = config else {
        return ConfigSummary::NotYetConfigured;
    };

    let sections = catalog
        .groups()
        .iter()
        .filter_map(|group| {
            let rows: Vec<_> = catalog
                .fields_in_group(group.key)
                .map(|field| {
                    let code = config
                        .config_value(field.key)
                        .filter(|value| !value.is_empty());
                    let name = code.and_then(|code| {
                        records.iter().find(|record| {
                            record.category == field.category.key() && record.code == code
                        })
                    });
                    SummaryRow {
                        field: field.key,
                        name: name
                            .map(|record| record.name.clone())
                            .unwrap_or_else(|| EMPTY_MARKER.to_string()),
                        code: code.unwrap_or(EMPTY_MARKER).to_string(),
                        category: field.category.key(),
                    }
                })
                .collect();
            (!rows.is_empty()).then(|| SummarySection {
                group: group.key.key(),
                title_key: group.title_key,
                rows,
            })
        })
        .collect();

    ConfigSummary::Configured(sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::*;
    use crate::catalog::{FieldDescriptor, FieldGroup};
    use crate::form_data::ModuleConfig;

    #[test]
    fn missing_configuration_is_not_configured() {
        let none: Option<&ModuleConfig> = None;
        assert_eq!(
            summarize(&catalog_ab(), none, &[]),
            ConfigSummary::NotYetConfigured
        );
    }

    #[test]
    fn names_resolve_within_the_field_category() {
        let config = ModuleConfig::new().with_entry("a", "1141").with_entry("b", "1141");
        let records = vec![AccountSetRecord::new("1141", "Receivables", "asset")];

        let ConfigSummary::Configured(sections) = summarize(&catalog_ab(), Some(&config), &records)
        else {
            panic!("expected a configured summary");
        };
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].rows[0].name, "Receivables");
        assert_eq!(sections[1].rows[0].name, EMPTY_MARKER);
        assert_eq!(sections[1].rows[0].code, "1141");
    }

    #[test]
    fn blank_values_and_empty_groups_render_placeholders() {
        let catalog = FieldCatalog::new(
            "sparse",
            vec![FieldDescriptor::new("a", TestCategory::Asset, TestGroup::Extra)],
            vec![
                FieldGroup::new(TestGroup::Main, "main"),
                FieldGroup::new(TestGroup::Extra, "extra"),
            ],
        )
        .expect("catalog");
        let config = ModuleConfig::new().with_entry("a", "");

        let ConfigSummary::Configured(sections) = summarize(&catalog, Some(&config), &[]) else {
            panic!("expected a configured summary");
        };
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].group, "extra");
        assert_eq!(sections[0].rows[0].code, EMPTY_MARKER);
        assert_eq!(sections[0].rows[0].name, EMPTY_MARKER);
    }
}
