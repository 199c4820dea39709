//! Plain-text layouts for the console. Everything here returns strings so the
//! shell decides where they go.

use std::fmt::Write;

use crate::dialog::session::{ChangeView, SectionView};
use crate::modules::{ConfigSummary, EMPTY_MARKER};
use crate::options::AccountSetRecord;

const EMPTY_VALUE: &str = "(empty)";

#[derive(Debug, Clone)]
pub struct ModuleLine {
    pub key: &'static str,
    pub title: &'static str,
    pub fields: usize,
    pub configured: bool,
}

pub fn render_modules(lines: &[ModuleLine]) -> String {
    let width = lines.iter().map(|line| line.key.len()).max().unwrap_or(0);
    let mut out = String::new();
    for line in lines {
        let status = if line.configured {
            "configured"
        } else {
            "not yet configured"
        };
        let _ = writeln!(
            out,
            "  {:<width$}  {} ({} fields, {})",
            line.key, line.title, line.fields, status
        );
    }
    out
}

pub fn render_summary(title: &str, summary: &ConfigSummary) -> String {
    let mut out = format!("{title}\n");
    let sections = match summary {
        ConfigSummary::NotYetConfigured => {
            out.push_str("  not yet configured\n");
            return out;
        }
        ConfigSummary::Configured(sections) => sections,
    };
    for section in sections {
        let _ = writeln!(out, "  [{}]", section.title_key);
        let field_width = section.rows.iter().map(|row| row.field.len()).max().unwrap_or(0);
        let name_width = section
            .rows
            .iter()
            .map(|row| row.name.chars().count())
            .max()
            .unwrap_or(0);
        let code_width = section
            .rows
            .iter()
            .map(|row| row.code.chars().count())
            .max()
            .unwrap_or(0);
        for row in &section.rows {
            let _ = writeln!(
                out,
                "    {:<field_width$}  {:<name_width$}  {:<code_width$}  {}",
                row.field, row.name, row.code, row.category
            );
        }
    }
    out
}

/// Edit step listing. Fields are numbered across sections so they can be
/// addressed by position.
pub fn render_sections(sections: &[SectionView], options_errored: bool) -> String {
    let mut out = String::new();
    if options_errored {
        out.push_str("  account sets could not be loaded; fields are read-only\n");
    }
    let mut position = 0;
    for section in sections {
        let _ = writeln!(out, "  [{}]", section.title_key);
        for field in &section.fields {
            position += 1;
            let value = if field.value.is_empty() {
                EMPTY_VALUE
            } else {
                field.label.as_str()
            };
            let marker = if field.disabled { " (no account sets)" } else { "" };
            let _ = writeln!(
                out,
                "  {:>3}. {} [{}] = {}{}",
                position, field.key, field.category, value, marker
            );
        }
    }
    out
}

pub fn render_review(title: &str, changes: &[ChangeView]) -> String {
    let mut out = format!("Review changes to {} ({})\n", title, changes.len());
    for (index, change) in changes.iter().enumerate() {
        let _ = writeln!(out, "  {}. {} [{}]", index + 1, change.key, change.category);
        let _ = writeln!(out, "     from: {}", display_value(&change.from, &change.from_label));
        let _ = writeln!(out, "     to:   {}", display_value(&change.to, &change.to_label));
    }
    out
}

pub fn render_account_sets(records: &[AccountSetRecord]) -> String {
    if records.is_empty() {
        return format!("  {}\n", EMPTY_MARKER);
    }
    let width = records.iter().map(|record| record.category.len()).max().unwrap_or(0);
    let mut out = String::new();
    for record in records {
        let _ = writeln!(out, "  {:<width$}  {}", record.category, record.label());
    }
    out
}

fn display_value<'a>(value: &str, label: &'a str) -> &'a str {
    if value.is_empty() {
        EMPTY_VALUE
    } else {
        label
    }
}
