#![doc(test(attr(deny(warnings))))]

//! Module configuration reconciliation for the banking admin console.
//!
//! Each configurable module (credit, deposit) declares a catalog of
//! chart-of-accounts integration points. The shared [`dialog`] engine lets an
//! operator stage edits against the persisted configuration, review exactly
//! what changed and commit the full record through a [`sink::ConfigureModule`].

pub mod catalog;
pub mod cli;
pub mod config;
pub mod dialog;
pub mod errors;
pub mod form_data;
pub mod modules;
pub mod options;
pub mod sink;
pub mod storage;
pub mod utils;

pub use catalog::{CatalogError, FieldCatalog, FieldDescriptor, FieldGroup, Vocabulary};
pub use dialog::{
    CommitOutcome, CommitTicket, DialogError, DialogSession, DialogStep, ReconciliationDialog,
};
pub use errors::ConfigError;
pub use form_data::{
    compute_diff, default_form_data, empty_form_data, form_data_from_config, ChangeItem,
    ConfigValues, FormData, ModuleConfig,
};
pub use modules::{ConfigurableModule, ModuleDescriptor, ModuleRegistry};
pub use options::{
    group_by_category, resolve_label, AccountSetOption, AccountSetRecord, OptionIndex,
};
pub use sink::{ConfigureModule, SinkError};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("module_config tracing initialized.");
    });
}
