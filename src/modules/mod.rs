//! Module adapters: each binds a field catalog, a success message and the
//! shared dialog engine into something a host can list, display and edit.

pub mod credit;
pub mod deposit;
pub mod display;

use std::sync::Arc;

use crate::catalog::{FieldCatalog, Vocabulary};
use crate::dialog::{DialogSession, ReconciliationDialog};
use crate::errors::ConfigError;
use crate::form_data::{default_form_data, FormData, ModuleConfig};
use crate::options::AccountSetRecord;
use crate::sink::ConfigureModule;

pub use credit::{credit_module, CreditAccountCategory, CreditFieldGroup, CREDIT_CATALOG};
pub use deposit::{deposit_module, DepositAccountCategory, DepositFieldGroup, DEPOSIT_CATALOG};
pub use display::{ConfigSummary, SummaryRow, SummarySection, EMPTY_MARKER};

/// Static description of one configurable module.
#[derive(Debug)]
pub struct ModuleDescriptor<C: 'static, G: 'static> {
    pub key: &'static str,
    pub title: &'static str,
    pub catalog: &'static FieldCatalog<C, G>,
    pub success_message: &'static str,
}

impl<C: 'static, G: 'static> Clone for ModuleDescriptor<C, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: 'static, G: 'static> Copy for ModuleDescriptor<C, G> {}

/// Vocabulary-independent handle on a module.
pub trait ConfigurableModule: Send + Sync {
    fn key(&self) -> &'static str;
    fn title(&self) -> &'static str;
    fn field_keys(&self) -> Vec<&'static str>;
    /// Account category keys this module draws targets from.
    fn categories(&self) -> Vec<&'static str>;
    fn default_form_data(&self) -> FormData;
    fn summarize(&self, config: Option<&ModuleConfig>, records: &[AccountSetRecord])
        -> ConfigSummary;
    fn new_session(&self, sink: Arc<dyn ConfigureModule>) -> Box<dyn DialogSession>;
}

impl<C: Vocabulary, G: Vocabulary> ConfigurableModule for ModuleDescriptor<C, G> {
    fn key(&self) -> &'static str {
        self.key
    }

    fn title(&self) -> &'static str {
        self.title
    }

    fn field_keys(&self) -> Vec<&'static str> {
        self.catalog.keys().collect()
    }

    fn categories(&self) -> Vec<&'static str> {
        C::all().iter().map(Vocabulary::key).collect()
    }

    fn default_form_data(&self) -> FormData {
        default_form_data(self.catalog)
    }

    fn summarize(
        &self,
        config: Option<&ModuleConfig>,
        records: &[AccountSetRecord],
    ) -> ConfigSummary {
        display::summarize(self.catalog, config, records)
    }

    fn new_session(&self, sink: Arc<dyn ConfigureModule>) -> Box<dyn DialogSession> {
        Box::new(ReconciliationDialog::new(*self, sink))
    }
}

/// The modules offered by the console, in display order.
pub struct ModuleRegistry {
    modules: Vec<Box<dyn ConfigurableModule>>,
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self {
            modules: vec![Box::new(deposit_module()), Box::new(credit_module())],
        }
    }

    pub fn get(&self, key: &str) -> Option<&dyn ConfigurableModule> {
        self.modules
            .iter()
            .find(|module| module.key().eq_ignore_ascii_case(key))
            .map(|module| &**module)
    }

    pub fn require(&self, key: &str) -> Result<&dyn ConfigurableModule, ConfigError> {
        self.get(key)
            .ok_or_else(|| ConfigError::UnknownModule(key.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn ConfigurableModule> + '_ {
        self.modules.iter().map(|module| &**module)
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.iter().map(|module| module.key()).collect()
    }
}
