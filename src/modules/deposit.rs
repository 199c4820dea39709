//! Deposit module: omnibus cash account plus deposit account parents per
//! customer type, active and frozen.

use once_cell::sync::Lazy;

use crate::catalog::{FieldCatalog, FieldDescriptor, FieldGroup, Vocabulary};

use super::ModuleDescriptor;

pub const DEPOSIT_MODULE_KEY: &str = "deposit";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DepositAccountCategory {
    Asset,
    Liability,
}

impl Vocabulary for DepositAccountCategory {
    fn key(&self) -> &'static str {
        match self {
            DepositAccountCategory::Asset => "asset",
            DepositAccountCategory::Liability => "liability",
        }
    }

    fn all() -> &'static [Self] {
        &[DepositAccountCategory::Asset, DepositAccountCategory::Liability]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DepositFieldGroup {
    Omnibus,
    DepositAccounts,
    FrozenDepositAccounts,
}

impl Vocabulary for DepositFieldGroup {
    fn key(&self) -> &'static str {
        match self {
            DepositFieldGroup::Omnibus => "omnibus",
            DepositFieldGroup::DepositAccounts => "depositAccounts",
            DepositFieldGroup::FrozenDepositAccounts => "frozenDepositAccounts",
        }
    }

    fn all() -> &'static [Self] {
        &[
            DepositFieldGroup::Omnibus,
            DepositFieldGroup::DepositAccounts,
            DepositFieldGroup::FrozenDepositAccounts,
        ]
    }
}

use DepositAccountCategory::{Asset, Liability};
use DepositFieldGroup::{DepositAccounts, FrozenDepositAccounts, Omnibus};

// Wire keys are irregular (`chartOfAccounts…` vs `chartOfAccount…`); keep them
// exactly as the configure operation expects.
#[rustfmt::skip]
const DEPOSIT_FIELDS: &[(&str, &str, DepositAccountCategory, DepositFieldGroup)] = &[
    ("chartOfAccountsOmnibusParentCode", "1110.01.0101", Asset, Omnibus),
    ("chartOfAccountsIndividualDepositAccountsParentCode", "2110.01.0101", Liability, DepositAccounts),
    ("chartOfAccountsGovernmentEntityDepositAccountsParentCode", "2110.01.0201", Liability, DepositAccounts),
    ("chartOfAccountPrivateCompanyDepositAccountsParentCode", "2110.01.0301", Liability, DepositAccounts),
    ("chartOfAccountBankDepositAccountsParentCode", "2110.01.0401", Liability, DepositAccounts),
    ("chartOfAccountFinancialInstitutionDepositAccountsParentCode", "2110.01.0501", Liability, DepositAccounts),
    ("chartOfAccountNonDomiciledIndividualDepositAccountsParentCode", "2110.01.0601", Liability, DepositAccounts),
    ("chartOfAccountsFrozenIndividualDepositAccountsParentCode", "2120.01.0101", Liability, FrozenDepositAccounts),
    ("chartOfAccountsFrozenGovernmentEntityDepositAccountsParentCode", "2120.01.0201", Liability, FrozenDepositAccounts),
    ("chartOfAccountFrozenPrivateCompanyDepositAccountsParentCode", "2120.01.0301", Liability, FrozenDepositAccounts),
    ("chartOfAccountFrozenBankDepositAccountsParentCode", "2120.01.0401", Liability, FrozenDepositAccounts),
    ("chartOfAccountFrozenFinancialInstitutionDepositAccountsParentCode", "2120.01.0501", Liability, FrozenDepositAccounts),
    ("chartOfAccountFrozenNonDomiciledIndividualDepositAccountsParentCode", "2120.01.0601", Liability, FrozenDepositAccounts),
];

pub static DEPOSIT_CATALOG: Lazy<FieldCatalog<DepositAccountCategory, DepositFieldGroup>> =
    Lazy::new(|| {
        let fields = DEPOSIT_FIELDS
            .iter()
            .map(|&(key, default_code, category, group)| {
                FieldDescriptor::new(key, category, group).with_default(default_code)
            })
            .collect();
        let groups = DepositFieldGroup::all()
            .iter()
            .map(|group| FieldGroup::new(*group, group.key()))
            .collect();
        FieldCatalog::new(DEPOSIT_MODULE_KEY, fields, groups)
            .expect("deposit catalog declares each field once")
    });

pub fn deposit_module() -> ModuleDescriptor<DepositAccountCategory, DepositFieldGroup> {
    ModuleDescriptor {
        key: DEPOSIT_MODULE_KEY,
        title: "Deposit",
        catalog: &DEPOSIT_CATALOG,
        success_message: "Deposit module configuration updated",
    }
}
