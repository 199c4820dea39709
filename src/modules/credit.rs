//! Credit module: facility, collateral and receivable integration points.

use once_cell::sync::Lazy;

use crate::catalog::{FieldCatalog, FieldDescriptor, FieldGroup, Vocabulary};

use super::ModuleDescriptor;

pub const CREDIT_MODULE_KEY: &str = "credit";

/// Account categories a credit field can draw targets from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CreditAccountCategory {
    OffBalanceSheet,
    Asset,
    Liability,
    Equity,
    Revenue,
    CostOfRevenue,
    Expenses,
}

impl Vocabulary for CreditAccountCategory {
    fn key(&self) -> &'static str {
        match self {
            CreditAccountCategory::OffBalanceSheet => "offBalanceSheet",
            CreditAccountCategory::Asset => "asset",
            CreditAccountCategory::Liability => "liability",
            CreditAccountCategory::Equity => "equity",
            CreditAccountCategory::Revenue => "revenue",
            CreditAccountCategory::CostOfRevenue => "costOfRevenue",
            CreditAccountCategory::Expenses => "expenses",
        }
    }

    fn all() -> &'static [Self] {
        &[
            CreditAccountCategory::OffBalanceSheet,
            CreditAccountCategory::Asset,
            CreditAccountCategory::Liability,
            CreditAccountCategory::Equity,
            CreditAccountCategory::Revenue,
            CreditAccountCategory::CostOfRevenue,
            CreditAccountCategory::Expenses,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CreditFieldGroup {
    Omnibus,
    Summary,
}

impl Vocabulary for CreditFieldGroup {
    fn key(&self) -> &'static str {
        match self {
            CreditFieldGroup::Omnibus => "omnibus",
            CreditFieldGroup::Summary => "summary",
        }
    }

    fn all() -> &'static [Self] {
        &[CreditFieldGroup::Omnibus, CreditFieldGroup::Summary]
    }
}

use CreditAccountCategory::{Asset, OffBalanceSheet, Revenue};
use CreditFieldGroup::{Omnibus, Summary};

/// (key, default code, category, group) in display order.
#[rustfmt::skip]
const CREDIT_FIELDS: &[(&str, &str, CreditAccountCategory, CreditFieldGroup)] = &[
    ("chartOfAccountFacilityOmnibusParentCode", "9110.02.0201", OffBalanceSheet, Omnibus),
    ("chartOfAccountCollateralOmnibusParentCode", "9220.08.0201", OffBalanceSheet, Omnibus),
    ("chartOfAccountLiquidationProceedsOmnibusParentCode", "9170.00.0001", OffBalanceSheet, Omnibus),
    ("chartOfAccountPaymentsMadeOmnibusParentCode", "9110", OffBalanceSheet, Omnibus),
    ("chartOfAccountInterestAddedToObligationsOmnibusParentCode", "9110", OffBalanceSheet, Omnibus),
    ("chartOfAccountFacilityParentCode", "9110.02.0201", OffBalanceSheet, Summary),
    ("chartOfAccountCollateralParentCode", "9220.08.0201", OffBalanceSheet, Summary),
    ("chartOfAccountCollateralInLiquidationParentCode", "9220.08.0201", OffBalanceSheet, Summary),
    ("chartOfAccountLiquidatedCollateralParentCode", "9220.08.0201", OffBalanceSheet, Summary),
    ("chartOfAccountProceedsFromLiquidationParentCode", "9220.08.0201", OffBalanceSheet, Summary),
    ("chartOfAccountInterestIncomeParentCode", "6110.01.0100", Revenue, Summary),
    ("chartOfAccountFeeIncomeParentCode", "6110.01.0300", Revenue, Summary),
    ("chartOfAccountPaymentHoldingParentCode", "1141.99.0201", Asset, Summary),
    ("chartOfAccountUncoveredOutstandingParentCode", "9110", OffBalanceSheet, Summary),
    ("chartOfAccountDisbursedDefaultedParentCode", "11.02.0203", Asset, Summary),
    ("chartOfAccountInterestDefaultedParentCode", "11.02.0203", Asset, Summary),
    ("chartOfAccountShortTermIndividualDisbursedReceivableParentCode", "1141.04.0101", Asset, Summary),
    ("chartOfAccountShortTermGovernmentEntityDisbursedReceivableParentCode", "1141.02.0101", Asset, Summary),
    ("chartOfAccountShortTermPrivateCompanyDisbursedReceivableParentCode", "1141.03.0101", Asset, Summary),
    ("chartOfAccountShortTermBankDisbursedReceivableParentCode", "1141.05.0401", Asset, Summary),
    ("chartOfAccountShortTermFinancialInstitutionDisbursedReceivableParentCode", "1141.06.0101", Asset, Summary),
    ("chartOfAccountShortTermForeignAgencyOrSubsidiaryDisbursedReceivableParentCode", "1141.07.0101", Asset, Summary),
    ("chartOfAccountShortTermNonDomiciledCompanyDisbursedReceivableParentCode", "1141.08.0101", Asset, Summary),
    ("chartOfAccountLongTermIndividualDisbursedReceivableParentCode", "1142.04.0101", Asset, Summary),
    ("chartOfAccountLongTermGovernmentEntityDisbursedReceivableParentCode", "1142.02.0101", Asset, Summary),
    ("chartOfAccountLongTermPrivateCompanyDisbursedReceivableParentCode", "1142.03.0101", Asset, Summary),
    ("chartOfAccountLongTermBankDisbursedReceivableParentCode", "1142.05.0401", Asset, Summary),
    ("chartOfAccountLongTermFinancialInstitutionDisbursedReceivableParentCode", "1142.06.0101", Asset, Summary),
    ("chartOfAccountLongTermForeignAgencyOrSubsidiaryDisbursedReceivableParentCode", "1142.07.0101", Asset, Summary),
    ("chartOfAccountLongTermNonDomiciledCompanyDisbursedReceivableParentCode", "1142.08.0101", Asset, Summary),
    ("chartOfAccountShortTermIndividualInterestReceivableParentCode", "1141.04.9901", Asset, Summary),
    ("chartOfAccountShortTermGovernmentEntityInterestReceivableParentCode", "1141.02.9901", Asset, Summary),
    ("chartOfAccountShortTermPrivateCompanyInterestReceivableParentCode", "1141.03.9901", Asset, Summary),
    ("chartOfAccountShortTermBankInterestReceivableParentCode", "1141.05.9901", Asset, Summary),
    ("chartOfAccountShortTermFinancialInstitutionInterestReceivableParentCode", "1141.06.9901", Asset, Summary),
    ("chartOfAccountShortTermForeignAgencyOrSubsidiaryInterestReceivableParentCode", "1141.07.9901", Asset, Summary),
    ("chartOfAccountShortTermNonDomiciledCompanyInterestReceivableParentCode", "1141.08.9901", Asset, Summary),
    ("chartOfAccountLongTermIndividualInterestReceivableParentCode", "1142.04.9901", Asset, Summary),
    ("chartOfAccountLongTermGovernmentEntityInterestReceivableParentCode", "1142.02.9901", Asset, Summary),
    ("chartOfAccountLongTermPrivateCompanyInterestReceivableParentCode", "1142.03.9901", Asset, Summary),
    ("chartOfAccountLongTermBankInterestReceivableParentCode", "1142.05.9901", Asset, Summary),
    ("chartOfAccountLongTermFinancialInstitutionInterestReceivableParentCode", "1142.06.9901", Asset, Summary),
    ("chartOfAccountLongTermForeignAgencyOrSubsidiaryInterestReceivableParentCode", "1142.07.9901", Asset, Summary),
    ("chartOfAccountLongTermNonDomiciledCompanyInterestReceivableParentCode", "1142.08.9901", Asset, Summary),
    ("chartOfAccountOverdueIndividualDisbursedReceivableParentCode", "1148.04.0101", Asset, Summary),
    ("chartOfAccountOverdueGovernmentEntityDisbursedReceivableParentCode", "1148.02.0101", Asset, Summary),
    ("chartOfAccountOverduePrivateCompanyDisbursedReceivableParentCode", "1148.03.0101", Asset, Summary),
    ("chartOfAccountOverdueBankDisbursedReceivableParentCode", "1148.05.0401", Asset, Summary),
    ("chartOfAccountOverdueFinancialInstitutionDisbursedReceivableParentCode", "1148.06.0101", Asset, Summary),
    ("chartOfAccountOverdueForeignAgencyOrSubsidiaryDisbursedReceivableParentCode", "1148.07.0101", Asset, Summary),
    ("chartOfAccountOverdueNonDomiciledCompanyDisbursedReceivableParentCode", "1148.08.0101", Asset, Summary),
];

pub static CREDIT_CATALOG: Lazy<FieldCatalog<CreditAccountCategory, CreditFieldGroup>> =
    Lazy::new(|| {
        let fields = CREDIT_FIELDS
            .iter()
            .map(|&(key, default_code, category, group)| {
                FieldDescriptor::new(key, category, group).with_default(default_code)
            })
            .collect();
        let groups = vec![
            FieldGroup::new(Omnibus, "omnibus"),
            FieldGroup::new(Summary, "summary"),
        ];
        FieldCatalog::new(CREDIT_MODULE_KEY, fields, groups)
            .expect("credit catalog declares each field once")
    });

pub fn credit_module() -> ModuleDescriptor<CreditAccountCategory, CreditFieldGroup> {
    ModuleDescriptor {
        key: CREDIT_MODULE_KEY,
        title: "Credit",
        catalog: &CREDIT_CATALOG,
        success_message: "Credit module configuration updated",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form_data::{default_form_data, empty_form_data};

    #[test]
    fn catalog_keeps_declared_order() {
        let catalog = &*CREDIT_CATALOG;
        assert_eq!(catalog.len(), 51);
        assert_eq!(
            catalog.fields()[0].key,
            "chartOfAccountFacilityOmnibusParentCode"
        );
        assert_eq!(catalog.fields_in_group(Omnibus).count(), 5);
    }

    #[test]
    fn defaults_cover_every_field() {
        let defaults = default_form_data(&CREDIT_CATALOG);
        assert!(defaults.iter().all(|(_, code)| !code.is_empty()));
        assert_eq!(
            defaults.value("chartOfAccountInterestIncomeParentCode"),
            "6110.01.0100"
        );
        assert_eq!(empty_form_data(&CREDIT_CATALOG).len(), defaults.len());
    }

    #[test]
    fn categories_round_trip_their_keys() {
        for category in CreditAccountCategory::all() {
            assert_eq!(CreditAccountCategory::from_key(category.key()), Some(*category));
        }
    }
}
