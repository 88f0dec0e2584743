//! Process catalog: which KPIs each business process offers, in display order,
//! with their default assumptions and bound formulas.

use super::kpi::formula_of;
use super::{Formula, KpiId, KpiInputs, KpiInputsData};
use crate::models::BusinessProcess;
use anyhow::{bail, Result};
use std::collections::HashSet;
use tracing::debug;

/// Process selected for a fresh working agent.
pub const DEFAULT_PROCESS: BusinessProcess = BusinessProcess::Sales;

const SALES: &[KpiId] = &[
    KpiId::MoreLeads,
    KpiId::WinRateImprovement,
    KpiId::DealSizeIncrease,
    KpiId::SalesCycleReduction,
    KpiId::ChurnReduction,
    KpiId::CrossSellUpsell,
];

const SERVICE: &[KpiId] = &[
    KpiId::AverageHandlingTimeReduction,
    KpiId::FirstContactResolution,
    KpiId::CaseDeflection,
    KpiId::AfterCallWorkReduction,
    KpiId::EscalationReduction,
    KpiId::AgentOnboardingAcceleration,
];

const MARKETING: &[KpiId] = &[
    KpiId::CampaignConversionUplift,
    KpiId::MqlGrowth,
    KpiId::PersonalizationUplift,
    KpiId::ContentProductionEfficiency,
    KpiId::AdSpendOptimization,
];

const FINANCE: &[KpiId] = &[
    KpiId::InvoiceProcessingAutomation,
    KpiId::FinancialCloseAcceleration,
    KpiId::DsoReduction,
    KpiId::PaymentErrorReduction,
    KpiId::ExpenseAuditRecovery,
];

const SUPPLY_CHAIN: &[KpiId] = &[
    KpiId::InventoryOptimization,
    KpiId::StockoutReduction,
    KpiId::ExpediteCostReduction,
    KpiId::ProcurementSavings,
    KpiId::FreightOptimization,
];

const IT: &[KpiId] = &[
    KpiId::TicketAutomation,
    KpiId::IncidentResolution,
    KpiId::DeveloperProductivity,
    KpiId::CloudCostOptimization,
    KpiId::SecurityIncidentReduction,
];

const LEGAL: &[KpiId] = &[
    KpiId::ContractReviewAutomation,
    KpiId::ComplianceMonitoring,
    KpiId::LegalResearchEfficiency,
    KpiId::OutsideCounselReduction,
    KpiId::RegulatoryPenaltyAvoidance,
];

/// KPIs offered for `process`, in display and report order.
pub fn list_kpis(process: BusinessProcess) -> &'static [KpiId] {
    match process {
        BusinessProcess::Sales => SALES,
        BusinessProcess::Service => SERVICE,
        BusinessProcess::Marketing => MARKETING,
        BusinessProcess::Finance => FINANCE,
        BusinessProcess::SupplyChain => SUPPLY_CHAIN,
        BusinessProcess::It => IT,
        BusinessProcess::Legal => LEGAL,
    }
}

/// Default assumptions for every KPI of `process`.
pub fn default_inputs(process: BusinessProcess) -> KpiInputsData {
    list_kpis(process)
        .iter()
        .map(|&kpi| KpiInputs::defaults_for(kpi))
        .collect()
}

/// The formula bound to `kpi`.
pub fn formula_for(kpi: KpiId) -> Formula {
    formula_of(kpi)
}

/// Index of `kpi` within its process list.
pub fn position(kpi: KpiId) -> usize {
    list_kpis(kpi.process())
        .iter()
        .position(|&k| k == kpi)
        .unwrap_or(usize::MAX)
}

/// Check the catalog is complete and consistent.
///
/// Any failure here is a defect in the catalog tables, not a user error.
pub fn validate() -> Result<()> {
    let mut seen = HashSet::new();

    for process in BusinessProcess::ALL {
        let kpis = list_kpis(process);
        if kpis.is_empty() {
            bail!("process {} lists no KPIs", process);
        }

        let defaults = default_inputs(process);
        for &kpi in kpis {
            if kpi.process() != process {
                bail!("{} is listed under {} but belongs to {}", kpi, process, kpi.process());
            }
            if !seen.insert(kpi) {
                bail!("{} is listed more than once", kpi);
            }
            let inputs = match defaults.get(kpi) {
                Some(inputs) if inputs.kpi() == kpi => inputs,
                _ => bail!("{} has no default inputs", kpi),
            };
            if let Err(e) = formula_for(kpi)(inputs) {
                bail!("default inputs for {} do not evaluate: {}", kpi, e);
            }
        }
    }

    if let Some(missing) = KpiId::ALL.iter().find(|kpi| !seen.contains(*kpi)) {
        bail!("{} is not listed under any process", missing);
    }

    debug!(
        "Catalog validated: {} KPIs across {} processes",
        seen.len(),
        BusinessProcess::ALL.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_valid() {
        validate().unwrap();
    }

    #[test]
    fn test_list_order_is_stable() {
        let sales = list_kpis(BusinessProcess::Sales);
        assert_eq!(sales[0], KpiId::MoreLeads);
        assert_eq!(sales.len(), 6);
        assert_eq!(
            list_kpis(BusinessProcess::Service)[0],
            KpiId::AverageHandlingTimeReduction
        );
    }

    #[test]
    fn test_default_inputs_cover_process() {
        for process in BusinessProcess::ALL {
            let defaults = default_inputs(process);
            assert_eq!(defaults.len(), list_kpis(process).len());
            for &kpi in list_kpis(process) {
                assert!(defaults.contains(kpi));
            }
        }
    }

    #[test]
    fn test_position() {
        assert_eq!(position(KpiId::MoreLeads), 0);
        assert_eq!(position(KpiId::CrossSellUpsell), 5);
        assert_eq!(position(KpiId::RegulatoryPenaltyAvoidance), 4);
    }

    #[test]
    fn test_catalog_order_matches_declaration_order() {
        let flattened: Vec<KpiId> = BusinessProcess::ALL
            .iter()
            .flat_map(|&p| list_kpis(p).iter().copied())
            .collect();
        assert_eq!(flattened, KpiId::ALL.to_vec());
    }
}
