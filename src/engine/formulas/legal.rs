//! Legal formulas. Cost savings (EBITDA); rates are whole percentages.

use super::{Detail, FormulaOutput, KpiFormula};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractReviewAutomationInputs {
    pub contracts_per_month: f64,
    pub hours_per_contract: f64,
    pub automation_pct: f64,
    pub attorney_hourly_cost: f64,
}

impl Default for ContractReviewAutomationInputs {
    fn default() -> Self {
        Self {
            contracts_per_month: 200.0,
            hours_per_contract: 3.0,
            automation_pct: 60.0,
            attorney_hourly_cost: 250.0,
        }
    }
}

impl KpiFormula for ContractReviewAutomationInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("contractsPerMonth", self.contracts_per_month),
            ("hoursPerContract", self.hours_per_contract),
            ("automationPct", self.automation_pct),
            ("attorneyHourlyCost", self.attorney_hourly_cost),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let review_hours = self.contracts_per_month * self.hours_per_contract;
        let hours_saved = review_hours * self.rate(self.automation_pct);
        let savings = hours_saved * self.attorney_hourly_cost;

        FormulaOutput::new(
            savings,
            vec![
                Detail::hours("Review Hours per Month", review_hours),
                Detail::hours("Hours Saved per Month", hours_saved),
                Detail::currency("Monthly Cost Savings", savings),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceMonitoringInputs {
    pub compliance_hours_per_month: f64,
    pub automation_pct: f64,
    pub compliance_hourly_cost: f64,
}

impl Default for ComplianceMonitoringInputs {
    fn default() -> Self {
        Self {
            compliance_hours_per_month: 400.0,
            automation_pct: 60.0,
            compliance_hourly_cost: 90.0,
        }
    }
}

impl KpiFormula for ComplianceMonitoringInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("complianceHoursPerMonth", self.compliance_hours_per_month),
            ("automationPct", self.automation_pct),
            ("complianceHourlyCost", self.compliance_hourly_cost),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let hours_saved = self.compliance_hours_per_month * self.rate(self.automation_pct);
        let savings = hours_saved * self.compliance_hourly_cost;

        FormulaOutput::new(
            savings,
            vec![
                Detail::hours("Hours Saved per Month", hours_saved),
                Detail::currency("Monthly Cost Savings", savings),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalResearchEfficiencyInputs {
    pub research_hours_per_month: f64,
    pub time_reduction_pct: f64,
    pub attorney_hourly_cost: f64,
}

impl Default for LegalResearchEfficiencyInputs {
    fn default() -> Self {
        Self {
            research_hours_per_month: 300.0,
            time_reduction_pct: 40.0,
            attorney_hourly_cost: 250.0,
        }
    }
}

impl KpiFormula for LegalResearchEfficiencyInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("researchHoursPerMonth", self.research_hours_per_month),
            ("timeReductionPct", self.time_reduction_pct),
            ("attorneyHourlyCost", self.attorney_hourly_cost),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let hours_saved = self.research_hours_per_month * self.rate(self.time_reduction_pct);
        let savings = hours_saved * self.attorney_hourly_cost;

        FormulaOutput::new(
            savings,
            vec![
                Detail::hours("Hours Saved per Month", hours_saved),
                Detail::currency("Monthly Cost Savings", savings),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutsideCounselReductionInputs {
    pub annual_outside_counsel_spend: f64,
    pub reduction_pct: f64,
}

impl Default for OutsideCounselReductionInputs {
    fn default() -> Self {
        Self {
            annual_outside_counsel_spend: 2_000_000.0,
            reduction_pct: 20.0,
        }
    }
}

impl KpiFormula for OutsideCounselReductionInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("annualOutsideCounselSpend", self.annual_outside_counsel_spend),
            ("reductionPct", self.reduction_pct),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let savings = self.annual_outside_counsel_spend * self.rate(self.reduction_pct);

        FormulaOutput::new(
            savings,
            vec![Detail::currency("Annual Counsel Savings", savings)],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegulatoryPenaltyAvoidanceInputs {
    pub expected_annual_penalties: f64,
    pub risk_reduction_pct: f64,
}

impl Default for RegulatoryPenaltyAvoidanceInputs {
    fn default() -> Self {
        Self {
            expected_annual_penalties: 500_000.0,
            risk_reduction_pct: 30.0,
        }
    }
}

impl KpiFormula for RegulatoryPenaltyAvoidanceInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("expectedAnnualPenalties", self.expected_annual_penalties),
            ("riskReductionPct", self.risk_reduction_pct),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let avoided = self.expected_annual_penalties * self.rate(self.risk_reduction_pct);

        FormulaOutput::new(
            avoided,
            vec![Detail::currency("Annual Penalties Avoided", avoided)],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::formulas::test_util::assert_close;

    #[test]
    fn test_legal_defaults() {
        let contract = ContractReviewAutomationInputs::default().compute();
        assert_close(contract.detail("Hours Saved per Month").unwrap(), 360.0);
        assert_close(contract.impact, 90_000.0);

        assert_close(ComplianceMonitoringInputs::default().compute().impact, 21_600.0);
        assert_close(LegalResearchEfficiencyInputs::default().compute().impact, 30_000.0);
        assert_close(OutsideCounselReductionInputs::default().compute().impact, 400_000.0);
        assert_close(
            RegulatoryPenaltyAvoidanceInputs::default().compute().impact,
            150_000.0,
        );
    }
}
