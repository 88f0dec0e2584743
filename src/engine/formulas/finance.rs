//! Finance formulas. Cost savings (EBITDA).
//!
//! Finance assumptions are authored as whole percentages: `automationPct = 60`
//! means 60% of the work is automated. [`KpiFormula::rate`] divides by 100.

use super::{Detail, FormulaOutput, KpiFormula};
use serde::{Deserialize, Serialize};

const MINUTES_PER_HOUR: f64 = 60.0;
const DAYS_PER_YEAR: f64 = 365.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceProcessingAutomationInputs {
    pub invoices_per_month: f64,
    pub minutes_per_invoice: f64,
    pub automation_pct: f64,
    pub staff_hourly_cost: f64,
}

impl Default for InvoiceProcessingAutomationInputs {
    fn default() -> Self {
        Self {
            invoices_per_month: 5_000.0,
            minutes_per_invoice: 10.0,
            automation_pct: 60.0,
            staff_hourly_cost: 40.0,
        }
    }
}

impl KpiFormula for InvoiceProcessingAutomationInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("invoicesPerMonth", self.invoices_per_month),
            ("minutesPerInvoice", self.minutes_per_invoice),
            ("automationPct", self.automation_pct),
            ("staffHourlyCost", self.staff_hourly_cost),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let processing_hours = self.invoices_per_month * self.minutes_per_invoice / MINUTES_PER_HOUR;
        let hours_saved = processing_hours * self.rate(self.automation_pct);
        let savings = hours_saved * self.staff_hourly_cost;

        FormulaOutput::new(
            savings,
            vec![
                Detail::hours("Processing Hours per Month", processing_hours),
                Detail::hours("Hours Saved per Month", hours_saved),
                Detail::currency("Monthly Cost Savings", savings),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialCloseAccelerationInputs {
    pub close_hours_per_month: f64,
    pub close_time_reduction_pct: f64,
    pub staff_hourly_cost: f64,
}

impl Default for FinancialCloseAccelerationInputs {
    fn default() -> Self {
        Self {
            close_hours_per_month: 800.0,
            close_time_reduction_pct: 30.0,
            staff_hourly_cost: 50.0,
        }
    }
}

impl KpiFormula for FinancialCloseAccelerationInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("closeHoursPerMonth", self.close_hours_per_month),
            ("closeTimeReductionPct", self.close_time_reduction_pct),
            ("staffHourlyCost", self.staff_hourly_cost),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let hours_saved = self.close_hours_per_month * self.rate(self.close_time_reduction_pct);
        let savings = hours_saved * self.staff_hourly_cost;

        FormulaOutput::new(
            savings,
            vec![
                Detail::hours("Hours Saved per Month", hours_saved),
                Detail::currency("Monthly Cost Savings", savings),
            ],
        )
    }
}

/// Faster collections release working capital; the saving is its financing cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DsoReductionInputs {
    pub annual_revenue: f64,
    pub dso_reduction_days: f64,
    pub cost_of_capital_pct: f64,
}

impl Default for DsoReductionInputs {
    fn default() -> Self {
        Self {
            annual_revenue: 50_000_000.0,
            dso_reduction_days: 5.0,
            cost_of_capital_pct: 8.0,
        }
    }
}

impl KpiFormula for DsoReductionInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("annualRevenue", self.annual_revenue),
            ("dsoReductionDays", self.dso_reduction_days),
            ("costOfCapitalPct", self.cost_of_capital_pct),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let daily_revenue = self.annual_revenue / DAYS_PER_YEAR;
        let cash_released = daily_revenue * self.dso_reduction_days;
        let savings = cash_released * self.rate(self.cost_of_capital_pct);

        FormulaOutput::new(
            savings,
            vec![
                Detail::currency("Daily Revenue", daily_revenue),
                Detail::days("DSO Reduction", self.dso_reduction_days),
                Detail::currency("Cash Released", cash_released),
                Detail::currency("Annual Financing Savings", savings),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentErrorReductionInputs {
    pub transactions_per_month: f64,
    pub error_rate_pct: f64,
    pub error_reduction_pct: f64,
    pub cost_per_error: f64,
}

impl Default for PaymentErrorReductionInputs {
    fn default() -> Self {
        Self {
            transactions_per_month: 20_000.0,
            error_rate_pct: 2.0,
            error_reduction_pct: 70.0,
            cost_per_error: 50.0,
        }
    }
}

impl KpiFormula for PaymentErrorReductionInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("transactionsPerMonth", self.transactions_per_month),
            ("errorRatePct", self.error_rate_pct),
            ("errorReductionPct", self.error_reduction_pct),
            ("costPerError", self.cost_per_error),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let errors = self.transactions_per_month * self.rate(self.error_rate_pct);
        let avoided = errors * self.rate(self.error_reduction_pct);
        let savings = avoided * self.cost_per_error;

        FormulaOutput::new(
            savings,
            vec![
                Detail::count("Errors per Month", errors),
                Detail::count("Errors Avoided per Month", avoided),
                Detail::currency("Monthly Cost Savings", savings),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseAuditRecoveryInputs {
    pub annual_audited_spend: f64,
    pub leakage_pct: f64,
    pub recovery_pct: f64,
}

impl Default for ExpenseAuditRecoveryInputs {
    fn default() -> Self {
        Self {
            annual_audited_spend: 20_000_000.0,
            leakage_pct: 1.5,
            recovery_pct: 60.0,
        }
    }
}

impl KpiFormula for ExpenseAuditRecoveryInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("annualAuditedSpend", self.annual_audited_spend),
            ("leakagePct", self.leakage_pct),
            ("recoveryPct", self.recovery_pct),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let leakage = self.annual_audited_spend * self.rate(self.leakage_pct);
        let recovered = leakage * self.rate(self.recovery_pct);

        FormulaOutput::new(
            recovered,
            vec![
                Detail::currency("Annual Spend Leakage", leakage),
                Detail::currency("Annual Recovered Spend", recovered),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::formulas::test_util::assert_close;

    #[test]
    fn test_whole_percentages_are_divided() {
        let output = InvoiceProcessingAutomationInputs::default().compute();
        assert_close(output.detail("Processing Hours per Month").unwrap(), 5_000.0 * 10.0 / 60.0);
        assert_close(output.detail("Hours Saved per Month").unwrap(), 500.0);
        assert_close(output.impact, 20_000.0);
    }

    #[test]
    fn test_dso_reduction() {
        let output = DsoReductionInputs::default().compute();
        assert_close(output.detail("Cash Released").unwrap(), 50_000_000.0 / 365.0 * 5.0);
        assert_close(output.impact, 50_000_000.0 / 365.0 * 5.0 * 0.08);
    }

    #[test]
    fn test_finance_defaults() {
        assert_close(FinancialCloseAccelerationInputs::default().compute().impact, 12_000.0);
        assert_close(PaymentErrorReductionInputs::default().compute().impact, 14_000.0);
        assert_close(ExpenseAuditRecoveryInputs::default().compute().impact, 180_000.0);
    }
}
