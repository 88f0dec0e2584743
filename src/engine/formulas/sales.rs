//! Sales formulas. Revenue growth; rates are fractions.

use super::{Detail, FormulaOutput, KpiFormula};
use serde::{Deserialize, Serialize};

/// More qualified leads entering the funnel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoreLeadsInputs {
    pub current_leads: f64,
    pub lead_conversion_rate: f64,
    pub opportunity_win_rate: f64,
    pub average_deal_size: f64,
    pub increment_pct: f64,
}

impl Default for MoreLeadsInputs {
    fn default() -> Self {
        Self {
            current_leads: 20_000.0,
            lead_conversion_rate: 0.10,
            opportunity_win_rate: 0.30,
            average_deal_size: 25_000.0,
            increment_pct: 0.03,
        }
    }
}

impl KpiFormula for MoreLeadsInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("currentLeads", self.current_leads),
            ("leadConversionRate", self.lead_conversion_rate),
            ("opportunityWinRate", self.opportunity_win_rate),
            ("averageDealSize", self.average_deal_size),
            ("incrementPct", self.increment_pct),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let leads = self.current_leads * self.rate(self.increment_pct);
        let opportunities = leads * self.rate(self.lead_conversion_rate);
        let deals = opportunities * self.rate(self.opportunity_win_rate);
        let revenue = deals * self.average_deal_size;

        FormulaOutput::new(
            revenue,
            vec![
                Detail::count("Incremental Leads", leads),
                Detail::count("Incremental Opportunities", opportunities),
                Detail::count("Incremental Deals", deals),
                Detail::currency("Incremental Revenue", revenue),
            ],
        )
    }
}

/// Higher win rate on the existing opportunity flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinRateImprovementInputs {
    pub opportunities_per_year: f64,
    /// Added percentage points of win rate.
    pub win_rate_increase: f64,
    pub average_deal_size: f64,
}

impl Default for WinRateImprovementInputs {
    fn default() -> Self {
        Self {
            opportunities_per_year: 2_000.0,
            win_rate_increase: 0.05,
            average_deal_size: 25_000.0,
        }
    }
}

impl KpiFormula for WinRateImprovementInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("opportunitiesPerYear", self.opportunities_per_year),
            ("winRateIncrease", self.win_rate_increase),
            ("averageDealSize", self.average_deal_size),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let deals = self.opportunities_per_year * self.rate(self.win_rate_increase);
        let revenue = deals * self.average_deal_size;

        FormulaOutput::new(
            revenue,
            vec![
                Detail::count("Incremental Deals", deals),
                Detail::currency("Incremental Revenue", revenue),
            ],
        )
    }
}

/// Larger average deal through better packaging and pricing guidance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealSizeIncreaseInputs {
    pub deals_per_year: f64,
    pub average_deal_size: f64,
    pub deal_size_increase_pct: f64,
}

impl Default for DealSizeIncreaseInputs {
    fn default() -> Self {
        Self {
            deals_per_year: 600.0,
            average_deal_size: 25_000.0,
            deal_size_increase_pct: 0.05,
        }
    }
}

impl KpiFormula for DealSizeIncreaseInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("dealsPerYear", self.deals_per_year),
            ("averageDealSize", self.average_deal_size),
            ("dealSizeIncreasePct", self.deal_size_increase_pct),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let uplift_per_deal = self.average_deal_size * self.rate(self.deal_size_increase_pct);
        let revenue = self.deals_per_year * uplift_per_deal;

        FormulaOutput::new(
            revenue,
            vec![
                Detail::currency("Uplift per Deal", uplift_per_deal),
                Detail::currency("Incremental Revenue", revenue),
            ],
        )
    }
}

/// Shorter cycles free capacity for additional closed deals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesCycleReductionInputs {
    pub deals_per_year: f64,
    pub average_deal_size: f64,
    pub cycle_reduction_pct: f64,
}

impl Default for SalesCycleReductionInputs {
    fn default() -> Self {
        Self {
            deals_per_year: 600.0,
            average_deal_size: 25_000.0,
            cycle_reduction_pct: 0.10,
        }
    }
}

impl KpiFormula for SalesCycleReductionInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("dealsPerYear", self.deals_per_year),
            ("averageDealSize", self.average_deal_size),
            ("cycleReductionPct", self.cycle_reduction_pct),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let additional_deals = self.deals_per_year * self.rate(self.cycle_reduction_pct);
        let revenue = additional_deals * self.average_deal_size;

        FormulaOutput::new(
            revenue,
            vec![
                Detail::count("Additional Deals Closed", additional_deals),
                Detail::currency("Incremental Revenue", revenue),
            ],
        )
    }
}

/// Fewer customers lost to churn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChurnReductionInputs {
    pub active_customers: f64,
    pub annual_revenue_per_customer: f64,
    pub churn_rate: f64,
    pub churn_reduction_pct: f64,
}

impl Default for ChurnReductionInputs {
    fn default() -> Self {
        Self {
            active_customers: 5_000.0,
            annual_revenue_per_customer: 12_000.0,
            churn_rate: 0.12,
            churn_reduction_pct: 0.10,
        }
    }
}

impl KpiFormula for ChurnReductionInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("activeCustomers", self.active_customers),
            ("annualRevenuePerCustomer", self.annual_revenue_per_customer),
            ("churnRate", self.churn_rate),
            ("churnReductionPct", self.churn_reduction_pct),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let churned = self.active_customers * self.rate(self.churn_rate);
        let retained = churned * self.rate(self.churn_reduction_pct);
        let revenue = retained * self.annual_revenue_per_customer;

        FormulaOutput::new(
            revenue,
            vec![
                Detail::count("Customers Churned Today", churned),
                Detail::count("Customers Retained", retained),
                Detail::currency("Retained Revenue", revenue),
            ],
        )
    }
}

/// Additional cross-sell and upsell conversions in the installed base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossSellUpsellInputs {
    pub customer_base: f64,
    pub upsell_rate_increase: f64,
    pub average_upsell_value: f64,
}

impl Default for CrossSellUpsellInputs {
    fn default() -> Self {
        Self {
            customer_base: 5_000.0,
            upsell_rate_increase: 0.02,
            average_upsell_value: 8_000.0,
        }
    }
}

impl KpiFormula for CrossSellUpsellInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("customerBase", self.customer_base),
            ("upsellRateIncrease", self.upsell_rate_increase),
            ("averageUpsellValue", self.average_upsell_value),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let upsells = self.customer_base * self.rate(self.upsell_rate_increase);
        let revenue = upsells * self.average_upsell_value;

        FormulaOutput::new(
            revenue,
            vec![
                Detail::count("Incremental Upsells", upsells),
                Detail::currency("Incremental Revenue", revenue),
            ],
        )
    }
}
