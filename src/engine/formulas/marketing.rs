//! Marketing formulas. Mostly revenue growth; rates are fractions.

use super::{Detail, FormulaOutput, KpiFormula};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignConversionUpliftInputs {
    pub campaign_reach: f64,
    pub conversion_rate: f64,
    /// Relative uplift on the current conversion rate.
    pub conversion_uplift_pct: f64,
    pub average_order_value: f64,
}

impl Default for CampaignConversionUpliftInputs {
    fn default() -> Self {
        Self {
            campaign_reach: 500_000.0,
            conversion_rate: 0.02,
            conversion_uplift_pct: 0.10,
            average_order_value: 150.0,
        }
    }
}

impl KpiFormula for CampaignConversionUpliftInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("campaignReach", self.campaign_reach),
            ("conversionRate", self.conversion_rate),
            ("conversionUpliftPct", self.conversion_uplift_pct),
            ("averageOrderValue", self.average_order_value),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let current_conversions = self.campaign_reach * self.rate(self.conversion_rate);
        let incremental = current_conversions * self.rate(self.conversion_uplift_pct);
        let revenue = incremental * self.average_order_value;

        FormulaOutput::new(
            revenue,
            vec![
                Detail::count("Current Conversions", current_conversions),
                Detail::count("Incremental Conversions", incremental),
                Detail::currency("Incremental Revenue", revenue),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MqlGrowthInputs {
    pub mqls_per_year: f64,
    pub mql_increase_pct: f64,
    pub mql_to_sql_rate: f64,
    pub sql_win_rate: f64,
    pub average_deal_size: f64,
}

impl Default for MqlGrowthInputs {
    fn default() -> Self {
        Self {
            mqls_per_year: 12_000.0,
            mql_increase_pct: 0.10,
            mql_to_sql_rate: 0.25,
            sql_win_rate: 0.20,
            average_deal_size: 25_000.0,
        }
    }
}

impl KpiFormula for MqlGrowthInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("mqlsPerYear", self.mqls_per_year),
            ("mqlIncreasePct", self.mql_increase_pct),
            ("mqlToSqlRate", self.mql_to_sql_rate),
            ("sqlWinRate", self.sql_win_rate),
            ("averageDealSize", self.average_deal_size),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let mqls = self.mqls_per_year * self.rate(self.mql_increase_pct);
        let sqls = mqls * self.rate(self.mql_to_sql_rate);
        let deals = sqls * self.rate(self.sql_win_rate);
        let revenue = deals * self.average_deal_size;

        FormulaOutput::new(
            revenue,
            vec![
                Detail::count("Incremental MQLs", mqls),
                Detail::count("Incremental SQLs", sqls),
                Detail::count("Incremental Deals", deals),
                Detail::currency("Incremental Revenue", revenue),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizationUpliftInputs {
    pub annual_digital_revenue: f64,
    pub personalization_uplift_pct: f64,
}

impl Default for PersonalizationUpliftInputs {
    fn default() -> Self {
        Self {
            annual_digital_revenue: 10_000_000.0,
            personalization_uplift_pct: 0.03,
        }
    }
}

impl KpiFormula for PersonalizationUpliftInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("annualDigitalRevenue", self.annual_digital_revenue),
            ("personalizationUpliftPct", self.personalization_uplift_pct),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let revenue = self.annual_digital_revenue * self.rate(self.personalization_uplift_pct);

        FormulaOutput::new(
            revenue,
            vec![Detail::currency("Incremental Revenue", revenue)],
        )
    }
}

/// Faster production of campaign assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentProductionEfficiencyInputs {
    pub assets_per_month: f64,
    pub hours_per_asset: f64,
    pub time_reduction_pct: f64,
    pub marketer_hourly_cost: f64,
}

impl Default for ContentProductionEfficiencyInputs {
    fn default() -> Self {
        Self {
            assets_per_month: 80.0,
            hours_per_asset: 6.0,
            time_reduction_pct: 0.40,
            marketer_hourly_cost: 55.0,
        }
    }
}

impl KpiFormula for ContentProductionEfficiencyInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("assetsPerMonth", self.assets_per_month),
            ("hoursPerAsset", self.hours_per_asset),
            ("timeReductionPct", self.time_reduction_pct),
            ("marketerHourlyCost", self.marketer_hourly_cost),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let hours_saved =
            self.assets_per_month * self.hours_per_asset * self.rate(self.time_reduction_pct);
        let savings = hours_saved * self.marketer_hourly_cost;

        FormulaOutput::new(
            savings,
            vec![
                Detail::hours("Hours Saved per Month", hours_saved),
                Detail::currency("Monthly Cost Savings", savings),
            ],
        )
    }
}

/// Less paid media spent on non-converting audiences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdSpendOptimizationInputs {
    pub annual_ad_spend: f64,
    pub waste_reduction_pct: f64,
}

impl Default for AdSpendOptimizationInputs {
    fn default() -> Self {
        Self {
            annual_ad_spend: 2_000_000.0,
            waste_reduction_pct: 0.08,
        }
    }
}

impl KpiFormula for AdSpendOptimizationInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("annualAdSpend", self.annual_ad_spend),
            ("wasteReductionPct", self.waste_reduction_pct),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let savings = self.annual_ad_spend * self.rate(self.waste_reduction_pct);

        FormulaOutput::new(
            savings,
            vec![Detail::currency("Annual Media Savings", savings)],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::formulas::test_util::assert_close;

    #[test]
    fn test_mql_growth_funnel() {
        let output = MqlGrowthInputs::default().compute();
        assert_close(output.detail("Incremental MQLs").unwrap(), 1_200.0);
        assert_close(output.detail("Incremental SQLs").unwrap(), 300.0);
        assert_close(output.detail("Incremental Deals").unwrap(), 60.0);
        assert_close(output.impact, 1_500_000.0);
    }

    #[test]
    fn test_marketing_defaults() {
        assert_close(
            CampaignConversionUpliftInputs::default().compute().impact,
            150_000.0,
        );
        assert_close(PersonalizationUpliftInputs::default().compute().impact, 300_000.0);
        assert_close(
            ContentProductionEfficiencyInputs::default().compute().impact,
            10_560.0,
        );
        assert_close(AdSpendOptimizationInputs::default().compute().impact, 160_000.0);
    }
}
