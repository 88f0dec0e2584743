//! Supply chain formulas. Rates are fractions.

use super::{Detail, FormulaOutput, KpiFormula};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryOptimizationInputs {
    pub inventory_value: f64,
    pub inventory_reduction_pct: f64,
    /// Annual holding cost as a share of inventory value.
    pub carrying_cost_rate: f64,
}

impl Default for InventoryOptimizationInputs {
    fn default() -> Self {
        Self {
            inventory_value: 10_000_000.0,
            inventory_reduction_pct: 0.10,
            carrying_cost_rate: 0.25,
        }
    }
}

impl KpiFormula for InventoryOptimizationInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("inventoryValue", self.inventory_value),
            ("inventoryReductionPct", self.inventory_reduction_pct),
            ("carryingCostRate", self.carrying_cost_rate),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let reduction = self.inventory_value * self.rate(self.inventory_reduction_pct);
        let savings = reduction * self.rate(self.carrying_cost_rate);

        FormulaOutput::new(
            savings,
            vec![
                Detail::currency("Inventory Reduction", reduction),
                Detail::currency("Annual Carrying Cost Savings", savings),
            ],
        )
    }
}

/// Sales recovered from fewer out-of-stock events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockoutReductionInputs {
    pub annual_revenue: f64,
    pub stockout_loss_rate: f64,
    pub stockout_reduction_pct: f64,
}

impl Default for StockoutReductionInputs {
    fn default() -> Self {
        Self {
            annual_revenue: 50_000_000.0,
            stockout_loss_rate: 0.04,
            stockout_reduction_pct: 0.30,
        }
    }
}

impl KpiFormula for StockoutReductionInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("annualRevenue", self.annual_revenue),
            ("stockoutLossRate", self.stockout_loss_rate),
            ("stockoutReductionPct", self.stockout_reduction_pct),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let lost = self.annual_revenue * self.rate(self.stockout_loss_rate);
        let recovered = lost * self.rate(self.stockout_reduction_pct);

        FormulaOutput::new(
            recovered,
            vec![
                Detail::currency("Revenue Lost to Stockouts", lost),
                Detail::currency("Recovered Revenue", recovered),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpediteCostReductionInputs {
    pub annual_expedite_cost: f64,
    pub forecast_improvement_pct: f64,
}

impl Default for ExpediteCostReductionInputs {
    fn default() -> Self {
        Self {
            annual_expedite_cost: 1_500_000.0,
            forecast_improvement_pct: 0.20,
        }
    }
}

impl KpiFormula for ExpediteCostReductionInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("annualExpediteCost", self.annual_expedite_cost),
            ("forecastImprovementPct", self.forecast_improvement_pct),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let savings = self.annual_expedite_cost * self.rate(self.forecast_improvement_pct);

        FormulaOutput::new(
            savings,
            vec![Detail::currency("Annual Expedite Savings", savings)],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcurementSavingsInputs {
    pub addressable_spend: f64,
    pub negotiated_savings_pct: f64,
}

impl Default for ProcurementSavingsInputs {
    fn default() -> Self {
        Self {
            addressable_spend: 30_000_000.0,
            negotiated_savings_pct: 0.02,
        }
    }
}

impl KpiFormula for ProcurementSavingsInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("addressableSpend", self.addressable_spend),
            ("negotiatedSavingsPct", self.negotiated_savings_pct),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let savings = self.addressable_spend * self.rate(self.negotiated_savings_pct);

        FormulaOutput::new(
            savings,
            vec![Detail::currency("Annual Procurement Savings", savings)],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreightOptimizationInputs {
    pub annual_freight_cost: f64,
    pub route_optimization_pct: f64,
}

impl Default for FreightOptimizationInputs {
    fn default() -> Self {
        Self {
            annual_freight_cost: 5_000_000.0,
            route_optimization_pct: 0.06,
        }
    }
}

impl KpiFormula for FreightOptimizationInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("annualFreightCost", self.annual_freight_cost),
            ("routeOptimizationPct", self.route_optimization_pct),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let savings = self.annual_freight_cost * self.rate(self.route_optimization_pct);

        FormulaOutput::new(
            savings,
            vec![Detail::currency("Annual Freight Savings", savings)],
        )
    }
}
