//! Data models for the impact calculator.
//!
//! This module contains the core data structures shared by the engine,
//! the session layer and the report assembler.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use crate::engine::{KpiId, KpiInputsData};

/// Functional domain grouping KPIs and default assumptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BusinessProcess {
    Sales,
    Service,
    Marketing,
    Finance,
    #[serde(rename = "Supply Chain", alias = "SupplyChain")]
    SupplyChain,
    #[serde(rename = "IT")]
    It,
    Legal,
}

impl BusinessProcess {
    /// Every process, in catalog order.
    pub const ALL: [BusinessProcess; 7] = [
        BusinessProcess::Sales,
        BusinessProcess::Service,
        BusinessProcess::Marketing,
        BusinessProcess::Finance,
        BusinessProcess::SupplyChain,
        BusinessProcess::It,
        BusinessProcess::Legal,
    ];

    /// How percentage-style inputs of this family are authored.
    ///
    /// Finance, IT and Legal assumptions are whole percentages (`60` means
    /// 60%); every other family uses fractions (`0.15` means 15%).
    pub fn rate_scale(self) -> RateScale {
        match self {
            BusinessProcess::Finance | BusinessProcess::It | BusinessProcess::Legal => {
                RateScale::Percent
            }
            _ => RateScale::Fraction,
        }
    }
}

impl fmt::Display for BusinessProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusinessProcess::Sales => write!(f, "Sales"),
            BusinessProcess::Service => write!(f, "Service"),
            BusinessProcess::Marketing => write!(f, "Marketing"),
            BusinessProcess::Finance => write!(f, "Finance"),
            BusinessProcess::SupplyChain => write!(f, "Supply Chain"),
            BusinessProcess::It => write!(f, "IT"),
            BusinessProcess::Legal => write!(f, "Legal"),
        }
    }
}

/// Convention for percentage-style inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateScale {
    /// `0.15` means 15%.
    Fraction,
    /// `15` means 15%.
    Percent,
}

impl RateScale {
    /// Convert an authored rate into a fractional multiplier.
    pub fn apply(self, rate: f64) -> f64 {
        match self {
            RateScale::Fraction => rate,
            RateScale::Percent => rate / 100.0,
        }
    }
}

/// Whether a KPI grows the top line or saves cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ImpactType {
    Revenue,
    #[serde(rename = "EBITDA")]
    Ebitda,
}

impl ImpactType {
    /// Report grouping order.
    pub const ALL: [ImpactType; 2] = [ImpactType::Revenue, ImpactType::Ebitda];
}

impl fmt::Display for ImpactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImpactType::Revenue => write!(f, "Revenue"),
            ImpactType::Ebitda => write!(f, "EBITDA"),
        }
    }
}

/// Unit of a detail value, used only for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Count,
    Currency,
    Hours,
    Minutes,
    Days,
}

/// One labeled intermediate quantity of a KPI calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultDetail {
    pub label: String,
    pub value: f64,
    pub unit: Unit,
}

/// Output of one KPI evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiResult {
    pub kpi: KpiId,
    pub details: Vec<ResultDetail>,
    /// Full-precision impact; rounding is left to renderers.
    pub impact_amount: f64,
    pub impact_type: ImpactType,
    #[serde(default)]
    pub saved: bool,
}

/// Identifier of a committed agent, derived from its creation instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub i64);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable snapshot of a committed agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    id: AgentId,
    name: String,
    process: BusinessProcess,
    inputs: KpiInputsData,
    results: Vec<KpiResult>,
    created_at: DateTime<Utc>,
}

impl AgentConfig {
    pub(crate) fn new(
        id: AgentId,
        name: String,
        process: BusinessProcess,
        inputs: KpiInputsData,
        results: Vec<KpiResult>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            process,
            inputs,
            results,
            created_at,
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn process(&self) -> BusinessProcess {
        self.process
    }

    pub fn inputs(&self) -> &KpiInputsData {
        &self.inputs
    }

    /// Saved results, in the order they were accepted.
    pub fn results(&self) -> &[KpiResult] {
        &self.results
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Sum of saved impact for one impact type.
    pub fn total_for(&self, impact_type: ImpactType) -> f64 {
        self.results
            .iter()
            .filter(|r| r.impact_type == impact_type)
            .map(|r| r.impact_amount)
            .sum()
    }
}

/// Customer metadata attached to a report; never used in calculation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ebitda: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_scale_per_family() {
        assert_eq!(BusinessProcess::Sales.rate_scale(), RateScale::Fraction);
        assert_eq!(BusinessProcess::SupplyChain.rate_scale(), RateScale::Fraction);
        assert_eq!(BusinessProcess::Finance.rate_scale(), RateScale::Percent);
        assert_eq!(BusinessProcess::It.rate_scale(), RateScale::Percent);
        assert_eq!(BusinessProcess::Legal.rate_scale(), RateScale::Percent);

        assert_eq!(RateScale::Percent.apply(60.0), 0.6);
        assert_eq!(RateScale::Fraction.apply(0.6), 0.6);
    }

    #[test]
    fn test_process_serde_names() {
        let json = serde_json::to_string(&BusinessProcess::SupplyChain).unwrap();
        assert_eq!(json, "\"Supply Chain\"");
        let it: BusinessProcess = serde_json::from_str("\"IT\"").unwrap();
        assert_eq!(it, BusinessProcess::It);
        let alias: BusinessProcess = serde_json::from_str("\"SupplyChain\"").unwrap();
        assert_eq!(alias, BusinessProcess::SupplyChain);
    }

    #[test]
    fn test_impact_type_display_and_serde() {
        assert_eq!(ImpactType::Ebitda.to_string(), "EBITDA");
        assert_eq!(
            serde_json::to_string(&ImpactType::Ebitda).unwrap(),
            "\"EBITDA\""
        );
        assert!(ImpactType::Revenue < ImpactType::Ebitda);
    }

    #[test]
    fn test_customer_info_optional_fields() {
        let customer: CustomerInfo = serde_json::from_str(r#"{"name": "Acme"}"#).unwrap();
        assert_eq!(customer.name, "Acme");
        assert!(customer.revenue.is_none());
        assert!(customer.industry.is_none());
    }
}
