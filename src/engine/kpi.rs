//! The closed set of KPIs.
//!
//! One table declares every KPI: its display name, owning process, impact
//! type and input record. From it we derive the [`KpiId`] enumeration, the
//! [`KpiInputs`] tagged union and the formula binding, so the three can never
//! drift apart.

use super::formulas::*;
use crate::error::{EngineError, Result};
use crate::models::{BusinessProcess, ImpactType, RateScale};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! define_kpis {
    ($(
        $variant:ident {
            name: $name:literal,
            process: $process:ident,
            impact: $impact:ident,
            inputs: $inputs:ty $(,)?
        }
    ),+ $(,)?) => {
        /// Identifier of a KPI.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum KpiId {
            $($variant),+
        }

        impl KpiId {
            /// Every KPI, grouped by process in catalog order.
            pub const ALL: &'static [KpiId] = &[$(KpiId::$variant),+];

            /// Human-readable name.
            pub fn name(self) -> &'static str {
                match self {
                    $(KpiId::$variant => $name),+
                }
            }

            /// Serialized identifier, e.g. `MoreLeads`.
            pub fn ident(self) -> &'static str {
                match self {
                    $(KpiId::$variant => stringify!($variant)),+
                }
            }

            pub fn process(self) -> BusinessProcess {
                match self {
                    $(KpiId::$variant => BusinessProcess::$process),+
                }
            }

            /// Static classification; never depends on inputs.
            pub fn impact_type(self) -> ImpactType {
                match self {
                    $(KpiId::$variant => ImpactType::$impact),+
                }
            }
        }

        /// Input record for one KPI, tagged by the KPI it belongs to.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "kpi")]
        pub enum KpiInputs {
            $($variant($inputs)),+
        }

        impl KpiInputs {
            pub fn kpi(&self) -> KpiId {
                match self {
                    $(KpiInputs::$variant(_) => KpiId::$variant),+
                }
            }

            /// Parameter names and values, in declaration order.
            pub fn fields(&self) -> Vec<(&'static str, f64)> {
                match self {
                    $(KpiInputs::$variant(inputs) => inputs.fields()),+
                }
            }

            /// The documented default assumptions for `kpi`.
            pub fn defaults_for(kpi: KpiId) -> Self {
                match kpi {
                    $(KpiId::$variant => KpiInputs::$variant(<$inputs>::default())),+
                }
            }

            fn merge(&self, overrides: &toml::Table) -> std::result::Result<Self, String> {
                match self {
                    $(KpiInputs::$variant(inputs) => merge_record(inputs, overrides).map(KpiInputs::$variant)),+
                }
            }
        }

        pub(crate) fn formula_of(kpi: KpiId) -> Formula {
            match kpi {
                $(KpiId::$variant => evaluate::<$inputs>),+
            }
        }

        $(
            impl KpiVariant for $inputs {
                const KPI: KpiId = KpiId::$variant;

                fn extract(inputs: &KpiInputs) -> Option<&Self> {
                    match inputs {
                        KpiInputs::$variant(typed) => Some(typed),
                        _ => None,
                    }
                }
            }

            impl From<$inputs> for KpiInputs {
                fn from(inputs: $inputs) -> Self {
                    KpiInputs::$variant(inputs)
                }
            }
        )+
    };
}

define_kpis! {
    MoreLeads {
        name: "More Leads",
        process: Sales,
        impact: Revenue,
        inputs: MoreLeadsInputs,
    },
    WinRateImprovement {
        name: "Win Rate Improvement",
        process: Sales,
        impact: Revenue,
        inputs: WinRateImprovementInputs,
    },
    DealSizeIncrease {
        name: "Deal Size Increase",
        process: Sales,
        impact: Revenue,
        inputs: DealSizeIncreaseInputs,
    },
    SalesCycleReduction {
        name: "Sales Cycle Reduction",
        process: Sales,
        impact: Revenue,
        inputs: SalesCycleReductionInputs,
    },
    ChurnReduction {
        name: "Churn Reduction",
        process: Sales,
        impact: Revenue,
        inputs: ChurnReductionInputs,
    },
    CrossSellUpsell {
        name: "Cross-sell & Upsell",
        process: Sales,
        impact: Revenue,
        inputs: CrossSellUpsellInputs,
    },
    AverageHandlingTimeReduction {
        name: "Average Handling Time Reduction",
        process: Service,
        impact: Ebitda,
        inputs: AverageHandlingTimeReductionInputs,
    },
    FirstContactResolution {
        name: "First Contact Resolution",
        process: Service,
        impact: Ebitda,
        inputs: FirstContactResolutionInputs,
    },
    CaseDeflection {
        name: "Case Deflection",
        process: Service,
        impact: Ebitda,
        inputs: CaseDeflectionInputs,
    },
    AfterCallWorkReduction {
        name: "After-Call Work Reduction",
        process: Service,
        impact: Ebitda,
        inputs: AfterCallWorkReductionInputs,
    },
    EscalationReduction {
        name: "Escalation Reduction",
        process: Service,
        impact: Ebitda,
        inputs: EscalationReductionInputs,
    },
    AgentOnboardingAcceleration {
        name: "Agent Onboarding Acceleration",
        process: Service,
        impact: Ebitda,
        inputs: AgentOnboardingAccelerationInputs,
    },
    CampaignConversionUplift {
        name: "Campaign Conversion Uplift",
        process: Marketing,
        impact: Revenue,
        inputs: CampaignConversionUpliftInputs,
    },
    MqlGrowth {
        name: "MQL Growth",
        process: Marketing,
        impact: Revenue,
        inputs: MqlGrowthInputs,
    },
    PersonalizationUplift {
        name: "Personalization Uplift",
        process: Marketing,
        impact: Revenue,
        inputs: PersonalizationUpliftInputs,
    },
    ContentProductionEfficiency {
        name: "Content Production Efficiency",
        process: Marketing,
        impact: Ebitda,
        inputs: ContentProductionEfficiencyInputs,
    },
    AdSpendOptimization {
        name: "Ad Spend Optimization",
        process: Marketing,
        impact: Ebitda,
        inputs: AdSpendOptimizationInputs,
    },
    InvoiceProcessingAutomation {
        name: "Invoice Processing Automation",
        process: Finance,
        impact: Ebitda,
        inputs: InvoiceProcessingAutomationInputs,
    },
    FinancialCloseAcceleration {
        name: "Financial Close Acceleration",
        process: Finance,
        impact: Ebitda,
        inputs: FinancialCloseAccelerationInputs,
    },
    DsoReduction {
        name: "DSO Reduction",
        process: Finance,
        impact: Ebitda,
        inputs: DsoReductionInputs,
    },
    PaymentErrorReduction {
        name: "Payment Error Reduction",
        process: Finance,
        impact: Ebitda,
        inputs: PaymentErrorReductionInputs,
    },
    ExpenseAuditRecovery {
        name: "Expense Audit Recovery",
        process: Finance,
        impact: Ebitda,
        inputs: ExpenseAuditRecoveryInputs,
    },
    InventoryOptimization {
        name: "Inventory Optimization",
        process: SupplyChain,
        impact: Ebitda,
        inputs: InventoryOptimizationInputs,
    },
    StockoutReduction {
        name: "Stockout Reduction",
        process: SupplyChain,
        impact: Revenue,
        inputs: StockoutReductionInputs,
    },
    ExpediteCostReduction {
        name: "Expedite Cost Reduction",
        process: SupplyChain,
        impact: Ebitda,
        inputs: ExpediteCostReductionInputs,
    },
    ProcurementSavings {
        name: "Procurement Savings",
        process: SupplyChain,
        impact: Ebitda,
        inputs: ProcurementSavingsInputs,
    },
    FreightOptimization {
        name: "Freight Optimization",
        process: SupplyChain,
        impact: Ebitda,
        inputs: FreightOptimizationInputs,
    },
    TicketAutomation {
        name: "Ticket Automation",
        process: It,
        impact: Ebitda,
        inputs: TicketAutomationInputs,
    },
    IncidentResolution {
        name: "Incident Resolution Time",
        process: It,
        impact: Ebitda,
        inputs: IncidentResolutionInputs,
    },
    DeveloperProductivity {
        name: "Developer Productivity",
        process: It,
        impact: Ebitda,
        inputs: DeveloperProductivityInputs,
    },
    CloudCostOptimization {
        name: "Cloud Cost Optimization",
        process: It,
        impact: Ebitda,
        inputs: CloudCostOptimizationInputs,
    },
    SecurityIncidentReduction {
        name: "Security Incident Reduction",
        process: It,
        impact: Ebitda,
        inputs: SecurityIncidentReductionInputs,
    },
    ContractReviewAutomation {
        name: "Contract Review Automation",
        process: Legal,
        impact: Ebitda,
        inputs: ContractReviewAutomationInputs,
    },
    ComplianceMonitoring {
        name: "Compliance Monitoring",
        process: Legal,
        impact: Ebitda,
        inputs: ComplianceMonitoringInputs,
    },
    LegalResearchEfficiency {
        name: "Legal Research Efficiency",
        process: Legal,
        impact: Ebitda,
        inputs: LegalResearchEfficiencyInputs,
    },
    OutsideCounselReduction {
        name: "Outside Counsel Reduction",
        process: Legal,
        impact: Ebitda,
        inputs: OutsideCounselReductionInputs,
    },
    RegulatoryPenaltyAvoidance {
        name: "Regulatory Penalty Avoidance",
        process: Legal,
        impact: Ebitda,
        inputs: RegulatoryPenaltyAvoidanceInputs,
    },
}

impl KpiId {
    /// Scale of this KPI's percentage-style inputs.
    pub fn rate_scale(self) -> RateScale {
        self.process().rate_scale()
    }
}

impl fmt::Display for KpiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for KpiId {
    type Err = String;

    /// Accepts the serialized identifier or the display name, ignoring case.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim();
        KpiId::ALL
            .iter()
            .copied()
            .find(|kpi| {
                kpi.ident().eq_ignore_ascii_case(wanted) || kpi.name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| format!("Unknown KPI: {}", s))
    }
}

impl KpiInputs {
    /// Return a copy with the named fields replaced.
    ///
    /// Every key must name a parameter of this KPI and hold a number.
    /// Non-finite numbers are accepted here and rejected at evaluation.
    pub fn with_overrides(&self, overrides: &toml::Table) -> Result<KpiInputs> {
        let kpi = self.kpi();
        let known = self.fields();
        let mut normalized = toml::Table::new();

        for (key, value) in overrides {
            if !known.iter().any(|(name, _)| name == key) {
                return Err(EngineError::invalid_field(kpi, key, "unknown parameter"));
            }
            let number = match value {
                toml::Value::Float(f) => *f,
                toml::Value::Integer(i) => *i as f64,
                other => {
                    return Err(EngineError::invalid_field(
                        kpi,
                        key,
                        format!("expected a number, got {}", other.type_str()),
                    ))
                }
            };
            normalized.insert(key.clone(), toml::Value::Float(number));
        }

        self.merge(&normalized)
            .map_err(|reason| EngineError::invalid_input(kpi, reason))
    }
}

fn merge_record<T>(current: &T, overrides: &toml::Table) -> std::result::Result<T, String>
where
    T: Serialize + DeserializeOwned,
{
    let mut value = toml::Value::try_from(current).map_err(|e| e.to_string())?;
    let table = value
        .as_table_mut()
        .ok_or_else(|| "input record is not a table".to_string())?;
    for (key, override_value) in overrides {
        table.insert(key.clone(), override_value.clone());
    }
    value.try_into().map_err(|e: toml::de::Error| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kpi_count_and_uniqueness() {
        assert_eq!(KpiId::ALL.len(), 37);
        let mut seen = std::collections::HashSet::new();
        for kpi in KpiId::ALL {
            assert!(seen.insert(kpi.ident()));
        }
    }

    #[test]
    fn test_impact_type_classification() {
        assert_eq!(KpiId::MoreLeads.impact_type(), ImpactType::Revenue);
        assert_eq!(
            KpiId::AverageHandlingTimeReduction.impact_type(),
            ImpactType::Ebitda
        );
        for kpi in KpiId::ALL {
            if kpi.process() == BusinessProcess::Sales {
                assert_eq!(kpi.impact_type(), ImpactType::Revenue);
            }
            if kpi.process() == BusinessProcess::Service {
                assert_eq!(kpi.impact_type(), ImpactType::Ebitda);
            }
        }
    }

    #[test]
    fn test_defaults_carry_matching_tag() {
        for &kpi in KpiId::ALL {
            assert_eq!(KpiInputs::defaults_for(kpi).kpi(), kpi);
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("MoreLeads".parse::<KpiId>(), Ok(KpiId::MoreLeads));
        assert_eq!("more leads".parse::<KpiId>(), Ok(KpiId::MoreLeads));
        assert_eq!(
            "Average Handling Time Reduction".parse::<KpiId>(),
            Ok(KpiId::AverageHandlingTimeReduction)
        );
        assert!("Bogus".parse::<KpiId>().is_err());
    }

    #[test]
    fn test_inputs_serialize_with_tag() {
        let json = serde_json::to_value(KpiInputs::defaults_for(KpiId::MoreLeads)).unwrap();
        assert_eq!(json["kpi"], "MoreLeads");
        assert_eq!(json["currentLeads"], 20000.0);

        let back: KpiInputs = serde_json::from_value(json).unwrap();
        assert_eq!(back, KpiInputs::defaults_for(KpiId::MoreLeads));
    }

    #[test]
    fn test_missing_field_fails_to_parse() {
        let json = r#"{"kpi": "MoreLeads", "currentLeads": 100}"#;
        assert!(serde_json::from_str::<KpiInputs>(json).is_err());
    }

    #[test]
    fn test_with_overrides() {
        let defaults = KpiInputs::defaults_for(KpiId::MoreLeads);
        let overrides: toml::Table = toml::from_str("currentLeads = 30000\nincrementPct = 0.05").unwrap();
        let updated = defaults.with_overrides(&overrides).unwrap();

        match updated {
            KpiInputs::MoreLeads(inputs) => {
                assert_eq!(inputs.current_leads, 30_000.0);
                assert_eq!(inputs.increment_pct, 0.05);
                assert_eq!(inputs.average_deal_size, 25_000.0);
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_overrides_reject_unknown_and_non_numeric() {
        let defaults = KpiInputs::defaults_for(KpiId::CaseDeflection);

        let unknown: toml::Table = toml::from_str("currentLeads = 1").unwrap();
        let err = defaults.with_overrides(&unknown).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { .. }));

        let text: toml::Table = toml::from_str("casesPerMonth = \"lots\"").unwrap();
        let err = defaults.with_overrides(&text).unwrap_err();
        assert!(err.to_string().contains("expected a number"));
    }
}
