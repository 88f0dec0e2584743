//! Service formulas. Cost savings (EBITDA); rates are fractions.

use super::{Detail, FormulaOutput, KpiFormula};
use serde::{Deserialize, Serialize};

const MINUTES_PER_HOUR: f64 = 60.0;

/// Shorter average handling time per case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageHandlingTimeReductionInputs {
    #[serde(rename = "currentAHTMinutes")]
    pub current_aht_minutes: f64,
    pub cases_per_month: f64,
    pub agent_hourly_cost: f64,
    #[serde(rename = "ahtReductionPct")]
    pub aht_reduction_pct: f64,
}

impl Default for AverageHandlingTimeReductionInputs {
    fn default() -> Self {
        Self {
            current_aht_minutes: 12.0,
            cases_per_month: 10_000.0,
            agent_hourly_cost: 35.0,
            aht_reduction_pct: 0.15,
        }
    }
}

impl KpiFormula for AverageHandlingTimeReductionInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("currentAHTMinutes", self.current_aht_minutes),
            ("casesPerMonth", self.cases_per_month),
            ("agentHourlyCost", self.agent_hourly_cost),
            ("ahtReductionPct", self.aht_reduction_pct),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let minutes_saved = self.current_aht_minutes * self.rate(self.aht_reduction_pct);
        let hours_saved = minutes_saved * self.cases_per_month / MINUTES_PER_HOUR;
        let savings = hours_saved * self.agent_hourly_cost;

        FormulaOutput::new(
            savings,
            vec![
                Detail::minutes("Minutes Saved per Case", minutes_saved),
                Detail::hours("Hours Saved per Month", hours_saved),
                Detail::currency("Monthly Cost Savings", savings),
            ],
        )
    }
}

/// More issues resolved on first contact, avoiding repeat contacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstContactResolutionInputs {
    pub cases_per_month: f64,
    pub repeat_contact_rate: f64,
    pub fcr_improvement_pct: f64,
    pub cost_per_contact: f64,
}

impl Default for FirstContactResolutionInputs {
    fn default() -> Self {
        Self {
            cases_per_month: 10_000.0,
            repeat_contact_rate: 0.20,
            fcr_improvement_pct: 0.25,
            cost_per_contact: 6.0,
        }
    }
}

impl KpiFormula for FirstContactResolutionInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("casesPerMonth", self.cases_per_month),
            ("repeatContactRate", self.repeat_contact_rate),
            ("fcrImprovementPct", self.fcr_improvement_pct),
            ("costPerContact", self.cost_per_contact),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let repeat_contacts = self.cases_per_month * self.rate(self.repeat_contact_rate);
        let avoided = repeat_contacts * self.rate(self.fcr_improvement_pct);
        let savings = avoided * self.cost_per_contact;

        FormulaOutput::new(
            savings,
            vec![
                Detail::count("Repeat Contacts per Month", repeat_contacts),
                Detail::count("Contacts Avoided per Month", avoided),
                Detail::currency("Monthly Cost Savings", savings),
            ],
        )
    }
}

/// Cases resolved by self-service instead of an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseDeflectionInputs {
    pub cases_per_month: f64,
    pub deflection_pct: f64,
    pub cost_per_case: f64,
}

impl Default for CaseDeflectionInputs {
    fn default() -> Self {
        Self {
            cases_per_month: 10_000.0,
            deflection_pct: 0.10,
            cost_per_case: 6.0,
        }
    }
}

impl KpiFormula for CaseDeflectionInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("casesPerMonth", self.cases_per_month),
            ("deflectionPct", self.deflection_pct),
            ("costPerCase", self.cost_per_case),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let deflected = self.cases_per_month * self.rate(self.deflection_pct);
        let savings = deflected * self.cost_per_case;

        FormulaOutput::new(
            savings,
            vec![
                Detail::count("Cases Deflected per Month", deflected),
                Detail::currency("Monthly Cost Savings", savings),
            ],
        )
    }
}

/// Less wrap-up work after each case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AfterCallWorkReductionInputs {
    pub acw_minutes: f64,
    pub cases_per_month: f64,
    pub acw_reduction_pct: f64,
    pub agent_hourly_cost: f64,
}

impl Default for AfterCallWorkReductionInputs {
    fn default() -> Self {
        Self {
            acw_minutes: 4.0,
            cases_per_month: 10_000.0,
            acw_reduction_pct: 0.30,
            agent_hourly_cost: 35.0,
        }
    }
}

impl KpiFormula for AfterCallWorkReductionInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("acwMinutes", self.acw_minutes),
            ("casesPerMonth", self.cases_per_month),
            ("acwReductionPct", self.acw_reduction_pct),
            ("agentHourlyCost", self.agent_hourly_cost),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let minutes_saved = self.acw_minutes * self.rate(self.acw_reduction_pct);
        let hours_saved = minutes_saved * self.cases_per_month / MINUTES_PER_HOUR;
        let savings = hours_saved * self.agent_hourly_cost;

        FormulaOutput::new(
            savings,
            vec![
                Detail::minutes("Minutes Saved per Case", minutes_saved),
                Detail::hours("Hours Saved per Month", hours_saved),
                Detail::currency("Monthly Cost Savings", savings),
            ],
        )
    }
}

/// Fewer cases escalated to second-line support.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalationReductionInputs {
    pub escalations_per_month: f64,
    pub escalation_reduction_pct: f64,
    pub cost_per_escalation: f64,
}

impl Default for EscalationReductionInputs {
    fn default() -> Self {
        Self {
            escalations_per_month: 800.0,
            escalation_reduction_pct: 0.20,
            cost_per_escalation: 45.0,
        }
    }
}

impl KpiFormula for EscalationReductionInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("escalationsPerMonth", self.escalations_per_month),
            ("escalationReductionPct", self.escalation_reduction_pct),
            ("costPerEscalation", self.cost_per_escalation),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let avoided = self.escalations_per_month * self.rate(self.escalation_reduction_pct);
        let savings = avoided * self.cost_per_escalation;

        FormulaOutput::new(
            savings,
            vec![
                Detail::count("Escalations Avoided per Month", avoided),
                Detail::currency("Monthly Cost Savings", savings),
            ],
        )
    }
}

/// New agents reach full productivity sooner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentOnboardingAccelerationInputs {
    pub new_hires_per_year: f64,
    pub onboarding_hours_per_hire: f64,
    pub ramp_reduction_pct: f64,
    pub agent_hourly_cost: f64,
}

impl Default for AgentOnboardingAccelerationInputs {
    fn default() -> Self {
        Self {
            new_hires_per_year: 60.0,
            onboarding_hours_per_hire: 120.0,
            ramp_reduction_pct: 0.25,
            agent_hourly_cost: 35.0,
        }
    }
}

impl KpiFormula for AgentOnboardingAccelerationInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("newHiresPerYear", self.new_hires_per_year),
            ("onboardingHoursPerHire", self.onboarding_hours_per_hire),
            ("rampReductionPct", self.ramp_reduction_pct),
            ("agentHourlyCost", self.agent_hourly_cost),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let hours_saved = self.new_hires_per_year
            * self.onboarding_hours_per_hire
            * self.rate(self.ramp_reduction_pct);
        let savings = hours_saved * self.agent_hourly_cost;

        FormulaOutput::new(
            savings,
            vec![
                Detail::hours("Onboarding Hours Saved per Year", hours_saved),
                Detail::currency("Annual Cost Savings", savings),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::formulas::test_util::assert_close;

    #[test]
    fn test_aht_reference_scenario() {
        let inputs = AverageHandlingTimeReductionInputs {
            current_aht_minutes: 12.0,
            cases_per_month: 10_000.0,
            agent_hourly_cost: 35.0,
            aht_reduction_pct: 0.15,
        };
        let output = inputs.compute();

        assert_close(output.detail("Minutes Saved per Case").unwrap(), 1.8);
        assert_close(output.detail("Hours Saved per Month").unwrap(), 300.0);
        assert_close(output.impact, 10_500.0);
    }

    #[test]
    fn test_aht_serialized_field_names() {
        let json = serde_json::to_value(AverageHandlingTimeReductionInputs::default()).unwrap();
        assert!(json.get("currentAHTMinutes").is_some());
        assert!(json.get("ahtReductionPct").is_some());
        assert!(json.get("casesPerMonth").is_some());
    }

    #[test]
    fn test_service_defaults() {
        assert_close(FirstContactResolutionInputs::default().compute().impact, 3_000.0);
        assert_close(CaseDeflectionInputs::default().compute().impact, 6_000.0);
        assert_close(AfterCallWorkReductionInputs::default().compute().impact, 7_000.0);
        assert_close(EscalationReductionInputs::default().compute().impact, 7_200.0);
        assert_close(
            AgentOnboardingAccelerationInputs::default().compute().impact,
            63_000.0,
        );
    }

    #[test]
    fn test_negative_reduction_is_not_clamped() {
        let inputs = CaseDeflectionInputs {
            deflection_pct: -0.05,
            ..Default::default()
        };
        assert_close(inputs.compute().impact, -3_000.0);
    }
}
