//! IT formulas. Cost savings (EBITDA); rates are whole percentages.

use super::{Detail, FormulaOutput, KpiFormula};
use serde::{Deserialize, Serialize};

const MINUTES_PER_HOUR: f64 = 60.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketAutomationInputs {
    pub tickets_per_month: f64,
    pub minutes_per_ticket: f64,
    pub automation_pct: f64,
    pub it_hourly_cost: f64,
}

impl Default for TicketAutomationInputs {
    fn default() -> Self {
        Self {
            tickets_per_month: 4_000.0,
            minutes_per_ticket: 15.0,
            automation_pct: 60.0,
            it_hourly_cost: 45.0,
        }
    }
}

impl KpiFormula for TicketAutomationInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("ticketsPerMonth", self.tickets_per_month),
            ("minutesPerTicket", self.minutes_per_ticket),
            ("automationPct", self.automation_pct),
            ("itHourlyCost", self.it_hourly_cost),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let handling_hours = self.tickets_per_month * self.minutes_per_ticket / MINUTES_PER_HOUR;
        let hours_saved = handling_hours * self.rate(self.automation_pct);
        let savings = hours_saved * self.it_hourly_cost;

        FormulaOutput::new(
            savings,
            vec![
                Detail::hours("Ticket Hours per Month", handling_hours),
                Detail::hours("Hours Saved per Month", hours_saved),
                Detail::currency("Monthly Cost Savings", savings),
            ],
        )
    }
}

/// Shorter mean time to resolve incidents reduces downtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentResolutionInputs {
    pub incidents_per_month: f64,
    pub mttr_hours: f64,
    pub mttr_reduction_pct: f64,
    pub downtime_cost_per_hour: f64,
}

impl Default for IncidentResolutionInputs {
    fn default() -> Self {
        Self {
            incidents_per_month: 40.0,
            mttr_hours: 4.0,
            mttr_reduction_pct: 30.0,
            downtime_cost_per_hour: 5_000.0,
        }
    }
}

impl KpiFormula for IncidentResolutionInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("incidentsPerMonth", self.incidents_per_month),
            ("mttrHours", self.mttr_hours),
            ("mttrReductionPct", self.mttr_reduction_pct),
            ("downtimeCostPerHour", self.downtime_cost_per_hour),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let downtime_avoided =
            self.incidents_per_month * self.mttr_hours * self.rate(self.mttr_reduction_pct);
        let savings = downtime_avoided * self.downtime_cost_per_hour;

        FormulaOutput::new(
            savings,
            vec![
                Detail::hours("Downtime Hours Avoided per Month", downtime_avoided),
                Detail::currency("Monthly Downtime Savings", savings),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperProductivityInputs {
    pub developers: f64,
    pub coding_hours_per_month: f64,
    pub productivity_gain_pct: f64,
    pub developer_hourly_cost: f64,
}

impl Default for DeveloperProductivityInputs {
    fn default() -> Self {
        Self {
            developers: 100.0,
            coding_hours_per_month: 120.0,
            productivity_gain_pct: 20.0,
            developer_hourly_cost: 75.0,
        }
    }
}

impl KpiFormula for DeveloperProductivityInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("developers", self.developers),
            ("codingHoursPerMonth", self.coding_hours_per_month),
            ("productivityGainPct", self.productivity_gain_pct),
            ("developerHourlyCost", self.developer_hourly_cost),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let hours_saved =
            self.developers * self.coding_hours_per_month * self.rate(self.productivity_gain_pct);
        let savings = hours_saved * self.developer_hourly_cost;

        FormulaOutput::new(
            savings,
            vec![
                Detail::hours("Developer Hours Freed per Month", hours_saved),
                Detail::currency("Monthly Capacity Value", savings),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudCostOptimizationInputs {
    pub annual_cloud_spend: f64,
    pub optimization_pct: f64,
}

impl Default for CloudCostOptimizationInputs {
    fn default() -> Self {
        Self {
            annual_cloud_spend: 3_000_000.0,
            optimization_pct: 15.0,
        }
    }
}

impl KpiFormula for CloudCostOptimizationInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("annualCloudSpend", self.annual_cloud_spend),
            ("optimizationPct", self.optimization_pct),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let savings = self.annual_cloud_spend * self.rate(self.optimization_pct);

        FormulaOutput::new(
            savings,
            vec![Detail::currency("Annual Cloud Savings", savings)],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityIncidentReductionInputs {
    pub incidents_per_year: f64,
    pub incident_reduction_pct: f64,
    pub cost_per_incident: f64,
}

impl Default for SecurityIncidentReductionInputs {
    fn default() -> Self {
        Self {
            incidents_per_year: 12.0,
            incident_reduction_pct: 25.0,
            cost_per_incident: 150_000.0,
        }
    }
}

impl KpiFormula for SecurityIncidentReductionInputs {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("incidentsPerYear", self.incidents_per_year),
            ("incidentReductionPct", self.incident_reduction_pct),
            ("costPerIncident", self.cost_per_incident),
        ]
    }

    fn compute(&self) -> FormulaOutput {
        let avoided = self.incidents_per_year * self.rate(self.incident_reduction_pct);
        let savings = avoided * self.cost_per_incident;

        FormulaOutput::new(
            savings,
            vec![
                Detail::count("Incidents Avoided per Year", avoided),
                Detail::currency("Annual Incident Cost Avoided", savings),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::formulas::test_util::assert_close;

    #[test]
    fn test_ticket_automation() {
        let output = TicketAutomationInputs::default().compute();
        assert_close(output.detail("Ticket Hours per Month").unwrap(), 1_000.0);
        assert_close(output.detail("Hours Saved per Month").unwrap(), 600.0);
        assert_close(output.impact, 27_000.0);
    }

    #[test]
    fn test_it_defaults() {
        assert_close(IncidentResolutionInputs::default().compute().impact, 240_000.0);
        assert_close(DeveloperProductivityInputs::default().compute().impact, 180_000.0);
        assert_close(CloudCostOptimizationInputs::default().compute().impact, 450_000.0);
        assert_close(
            SecurityIncidentReductionInputs::default().compute().impact,
            450_000.0,
        );
    }
}
