//! Report assembly.
//!
//! Turns the committed agents of a session into a structured payload that a
//! renderer (local or remote) lays out. Amounts are carried at full
//! precision; rounding happens only when rendering.

use crate::engine::catalog;
use crate::models::{
    AgentConfig, AgentId, BusinessProcess, CustomerInfo, ImpactType, KpiId, KpiResult,
    ResultDetail,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    pub customer: Option<CustomerInfo>,
    pub sections: Vec<AgentSection>,
    pub totals: ImpactTotals,
    pub process_totals: Vec<ProcessTotal>,
}

/// One committed agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSection {
    pub agent_id: AgentId,
    pub agent_name: String,
    pub process: BusinessProcess,
    pub created_at: DateTime<Utc>,
    /// Revenue first, then EBITDA. Empty groups are left out.
    pub groups: Vec<ImpactGroup>,
    /// Inputs behind each saved KPI, in catalog order.
    pub assumptions: Vec<Assumption>,
}

impl AgentSection {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactGroup {
    pub impact_type: ImpactType,
    pub entries: Vec<ReportEntry>,
    pub subtotal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEntry {
    pub kpi: KpiId,
    pub kpi_name: String,
    pub details: Vec<ResultDetail>,
    pub impact_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assumption {
    pub kpi: KpiId,
    pub kpi_name: String,
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactTotals {
    pub revenue: f64,
    pub ebitda: f64,
}

impl ImpactTotals {
    /// Flat sum of every entry's amount, in section order. Group subtotals
    /// are not summed again, so a total equals the sum of its line items.
    fn from_sections<'a>(sections: impl IntoIterator<Item = &'a AgentSection>) -> Self {
        let mut totals = Self::default();
        for section in sections {
            for group in &section.groups {
                for entry in &group.entries {
                    totals.add(group.impact_type, entry.impact_amount);
                }
            }
        }
        totals
    }

    fn add(&mut self, impact_type: ImpactType, amount: f64) {
        match impact_type {
            ImpactType::Revenue => self.revenue += amount,
            ImpactType::Ebitda => self.ebitda += amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessTotal {
    pub process: BusinessProcess,
    pub agents: usize,
    pub totals: ImpactTotals,
}

/// Build the report payload for `agents`, in save order.
pub fn assemble(agents: &[AgentConfig], customer: Option<&CustomerInfo>) -> ReportPayload {
    let sections: Vec<AgentSection> = agents.iter().map(build_section).collect();
    let totals = ImpactTotals::from_sections(&sections);

    ReportPayload {
        customer: customer.cloned(),
        process_totals: process_totals(&sections),
        sections,
        totals,
    }
}

fn build_section(agent: &AgentConfig) -> AgentSection {
    let mut results: Vec<&KpiResult> = agent.results().iter().collect();
    results.sort_by_key(|r| catalog::position(r.kpi));

    let groups = ImpactType::ALL
        .iter()
        .filter_map(|&impact_type| {
            let entries: Vec<ReportEntry> = results
                .iter()
                .filter(|r| r.impact_type == impact_type)
                .map(|r| ReportEntry {
                    kpi: r.kpi,
                    kpi_name: r.kpi.name().to_string(),
                    details: r.details.clone(),
                    impact_amount: r.impact_amount,
                })
                .collect();

            if entries.is_empty() {
                return None;
            }
            let subtotal = entries.iter().map(|e| e.impact_amount).sum();
            Some(ImpactGroup {
                impact_type,
                entries,
                subtotal,
            })
        })
        .collect();

    let assumptions = results
        .iter()
        .filter_map(|r| agent.inputs().get(r.kpi))
        .map(|inputs| Assumption {
            kpi: inputs.kpi(),
            kpi_name: inputs.kpi().name().to_string(),
            parameters: inputs
                .fields()
                .into_iter()
                .map(|(name, value)| Parameter {
                    name: name.to_string(),
                    label: humanize(name),
                    value,
                })
                .collect(),
        })
        .collect();

    AgentSection {
        agent_id: agent.id(),
        agent_name: agent.name().to_string(),
        process: agent.process(),
        created_at: agent.created_at(),
        groups,
        assumptions,
    }
}

fn process_totals(sections: &[AgentSection]) -> Vec<ProcessTotal> {
    BusinessProcess::ALL
        .iter()
        .filter_map(|&process| {
            let members: Vec<&AgentSection> =
                sections.iter().filter(|s| s.process == process).collect();
            if members.is_empty() {
                return None;
            }
            Some(ProcessTotal {
                process,
                agents: members.len(),
                totals: ImpactTotals::from_sections(members.iter().copied()),
            })
        })
        .collect()
}

/// `currentAHTMinutes` -> `Current AHT Minutes`.
fn humanize(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut label = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if i == 0 {
            label.extend(c.to_uppercase());
            continue;
        }
        let prev = chars[i - 1];
        let next_is_lower = chars.get(i + 1).map_or(false, |n| n.is_lowercase());
        let boundary = c.is_uppercase()
            && (prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower));
        if boundary {
            label.push(' ');
        }
        label.push(c);
    }

    label
}
