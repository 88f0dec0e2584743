//! Markdown and JSON report rendering.
//!
//! This module lays out an assembled [`ReportPayload`] as a Markdown
//! business case or as pretty-printed JSON.

use super::assembler::{AgentSection, Assumption, ImpactGroup, ReportPayload};
use crate::engine::builder::{format_currency, format_number};
use crate::models::{CustomerInfo, ImpactType};
use chrono::{DateTime, Utc};

/// Presentation settings for the Markdown renderer.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub currency_symbol: String,
    /// Decimals shown on impact amounts.
    pub decimals: usize,
    pub include_assumptions: bool,
    pub generated_at: DateTime<Utc>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            decimals: 0,
            include_assumptions: true,
            generated_at: Utc::now(),
        }
    }
}

impl RenderOptions {
    fn money(&self, value: f64) -> String {
        format_currency(value, &self.currency_symbol, self.decimals)
    }
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &ReportPayload, options: &RenderOptions) -> String {
    let mut output = String::new();

    output.push_str("# AI Agent Impact Report\n\n");
    output.push_str(&generate_metadata_section(report.customer.as_ref(), report, options));
    output.push_str(&generate_summary_section(report, options));

    if report.sections.is_empty() {
        output.push_str("No agents have been saved yet.\n\n");
    }
    for section in &report.sections {
        output.push_str(&generate_agent_section(section, options));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(
    customer: Option<&CustomerInfo>,
    report: &ReportPayload,
    options: &RenderOptions,
) -> String {
    let mut section = String::new();

    section.push_str("## Customer\n\n");
    match customer {
        Some(customer) => {
            section.push_str(&format!("- **Customer:** {}\n", customer.name));
            if let Some(ref industry) = customer.industry {
                section.push_str(&format!("- **Industry:** {}\n", industry));
            }
            if let Some(revenue) = customer.revenue {
                section.push_str(&format!("- **Annual Revenue:** {}\n", options.money(revenue)));
            }
            if let Some(ebitda) = customer.ebitda {
                section.push_str(&format!("- **Annual EBITDA:** {}\n", options.money(ebitda)));
            }
        }
        None => section.push_str("- **Customer:** _not specified_\n"),
    }
    section.push_str(&format!(
        "- **Generated:** {}\n",
        options.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Agents:** {}\n", report.sections.len()));
    section.push('\n');

    section
}

/// Generate the totals section.
fn generate_summary_section(report: &ReportPayload, options: &RenderOptions) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str("| Revenue Impact | EBITDA Impact |\n");
    section.push_str("|---:|---:|\n");
    section.push_str(&format!(
        "| {} | {} |\n\n",
        options.money(report.totals.revenue),
        options.money(report.totals.ebitda)
    ));

    if report.process_totals.len() > 1 {
        section.push_str("### By Business Process\n\n");
        section.push_str("| Process | Agents | Revenue | EBITDA |\n");
        section.push_str("|:---|:---:|---:|---:|\n");
        for total in &report.process_totals {
            section.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                total.process,
                total.agents,
                options.money(total.totals.revenue),
                options.money(total.totals.ebitda)
            ));
        }
        section.push('\n');
    }

    section
}

/// Generate the section for one agent.
fn generate_agent_section(agent: &AgentSection, options: &RenderOptions) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", agent.agent_name));
    section.push_str(&format!(
        "*Process: {} | Saved: {}*\n\n",
        agent.process,
        agent.created_at.format("%Y-%m-%d %H:%M UTC")
    ));

    if agent.is_empty() {
        section.push_str("No KPI results were saved for this agent.\n\n");
        return section;
    }

    for group in &agent.groups {
        section.push_str(&generate_group_block(group, options));
    }

    if options.include_assumptions && !agent.assumptions.is_empty() {
        section.push_str(&generate_assumptions_block(&agent.assumptions));
    }

    section.push_str("---\n\n");

    section
}

/// Generate the table for one impact type.
fn generate_group_block(group: &ImpactGroup, options: &RenderOptions) -> String {
    let mut block = String::new();

    let heading = match group.impact_type {
        ImpactType::Revenue => "Revenue Impact",
        ImpactType::Ebitda => "EBITDA Impact",
    };
    block.push_str(&format!("### {}\n\n", heading));
    block.push_str("| KPI | Breakdown | Impact |\n");
    block.push_str("|:---|:---|---:|\n");

    for entry in &group.entries {
        let breakdown = entry
            .details
            .iter()
            .map(|d| d.display(&options.currency_symbol))
            .collect::<Vec<_>>()
            .join("<br>");
        block.push_str(&format!(
            "| {} | {} | {} |\n",
            entry.kpi_name,
            breakdown,
            options.money(entry.impact_amount)
        ));
    }
    block.push_str(&format!(
        "| **Subtotal** | | **{}** |\n\n",
        options.money(group.subtotal)
    ));

    block
}

fn generate_assumptions_block(assumptions: &[Assumption]) -> String {
    let mut block = String::new();

    block.push_str("<details>\n<summary>Assumptions</summary>\n\n");
    for assumption in assumptions {
        block.push_str(&format!("**{}**\n\n", assumption.kpi_name));
        for parameter in &assumption.parameters {
            let decimals = if parameter.value.fract() == 0.0 { 0 } else { 4 };
            let value = format_number(parameter.value, decimals);
            let value = if decimals > 0 {
                value.trim_end_matches('0').trim_end_matches('.').to_string()
            } else {
                value
            };
            block.push_str(&format!("- {}: {}\n", parameter.label, value));
        }
        block.push('\n');
    }
    block.push_str("</details>\n\n");

    block
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("*Estimates are based on the assumptions listed for each KPI.*\n");
    footer.push_str(&format!(
        "*Report generated by kpimpact v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &ReportPayload) -> anyhow::Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
