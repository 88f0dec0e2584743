//! Result builder: turns formula output into a display- and export-ready
//! [`KpiResult`].

use super::catalog;
use super::{FormulaOutput, KpiId, KpiInputs, KpiInputsData};
use crate::error::{EngineError, Result};
use crate::models::{BusinessProcess, KpiResult, ResultDetail, Unit};
use tracing::debug;

/// Evaluate `kpi` against the record stored for it in `inputs`.
pub fn evaluate(kpi: KpiId, inputs: &KpiInputsData) -> Result<KpiResult> {
    let record = inputs
        .get(kpi)
        .ok_or_else(|| EngineError::invalid_input(kpi, "no inputs configured"))?;
    evaluate_inputs(record)
}

/// Evaluate a single input record with its bound formula.
pub fn evaluate_inputs(inputs: &KpiInputs) -> Result<KpiResult> {
    let kpi = inputs.kpi();
    let output = catalog::formula_for(kpi)(inputs)?;
    debug!("{} evaluated: impact {}", kpi, output.impact);
    Ok(build_result(kpi, output))
}

/// Evaluate every KPI of `process`, in catalog order.
pub fn evaluate_process(process: BusinessProcess, inputs: &KpiInputsData) -> Result<Vec<KpiResult>> {
    catalog::list_kpis(process)
        .iter()
        .map(|&kpi| evaluate(kpi, inputs))
        .collect()
}

fn build_result(kpi: KpiId, output: FormulaOutput) -> KpiResult {
    KpiResult {
        kpi,
        details: output
            .details
            .into_iter()
            .map(|d| ResultDetail {
                label: d.label.to_string(),
                value: d.value,
                unit: d.unit,
            })
            .collect(),
        impact_amount: output.impact,
        impact_type: kpi.impact_type(),
        saved: false,
    }
}

impl ResultDetail {
    /// `"Incremental Deals: 18"`, rounded for display only.
    pub fn display(&self, currency_symbol: &str) -> String {
        format!("{}: {}", self.label, format_value(self.value, self.unit, currency_symbol))
    }
}

/// Format a value for humans according to its unit.
pub fn format_value(value: f64, unit: Unit, currency_symbol: &str) -> String {
    match unit {
        Unit::Currency => format_currency(value, currency_symbol, 0),
        Unit::Count => format_number(value, if is_whole(value) { 0 } else { 1 }),
        Unit::Hours => format!("{} hrs", format_number(value, if is_whole(value) { 0 } else { 1 })),
        Unit::Minutes => format!("{} min", format_number(value, if is_whole(value) { 0 } else { 1 })),
        Unit::Days => format!("{} days", format_number(value, if is_whole(value) { 0 } else { 1 })),
    }
}

/// `-$1,234,567` style currency.
pub fn format_currency(value: f64, currency_symbol: &str, decimals: usize) -> String {
    let number = format_number(value.abs(), decimals);
    if value < 0.0 && number.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}{}", currency_symbol, number)
    } else {
        format!("{}{}", currency_symbol, number)
    }
}

/// Thousands-separated number with a fixed number of decimals.
pub fn format_number(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::new();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let negative = value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut result = String::new();
    if negative {
        result.push('-');
    }
    result.push_str(&grouped);
    if let Some(frac) = frac_part {
        result.push('.');
        result.push_str(frac);
    }
    result
}

fn is_whole(value: f64) -> bool {
    (value - value.round()).abs() < 1e-9
}
