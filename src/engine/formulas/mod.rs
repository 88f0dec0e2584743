//! Formula library: one pure impact calculation per KPI.
//!
//! Each process family lives in its own module. A formula is a method on the
//! KPI's own input record, so a record can only ever be evaluated by the
//! formula it was written for. Inputs are checked for finiteness before any
//! arithmetic happens.

pub mod finance;
pub mod it;
pub mod legal;
pub mod marketing;
pub mod sales;
pub mod service;
pub mod supply_chain;

pub use finance::*;
pub use it::*;
pub use legal::*;
pub use marketing::*;
pub use sales::*;
pub use service::*;
pub use supply_chain::*;

use crate::engine::{KpiId, KpiInputs};
use crate::error::{EngineError, Result};
use crate::models::Unit;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A bound formula, as handed out by the process catalog.
pub type Formula = fn(&KpiInputs) -> Result<FormulaOutput>;

/// Raw result of a formula: the impact plus the quantities behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaOutput {
    pub impact: f64,
    pub details: Vec<Detail>,
}

impl FormulaOutput {
    pub fn new(impact: f64, details: Vec<Detail>) -> Self {
        Self { impact, details }
    }

    /// Look up a detail value by label.
    #[cfg(test)]
    pub fn detail(&self, label: &str) -> Option<f64> {
        self.details
            .iter()
            .find(|d| d.label == label)
            .map(|d| d.value)
    }
}

/// A labeled intermediate quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detail {
    pub label: &'static str,
    pub value: f64,
    pub unit: Unit,
}

impl Detail {
    pub fn count(label: &'static str, value: f64) -> Self {
        Self {
            label,
            value,
            unit: Unit::Count,
        }
    }

    pub fn currency(label: &'static str, value: f64) -> Self {
        Self {
            label,
            value,
            unit: Unit::Currency,
        }
    }

    pub fn hours(label: &'static str, value: f64) -> Self {
        Self {
            label,
            value,
            unit: Unit::Hours,
        }
    }

    pub fn minutes(label: &'static str, value: f64) -> Self {
        Self {
            label,
            value,
            unit: Unit::Minutes,
        }
    }

    pub fn days(label: &'static str, value: f64) -> Self {
        Self {
            label,
            value,
            unit: Unit::Days,
        }
    }
}

/// Ties an input record to its variant of [`KpiInputs`].
pub trait KpiVariant: Sized {
    const KPI: KpiId;

    fn extract(inputs: &KpiInputs) -> Option<&Self>;
}

/// An input record that knows how to compute its own impact.
pub trait KpiFormula: KpiVariant + Default + Serialize + DeserializeOwned {
    /// Every parameter, by its serialized name, in declaration order.
    fn fields(&self) -> Vec<(&'static str, f64)>;

    /// The arithmetic. Only called once every field is finite.
    fn compute(&self) -> FormulaOutput;

    /// Convert an authored rate using this KPI's declared scale.
    fn rate(&self, value: f64) -> f64 {
        Self::KPI.rate_scale().apply(value)
    }
}

/// Evaluate `inputs` with the formula of `F`.
pub fn evaluate<F: KpiFormula>(inputs: &KpiInputs) -> Result<FormulaOutput> {
    let typed = F::extract(inputs).ok_or_else(|| {
        EngineError::invalid_input(
            F::KPI,
            format!("received inputs for {}", inputs.kpi().name()),
        )
    })?;

    check_finite(F::KPI, &typed.fields())?;

    Ok(typed.compute())
}

fn check_finite(kpi: KpiId, fields: &[(&'static str, f64)]) -> Result<()> {
    for (name, value) in fields {
        if !value.is_finite() {
            return Err(EngineError::invalid_field(
                kpi,
                name,
                format!("must be a finite number, got {}", value),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_util {
    /// Float comparison with a tolerance relative to the expected magnitude.
    pub fn assert_close(actual: f64, expected: f64) {
        let tolerance = 1e-9 * expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {}, got {}",
            expected,
            actual
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::catalog;

    #[test]
    fn test_mismatched_inputs_rejected() {
        let inputs = KpiInputs::from(CaseDeflectionInputs::default());
        let err = evaluate::<MoreLeadsInputs>(&inputs).unwrap_err();
        match err {
            EngineError::InvalidInput { kpi, reason, .. } => {
                assert_eq!(kpi, KpiId::MoreLeads);
                assert!(reason.contains("Case Deflection"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_rejected_before_arithmetic() {
        let inputs = KpiInputs::from(MoreLeadsInputs {
            increment_pct: f64::NAN,
            ..Default::default()
        });
        let err = evaluate::<MoreLeadsInputs>(&inputs).unwrap_err();
        match err {
            EngineError::InvalidInput { field, .. } => {
                assert_eq!(field.as_deref(), Some("incrementPct"))
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let inputs = KpiInputs::from(TicketAutomationInputs {
            tickets_per_month: f64::INFINITY,
            ..Default::default()
        });
        assert!(catalog::formula_for(KpiId::TicketAutomation)(&inputs).is_err());
    }

    #[test]
    fn test_zeroing_any_field_yields_zero_impact() {
        for &kpi in KpiId::ALL {
            let defaults = KpiInputs::defaults_for(kpi);
            for (field, _) in defaults.fields() {
                let mut overrides = toml::Table::new();
                overrides.insert(field.to_string(), toml::Value::Float(0.0));
                let zeroed = defaults.with_overrides(&overrides).unwrap();
                let output = catalog::formula_for(kpi)(&zeroed).unwrap();
                assert_eq!(
                    output.impact, 0.0,
                    "{} with {} = 0 should have no impact",
                    kpi.name(),
                    field
                );
            }
        }
    }

    #[test]
    fn test_every_field_is_finite_checked() {
        for &kpi in KpiId::ALL {
            let defaults = KpiInputs::defaults_for(kpi);
            for (field, _) in defaults.fields() {
                let mut overrides = toml::Table::new();
                overrides.insert(field.to_string(), toml::Value::Float(f64::NAN));
                let poisoned = defaults.with_overrides(&overrides).unwrap();
                let err = catalog::formula_for(kpi)(&poisoned).unwrap_err();
                assert!(
                    matches!(err, EngineError::InvalidInput { .. }),
                    "{}.{} should be rejected",
                    kpi.name(),
                    field
                );
            }
        }
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        for &kpi in KpiId::ALL {
            let inputs = KpiInputs::defaults_for(kpi);
            let first = catalog::formula_for(kpi)(&inputs).unwrap();
            let second = catalog::formula_for(kpi)(&inputs).unwrap();
            assert_eq!(first.impact.to_bits(), second.impact.to_bits());
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_default_impacts_are_positive() {
        for &kpi in KpiId::ALL {
            let output = catalog::formula_for(kpi)(&KpiInputs::defaults_for(kpi)).unwrap();
            assert!(output.impact > 0.0, "{} default impact", kpi.name());
            assert!(!output.details.is_empty());
        }
    }
}
