//! KPI impact calculation engine.
//!
//! - [`formulas`]: one pure function per KPI, grouped by process family
//! - [`catalog`]: process → ordered KPIs, default inputs, formula binding
//! - [`builder`]: formula output → [`crate::models::KpiResult`]

pub mod builder;
pub mod catalog;
pub mod formulas;
mod inputs;
mod kpi;

pub use formulas::{Formula, FormulaOutput};
pub use inputs::KpiInputsData;
pub use kpi::{KpiId, KpiInputs};
