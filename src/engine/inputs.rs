//! Per-KPI input sets for one agent.

use super::{KpiId, KpiInputs};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Input records keyed by the KPI they belong to.
///
/// Keys are always taken from the record itself, so an entry can never be
/// filed under the wrong KPI. Iteration follows catalog order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<KpiInputs>", into = "Vec<KpiInputs>")]
pub struct KpiInputsData {
    entries: BTreeMap<KpiId, KpiInputs>,
}

impl KpiInputsData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for its KPI, returning the previous one.
    pub fn insert(&mut self, inputs: KpiInputs) -> Option<KpiInputs> {
        self.entries.insert(inputs.kpi(), inputs)
    }

    pub fn get(&self, kpi: KpiId) -> Option<&KpiInputs> {
        self.entries.get(&kpi)
    }

    pub fn contains(&self, kpi: KpiId) -> bool {
        self.entries.contains_key(&kpi)
    }

    pub fn remove(&mut self, kpi: KpiId) -> Option<KpiInputs> {
        self.entries.remove(&kpi)
    }

    pub fn iter(&self) -> impl Iterator<Item = &KpiInputs> {
        self.entries.values()
    }

    pub fn kpis(&self) -> impl Iterator<Item = KpiId> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<KpiInputs>> for KpiInputsData {
    fn from(records: Vec<KpiInputs>) -> Self {
        records.into_iter().collect()
    }
}

impl From<KpiInputsData> for Vec<KpiInputs> {
    fn from(data: KpiInputsData) -> Self {
        data.entries.into_values().collect()
    }
}

impl FromIterator<KpiInputs> for KpiInputsData {
    fn from_iter<I: IntoIterator<Item = KpiInputs>>(iter: I) -> Self {
        let mut data = KpiInputsData::new();
        for inputs in iter {
            data.insert(inputs);
        }
        data
    }
}
