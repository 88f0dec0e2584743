//! Agent aggregation: the in-progress working agent and the session
//! collection of committed agents.

use crate::engine::{builder, catalog, KpiId, KpiInputs, KpiInputsData};
use crate::error::{EngineError, Result};
use crate::models::{AgentConfig, AgentId, BusinessProcess, CustomerInfo, KpiResult};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// The agent currently being configured.
///
/// Results are replaced, never edited: changing a KPI's inputs drops its
/// previous result until it is calculated again.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingAgent {
    pub name: String,
    process: Option<BusinessProcess>,
    inputs: KpiInputsData,
    results: Vec<KpiResult>,
}

impl Default for WorkingAgent {
    fn default() -> Self {
        Self::new(catalog::DEFAULT_PROCESS)
    }
}

impl WorkingAgent {
    /// A fresh, unnamed agent with `process`'s default assumptions.
    pub fn new(process: BusinessProcess) -> Self {
        Self {
            name: String::new(),
            process: Some(process),
            inputs: catalog::default_inputs(process),
            results: Vec::new(),
        }
    }

    /// An agent with no process chosen yet.
    #[allow(dead_code)] // plans always name a process; commit still guards the unset state
    pub fn unset() -> Self {
        Self {
            name: String::new(),
            process: None,
            inputs: KpiInputsData::new(),
            results: Vec::new(),
        }
    }

    pub fn process(&self) -> Option<BusinessProcess> {
        self.process
    }

    pub fn inputs(&self) -> &KpiInputsData {
        &self.inputs
    }

    pub fn results(&self) -> &[KpiResult] {
        &self.results
    }

    pub fn result(&self, kpi: KpiId) -> Option<&KpiResult> {
        self.results.iter().find(|r| r.kpi == kpi)
    }

    /// Switch process: inputs reset to the new process's defaults and all
    /// results are discarded.
    pub fn select_process(&mut self, process: BusinessProcess) {
        if self.process != Some(process) {
            debug!("Working agent switched to {}", process);
        }
        self.process = Some(process);
        self.inputs = catalog::default_inputs(process);
        self.results.clear();
    }

    /// Replace the record for one KPI.
    pub fn set_inputs(&mut self, inputs: KpiInputs) -> Result<()> {
        let kpi = inputs.kpi();
        self.ensure_in_process(kpi)?;
        self.inputs.insert(inputs);
        self.results.retain(|r| r.kpi != kpi);
        Ok(())
    }

    /// Replace named parameters of one KPI's record.
    pub fn apply_overrides(&mut self, kpi: KpiId, overrides: &toml::Table) -> Result<()> {
        self.ensure_in_process(kpi)?;
        let current = match self.inputs.get(kpi) {
            Some(inputs) => inputs.clone(),
            None => KpiInputs::defaults_for(kpi),
        };
        let updated = current.with_overrides(overrides)?;
        self.set_inputs(updated)
    }

    /// Calculate one KPI, replacing any earlier result for it.
    pub fn calculate(&mut self, kpi: KpiId) -> Result<&KpiResult> {
        self.ensure_in_process(kpi)?;
        let result = builder::evaluate(kpi, &self.inputs)?;

        let index = match self.results.iter().position(|r| r.kpi == kpi) {
            Some(index) => {
                self.results[index] = result;
                index
            }
            None => {
                self.results.push(result);
                self.results.sort_by_key(|r| catalog::position(r.kpi));
                self.results
                    .iter()
                    .position(|r| r.kpi == kpi)
                    .unwrap_or(self.results.len() - 1)
            }
        };
        Ok(&self.results[index])
    }

    /// Calculate every KPI of the current process.
    ///
    /// On failure the previous results are left untouched.
    pub fn calculate_all(&mut self) -> Result<&[KpiResult]> {
        let process = self.require_process()?;
        self.results = builder::evaluate_process(process, &self.inputs)?;
        Ok(&self.results)
    }

    /// Flag a calculated result as accepted (or not) for the agent.
    pub fn mark_saved(&mut self, kpi: KpiId, saved: bool) -> Result<()> {
        match self.results.iter_mut().find(|r| r.kpi == kpi) {
            Some(result) => {
                result.saved = saved;
                Ok(())
            }
            None => Err(EngineError::Validation(format!(
                "{} has not been calculated",
                kpi
            ))),
        }
    }

    fn require_process(&self) -> Result<BusinessProcess> {
        self.process
            .ok_or_else(|| EngineError::Validation("no business process selected".to_string()))
    }

    fn ensure_in_process(&self, kpi: KpiId) -> Result<()> {
        let process = self.require_process()?;
        if kpi.process() != process {
            return Err(EngineError::Validation(format!(
                "{} belongs to {}, not {}",
                kpi,
                kpi.process(),
                process
            )));
        }
        Ok(())
    }
}

/// The ordered collection of committed agents plus report metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    agents: Vec<AgentConfig>,
    customer: Option<CustomerInfo>,
    last_id: Option<AgentId>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a session from already validated records.
    pub(crate) fn from_parts(agents: Vec<AgentConfig>, customer: Option<CustomerInfo>) -> Self {
        let last_id = agents.iter().map(|a| a.id()).max();
        Self {
            agents,
            customer,
            last_id,
        }
    }

    /// Committed agents, in save order.
    pub fn agents(&self) -> &[AgentConfig] {
        &self.agents
    }

    pub fn get(&self, id: AgentId) -> Option<&AgentConfig> {
        self.agents.iter().find(|a| a.id() == id)
    }

    pub fn customer(&self) -> Option<&CustomerInfo> {
        self.customer.as_ref()
    }

    pub fn set_customer(&mut self, customer: Option<CustomerInfo>) {
        self.customer = customer;
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Commit the working agent as an immutable record.
    ///
    /// Only results flagged `saved` are kept, in their current order. On
    /// success the working agent is reset to the state a new session starts
    /// in: catalog default process, its default inputs, empty name and no
    /// results.
    pub fn commit(&mut self, working: &mut WorkingAgent) -> Result<&AgentConfig> {
        self.commit_at(working, Utc::now())
    }

    pub(crate) fn commit_at(
        &mut self,
        working: &mut WorkingAgent,
        now: DateTime<Utc>,
    ) -> Result<&AgentConfig> {
        let name = working.name.trim();
        if name.is_empty() {
            return Err(EngineError::Validation("agent name is required".to_string()));
        }
        let process = working
            .process
            .ok_or_else(|| EngineError::Validation("business process is required".to_string()))?;

        if let Some(stray) = working.results.iter().find(|r| r.kpi.process() != process) {
            return Err(EngineError::Validation(format!(
                "{} does not belong to {}",
                stray.kpi, process
            )));
        }

        let saved: Vec<KpiResult> = working.results.iter().filter(|r| r.saved).cloned().collect();
        let id = self.next_id(now);
        let record = AgentConfig::new(
            id,
            name.to_string(),
            process,
            working.inputs.clone(),
            saved,
            now,
        );

        info!(
            "Committed agent '{}' ({}) with {} saved KPI result(s)",
            record.name(),
            process,
            record.results().len()
        );

        self.agents.push(record);
        *working = WorkingAgent::default();

        Ok(&self.agents[self.agents.len() - 1])
    }

    /// Remove a committed agent. Unknown ids are ignored.
    pub fn remove(&mut self, id: AgentId) -> Option<AgentConfig> {
        let index = self.agents.iter().position(|a| a.id() == id)?;
        let removed = self.agents.remove(index);
        info!("Removed agent '{}' ({})", removed.name(), id);
        Some(removed)
    }

    /// An editable copy of a committed agent. The stored record is untouched.
    pub fn load(&self, id: AgentId) -> Option<WorkingAgent> {
        self.get(id).map(|agent| WorkingAgent {
            name: agent.name().to_string(),
            process: Some(agent.process()),
            inputs: agent.inputs().clone(),
            results: agent.results().to_vec(),
        })
    }

    /// Millisecond timestamp, bumped past the last issued id when needed.
    fn next_id(&mut self, now: DateTime<Utc>) -> AgentId {
        let candidate = now.timestamp_millis();
        let id = match self.last_id {
            Some(AgentId(last)) if candidate <= last => AgentId(last + 1),
            _ => AgentId(candidate),
        };
        self.last_id = Some(id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::formulas::MoreLeadsInputs;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn calculated_sales_agent(name: &str) -> WorkingAgent {
        let mut working = WorkingAgent::new(BusinessProcess::Sales);
        working.name = name.to_string();
        working.calculate_all().unwrap();
        working
    }

    #[test]
    fn test_commit_keeps_only_saved_results_in_order() {
        let mut session = Session::new();
        let mut working = calculated_sales_agent("A1");
        working.mark_saved(KpiId::ChurnReduction, true).unwrap();
        working.mark_saved(KpiId::MoreLeads, true).unwrap();

        let expected: Vec<KpiResult> = working.results().iter().filter(|r| r.saved).cloned().collect();
        let before = session.len();

        let record = session.commit_at(&mut working, fixed_now()).unwrap();
        let kpis: Vec<KpiId> = record.results().iter().map(|r| r.kpi).collect();
        assert_eq!(kpis, vec![KpiId::MoreLeads, KpiId::ChurnReduction]);
        assert_eq!(record.results(), expected.as_slice());
        assert_eq!(session.len(), before + 1);
    }

    #[test]
    fn test_commit_resets_working_state_to_defaults() {
        let mut session = Session::new();
        let pristine = WorkingAgent::default();

        let mut working = calculated_sales_agent("A1");
        let mut overrides = toml::Table::new();
        overrides.insert("currentLeads".to_string(), toml::Value::Integer(99));
        working.apply_overrides(KpiId::MoreLeads, &overrides).unwrap();

        session.commit(&mut working).unwrap();

        assert_eq!(working.process(), Some(BusinessProcess::Sales));
        assert_eq!(working.inputs(), &catalog::default_inputs(BusinessProcess::Sales));
        assert!(working.name.is_empty());
        assert!(working.results().is_empty());
        assert_eq!(working, pristine);
    }

    #[test]
    fn test_commit_from_other_process_resets_to_catalog_default() {
        let mut session = Session::new();
        let mut working = WorkingAgent::new(BusinessProcess::Legal);
        working.name = "Counsel".to_string();
        working.calculate_all().unwrap();

        session.commit(&mut working).unwrap();
        assert_eq!(session.agents()[0].process(), BusinessProcess::Legal);
        assert_eq!(working.process(), Some(catalog::DEFAULT_PROCESS));
        assert_eq!(working, WorkingAgent::default());
    }

    #[test]
    fn test_commit_requires_name_and_process() {
        let mut session = Session::new();

        let mut unnamed = calculated_sales_agent("   ");
        let err = session.commit(&mut unnamed).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        let mut no_process = WorkingAgent::unset();
        no_process.name = "Orphan".to_string();
        let err = session.commit(&mut no_process).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        assert!(session.is_empty());
        assert_eq!(unnamed.name, "   ");
    }

    #[test]
    fn test_ids_unique_with_same_instant_and_name() {
        let mut session = Session::new();
        let now = fixed_now();

        let mut first = calculated_sales_agent("Twin");
        let id1 = session.commit_at(&mut first, now).unwrap().id();
        let mut second = calculated_sales_agent("Twin");
        let id2 = session.commit_at(&mut second, now).unwrap().id();

        assert_ne!(id1, id2);
        assert!(id2 > id1);
        assert_eq!(id1, AgentId(now.timestamp_millis()));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut session = Session::new();
        let mut working = calculated_sales_agent("A1");
        let id = session.commit(&mut working).unwrap().id();

        let snapshot = session.clone();
        assert!(session.remove(AgentId(-1)).is_none());
        assert_eq!(session, snapshot);

        assert!(session.remove(id).is_some());
        assert!(session.is_empty());
        assert!(session.remove(id).is_none());
    }

    #[test]
    fn test_load_returns_copy() {
        let mut session = Session::new();
        let mut working = calculated_sales_agent("A1");
        working.mark_saved(KpiId::MoreLeads, true).unwrap();
        let id = session.commit(&mut working).unwrap().id();

        let mut copy = session.load(id).unwrap();
        assert_eq!(copy.name, "A1");
        assert_eq!(copy.process(), Some(BusinessProcess::Sales));
        assert_eq!(copy.results().len(), 1);

        copy.mark_saved(KpiId::MoreLeads, false).unwrap();
        copy.name = "Edited".to_string();
        assert!(session.get(id).unwrap().results()[0].saved);
        assert_eq!(session.get(id).unwrap().name(), "A1");

        assert!(session.load(AgentId(0)).is_none());
    }

    #[test]
    fn test_set_inputs_drops_stale_result() {
        let mut working = calculated_sales_agent("A1");
        assert!(working.result(KpiId::MoreLeads).is_some());

        working
            .set_inputs(
                MoreLeadsInputs {
                    current_leads: 40_000.0,
                    ..Default::default()
                }
                .into(),
            )
            .unwrap();
        assert!(working.result(KpiId::MoreLeads).is_none());

        let recalculated = working.calculate(KpiId::MoreLeads).unwrap();
        assert!((recalculated.impact_amount - 900_000.0).abs() < 1e-6);
        assert_eq!(working.results()[0].kpi, KpiId::MoreLeads);
    }

    #[test]
    fn test_cross_process_inputs_rejected() {
        let mut working = WorkingAgent::new(BusinessProcess::Sales);
        let err = working.calculate(KpiId::CaseDeflection).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn test_select_process_resets() {
        let mut working = calculated_sales_agent("A1");
        working.select_process(BusinessProcess::Legal);
        assert!(working.results().is_empty());
        assert_eq!(working.inputs(), &catalog::default_inputs(BusinessProcess::Legal));
        assert_eq!(working.name, "A1");
    }

    #[test]
    fn test_mark_saved_requires_result() {
        let mut working = WorkingAgent::new(BusinessProcess::Sales);
        assert!(working.mark_saved(KpiId::MoreLeads, true).is_err());
    }
}
