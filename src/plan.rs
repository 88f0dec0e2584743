//! Plan files.
//!
//! A plan describes the agents to model in TOML and is replayed against a
//! [`Session`] through the same working-agent operations an interactive
//! front end would use: pick a process, override assumptions, calculate,
//! mark results saved and commit. Agents already in the session (loaded
//! from a session document) can be edited or removed by id.

use crate::engine::{catalog, KpiId};
use crate::models::{AgentId, BusinessProcess, CustomerInfo};
use crate::session::{Session, WorkingAgent};
use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Plan {
    #[serde(default)]
    pub customer: Option<CustomerInfo>,

    /// Committed agents to drop.
    #[serde(default)]
    pub remove: Vec<AgentId>,

    /// Committed agents to reopen, change and commit again.
    #[serde(default)]
    pub edit: Vec<PlanEdit>,

    #[serde(default)]
    pub agents: Vec<PlanAgent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanAgent {
    pub name: String,

    pub process: BusinessProcess,

    /// KPIs whose results are kept. Every KPI of the process when absent.
    #[serde(default)]
    pub save: Option<Vec<String>>,

    /// Per-KPI assumption overrides, keyed by KPI identifier or name.
    #[serde(default)]
    pub inputs: BTreeMap<String, toml::Table>,
}

/// Changes to one committed agent. The edited agent is committed under a
/// new id and the old record is removed.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanEdit {
    pub id: AgentId,

    #[serde(default)]
    pub name: Option<String>,

    /// KPIs to keep after the edit. The previously saved KPIs when absent.
    #[serde(default)]
    pub save: Option<Vec<String>>,

    #[serde(default)]
    pub inputs: BTreeMap<String, toml::Table>,
}

impl Plan {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan file: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse plan file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let plan: Plan = toml::from_str(content)?;
        Ok(plan)
    }

    /// Replay the plan into `session`: edits first, then removals, then one
    /// new agent per entry.
    ///
    /// Returns the number of agents committed, edited ones included.
    pub fn apply(&self, session: &mut Session) -> Result<usize> {
        let referenced = self.edit.iter().map(|e| e.id).chain(self.remove.iter().copied());
        for id in referenced {
            if session.get(id).is_none() {
                bail!("No committed agent with id {}", id);
            }
        }

        if let Some(ref customer) = self.customer {
            session.set_customer(Some(customer.clone()));
        }

        for edit in &self.edit {
            edit.apply(session)
                .with_context(|| format!("Agent {} could not be edited", edit.id))?;
        }

        for &id in &self.remove {
            session.remove(id);
        }

        let mut working = WorkingAgent::new(catalog::DEFAULT_PROCESS);
        for agent in &self.agents {
            agent
                .apply(&mut working, session)
                .with_context(|| format!("Agent '{}' could not be built", agent.name))?;
        }

        let committed = self.edit.len() + self.agents.len();
        info!(
            "Plan applied: {} agent(s) committed, {} removed",
            committed,
            self.remove.len()
        );
        Ok(committed)
    }
}

impl PlanEdit {
    fn apply(&self, session: &mut Session) -> Result<AgentId> {
        let mut working = session
            .load(self.id)
            .ok_or_else(|| anyhow!("No committed agent with id {}", self.id))?;
        let process = working
            .process()
            .ok_or_else(|| anyhow!("Agent {} has no business process", self.id))?;
        debug!(
            "Editing '{}' ({}) with {} input record(s)",
            working.name,
            process,
            working.inputs().len()
        );

        if let Some(ref name) = self.name {
            working.name = name.clone();
        }

        let previously_saved: Vec<KpiId> = working.results().iter().map(|r| r.kpi).collect();

        for (key, overrides) in &self.inputs {
            let kpi = parse_kpi(key)?;
            working.apply_overrides(kpi, overrides)?;
        }

        let saved: Vec<KpiId> = match self.save {
            Some(ref keys) => keys.iter().map(|k| parse_kpi(k)).collect::<Result<_>>()?,
            None => previously_saved.clone(),
        };
        for kpi in previously_saved {
            if working.result(kpi).is_some() {
                working.mark_saved(kpi, false)?;
            }
        }
        for kpi in saved {
            if kpi.process() != process {
                bail!("{} is not a {} KPI", kpi, process);
            }
            if working.result(kpi).is_none() {
                working.calculate(kpi)?;
            }
            working.mark_saved(kpi, true)?;
        }

        let id = session.commit(&mut working)?.id();
        session.remove(self.id);
        info!("Agent {} replaced by {}", self.id, id);
        Ok(id)
    }
}

impl PlanAgent {
    fn apply(&self, working: &mut WorkingAgent, session: &mut Session) -> Result<()> {
        working.select_process(self.process);
        working.name = self.name.clone();

        for (key, overrides) in &self.inputs {
            let kpi = parse_kpi(key)?;
            working.apply_overrides(kpi, overrides)?;
            debug!("{}: {} override(s) for {}", self.name, overrides.len(), kpi);
        }

        working.calculate_all()?;

        let saved: Vec<KpiId> = match self.save {
            Some(ref keys) => keys.iter().map(|k| parse_kpi(k)).collect::<Result<_>>()?,
            None => catalog::list_kpis(self.process).to_vec(),
        };
        for kpi in saved {
            if kpi.process() != self.process {
                bail!("{} is not a {} KPI", kpi, self.process);
            }
            working.mark_saved(kpi, true)?;
        }

        session.commit(working)?;
        Ok(())
    }
}

fn parse_kpi(key: &str) -> Result<KpiId> {
    KpiId::from_str(key).map_err(anyhow::Error::msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImpactType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[customer]
name = "Acme Corp"
industry = "Manufacturing"

[[agents]]
name = "Pipeline Agent"
process = "Sales"
save = ["MoreLeads"]

[agents.inputs.MoreLeads]
currentLeads = 30000

[[agents]]
name = "Ops Agent"
process = "Supply Chain"
"#;

    #[test]
    fn test_parse_plan() {
        let plan = Plan::parse(SAMPLE).unwrap();
        assert_eq!(plan.customer.as_ref().unwrap().name, "Acme Corp");
        assert_eq!(plan.agents.len(), 2);
        assert_eq!(plan.agents[1].process, BusinessProcess::SupplyChain);
        assert!(plan.agents[1].save.is_none());
        assert!(plan.agents[0].inputs.contains_key("MoreLeads"));
    }

    #[test]
    fn test_apply_plan() {
        let plan = Plan::parse(SAMPLE).unwrap();
        let mut session = Session::new();
        assert_eq!(plan.apply(&mut session).unwrap(), 2);

        let agents = session.agents();
        assert_eq!(agents[0].name(), "Pipeline Agent");
        assert_eq!(agents[0].results().len(), 1);
        // 30000 * 0.03 * 0.10 * 0.30 * 25000
        assert!((agents[0].total_for(ImpactType::Revenue) - 675_000.0).abs() < 1e-6);

        assert_eq!(
            agents[1].results().len(),
            catalog::list_kpis(BusinessProcess::SupplyChain).len()
        );
        assert_eq!(session.customer().unwrap().industry.as_deref(), Some("Manufacturing"));
    }

    #[test]
    fn test_unknown_kpi_is_rejected() {
        let plan = Plan::parse(
            r#"
[[agents]]
name = "Bad"
process = "Sales"
save = ["NoSuchKpi"]
"#,
        )
        .unwrap();
        let mut session = Session::new();
        assert!(plan.apply(&mut session).is_err());
        assert!(session.is_empty());
    }

    #[test]
    fn test_foreign_kpi_override_is_rejected() {
        let plan = Plan::parse(
            r#"
[[agents]]
name = "Mixed"
process = "Sales"

[agents.inputs.CaseDeflection]
monthlyCases = 100
"#,
        )
        .unwrap();
        assert!(plan.apply(&mut Session::new()).is_err());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let plan = Plan::parse(
            r#"
[[agents]]
name = "Typo"
process = "Sales"

[agents.inputs.MoreLeads]
curentLeads = 1
"#,
        )
        .unwrap();
        let err = plan.apply(&mut Session::new()).unwrap_err();
        assert!(format!("{:#}", err).contains("Typo"));
    }

    fn seeded_session() -> (Session, AgentId, AgentId) {
        let mut session = Session::new();
        Plan::parse(SAMPLE).unwrap().apply(&mut session).unwrap();
        let ids: Vec<AgentId> = session.agents().iter().map(|a| a.id()).collect();
        (session, ids[0], ids[1])
    }

    #[test]
    fn test_remove_by_id() {
        let (mut session, pipeline, ops) = seeded_session();
        let plan = Plan::parse(&format!("remove = [{}]", pipeline.0)).unwrap();

        assert_eq!(plan.apply(&mut session).unwrap(), 0);
        assert_eq!(session.len(), 1);
        assert!(session.get(pipeline).is_none());
        assert_eq!(session.agents()[0].id(), ops);
    }

    #[test]
    fn test_unknown_id_fails_before_any_change() {
        let (mut session, pipeline, _) = seeded_session();
        let before = session.clone();
        let plan = Plan::parse(&format!(
            r#"
remove = [{}, 42]

[[agents]]
name = "Never"
process = "Legal"
"#,
            pipeline.0
        ))
        .unwrap();

        let err = plan.apply(&mut session).unwrap_err();
        assert!(err.to_string().contains("42"));
        assert_eq!(session, before);
    }

    #[test]
    fn test_edit_overrides_and_recalculates() {
        let (mut session, pipeline, ops) = seeded_session();
        let plan = Plan::parse(&format!(
            r#"
[[edit]]
id = {}
name = "Pipeline Agent v2"

[edit.inputs.MoreLeads]
currentLeads = 40000
"#,
            pipeline.0
        ))
        .unwrap();

        assert_eq!(plan.apply(&mut session).unwrap(), 1);
        assert_eq!(session.len(), 2);
        assert!(session.get(pipeline).is_none());

        let edited = &session.agents()[1];
        assert_ne!(edited.id(), pipeline);
        assert_eq!(edited.name(), "Pipeline Agent v2");
        assert_eq!(edited.results().len(), 1);
        assert!(edited.results()[0].saved);
        // 40000 * 0.03 * 0.10 * 0.30 * 25000
        assert!((edited.total_for(ImpactType::Revenue) - 900_000.0).abs() < 1e-6);
        assert_eq!(session.agents()[0].id(), ops);
    }

    #[test]
    fn test_edit_with_save_list_replaces_saved_kpis() {
        let (mut session, pipeline, _) = seeded_session();
        let plan = Plan::parse(&format!(
            r#"
[[edit]]
id = {}
save = ["DealSizeIncrease", "MoreLeads"]
"#,
            pipeline.0
        ))
        .unwrap();
        plan.apply(&mut session).unwrap();

        let edited = &session.agents()[1];
        assert_eq!(edited.name(), "Pipeline Agent");
        let kpis: Vec<KpiId> = edited.results().iter().map(|r| r.kpi).collect();
        assert_eq!(kpis, vec![KpiId::MoreLeads, KpiId::DealSizeIncrease]);
        assert!(edited.results().iter().all(|r| r.saved));
        // the loaded override survives the edit
        assert!((edited.results()[0].impact_amount - 675_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_edit_save_list_can_drop_a_kpi() {
        let (mut session, _, ops) = seeded_session();
        let plan = Plan::parse(&format!(
            r#"
[[edit]]
id = {}
save = ["InventoryOptimization"]
"#,
            ops.0
        ))
        .unwrap();
        plan.apply(&mut session).unwrap();

        let edited = &session.agents()[1];
        assert_eq!(edited.process(), BusinessProcess::SupplyChain);
        assert_eq!(edited.results().len(), 1);
        assert_eq!(edited.results()[0].kpi, KpiId::InventoryOptimization);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let plan = Plan::load(file.path()).unwrap();
        assert_eq!(plan.agents.len(), 2);

        assert!(Plan::load(Path::new("/nonexistent/plan.toml")).is_err());
    }
}
