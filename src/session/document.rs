//! Versioned JSON session document.

use super::Session;
use crate::engine::builder;
use crate::error::{EngineError, Result};
use crate::models::{AgentConfig, CustomerInfo};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Document format version written and accepted.
pub const DOCUMENT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDocument {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_info: Option<CustomerInfo>,
    pub agents: Vec<AgentConfig>,
}

impl SessionDocument {
    /// Check a parsed document before it becomes a session.
    pub fn validate(&self) -> Result<()> {
        if self.version != DOCUMENT_VERSION {
            return Err(EngineError::Format(format!(
                "unsupported session version '{}' (expected {})",
                self.version, DOCUMENT_VERSION
            )));
        }

        let mut ids = HashSet::new();
        for agent in &self.agents {
            if !ids.insert(agent.id()) {
                return Err(EngineError::Format(format!("duplicate agent id {}", agent.id())));
            }
            if agent.name().trim().is_empty() {
                return Err(EngineError::Format(format!("agent {} has no name", agent.id())));
            }

            let process = agent.process();
            if let Some(kpi) = agent.inputs().kpis().find(|k| k.process() != process) {
                return Err(EngineError::Format(format!(
                    "agent '{}' ({}) has inputs for {} from {}",
                    agent.name(),
                    process,
                    kpi,
                    kpi.process()
                )));
            }

            let mut seen = HashSet::new();
            for result in agent.results() {
                if !seen.insert(result.kpi) {
                    return Err(EngineError::Format(format!(
                        "agent '{}' has more than one result for {}",
                        agent.name(),
                        result.kpi
                    )));
                }
                if result.kpi.process() != process {
                    return Err(EngineError::Format(format!(
                        "agent '{}' ({}) has a result for {} from {}",
                        agent.name(),
                        process,
                        result.kpi,
                        result.kpi.process()
                    )));
                }
                if result.impact_type != result.kpi.impact_type() {
                    return Err(EngineError::Format(format!(
                        "agent '{}': {} is a {} KPI, not {}",
                        agent.name(),
                        result.kpi,
                        result.kpi.impact_type(),
                        result.impact_type
                    )));
                }
                if !result.saved {
                    return Err(EngineError::Format(format!(
                        "agent '{}' contains unsaved result {}",
                        agent.name(),
                        result.kpi
                    )));
                }

                if agent.inputs().get(result.kpi).is_none() {
                    return Err(EngineError::Format(format!(
                        "agent '{}' has a result for {} but no inputs for it",
                        agent.name(),
                        result.kpi
                    )));
                }
                let expected = builder::evaluate(result.kpi, agent.inputs()).map_err(|e| {
                    EngineError::Format(format!("agent '{}': {}", agent.name(), e))
                })?;
                if expected.impact_amount.to_bits() != result.impact_amount.to_bits() {
                    return Err(EngineError::Format(format!(
                        "agent '{}': stored {} impact {} does not match its inputs ({})",
                        agent.name(),
                        result.kpi,
                        result.impact_amount,
                        expected.impact_amount
                    )));
                }
            }
        }

        Ok(())
    }
}

impl Session {
    /// Snapshot the session as a document stamped with `timestamp`.
    pub fn to_document(&self, timestamp: DateTime<Utc>) -> SessionDocument {
        SessionDocument {
            version: DOCUMENT_VERSION.to_string(),
            timestamp,
            customer_info: self.customer().cloned(),
            agents: self.agents().to_vec(),
        }
    }

    /// Build a session from a document, rejecting anything malformed.
    pub fn from_document(document: SessionDocument) -> Result<Session> {
        document.validate()?;
        Ok(Session::from_parts(document.agents, document.customer_info))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_document(Utc::now()))?)
    }

    pub fn from_json(json: &str) -> Result<Session> {
        let document: SessionDocument = serde_json::from_str(json)?;
        Session::from_document(document)
    }

    /// Write the session document to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        fs::write(path, json)
            .map_err(|e| EngineError::Io(format!("cannot write {}: {}", path.display(), e)))?;
        info!("Session saved to {} ({} agents)", path.display(), self.len());
        Ok(())
    }

    /// Read a session document from `path`.
    pub fn load_file(path: &Path) -> Result<Session> {
        let json = fs::read_to_string(path)
            .map_err(|e| EngineError::Io(format!("cannot read {}: {}", path.display(), e)))?;
        let session = Session::from_json(&json)?;
        debug!("Loaded {} agents from {}", session.len(), path.display());
        Ok(session)
    }
}
