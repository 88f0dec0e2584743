//! Report export.
//!
//! The export request bundles the session's agents, the customer and the
//! assembled report. It is rendered locally (Markdown or JSON) or posted to
//! a rendering service that answers with a finished document. Either way the
//! result is an [`ExportResponse`] the caller writes out unchanged.

use super::assembler::{assemble, ReportPayload};
use super::generator::{generate_json_report, generate_markdown_report, RenderOptions};
use crate::error::{EngineError, Result};
use crate::models::{AgentConfig, CustomerInfo};
use crate::session::Session;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub customer_info: Option<CustomerInfo>,
    pub agents: Vec<AgentConfig>,
    pub report: ReportPayload,
}

impl ExportRequest {
    pub fn from_session(session: &Session) -> Self {
        Self {
            customer_info: session.customer().cloned(),
            agents: session.agents().to_vec(),
            report: assemble(session.agents(), session.customer()),
        }
    }
}

/// A rendered document and the filename suggested for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub filename: String,
    pub document: String,
}

/// Where a report is rendered.
#[derive(Debug, Clone)]
pub enum ExportTarget {
    Markdown(RenderOptions),
    Json,
    Remote { url: String, timeout: Duration },
}

/// Render `request` with `target`. All or nothing; never retried.
pub async fn export(request: &ExportRequest, target: &ExportTarget) -> Result<ExportResponse> {
    let stem = filename_stem(request.customer_info.as_ref());

    match target {
        ExportTarget::Markdown(options) => Ok(ExportResponse {
            filename: format!("{}.md", stem),
            document: generate_markdown_report(&request.report, options),
        }),
        ExportTarget::Json => {
            let document = generate_json_report(&request.report)
                .map_err(|e| EngineError::ExportFailure(format!("Failed to encode report: {}", e)))?;
            Ok(ExportResponse {
                filename: format!("{}.json", stem),
                document,
            })
        }
        ExportTarget::Remote { url, timeout } => export_remote(request, url, *timeout).await,
    }
}

async fn export_remote(
    request: &ExportRequest,
    url: &str,
    timeout: Duration,
) -> Result<ExportResponse> {
    info!("Sending report with {} agent(s) to {}", request.agents.len(), url);

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| EngineError::ExportFailure(format!("Failed to create HTTP client: {}", e)))?;

    let response = client
        .post(url)
        .json(request)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                EngineError::ExportFailure(format!(
                    "Rendering service timed out after {}s",
                    timeout.as_secs()
                ))
            } else if e.is_connect() {
                EngineError::ExportFailure(format!("Cannot connect to rendering service at {}", url))
            } else {
                EngineError::ExportFailure(format!("Failed to send report: {}", e))
            }
        })?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(EngineError::ExportFailure(format!(
            "Rendering service error {}: {}",
            status, body
        )));
    }

    let rendered: ExportResponse = response.json().await.map_err(|e| {
        EngineError::ExportFailure(format!("Failed to parse rendering service response: {}", e))
    })?;

    if rendered.filename.trim().is_empty() {
        return Err(EngineError::ExportFailure(
            "Rendering service returned no filename".to_string(),
        ));
    }

    debug!(
        "Received {} ({} bytes)",
        rendered.filename,
        rendered.document.len()
    );
    Ok(rendered)
}

/// `acme-corp-impact-report`, or `impact-report` without a customer.
fn filename_stem(customer: Option<&CustomerInfo>) -> String {
    let slug = customer
        .map(|c| {
            c.name
                .split(|ch: char| !ch.is_ascii_alphanumeric())
                .filter(|part| !part.is_empty())
                .map(|part| part.to_ascii_lowercase())
                .collect::<Vec<_>>()
                .join("-")
        })
        .unwrap_or_default();

    if slug.is_empty() {
        "impact-report".to_string()
    } else {
        format!("{}-impact-report", slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BusinessProcess, KpiId};
    use crate::session::WorkingAgent;

    fn sample_session() -> Session {
        let mut session = Session::new();
        session.set_customer(Some(CustomerInfo {
            name: "Acme Corp".to_string(),
            ..Default::default()
        }));
        let mut working = WorkingAgent::new(BusinessProcess::Sales);
        working.name = "Pipeline Agent".to_string();
        working.calculate_all().unwrap();
        working.mark_saved(KpiId::MoreLeads, true).unwrap();
        session.commit(&mut working).unwrap();
        session
    }

    #[test]
    fn test_request_shape() {
        let request = ExportRequest::from_session(&sample_session());
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["customerInfo"]["name"], "Acme Corp");
        assert_eq!(json["agents"][0]["name"], "Pipeline Agent");
        assert_eq!(json["report"]["sections"][0]["agentName"], "Pipeline Agent");
        assert!(json["report"]["totals"]["revenue"].is_number());
    }

    #[tokio::test]
    async fn test_markdown_export() {
        let request = ExportRequest::from_session(&sample_session());
        let response = export(&request, &ExportTarget::Markdown(RenderOptions::default()))
            .await
            .unwrap();

        assert_eq!(response.filename, "acme-corp-impact-report.md");
        assert!(response.document.contains("## Pipeline Agent"));
    }

    #[tokio::test]
    async fn test_json_export_round_trips() {
        let request = ExportRequest::from_session(&sample_session());
        let response = export(&request, &ExportTarget::Json).await.unwrap();

        assert_eq!(response.filename, "acme-corp-impact-report.json");
        let parsed: ReportPayload = serde_json::from_str(&response.document).unwrap();
        assert_eq!(parsed, request.report);
    }

    #[tokio::test]
    async fn test_remote_export_failure_is_reported() {
        let request = ExportRequest::from_session(&Session::new());
        let target = ExportTarget::Remote {
            url: "http://127.0.0.1:9/render".to_string(),
            timeout: Duration::from_secs(2),
        };

        let err = export(&request, &target).await.unwrap_err();
        assert!(matches!(err, EngineError::ExportFailure(_)));
    }

    #[test]
    fn test_filename_stem() {
        assert_eq!(filename_stem(None), "impact-report");
        let customer = CustomerInfo {
            name: "  O'Brien & Sons, Ltd. ".to_string(),
            ..Default::default()
        };
        assert_eq!(filename_stem(Some(&customer)), "o-brien-sons-ltd-impact-report");
        let blank = CustomerInfo::default();
        assert_eq!(filename_stem(Some(&blank)), "impact-report");
    }
}
