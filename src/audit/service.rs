//! Audit backend client
//!
//! This module handles the single request/response exchange with the audit
//! backend, including:
//! - The `AuditService` trait the runner depends on
//! - Building HTTP clients with a proper user agent string
//! - POSTing `{ "url": ... }` to the audit endpoint
//! - Classifying non-success statuses, malformed payloads and transport errors

use crate::audit::types::{AuditFailure, AuditResult};
use crate::config::{ServiceConfig, UserAgentConfig};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Something that can audit one URL at a time
///
/// The runner never issues overlapping calls; implementations may assume
/// each call is the only one in flight.
#[async_trait]
pub trait AuditService: Send + Sync {
    /// Audits a single URL, returning the backend's result or why it failed
    async fn audit_url(&self, url: &str) -> Result<AuditResult, AuditFailure>;
}

#[derive(Debug, Serialize)]
struct AuditRequest<'a> {
    url: &'a str,
}

/// Only the error text of a non-success body is of interest
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `service` - Endpoint and timeout configuration
/// * `user_agent` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(
    service: &ServiceConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    // Format: Name/Version
    let user_agent = format!("{}/{}", user_agent.name, user_agent.version);

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(service.request_timeout))
        .connect_timeout(Duration::from_secs(service.connect_timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Audit service backed by an HTTP endpoint
#[derive(Debug, Clone)]
pub struct HttpAuditService {
    client: Client,
    endpoint: String,
}

impl HttpAuditService {
    /// Creates a service posting to `endpoint` with the given client
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Creates a service from configuration
    pub fn from_config(
        service: &ServiceConfig,
        user_agent: &UserAgentConfig,
    ) -> crate::Result<Self> {
        let client = build_http_client(service, user_agent)?;
        Ok(Self::new(client, service.endpoint.clone()))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AuditService for HttpAuditService {
    async fn audit_url(&self, url: &str) -> Result<AuditResult, AuditFailure> {
        tracing::debug!("POST {} for {}", self.endpoint, url);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&AuditRequest { url })
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(classify_transport_error)?;

        if !status.is_success() {
            return Err(rejected(status, &body));
        }

        parse_result(&body)
    }
}

/// Maps a non-success response to a failure, preferring the backend's own message
fn rejected(status: StatusCode, body: &str) -> AuditFailure {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

    AuditFailure::Rejected {
        status: status.as_u16(),
        message,
    }
}

/// Parses a success body, rejecting payloads with impossible metric values
fn parse_result(body: &str) -> Result<AuditResult, AuditFailure> {
    let result: AuditResult =
        serde_json::from_str(body).map_err(|e| AuditFailure::MalformedResponse {
            message: e.to_string(),
        })?;

    if let Some(metric) = result.gtm_metrics.iter().find(|m| !m.is_well_formed()) {
        return Err(AuditFailure::MalformedResponse {
            message: format!("negative timing for container {}", metric.container_id),
        });
    }

    Ok(result)
}

fn classify_transport_error(e: reqwest::Error) -> AuditFailure {
    let message = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else {
        e.to_string()
    };

    AuditFailure::Transport { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> (ServiceConfig, UserAgentConfig) {
        (ServiceConfig::default(), UserAgentConfig::default())
    }

    #[test]
    fn test_build_http_client() {
        let (service, user_agent) = create_test_config();
        let client = build_http_client(&service, &user_agent);
        assert!(client.is_ok());
    }

    #[test]
    fn test_from_config_uses_endpoint() {
        let (service, user_agent) = create_test_config();
        let audit = HttpAuditService::from_config(&service, &user_agent).unwrap();
        assert_eq!(audit.endpoint(), service.endpoint);
    }

    #[test]
    fn test_client_errors_become_audit_errors() {
        let error = Client::new().get("not a url").build().unwrap_err();
        let error = crate::AuditError::from(error);

        assert!(matches!(error, crate::AuditError::HttpClient(_)));
        assert!(error.to_string().starts_with("HTTP client error"));
    }

    #[test]
    fn test_rejected_prefers_backend_message() {
        let failure = rejected(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"url":"https://a.com","status":"error","error":"Chrome crashed","gtmMetrics":[]}"#,
        );
        assert_eq!(
            failure,
            AuditFailure::Rejected {
                status: 500,
                message: "Chrome crashed".to_string()
            }
        );
    }

    #[test]
    fn test_rejected_falls_back_to_status() {
        let failure = rejected(StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>");
        assert_eq!(failure.to_string(), "HTTP 502");

        let failure = rejected(StatusCode::BAD_REQUEST, r#"{"error": ""}"#);
        assert_eq!(failure.to_string(), "HTTP 400");
    }

    #[test]
    fn test_parse_result_rejects_garbage() {
        let failure = parse_result("not json").unwrap_err();
        assert!(matches!(failure, AuditFailure::MalformedResponse { .. }));
    }

    #[test]
    fn test_parse_result_rejects_negative_metrics() {
        let body = r#"{"url":"https://a.com","status":"success","gtmMetrics":[
            {"containerId":"GTM-NEG","totalCpuTime":-5,"scriptEvaluation":1,"scriptParseTime":1}
        ]}"#;
        let failure = parse_result(body).unwrap_err();
        assert!(failure.to_string().contains("GTM-NEG"));
    }
}
