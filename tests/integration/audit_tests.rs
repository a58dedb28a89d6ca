//! Integration tests for the audit runner
//!
//! These tests use wiremock to stand in for the audit backend and run
//! full batches through the HTTP audit service end-to-end.

use gtm_audit::audit::{AuditFailure, AuditRunner, AuditService, HttpAuditService};
use gtm_audit::config::{RunnerConfig, ServiceConfig, UserAgentConfig};
use gtm_audit::output::{format_csv, CsvQuoting};
use gtm_audit::AuditError;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates an HTTP audit service pointed at the mock server
fn create_service(server: &MockServer, request_timeout: u64) -> HttpAuditService {
    let service = ServiceConfig {
        endpoint: format!("{}/api/audit", server.uri()),
        request_timeout,
        connect_timeout: 5,
    };
    HttpAuditService::from_config(&service, &UserAgentConfig::default())
        .expect("Failed to build audit service")
}

fn success_body(url: &str, containers: serde_json::Value) -> serde_json::Value {
    json!({ "url": url, "status": "success", "gtmMetrics": containers })
}

async fn mount_audit(server: &MockServer, url: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/audit"))
        .and(body_json(json!({ "url": url })))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_end_to_end_batch_with_failure() {
    let server = MockServer::start().await;

    mount_audit(
        &server,
        "https://ok.com",
        ResponseTemplate::new(200).set_body_json(success_body(
            "https://ok.com",
            json!([
                {"containerId": "GTM-AAA", "totalCpuTime": 400, "scriptEvaluation": 100, "scriptParseTime": 50},
                {"containerId": "GTM-BBB", "totalCpuTime": 600, "scriptEvaluation": 250, "scriptParseTime": 100}
            ]),
        )),
    )
    .await;

    mount_audit(
        &server,
        "https://fails.com",
        ResponseTemplate::new(500).set_body_json(json!({
            "url": "https://fails.com",
            "status": "error",
            "error": "Failed to launch browser",
            "gtmMetrics": []
        })),
    )
    .await;

    let service = create_service(&server, 10);
    let runner = AuditRunner::new(Arc::new(service), &RunnerConfig::default());

    let outcome = runner
        .start_batch("https://ok.com\nnot-a-url\nhttps://fails.com")
        .await
        .expect("Batch should complete");

    assert_eq!(outcome.warning.map(|w| w.rejected), Some(1));
    assert_eq!(outcome.results.len(), 2);

    assert_eq!(outcome.results[0].url, "https://ok.com");
    assert!(outcome.results[0].is_success());
    assert_eq!(outcome.results[0].gtm_metrics.len(), 2);

    assert_eq!(outcome.results[1].url, "https://fails.com");
    assert!(!outcome.results[1].is_success());
    assert_eq!(
        outcome.results[1].error.as_deref(),
        Some("Failed to launch browser")
    );

    assert_eq!(outcome.summary.total_urls, 2);
    assert_eq!(outcome.summary.successful_audits, 1);
    assert_eq!(outcome.summary.total_containers, 2);
    assert_eq!(outcome.summary.average_cpu_time, 500.0);
    assert_eq!(outcome.summary.average_script_eval, 175.0);
    assert_eq!(outcome.summary.average_parse_time, 75.0);

    let csv = format_csv(&outcome.results, CsvQuoting::Lenient);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1], "\"https://ok.com\",GTM-AAA,400,100,50,success,\"\"");
    assert_eq!(lines[2], ",GTM-BBB,600,250,100,,\"\"");
    assert_eq!(
        lines[3],
        "\"https://fails.com\",-,-,-,-,error,\"Failed to launch browser\""
    );

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_non_json_error_uses_status() {
    let server = MockServer::start().await;
    mount_audit(
        &server,
        "https://a.com",
        ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"),
    )
    .await;

    let service = create_service(&server, 10);
    let failure = service.audit_url("https://a.com").await.unwrap_err();

    assert_eq!(
        failure,
        AuditFailure::Rejected {
            status: 502,
            message: "HTTP 502".to_string()
        }
    );
}

#[tokio::test]
async fn test_malformed_success_body() {
    let server = MockServer::start().await;
    mount_audit(
        &server,
        "https://a.com",
        ResponseTemplate::new(200).set_body_string("{\"url\": \"https://a.com\""),
    )
    .await;

    let service = create_service(&server, 10);
    let failure = service.audit_url("https://a.com").await.unwrap_err();

    assert!(matches!(failure, AuditFailure::MalformedResponse { .. }));
    assert!(failure.is_transport());
}

#[tokio::test]
async fn test_request_timeout_is_transport_failure() {
    let server = MockServer::start().await;
    mount_audit(
        &server,
        "https://slow.com",
        ResponseTemplate::new(200)
            .set_body_json(success_body("https://slow.com", json!([])))
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    let service = create_service(&server, 1);
    let runner = AuditRunner::new(Arc::new(service), &RunnerConfig::default());

    let outcome = runner.start_batch("https://slow.com").await.unwrap();

    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].error.as_deref(), Some("Request timeout"));
    assert_eq!(outcome.summary.successful_audits, 0);
}

#[tokio::test]
async fn test_unreachable_backend_fails_every_url() {
    // Nothing listens on the discard port
    let service = HttpAuditService::from_config(
        &ServiceConfig {
            endpoint: "http://127.0.0.1:9/api/audit".to_string(),
            request_timeout: 5,
            connect_timeout: 1,
        },
        &UserAgentConfig::default(),
    )
    .unwrap();
    let runner = AuditRunner::new(Arc::new(service), &RunnerConfig::default());

    let outcome = runner
        .start_batch("https://a.com\nhttps://b.com")
        .await
        .unwrap();

    assert_eq!(outcome.results.len(), 2);
    assert!(outcome.results.iter().all(|r| !r.is_success()));
    assert!(outcome.results.iter().all(|r| r.error.is_some()));
    assert_eq!(outcome.summary.total_urls, 2);
    assert_eq!(outcome.summary.successful_audits, 0);
}

#[tokio::test]
async fn test_no_valid_urls_sends_nothing() {
    let server = MockServer::start().await;
    let service = create_service(&server, 10);
    let runner = AuditRunner::new(Arc::new(service), &RunnerConfig::default());

    let result = runner.start_batch("example.com\n\n   \nwww.test.org").await;

    assert!(matches!(result, Err(AuditError::NoValidUrls)));
    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_user_agent_header_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/audit"))
        .and(wiremock::matchers::header("user-agent", "GtmBot/9.9"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(success_body("https://a.com", json!([]))),
        )
        .mount(&server)
        .await;

    let service = HttpAuditService::from_config(
        &ServiceConfig {
            endpoint: format!("{}/api/audit", server.uri()),
            request_timeout: 10,
            connect_timeout: 5,
        },
        &UserAgentConfig {
            name: "GtmBot".to_string(),
            version: "9.9".to_string(),
        },
    )
    .unwrap();

    let result = service.audit_url("https://a.com").await.unwrap();
    assert!(result.is_success());
}
