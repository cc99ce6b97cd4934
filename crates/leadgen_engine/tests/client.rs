use leadgen_core::{ExportFormat, ExportRequest, LeadQuery, LeadStatus, LeadUpdate};
use leadgen_engine::{ApiClient, ApiErrorKind, ApiSettings, NETWORK_ERROR_MESSAGE};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&ApiSettings::default().with_base_url(format!("{}/api", server.uri())))
        .expect("client")
}

fn lead_json(id: &str, company: &str) -> serde_json::Value {
    json!({
        "id": id,
        "company_name": company,
        "contact_name": null,
        "email": "hello@example.com",
        "status": "new",
        "priority": "high",
        "source": "google_search",
        "score": 82.5,
        "ai_analysis": null,
        "tags": ["spa"],
        "estimated_value": 1200.0
    })
}

#[tokio::test]
async fn list_leads_sends_only_present_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/leads"))
        .and(query_param("industry", "Retail"))
        .and(query_param("per_page", "100"))
        .and(query_param_is_missing("status"))
        .and(query_param_is_missing("search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "leads": [lead_json("a", "Acme")],
                "total": 1,
                "page": 1,
                "per_page": 100,
                "total_pages": 1
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = LeadQuery {
        status: Some(String::new()),
        industry: Some("Retail".into()),
        per_page: Some(100),
        ..LeadQuery::default()
    };
    let page = client_for(&server).list_leads(&query).await.expect("leads");

    assert_eq!(page.total, 1);
    assert_eq!(page.leads[0].company_name, "Acme");
    assert_eq!(page.leads[0].status, LeadStatus::New);
    assert_eq!(page.leads[0].display_score(), 83);
}

#[tokio::test]
async fn http_error_carries_status_and_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/leads/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"success": false, "error": "Lead not found"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).get_lead("missing").await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::HttpStatus(404));
    assert_eq!(err.status_code(), 404);
    assert_eq!(err.to_string(), "Lead not found");
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let client = ApiClient::new(
        &ApiSettings::default().with_base_url(format!("http://127.0.0.1:{port}/api")),
    )
    .expect("client");

    let err = client.health().await.unwrap_err();
    assert!(matches!(err.kind, ApiErrorKind::Network | ApiErrorKind::Timeout));
    assert_eq!(err.status_code(), 500);
    assert_eq!(err.message, NETWORK_ERROR_MESSAGE);
}

#[tokio::test]
async fn bulk_delete_reports_partial_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/leads/bulk-delete"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"lead_ids": ["A", "B"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"deleted_count": 1, "not_found": ["B"]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .bulk_delete(&["A".to_string(), "B".to_string()])
        .await
        .expect("bulk delete");
    assert_eq!(result.deleted_count, 1);
    assert_eq!(result.not_found, vec!["B".to_string()]);
}

#[tokio::test]
async fn update_lead_sends_only_changed_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/leads/a"))
        .and(body_json(json!({"status": "qualified"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": lead_json("a", "Acme")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let update = LeadUpdate {
        status: Some(LeadStatus::Qualified),
        ..LeadUpdate::default()
    };
    let lead = client_for(&server)
        .update_lead("a", &update)
        .await
        .expect("update");
    assert_eq!(lead.id, "a");
}

#[tokio::test]
async fn rejected_envelope_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/scraper/start"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": false, "error": "Keywords are required"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .start_scrape(&Default::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Rejected(200));
    assert_eq!(err.message, "Keywords are required");
}

#[tokio::test]
async fn export_resolves_download_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/export/csv"))
        .and(body_json(json!({"status": "qualified"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "filename": "leads export.csv",
                "filepath": "/srv/exports/leads export.csv",
                "total_exported": 4,
                "download_url": "/api/export/download/leads export.csv"
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = ExportRequest {
        status: Some("qualified".into()),
        ..ExportRequest::default()
    };
    let result = client
        .export(ExportFormat::Csv, &request)
        .await
        .expect("export");

    assert_eq!(result.total_exported, 4);
    assert_eq!(
        result.download_url,
        format!("{}/api/export/download/leads%20export.csv", server.uri())
    );
}

#[tokio::test]
async fn job_status_dispatches_by_kind() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/apollo/status/job-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "id": "job-9",
                "status": "running",
                "total_leads": 10,
                "processed_leads": 4,
                "errors": [],
                "started_at": "2024-05-01T10:00:00",
                "completed_at": null,
                "parameters": {"search_type": "people"}
            }
        })))
        .mount(&server)
        .await;

    let job = client_for(&server)
        .job_status(leadgen_core::JobKind::Apollo, "job-9")
        .await
        .expect("status");
    assert_eq!(job.processed_leads, 4);
    assert_eq!(job.progress_percent(), 40);
}
