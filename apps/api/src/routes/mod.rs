pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::form::handlers as form;
use crate::form::sections::{
    CompanySection, EmployeeSection, FinancialSection, ManagementSection, PersonalSection,
    SectorSection,
};
use crate::gateway::handlers as gateway;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Form sessions
        .route("/api/v1/sessions", post(form::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(form::handle_get_session).delete(form::handle_delete_session),
        )
        .route("/api/v1/sessions/:id/fields", put(form::handle_set_field))
        .route(
            "/api/v1/sessions/:id/personal",
            put(form::handle_section::<PersonalSection>),
        )
        .route(
            "/api/v1/sessions/:id/company",
            put(form::handle_section::<CompanySection>),
        )
        .route(
            "/api/v1/sessions/:id/financial",
            put(form::handle_section::<FinancialSection>),
        )
        .route(
            "/api/v1/sessions/:id/financial/uploads",
            post(form::handle_upload)
                .layer(DefaultBodyLimit::max(form::UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/api/v1/sessions/:id/sector",
            put(form::handle_section::<SectorSection>),
        )
        .route(
            "/api/v1/sessions/:id/management",
            put(form::handle_section::<ManagementSection>),
        )
        .route(
            "/api/v1/sessions/:id/employees",
            put(form::handle_section::<EmployeeSection>),
        )
        // Submission & questions
        .route("/api/v1/sessions/:id/submit", post(gateway::handle_submit))
        .route("/api/v1/ask", post(gateway::handle_ask))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use mockall::predicate::eq;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::config::Config;
    use crate::form::sessions::SessionStore;
    use crate::gateway::store::memory::MemoryRecordStore;
    use crate::gateway::store::{MockRecordStore, RecordStore};
    use crate::gateway::Gateway;
    use crate::llm_client::{MockCompleter, DEFAULT_BASE_URL};

    fn test_config() -> Config {
        Config {
            mongodb_username: None,
            mongodb_password: None,
            mongodb_cluster_host: "cluster0.mongodb.net".to_string(),
            mongodb_database: "succession_ai".to_string(),
            mongodb_collection: "business_data".to_string(),
            openai_api_key: None,
            openai_base_url: DEFAULT_BASE_URL.to_string(),
            context_record_limit: 5,
            max_context_records: 50,
            session_ttl: std::time::Duration::from_secs(3600),
            port: 8080,
            rust_log: "info".to_string(),
        }
    }

    fn app(store: Option<Arc<dyn RecordStore>>, llm: MockCompleter) -> Router {
        build_router(AppState {
            sessions: SessionStore::new(test_config().session_ttl),
            gateway: Arc::new(Gateway::new(store, Arc::new(llm))),
            config: test_config(),
        })
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn open_session(app: &Router) -> String {
        let (status, body) = send(app, Method::POST, "/api/v1/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        body["session_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_reports_degraded_dependencies() {
        let mut llm = MockCompleter::new();
        llm.expect_is_configured().return_const(false);
        let app = app(None, llm);

        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["storage_connected"], false);
        assert_eq!(body["llm_configured"], false);
        assert_eq!(body["active_sessions"], 0);
    }

    #[tokio::test]
    async fn test_sections_fill_the_draft_and_submit_stores_it() {
        let store = Arc::new(MemoryRecordStore::default());
        let app = app(Some(store.clone()), MockCompleter::new());
        let id = open_session(&app).await;

        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("/api/v1/sessions/{id}/company"),
            Some(json!({ "company_name": "Lakeside Leisure Ltd", "country": "United Kingdom" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/api/v1/sessions/{id}/sector"),
            Some(json!({ "sector": "UK Leisure", "key_products": "Boat hire, Cafe" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["draft"]["key_products"], json!(["Boat hire", "Cafe"]));

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/api/v1/sessions/{id}/personal"),
            Some(json!({ "dob": "1970-01-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["draft"]["age"].as_i64().unwrap() >= 54);

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/submit"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["company_name"], "Lakeside Leisure Ltd");
        assert!(body["timestamp"].is_string());
        assert_eq!(store.len(), 1);

        // Draft survives the submit
        let (status, body) = send(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["draft"]["sector"], "UK Leisure");
    }

    #[tokio::test]
    async fn test_set_field_route_accepts_tagged_field() {
        let app = app(None, MockCompleter::new());
        let id = open_session(&app).await;

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/api/v1/sessions/{id}/fields"),
            Some(json!({ "field": "employee_count", "value": 40 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["draft"], json!({ "employee_count": 40 }));
    }

    #[tokio::test]
    async fn test_submit_without_storage_is_service_unavailable() {
        let mut llm = MockCompleter::new();
        llm.expect_complete().times(0);
        let app = app(None, llm);
        let id = open_session(&app).await;

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/submit"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "NOT_CONNECTED");

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/ask",
            Some(json!({ "question": "How many sellers?" })),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "NOT_CONNECTED");
    }

    #[tokio::test]
    async fn test_ask_returns_answer() {
        let mut llm = MockCompleter::new();
        llm.expect_is_configured().return_const(true);
        llm.expect_complete()
            .times(1)
            .returning(|_| Ok("No sellers have submitted yet.".to_string()));
        let app = app(Some(Arc::new(MemoryRecordStore::default())), llm);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/ask",
            Some(json!({ "question": "Who is selling?", "limit": 3 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], "No sellers have submitted yet.");
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let app = app(None, MockCompleter::new());
        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/api/v1/sessions/{}", Uuid::new_v4()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_delete_session_then_gone() {
        let app = app(None, MockCompleter::new());
        let id = open_session(&app).await;

        let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    fn multipart(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, filename, contents) in parts {
            body.extend_from_slice(b"--BOUNDARY\r\n");
            let disposition = match filename {
                Some(filename) => format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                ),
                None => format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"),
            };
            body.extend_from_slice(disposition.as_bytes());
            body.extend_from_slice(contents);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(b"--BOUNDARY--\r\n");
        body
    }

    async fn upload(app: &Router, id: &str, body: Vec<u8>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("/api/v1/sessions/{id}/financial/uploads"))
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=BOUNDARY")
            .body(Body::from(body))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_upload_captures_file_names_only() {
        let app = app(None, MockCompleter::new());
        let id = open_session(&app).await;

        let body = multipart(&[
            ("files", Some("accounts-2023.pdf"), &b"%PDF-1.4 fake"[..]),
            ("note", None, &b"not a file"[..]),
        ]);
        let (status, value) = upload(&app, &id, body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["draft"]["uploaded_files"], json!(["accounts-2023.pdf"]));
    }

    #[tokio::test]
    async fn test_upload_accepts_bodies_over_two_megabytes() {
        let app = app(None, MockCompleter::new());
        let id = open_session(&app).await;

        let contents = vec![b'x'; 3 * 1024 * 1024];
        let body = multipart(&[("files", Some("accounts.pdf"), contents.as_slice())]);
        let (status, value) = upload(&app, &id, body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["draft"]["uploaded_files"], json!(["accounts.pdf"]));
    }

    #[tokio::test]
    async fn test_reupload_replaces_file_names() {
        let app = app(None, MockCompleter::new());
        let id = open_session(&app).await;

        let first = multipart(&[("files", Some("accounts.pdf"), &b"v1"[..])]);
        upload(&app, &id, first).await;
        let again = multipart(&[("files", Some("accounts.pdf"), &b"v2"[..])]);
        let (status, value) = upload(&app, &id, again).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["draft"]["uploaded_files"], json!(["accounts.pdf"]));

        let other = multipart(&[("files", Some("forecast.xlsx"), &b"v1"[..])]);
        let (_, value) = upload(&app, &id, other).await;
        assert_eq!(value["draft"]["uploaded_files"], json!(["forecast.xlsx"]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_session_expires() {
        let app = app(None, MockCompleter::new());
        let id = open_session(&app).await;

        tokio::time::advance(test_config().session_ttl / 2).await;
        let (status, _) = send(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);

        tokio::time::advance(test_config().session_ttl + std::time::Duration::from_secs(1)).await;
        let (status, body) = send(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_ask_limit_is_capped() {
        let mut store = MockRecordStore::new();
        store
            .expect_latest()
            .with(eq(50))
            .times(1)
            .returning(|_| Ok(vec![]));
        let mut llm = MockCompleter::new();
        llm.expect_is_configured().return_const(true);
        llm.expect_complete()
            .times(1)
            .returning(|_| Ok("Nothing to report.".to_string()));
        let app = app(Some(Arc::new(store)), llm);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/ask",
            Some(json!({ "question": "Everything?", "limit": 1_000_000_000 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], "Nothing to report.");
    }
}
