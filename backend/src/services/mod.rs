//! HTTP surface of the service.
//!
//! - `chat`: the chat echo endpoints and their session log.
//! - `report`: start, status and cancel for the report job.
//!
//! `configure` wires everything onto an Actix `App`. The application state it
//! expects (`web::Data<ReportController>` and `web::Data<ChatLog>`) is
//! registered by the caller, so tests can inject their own instances.

pub mod chat;
pub mod report;

use actix_web::error::QueryPayloadError;
use actix_web::http::StatusCode;
use actix_web::web::{self, get, ServiceConfig};
use actix_web::{HttpRequest, HttpResponse, Responder, ResponseError};
use thiserror::Error;

/// Errors rejected at the HTTP boundary, rendered as `{ "error": <message> }`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("text is {len} characters long, the limit is {max}")]
    TextTooLong { len: usize, max: usize },
    #[error("invalid query string: {0}")]
    BadQuery(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::TextTooLong { .. } | ApiError::BadQuery(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadQuery(err.to_string()).into()
}

async fn read_root() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "message": "Hello World" }))
}

/// Registers every route of the service.
pub fn configure(cfg: &mut ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(query_error))
        .route("/", get().to(read_root))
        .configure(chat::configure_routes)
        .configure(report::configure_routes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job_controller::report::ReportSettings;
    use crate::job_controller::ReportController;
    use crate::services::chat::session::ChatLog;
    use actix_web::{test, App};
    use common::jobs::ReportState;
    use serde_json::{json, Value};
    use std::time::Duration;
    use tempfile::TempDir;

    fn controller(dir: &TempDir, duration: Duration) -> ReportController {
        ReportController::new(ReportSettings {
            output_path: dir.path().join("output.csv"),
            duration,
            steps: 10,
        })
    }

    macro_rules! service {
        ($controller:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($controller.clone()))
                    .app_data(web::Data::new(ChatLog::default()))
                    .configure(configure),
            )
            .await
        };
    }

    async fn wait_terminal(controller: &ReportController) {
        let mut rx = controller.subscribe();
        tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|s| s.is_terminal()))
            .await
            .expect("report run did not finish in time")
            .expect("controller dropped");
    }

    #[actix_web::test]
    async fn root_says_hello() {
        let dir = TempDir::new().unwrap();
        let app = service!(controller(&dir, Duration::ZERO));

        let req = test::TestRequest::get().uri("/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "message": "Hello World" }));
    }

    #[actix_web::test]
    async fn status_and_cancel_before_any_start() {
        let dir = TempDir::new().unwrap();
        let app = service!(controller(&dir, Duration::ZERO));

        let req = test::TestRequest::get().uri("/report_status/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "status": "Idle" }));

        let req = test::TestRequest::post().uri("/cancel_report/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "status": "NothingToCancel" }));
    }

    #[actix_web::test]
    async fn start_twice_then_cancel() {
        let dir = TempDir::new().unwrap();
        let controller = controller(&dir, Duration::from_secs(30));
        let app = service!(controller);

        for expected in ["Started", "AlreadyRunning"] {
            let req = test::TestRequest::post().uri("/start_report/").to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body, json!({ "status": expected }));
        }

        let req = test::TestRequest::get().uri("/report_status/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "Running");
        assert!(body["progress"].is_u64());

        let req = test::TestRequest::post().uri("/cancel_report/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "status": "CancelRequested" }));

        wait_terminal(&controller).await;
        let req = test::TestRequest::get().uri("/report_status/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "status": "Canceled" }));
        assert!(!dir.path().join("output.csv").exists());
    }

    #[actix_web::test]
    async fn completed_report_is_reported_with_detail() {
        let dir = TempDir::new().unwrap();
        let controller = controller(&dir, Duration::from_millis(20));
        let app = service!(controller);

        let req = test::TestRequest::post().uri("/start_report/").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        wait_terminal(&controller).await;
        assert!(matches!(controller.status(), ReportState::Completed(_)));

        let req = test::TestRequest::get().uri("/report_status/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body,
            json!({ "status": "Completed", "detail": "Report generated successfully" })
        );
    }

    #[actix_web::test]
    async fn chat_echoes_and_accumulates() {
        let dir = TempDir::new().unwrap();
        let app = service!(controller(&dir, Duration::ZERO));

        let req = test::TestRequest::get().uri("/chat?text=hello").to_request();
        let _: Value = test::call_and_read_body_json(&app, req).await;
        let req = test::TestRequest::get().uri("/chat?text=bye").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["message"], "succeeded");
        assert_eq!(body["debug_msg"], Value::Null);
        let session = &body["result"][0];
        assert_eq!(session["id"], 1);
        assert_eq!(session["receive"], json!([{ "text": "hello" }, { "text": "bye" }]));
        assert_eq!(session["send"][0], json!({ "type": "text", "value": "[2] You said: bye" }));
        assert_eq!(session["send"][3]["type"], "image");
    }

    #[actix_web::test]
    async fn chat_rejects_long_and_missing_text() {
        let dir = TempDir::new().unwrap();
        let app = service!(controller(&dir, Duration::ZERO));

        let long = "a".repeat(51);
        let req = test::TestRequest::get()
            .uri(&format!("/chat?text={}", long))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("51"));

        let req = test::TestRequest::get().uri("/chat").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn chat_limit_counts_characters_not_bytes() {
        let dir = TempDir::new().unwrap();
        let app = service!(controller(&dir, Duration::ZERO));
        // "這" is three bytes in UTF-8.
        let encoded = "%E9%80%99";

        let req = test::TestRequest::get()
            .uri(&format!("/chat?text={}", encoded.repeat(50)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["result"][0]["receive"][0]["text"], "這".repeat(50));

        let req = test::TestRequest::get()
            .uri(&format!("/chat?text={}", encoded.repeat(51)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("51 characters long"));
    }

    #[actix_web::test]
    async fn reset_starts_a_new_session() {
        let dir = TempDir::new().unwrap();
        let app = service!(controller(&dir, Duration::ZERO));

        let req = test::TestRequest::get().uri("/chat?text=hi").to_request();
        let _: Value = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::get().uri("/reset").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "message": "reset ok", "id": 2 }));

        let req = test::TestRequest::get().uri("/chat?text=again").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["result"][0]["id"], 2);
        assert_eq!(body["result"][0]["receive"], json!([{ "text": "again" }]));
    }
}
