//! Report job endpoints.
//!
//! Thin glue over `ReportController`; every reply is `200 OK` because
//! `AlreadyRunning` and `NothingToCancel` are ordinary outcomes, not errors.
//!
//! - `POST /start_report/`: `{ "status": "Started" | "AlreadyRunning" }`
//! - `GET /report_status/`: `{ "status": <state>, "progress"?: 0-100, "detail"?: text }`
//! - `POST /cancel_report/`: `{ "status": "CancelRequested" | "NothingToCancel" }`

mod cancel;
mod start;
mod status;

use actix_web::web::{get, post, ServiceConfig};

/// Registers the report routes at the application root.
pub fn configure_routes(cfg: &mut ServiceConfig) {
    cfg.route("/start_report/", post().to(start::process))
        .route("/report_status/", get().to(status::process))
        .route("/cancel_report/", post().to(cancel::process));
}
