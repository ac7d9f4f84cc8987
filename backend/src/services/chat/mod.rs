//! Chat echo endpoints.
//!
//! - `GET /chat?text=...`: Records the message in the current session and
//!   replies with a text, a facial expression, an animation and an image link.
//!   Messages longer than 50 characters are rejected with `400 Bad Request`.
//! - `GET /reset`: Clears the session history and starts a new session id.

mod query;
mod reset;
pub mod session;

use actix_web::web::{get, ServiceConfig};

/// Registers the chat routes at the application root.
pub fn configure_routes(cfg: &mut ServiceConfig) {
    cfg.route("/chat", get().to(query::process))
        .route("/reset", get().to(reset::process));
}
