use crate::services::chat::session::ChatLog;
use actix_web::{web, HttpResponse, Responder};
use log::info;

pub(crate) async fn process(log: web::Data<ChatLog>) -> impl Responder {
    let id = log.reset();
    info!("chat session reset, now {}", id);
    HttpResponse::Ok().json(serde_json::json!({ "message": "reset ok", "id": id }))
}
