use crate::services::chat::session::ChatLog;
use crate::services::ApiError;
use actix_web::{web, HttpResponse};
use common::model::chat::{ChatResults, ChatStatus};
use common::requests::ChatQuery;
use log::debug;

/// Longest accepted chat message, in characters.
pub(crate) const MAX_TEXT_CHARS: usize = 50;

pub(crate) async fn process(
    log: web::Data<ChatLog>,
    query: web::Query<ChatQuery>,
) -> Result<HttpResponse, ApiError> {
    let text = query.into_inner().text;
    let len = text.chars().count();
    if len > MAX_TEXT_CHARS {
        return Err(ApiError::TextTooLong {
            len,
            max: MAX_TEXT_CHARS,
        });
    }

    let session = log.record(&text);
    debug!("chat session {} received {} messages", session.id, session.receive.len());
    Ok(HttpResponse::Ok().json(ChatResults {
        message: ChatStatus::Succeeded,
        debug_msg: None,
        result: vec![session],
    }))
}
