use serde::Deserialize;

/// Query string of the chat endpoint.
/// `text` is the latest message typed by the user.
#[derive(Deserialize)]
pub struct ChatQuery {
    pub text: String,
}
