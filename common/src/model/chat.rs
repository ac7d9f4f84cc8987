use serde::{Deserialize, Serialize};

/// A message received by the bot from the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveMsg {
    pub text: String,
}

/// The kind of content carried by a `SendMsg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendKind {
    Text,
    FacialExpression,
    Animation,
    Image,
}

/// A message sent from the bot to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMsg {
    #[serde(rename = "type")]
    pub kind: SendKind,
    pub value: String,
}

/// Interaction record of one chat session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Identifier of the session, bumped on every reset.
    pub id: u64,
    /// Every message received in this session, oldest first.
    pub receive: Vec<ReceiveMsg>,
    /// The bot's reply to the latest message.
    pub send: Vec<SendMsg>,
}

/// Status literal of a chat reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatStatus {
    Succeeded,
}

/// Top-level body of the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResults {
    pub message: ChatStatus,
    pub debug_msg: Option<String>,
    pub result: Vec<ChatSession>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn send_kind_uses_type_key_and_snake_case() {
        let msg = SendMsg {
            kind: SendKind::FacialExpression,
            value: "happy".into(),
        };
        assert_eq!(
            serde_json::to_value(msg).unwrap(),
            json!({ "type": "facial_expression", "value": "happy" })
        );
    }
}
