//! In-memory chat session log.
//!
//! One session exists at a time. Every accepted message is appended to the
//! session history and bumps the turn counter; `reset` starts a new session.

use common::model::chat::{ChatSession, ReceiveMsg, SendKind, SendMsg};
use std::sync::{Mutex, PoisonError};

const FACIAL_EXPRESSIONS: [&str; 4] = ["happy", "surprised", "thinking", "shy"];
const ANIMATIONS: [&str; 3] = ["look_around", "nod", "wave"];
const IMAGE_URL: &str = "https://wmyaoyao.bot.nu:8443/anya.jpeg";

#[derive(Debug)]
struct Session {
    id: u64,
    turn: u64,
    received: Vec<String>,
}

/// Shared chat log injected into the Actix application state.
#[derive(Debug)]
pub struct ChatLog {
    session: Mutex<Session>,
}

impl Default for ChatLog {
    fn default() -> Self {
        ChatLog {
            session: Mutex::new(Session {
                id: 1,
                turn: 0,
                received: Vec::new(),
            }),
        }
    }
}

impl ChatLog {
    /// Records `text` and builds the reply for this turn.
    pub fn record(&self, text: &str) -> ChatSession {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        session.turn += 1;
        session.received.push(text.to_string());

        ChatSession {
            id: session.id,
            receive: session
                .received
                .iter()
                .map(|text| ReceiveMsg { text: text.clone() })
                .collect(),
            send: reply(text, session.turn),
        }
    }

    /// Clears the history and starts a new session. Returns the new session id.
    pub fn reset(&self) -> u64 {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        session.id += 1;
        session.turn = 0;
        session.received.clear();
        session.id
    }
}

fn reply(text: &str, turn: u64) -> Vec<SendMsg> {
    // turn starts at 1
    let index = (turn - 1) as usize;
    vec![
        SendMsg {
            kind: SendKind::Text,
            value: format!("[{}] You said: {}", turn, text),
        },
        SendMsg {
            kind: SendKind::FacialExpression,
            value: FACIAL_EXPRESSIONS[index % FACIAL_EXPRESSIONS.len()].to_string(),
        },
        SendMsg {
            kind: SendKind::Animation,
            value: ANIMATIONS[index % ANIMATIONS.len()].to_string(),
        },
        SendMsg {
            kind: SendKind::Image,
            value: IMAGE_URL.to_string(),
        },
    ]
}
