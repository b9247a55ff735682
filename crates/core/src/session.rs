use serde::{Deserialize, Serialize};

use crate::domain::speech::SpeechResponse;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    AwaitingLaunch,
    AwaitingIntent,
    SessionClosed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    Launch,
    Intent { name: String },
    SessionEnded,
}

impl SessionEvent {
    pub fn label(&self) -> &str {
        match self {
            Self::Launch => "launch",
            Self::Intent { name } => name,
            Self::SessionEnded => "session_ended",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTransition {
    pub from: SessionPhase,
    pub to: SessionPhase,
    pub event: SessionEvent,
}

impl SessionPhase {
    /// Phase the platform is in when an event arrives.
    pub fn on_arrival(new_session: bool) -> Self {
        if new_session {
            Self::AwaitingLaunch
        } else {
            Self::AwaitingIntent
        }
    }

    /// A reprompt keeps the conversation alive; anything else, including a
    /// session end without a response, closes it.
    pub fn after(response: Option<&SpeechResponse>) -> Self {
        match response {
            Some(response) if !response.should_end_session() => Self::AwaitingIntent,
            _ => Self::SessionClosed,
        }
    }
}

impl SessionTransition {
    pub fn new(
        new_session: bool,
        event: SessionEvent,
        response: Option<&SpeechResponse>,
    ) -> Self {
        Self { from: SessionPhase::on_arrival(new_session), to: SessionPhase::after(response), event }
    }
}
