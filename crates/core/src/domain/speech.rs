use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeechType {
    #[default]
    PlainText,
}

/// Spoken reply for a single platform event. A reply without a reprompt
/// closes the session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechResponse {
    pub speech_text: String,
    pub reprompt_text: Option<String>,
    pub response_type: SpeechType,
}

impl SpeechResponse {
    pub fn ask(speech: impl Into<String>, reprompt: impl Into<String>) -> Self {
        Self {
            speech_text: speech.into(),
            reprompt_text: Some(reprompt.into()),
            response_type: SpeechType::PlainText,
        }
    }

    pub fn tell(speech: impl Into<String>) -> Self {
        Self { speech_text: speech.into(), reprompt_text: None, response_type: SpeechType::PlainText }
    }

    pub fn should_end_session(&self) -> bool {
        self.reprompt_text.is_none()
    }
}
