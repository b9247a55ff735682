//! JSON shapes exchanged with the voice platform.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use stockloop_core::{IntentRequest, SpeechResponse, SpeechType};

pub const RESPONSE_VERSION: &str = "1.0";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub session: PlatformSession,
    pub request: PlatformRequest,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSession {
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub application: Application,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub user: Option<PlatformUser>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(default)]
    pub application_id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformUser {
    #[serde(default)]
    pub user_id: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestType {
    LaunchRequest,
    IntentRequest,
    SessionEndedRequest,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformRequest {
    #[serde(rename = "type")]
    pub request_type: RequestType,
    #[serde(default)]
    pub request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<IntentRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl PlatformRequest {
    pub fn launch(request_id: impl Into<String>) -> Self {
        Self::new(RequestType::LaunchRequest, request_id)
    }

    pub fn intent(request_id: impl Into<String>, intent: IntentRequest) -> Self {
        Self { intent: Some(intent), ..Self::new(RequestType::IntentRequest, request_id) }
    }

    pub fn session_ended(request_id: impl Into<String>, reason: Option<String>) -> Self {
        Self { reason, ..Self::new(RequestType::SessionEndedRequest, request_id) }
    }

    fn new(request_type: RequestType, request_id: impl Into<String>) -> Self {
        Self {
            request_type,
            request_id: request_id.into(),
            timestamp: None,
            locale: None,
            intent: None,
            reason: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub version: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub session_attributes: Map<String, Value>,
    pub response: ResponseBody,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    pub should_end_session: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub speech_type: SpeechType,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

impl ResponseEnvelope {
    pub fn speech(response: &SpeechResponse, session_attributes: Map<String, Value>) -> Self {
        let output_speech =
            OutputSpeech { speech_type: response.response_type, text: response.speech_text.clone() };
        let reprompt = response.reprompt_text.as_ref().map(|text| Reprompt {
            output_speech: OutputSpeech { speech_type: response.response_type, text: text.clone() },
        });

        Self {
            version: RESPONSE_VERSION.to_owned(),
            session_attributes,
            response: ResponseBody {
                output_speech: Some(output_speech),
                reprompt,
                should_end_session: response.should_end_session(),
            },
        }
    }

    pub fn session_closed() -> Self {
        Self {
            version: RESPONSE_VERSION.to_owned(),
            session_attributes: Map::new(),
            response: ResponseBody {
                output_speech: None,
                reprompt: None,
                should_end_session: true,
            },
        }
    }
}
