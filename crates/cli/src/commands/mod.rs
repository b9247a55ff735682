pub mod ask;
pub mod config;
pub mod doctor;
pub mod resolve;

use serde::Serialize;
use stockloop_core::IntentRequest;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Command-specific JSON document on success.
    pub fn document(command: &str, document: &impl Serialize) -> Self {
        match serde_json::to_string_pretty(document) {
            Ok(output) => Self { exit_code: 0, output },
            Err(error) => Self::failure(command, "serialization", error.to_string(), 1),
        }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Builds an intent from `Name=value` arguments. `Name=` yields a slot
/// without a value.
pub fn intent_from_slots(intent: &str, slots: &[String]) -> Result<IntentRequest, String> {
    slots.iter().try_fold(IntentRequest::new(intent), |request, raw| {
        let Some((name, value)) = raw.split_once('=') else {
            return Err(format!("slot `{raw}` must be written as NAME=VALUE"));
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(format!("slot `{raw}` is missing a name"));
        }
        Ok(if value.is_empty() {
            request.with_empty_slot(name)
        } else {
            request.with_slot(name, value)
        })
    })
}
