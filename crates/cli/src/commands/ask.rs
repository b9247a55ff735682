use std::sync::Arc;

use stockloop_core::config::{AppConfig, LoadOptions};
use stockloop_core::{QuoteService, SkillError};
use stockloop_quotes::{HttpQuoteService, StaticQuoteService};
use stockloop_skill::envelope::{PlatformRequest, PlatformSession, RequestEnvelope};
use stockloop_skill::{build_skill, EventContext};

use super::{intent_from_slots, CommandResult};

const COMMAND: &str = "ask";
const CLI_SESSION_ID: &str = "stockloop-cli-session";

#[derive(Clone, Debug)]
pub struct AskOptions {
    pub intent: String,
    pub slots: Vec<String>,
    pub launch: bool,
    pub offline: bool,
}

pub fn run(options: AskOptions) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(COMMAND, "config_validation", error.to_string(), 2)
        }
    };

    let request = if options.launch {
        PlatformRequest::launch("stockloop-cli-request")
    } else {
        match intent_from_slots(&options.intent, &options.slots) {
            Ok(intent) => PlatformRequest::intent("stockloop-cli-request", intent),
            Err(message) => return CommandResult::failure(COMMAND, "invalid_slot", message, 2),
        }
    };

    let quotes: Arc<dyn QuoteService> = if options.offline {
        Arc::new(StaticQuoteService::sample())
    } else {
        match HttpQuoteService::new(&config.quotes) {
            Ok(service) => Arc::new(service),
            Err(error) => {
                return CommandResult::failure(COMMAND, "quote_client", error.to_string(), 2)
            }
        }
    };

    let envelope = RequestEnvelope {
        version: "1.0".to_string(),
        session: synthetic_session(&config, options.launch),
        request,
    };
    let ctx = EventContext {
        correlation_id: "stockloop-cli".to_string(),
        session_id: CLI_SESSION_ID.to_string(),
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "runtime",
                format!("failed to initialize async runtime: {error}"),
                1,
            )
        }
    };

    let skill = build_skill(&config, quotes);
    match runtime.block_on(skill.execute(envelope, &ctx)) {
        Ok(response) => CommandResult::document(COMMAND, &response),
        Err(error) => CommandResult::failure(COMMAND, error_class(&error), error.to_string(), 4),
    }
}

fn synthetic_session(config: &AppConfig, new: bool) -> PlatformSession {
    let mut session = PlatformSession {
        new,
        session_id: CLI_SESSION_ID.to_string(),
        ..PlatformSession::default()
    };
    session.application.application_id = config.skill.application_id.clone().unwrap_or_default();
    session
}

fn error_class(error: &SkillError) -> &'static str {
    match error {
        SkillError::UnknownIntent { .. } => "unknown_intent",
        SkillError::InvalidApplication { .. } => "invalid_application",
        SkillError::MalformedRequest(_) => "malformed_request",
    }
}
