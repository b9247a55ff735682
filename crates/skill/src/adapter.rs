use async_trait::async_trait;
use stockloop_core::{IntentRequest, SessionEvent, SessionTransition, SkillError, SpeechResponse};
use tracing::{debug, info, warn};

use crate::envelope::{PlatformRequest, RequestEnvelope, RequestType, ResponseEnvelope};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventContext {
    pub correlation_id: String,
    pub session_id: String,
}

impl Default for EventContext {
    fn default() -> Self {
        Self {
            correlation_id: "unknown-correlation-id".to_owned(),
            session_id: "unknown-session".to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandlerResult {
    Responded(SpeechResponse),
    Processed,
}

impl HandlerResult {
    pub fn response(&self) -> Option<&SpeechResponse> {
        match self {
            Self::Responded(response) => Some(response),
            Self::Processed => None,
        }
    }
}

/// Lifecycle capabilities a skill provides to the platform adapter.
#[async_trait]
pub trait SkillHandler: Send + Sync {
    async fn on_launch(&self, ctx: &EventContext) -> Result<SpeechResponse, SkillError>;

    async fn on_intent(
        &self,
        intent: &IntentRequest,
        ctx: &EventContext,
    ) -> Result<SpeechResponse, SkillError>;

    async fn on_session_end(
        &self,
        reason: Option<&str>,
        ctx: &EventContext,
    ) -> Result<(), SkillError>;
}

/// Platform-facing half of the skill: checks the addressed application,
/// routes each request type to the handler and encodes the reply.
pub struct PlatformAdapter<H> {
    handler: H,
    application_id: Option<String>,
}

impl<H> PlatformAdapter<H>
where
    H: SkillHandler,
{
    pub fn new(handler: H) -> Self {
        Self { handler, application_id: None }
    }

    pub fn with_application_id(mut self, application_id: Option<String>) -> Self {
        self.application_id = application_id;
        self
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub async fn dispatch(
        &self,
        request: &PlatformRequest,
        ctx: &EventContext,
    ) -> Result<HandlerResult, SkillError> {
        match request.request_type {
            RequestType::LaunchRequest => {
                self.handler.on_launch(ctx).await.map(HandlerResult::Responded)
            }
            RequestType::IntentRequest => {
                let intent = request.intent.as_ref().ok_or_else(|| {
                    SkillError::MalformedRequest("IntentRequest without an intent".to_owned())
                })?;
                self.handler.on_intent(intent, ctx).await.map(HandlerResult::Responded)
            }
            RequestType::SessionEndedRequest => {
                self.handler.on_session_end(request.reason.as_deref(), ctx).await?;
                Ok(HandlerResult::Processed)
            }
        }
    }

    pub async fn execute(
        &self,
        envelope: RequestEnvelope,
        ctx: &EventContext,
    ) -> Result<ResponseEnvelope, SkillError> {
        self.verify_application(&envelope)?;

        if envelope.session.new {
            info!(
                event_name = "skill.session.started",
                correlation_id = %ctx.correlation_id,
                session_id = %ctx.session_id,
                request_id = %envelope.request.request_id,
                "platform session started"
            );
        }

        let result = match self.dispatch(&envelope.request, ctx).await {
            Ok(result) => result,
            Err(error) => {
                warn!(
                    event_name = "skill.dispatch.rejected",
                    correlation_id = %ctx.correlation_id,
                    session_id = %ctx.session_id,
                    error = %error,
                    "platform request rejected"
                );
                return Err(error);
            }
        };

        let transition = SessionTransition::new(
            envelope.session.new,
            session_event(&envelope.request),
            result.response(),
        );
        debug!(
            event_name = "skill.session.transition",
            correlation_id = %ctx.correlation_id,
            session_id = %ctx.session_id,
            event = transition.event.label(),
            from = ?transition.from,
            to = ?transition.to,
            "session phase changed"
        );

        Ok(match result {
            HandlerResult::Responded(response) => {
                ResponseEnvelope::speech(&response, envelope.session.attributes)
            }
            HandlerResult::Processed => ResponseEnvelope::session_closed(),
        })
    }

    fn verify_application(&self, envelope: &RequestEnvelope) -> Result<(), SkillError> {
        let Some(expected) = &self.application_id else {
            return Ok(());
        };
        let received = &envelope.session.application.application_id;
        if received != expected {
            return Err(SkillError::InvalidApplication { received: received.clone() });
        }
        Ok(())
    }
}

fn session_event(request: &PlatformRequest) -> SessionEvent {
    match request.request_type {
        RequestType::LaunchRequest => SessionEvent::Launch,
        RequestType::IntentRequest => SessionEvent::Intent {
            name: request.intent.as_ref().map(|intent| intent.name.clone()).unwrap_or_default(),
        },
        RequestType::SessionEndedRequest => SessionEvent::SessionEnded,
    }
}
