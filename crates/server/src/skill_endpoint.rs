use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Serialize;
use stockloop_core::InterfaceError;
use stockloop_skill::{EventContext, RequestEnvelope, ResponseEnvelope};
use tracing::{info, warn};
use uuid::Uuid;

use crate::bootstrap::SkillAdapter;

#[derive(Clone)]
pub struct SkillState {
    skill: Arc<SkillAdapter>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkillErrorBody {
    pub error: &'static str,
    pub detail: String,
    pub correlation_id: String,
}

pub fn router(skill: Arc<SkillAdapter>) -> Router {
    Router::new().route("/skill", post(handle_skill_request)).with_state(SkillState { skill })
}

pub async fn handle_skill_request(
    State(state): State<SkillState>,
    Json(envelope): Json<RequestEnvelope>,
) -> Result<Json<ResponseEnvelope>, (StatusCode, Json<SkillErrorBody>)> {
    let ctx = EventContext {
        correlation_id: Uuid::new_v4().to_string(),
        session_id: if envelope.session.session_id.is_empty() {
            "unknown-session".to_string()
        } else {
            envelope.session.session_id.clone()
        },
    };
    info!(
        event_name = "server.skill.request_received",
        correlation_id = %ctx.correlation_id,
        session_id = %ctx.session_id,
        request_type = ?envelope.request.request_type,
        "skill request received"
    );

    match state.skill.execute(envelope, &ctx).await {
        Ok(response) => Ok(Json(response)),
        Err(skill_error) => Err(error_response(skill_error.into_interface(ctx.correlation_id))),
    }
}

fn error_response(interface: InterfaceError) -> (StatusCode, Json<SkillErrorBody>) {
    let status = match &interface {
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        InterfaceError::Forbidden { .. } => StatusCode::FORBIDDEN,
    };

    warn!(
        event_name = "server.skill.request_rejected",
        correlation_id = %interface.correlation_id(),
        status = status.as_u16(),
        error = %interface,
        "skill request rejected"
    );

    (
        status,
        Json(SkillErrorBody {
            error: interface.user_message(),
            detail: interface.to_string(),
            correlation_id: interface.correlation_id().to_string(),
        }),
    )
}
