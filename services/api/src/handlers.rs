//! Axum Handlers for the REST API
//!
//! Call initiation for clients and the signaling callback for the telephony
//! provider. Upstream failures are collapsed into a uniform 500 so callers
//! learn nothing about internal topology; the detail goes to the log.

use axum::{
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use callbridge_core::{
    error::{CallError, SignalingError},
    signaling::{self, CallbackParameters},
};
use std::sync::Arc;
use tracing::{error, instrument, warn};

use crate::{
    models::{ErrorResponse, InitiateCallPayload},
    state::AppState,
};

pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    InternalServerError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { message })).into_response()
            }
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse { message })).into_response()
            }
            ApiError::InternalServerError(err) => {
                error!("Internal Server Error: {:?}", err);
                let message = "Internal Server Error".to_string();
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse { message }),
                )
                    .into_response()
            }
        }
    }
}

impl From<CallError> for ApiError {
    fn from(err: CallError) -> Self {
        if err.is_validation() {
            // Kept as 404 for compatibility with existing callers.
            Self::NotFound(err.to_string())
        } else {
            Self::InternalServerError(err.into())
        }
    }
}

impl From<SignalingError> for ApiError {
    fn from(err: SignalingError) -> Self {
        warn!(error = %err, "Rejected signaling callback");
        Self::BadRequest(err.to_string())
    }
}

/// Place an outbound call and bridge it to an agent once answered.
#[utoipa::path(
    post,
    path = "/call",
    request_body = InitiateCallPayload,
    responses(
        (status = 200, description = "Call accepted by the provider", body = String, content_type = "text/plain"),
        (status = 404, description = "Agent or recipient phone number not provided", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn initiate_call(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<InitiateCallPayload>,
) -> Result<impl IntoResponse, ApiError> {
    state.initiator.initiate(payload.into()).await?;
    Ok((StatusCode::OK, "done"))
}

/// Answer the provider's callback with a document that streams the call to the agent.
#[utoipa::path(
    post,
    path = "/signaling-callback",
    responses(
        (status = 200, description = "TwiML connect-stream document", body = String, content_type = "text/xml"),
        (status = 400, description = "A routing parameter is missing", body = ErrorResponse)
    ),
    params(
        ("ws_url" = String, Query, description = "WebSocket base URL of the media-streaming service"),
        ("agent_id" = String, Query, description = "Agent that handles the call"),
        ("context_id" = String, Query, description = "Call session identifier")
    )
)]
#[instrument(name = "signaling_callback", skip_all)]
pub async fn signaling_callback(
    Query(params): Query<CallbackParameters>,
) -> Result<impl IntoResponse, ApiError> {
    let document = signaling::handle_callback(&params)?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, signaling::CONTENT_TYPE)],
        document.to_xml(),
    ))
}
