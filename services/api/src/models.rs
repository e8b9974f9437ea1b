//! API Models
//!
//! Request and response bodies of the HTTP surface, annotated for OpenAPI
//! generation with `utoipa`.

use callbridge_core::{initiator::OutboundCallRequest, session::RecipientContext};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema, Debug, Default)]
pub struct InitiateCallPayload {
    #[schema(example = "agent-42")]
    pub agent_id: Option<String>,
    /// Origin number; the configured Twilio number is used when omitted.
    #[schema(example = "+15550000000")]
    pub from_number: Option<String>,
    #[schema(example = "+15551234567")]
    pub recipient_phone_number: Option<String>,
    /// Free-form JSON about the recipient, handed to the agent unchanged.
    #[schema(value_type = Option<Object>)]
    pub recipient_data: Option<Value>,
}

impl From<InitiateCallPayload> for OutboundCallRequest {
    fn from(payload: InitiateCallPayload) -> Self {
        Self {
            agent_id: payload.agent_id,
            from_number: payload.from_number,
            recipient_phone_number: payload.recipient_phone_number,
            recipient_data: payload.recipient_data.map(RecipientContext),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}
