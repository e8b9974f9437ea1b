//! Outbound Call Initiation
//!
//! Validates a call request, mints a session, resolves the current tunnel endpoints
//! and asks the telephony provider to place the call. The provider later invokes the
//! signaling callback encoded here; the session is always written first so that
//! callback can never arrive ahead of its record.

use crate::{
    error::CallError,
    session::{RecipientContext, SessionRegistry},
    telephony::{OutboundCall, TelephonyProvider},
    tunnel::TunnelResolver,
};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Path of the signaling callback on the callback tunnel.
pub const CALLBACK_PATH: &str = "/signaling-callback";

// Characters that would split or truncate a query value. `:` and `/` stay literal.
const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'>');

/// A request to call a recipient and connect them to an agent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutboundCallRequest {
    pub agent_id: Option<String>,
    pub from_number: Option<String>,
    pub recipient_phone_number: Option<String>,
    pub recipient_data: Option<RecipientContext>,
}

/// The outcome of a successfully placed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedCall {
    pub session_id: Uuid,
    pub call_sid: Option<String>,
}

/// Builds the URL the provider calls back once the recipient answers.
pub fn callback_url(
    callback_base_url: &str,
    stream_base_url: &str,
    agent_id: &str,
    session_id: &str,
) -> String {
    format!(
        "{}{}?ws_url={}&agent_id={}&context_id={}",
        callback_base_url.trim_end_matches('/'),
        CALLBACK_PATH,
        utf8_percent_encode(stream_base_url, QUERY_VALUE),
        utf8_percent_encode(agent_id, QUERY_VALUE),
        utf8_percent_encode(session_id, QUERY_VALUE),
    )
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Places outbound calls. Built once at startup with its collaborators injected.
pub struct CallInitiator {
    sessions: SessionRegistry,
    tunnels: Arc<dyn TunnelResolver>,
    telephony: Arc<dyn TelephonyProvider>,
    default_from_number: String,
}

impl CallInitiator {
    pub fn new(
        sessions: SessionRegistry,
        tunnels: Arc<dyn TunnelResolver>,
        telephony: Arc<dyn TelephonyProvider>,
        default_from_number: String,
    ) -> Self {
        Self {
            sessions,
            tunnels,
            telephony,
            default_from_number,
        }
    }

    #[instrument(name = "initiate_call", skip_all, fields(agent_id, context_id))]
    pub async fn initiate(&self, request: OutboundCallRequest) -> Result<PlacedCall, CallError> {
        let agent_id = present(request.agent_id).ok_or(CallError::MissingAgent)?;
        let to = present(request.recipient_phone_number).ok_or(CallError::MissingRecipient)?;
        let from = present(request.from_number).unwrap_or_else(|| self.default_from_number.clone());

        let span = tracing::Span::current();
        span.record("agent_id", agent_id.as_str());

        let session_id = self.sessions.create(request.recipient_data).await?;
        span.record("context_id", tracing::field::display(session_id));

        let placed = self.place(&agent_id, session_id, to, from).await;
        if let Err(e) = &placed {
            // No rollback: the record stays behind for retention cleanup.
            warn!(%session_id, error = %e, "Call was not placed; session record is orphaned");
        }
        placed
    }

    async fn place(
        &self,
        agent_id: &str,
        session_id: Uuid,
        to: String,
        from: String,
    ) -> Result<PlacedCall, CallError> {
        let endpoints = self.tunnels.resolve().await?;

        let url = callback_url(
            &endpoints.callback_base_url,
            &endpoints.stream_base_url,
            agent_id,
            &session_id.to_string(),
        );
        let call = OutboundCall::new(to, from, url);

        let provider_call = self.telephony.create_call(&call).await?;
        info!(
            call_sid = ?provider_call.sid,
            to = %call.to,
            from = %call.from,
            "Outbound call placed"
        );

        Ok(PlacedCall {
            session_id,
            call_sid: provider_call.sid,
        })
    }
}
