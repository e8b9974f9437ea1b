//! Signaling Bridge
//!
//! Answers the provider's callback for an answered call leg with a TwiML document
//! that connects the leg's audio to the agent's media stream. Stateless and free of
//! side effects, so duplicate callbacks get byte-identical answers.

use crate::error::SignalingError;
use serde::Deserialize;
use tracing::info;

/// Content type the provider expects for signaling documents.
pub const CONTENT_TYPE: &str = "text/xml";

/// Routing values the call initiator embedded in the callback URL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParameters {
    #[serde(rename = "ws_url")]
    pub stream_base_url: Option<String>,
    pub agent_id: Option<String>,
    #[serde(rename = "context_id")]
    pub session_id: Option<String>,
}

/// A "connect and stream" instruction for one call leg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalingDocument {
    stream_url: String,
}

impl SignalingDocument {
    pub fn stream_url(&self) -> &str {
        &self.stream_url
    }

    /// Renders the document as TwiML.
    pub fn to_xml(&self) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><Response><Connect><Stream url="{}" /></Connect></Response>"#,
            escape_xml(&self.stream_url)
        )
    }
}

fn required<'a>(
    value: &'a Option<String>,
    name: &'static str,
) -> Result<&'a str, SignalingError> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or(SignalingError::MissingCallbackParameter(name))
}

/// Builds the signaling document for a provider callback.
pub fn handle_callback(params: &CallbackParameters) -> Result<SignalingDocument, SignalingError> {
    let stream_base_url = required(&params.stream_base_url, "ws_url")?;
    let agent_id = required(&params.agent_id, "agent_id")?;
    let session_id = required(&params.session_id, "context_id")?;

    let stream_url = format!(
        "{}/chat/v1/{}/{}",
        stream_base_url.trim_end_matches('/'),
        agent_id,
        session_id
    );
    info!(%stream_url, "Redirecting call leg to media stream");

    Ok(SignalingDocument { stream_url })
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
