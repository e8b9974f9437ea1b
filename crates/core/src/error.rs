//! Error taxonomy for call initiation and provider callbacks.

use thiserror::Error;

/// Failures while looking up the public tunnel addresses.
#[derive(Debug, Error)]
pub enum TunnelError {
    /// The introspection service could not be reached or answered with an error.
    #[error("tunnel introspection unavailable: {0}")]
    Unavailable(String),
    /// No active tunnel carries the expected role name.
    #[error("no active tunnel named '{0}'")]
    NotFound(String),
}

/// Failures reported by the telephony provider when creating a call.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("telephony provider unreachable: {0}")]
    Unavailable(#[from] reqwest::Error),
    #[error("telephony provider rejected the call ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Everything that can stop an outbound call from being placed.
#[derive(Debug, Error)]
pub enum CallError {
    #[error("Agent not provided")]
    MissingAgent,
    #[error("Recipient phone number not provided")]
    MissingRecipient,
    #[error("failed to persist call session: {0:#}")]
    Persistence(#[source] anyhow::Error),
    #[error(transparent)]
    Tunnel(#[from] TunnelError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl CallError {
    /// True for errors caused by the request itself rather than an upstream.
    pub fn is_validation(&self) -> bool {
        matches!(self, CallError::MissingAgent | CallError::MissingRecipient)
    }
}

/// Failures while answering the provider's callback.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignalingError {
    #[error("missing callback parameter: {0}")]
    MissingCallbackParameter(&'static str),
}
