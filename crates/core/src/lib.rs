//! Call-session orchestration for outbound voice-agent calls.
//!
//! A call request becomes a persisted session, a provider call whose callback URL
//! carries the routing values, and finally a signaling document that connects the
//! answered leg to the agent's media stream.

pub mod error;
pub mod initiator;
pub mod session;
pub mod signaling;
pub mod telephony;
pub mod tunnel;

pub use error::{CallError, ProviderError, SignalingError, TunnelError};
pub use initiator::{CallInitiator, OutboundCallRequest, PlacedCall};
pub use session::{CallSession, RecipientContext, SessionRegistry, SessionStore};
pub use signaling::{CallbackParameters, SignalingDocument};
pub use tunnel::{TunnelEndpoints, TunnelResolver};
