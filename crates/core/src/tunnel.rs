//! Tunnel Endpoint Discovery
//!
//! Neither this service nor the media-streaming service is directly reachable from
//! the internet. Both sit behind tunnels whose public addresses can change whenever
//! the tunneling layer restarts, so every call initiation resolves them fresh.

use crate::error::TunnelError;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// The public base URLs in effect for a single call initiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TunnelEndpoints {
    /// HTTP(S) base at which our own callback endpoint is reachable.
    pub callback_base_url: String,
    /// WebSocket base at which the media-streaming service is reachable.
    pub stream_base_url: String,
}

/// Resolves the current public endpoints of the two tunneled services.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TunnelResolver: Send + Sync {
    async fn resolve(&self) -> Result<TunnelEndpoints, TunnelError>;
}

/// Rewrites an HTTP(S) URL into its WebSocket equivalent.
///
/// Only the scheme changes; anything that is not an `http:`/`https:` URL is
/// returned untouched.
pub fn to_websocket_url(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("https:") {
        format!("wss:{rest}")
    } else if let Some(rest) = url.strip_prefix("http:") {
        format!("ws:{rest}")
    } else {
        url.to_string()
    }
}

fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

#[derive(Debug, Deserialize)]
struct TunnelList {
    tunnels: Vec<Tunnel>,
}

#[derive(Debug, Deserialize)]
struct Tunnel {
    name: String,
    public_url: String,
}

/// Resolves endpoints from a live ngrok agent's local inspection API.
pub struct NgrokTunnelResolver {
    client: reqwest::Client,
    api_url: String,
    callback_tunnel: String,
    stream_tunnel: String,
}

impl NgrokTunnelResolver {
    pub const DEFAULT_API_URL: &'static str = "http://ngrok:4040";
    pub const DEFAULT_CALLBACK_TUNNEL: &'static str = "twilio-app";
    pub const DEFAULT_STREAM_TUNNEL: &'static str = "bolna-app";

    /// # Arguments
    ///
    /// * `api_url` - Base address of the inspection API (e.g. `http://ngrok:4040`).
    /// * `callback_tunnel` - Name of the tunnel forwarding to this service.
    /// * `stream_tunnel` - Name of the tunnel forwarding to the media-streaming service.
    pub fn new(
        client: reqwest::Client,
        api_url: impl Into<String>,
        callback_tunnel: impl Into<String>,
        stream_tunnel: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_url: trim_base(&api_url.into()),
            callback_tunnel: callback_tunnel.into(),
            stream_tunnel: stream_tunnel.into(),
        }
    }

    async fn list_tunnels(&self) -> Result<Vec<Tunnel>, TunnelError> {
        let url = format!("{}/api/tunnels", self.api_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TunnelError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TunnelError::Unavailable(format!(
                "{url} returned status {status}"
            )));
        }

        let list: TunnelList = response
            .json()
            .await
            .map_err(|e| TunnelError::Unavailable(format!("malformed tunnel list: {e}")))?;
        Ok(list.tunnels)
    }
}

#[async_trait]
impl TunnelResolver for NgrokTunnelResolver {
    async fn resolve(&self) -> Result<TunnelEndpoints, TunnelError> {
        let tunnels = self.list_tunnels().await?;

        let find = |name: &str| {
            tunnels
                .iter()
                .find(|t| t.name == name)
                .map(|t| trim_base(&t.public_url))
                .ok_or_else(|| TunnelError::NotFound(name.to_string()))
        };

        let callback_base_url = find(&self.callback_tunnel)?;
        let stream_base_url = to_websocket_url(&find(&self.stream_tunnel)?);

        debug!(%callback_base_url, %stream_base_url, "Resolved tunnel endpoints");
        Ok(TunnelEndpoints {
            callback_base_url,
            stream_base_url,
        })
    }
}

/// A fixed mapping, for tests and for deployments with stable public addresses.
pub struct StaticTunnelResolver {
    endpoints: TunnelEndpoints,
}

impl StaticTunnelResolver {
    pub fn new(callback_base_url: &str, stream_base_url: &str) -> Self {
        Self {
            endpoints: TunnelEndpoints {
                callback_base_url: trim_base(callback_base_url),
                stream_base_url: trim_base(stream_base_url),
            },
        }
    }
}

#[async_trait]
impl TunnelResolver for StaticTunnelResolver {
    async fn resolve(&self) -> Result<TunnelEndpoints, TunnelError> {
        Ok(self.endpoints.clone())
    }
}
