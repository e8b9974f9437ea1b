//! Telephony Provider Client
//!
//! The capability to originate an outbound call, plus an implementation against
//! the Twilio REST API.

use crate::error::ProviderError;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

/// An instruction to originate one outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundCall {
    /// Destination number (E.164).
    pub to: String,
    /// Origin number (E.164).
    pub from: String,
    /// URL the provider requests once the call is answered.
    pub callback_url: String,
    /// HTTP method the provider uses for `callback_url`.
    pub method: String,
    pub record: bool,
}

impl OutboundCall {
    pub fn new(to: String, from: String, callback_url: String) -> Self {
        Self {
            to,
            from,
            callback_url,
            method: "POST".to_string(),
            record: true,
        }
    }
}

/// Acknowledgement that the provider accepted the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCall {
    /// Provider call identifier, when the acceptance body could be read.
    pub sid: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TelephonyProvider: Send + Sync {
    async fn create_call(&self, call: &OutboundCall) -> Result<ProviderCall, ProviderError>;
}

#[derive(Debug, Deserialize)]
struct CreateCallResponse {
    sid: String,
}

/// Twilio REST client, constructed once at startup and shared.
pub struct TwilioClient {
    client: reqwest::Client,
    api_base: String,
    account_sid: String,
    auth_token: String,
}

impl TwilioClient {
    pub const DEFAULT_API_BASE: &'static str = "https://api.twilio.com";

    pub fn new(
        client: reqwest::Client,
        api_base: impl Into<String>,
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
        }
    }
}

#[async_trait]
impl TelephonyProvider for TwilioClient {
    async fn create_call(&self, call: &OutboundCall) -> Result<ProviderCall, ProviderError> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Calls.json",
            self.api_base, self.account_sid
        );
        let record = if call.record { "true" } else { "false" };

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[
                ("To", call.to.as_str()),
                ("From", call.from.as_str()),
                ("Url", call.callback_url.as_str()),
                ("Method", call.method.as_str()),
                ("Record", record),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        // A 2xx means the call is queued; an unreadable body must not turn that into a failure.
        let sid = match response.text().await {
            Ok(body) => match serde_json::from_str::<CreateCallResponse>(&body) {
                Ok(created) => Some(created.sid),
                Err(e) => {
                    warn!(%status, error = %e, "Twilio accepted the call but its response could not be decoded");
                    None
                }
            },
            Err(e) => {
                warn!(%status, error = %e, "Twilio accepted the call but its response body could not be read");
                None
            }
        };
        debug!(call_sid = ?sid, "Twilio accepted outbound call");
        Ok(ProviderCall { sid })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_call() -> OutboundCall {
        OutboundCall::new(
            "+15551234567".into(),
            "+15550000000".into(),
            "https://cb.example/signaling-callback?ws_url=wss://stream.example&agent_id=a1&context_id=c1"
                .into(),
        )
    }

    #[test]
    fn test_outbound_call_defaults() {
        let call = sample_call();
        assert_eq!(call.method, "POST");
        assert!(call.record);
    }

    #[tokio::test]
    async fn test_create_call_posts_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2010-04-01/Accounts/AC123/Calls.json"))
            .and(header_exists("authorization"))
            .and(body_string_contains("To=%2B15551234567"))
            .and(body_string_contains("Method=POST"))
            .and(body_string_contains("Record=true"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "sid": "CA42" })))
            .expect(1)
            .mount(&server)
            .await;

        let client = TwilioClient::new(reqwest::Client::new(), server.uri(), "AC123", "secret");
        let placed = client.create_call(&sample_call()).await.unwrap();
        assert_eq!(placed.sid.as_deref(), Some("CA42"));
    }

    #[tokio::test]
    async fn test_accepted_call_with_unreadable_body_still_succeeds() {
        for body in ["", "<html>gateway</html>"] {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/2010-04-01/Accounts/AC123/Calls.json"))
                .respond_with(ResponseTemplate::new(201).set_body_string(body))
                .expect(1)
                .mount(&server)
                .await;

            let client =
                TwilioClient::new(reqwest::Client::new(), server.uri(), "AC123", "secret");
            let placed = client
                .create_call(&sample_call())
                .await
                .expect("a 2xx is an accepted call");
            assert_eq!(placed.sid, None);
        }
    }

    #[tokio::test]
    async fn test_rejection_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid To number"))
            .mount(&server)
            .await;

        let client = TwilioClient::new(reqwest::Client::new(), server.uri(), "AC123", "secret");
        match client.create_call(&sample_call()).await.unwrap_err() {
            ProviderError::Rejected { status, body } => {
                assert_eq!(status, 400);
                assert_eq!(body, "invalid To number");
            }
            other => panic!("Expected Rejected, got {other:?}"),
        }
    }
}
