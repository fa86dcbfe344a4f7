//! Outbound call placement
//!
//! The orchestrator only needs one operation from the telephony provider:
//! place a call that fetches its playback markup from our connect webhook and
//! reports progress to our status webhook. [`TwilioCallPlacer`] implements it
//! against the provider's REST API:
//!
//! - Endpoint: `POST {api_base}/2010-04-01/Accounts/{account_sid}/Calls.json`
//! - Auth: HTTP basic (account SID / auth token)
//! - Body: form-encoded `From`, `To`, `Url` plus AMD and status-callback settings

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use super::clip::ClipRef;
use crate::config::{AmdSettings, ServerConfig};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Provider credentials not configured: {0}")]
    MissingCredentials(&'static str),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider rejected call ({status}): {message}")]
    Provider {
        status: u16,
        code: Option<i64>,
        message: String,
    },
}

/// A call the orchestrator wants placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    /// Clip the call is expected to play once connected. Informational only:
    /// what actually plays is decided by the connect webhook from the pointer.
    pub clip: ClipRef,
}

/// Provider acknowledgement of a placed call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlacedCall {
    pub sid: String,
    pub status: String,
}

#[async_trait]
pub trait CallPlacer: Send + Sync {
    async fn place_call(&self, request: &CallRequest) -> Result<PlacedCall, LaunchError>;
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    code: Option<i64>,
    message: Option<String>,
}

/// REST client for the provider's call creation endpoint.
pub struct TwilioCallPlacer {
    client: reqwest::Client,
    api_base: String,
    account_sid: Option<String>,
    auth_token: Option<String>,
    from_number: Option<String>,
    to_number: Option<String>,
    connect_url: String,
    status_callback_url: String,
    amd: AmdSettings,
}

impl TwilioCallPlacer {
    pub fn from_config(config: &ServerConfig) -> Result<Self, LaunchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_base: config.twilio_api_base.clone(),
            account_sid: config.twilio_account_sid.clone(),
            auth_token: config.twilio_auth_token.clone(),
            from_number: config.from_number.clone(),
            to_number: config.to_number.clone(),
            connect_url: config.connect_url(),
            status_callback_url: config.status_callback_url(),
            amd: config.amd.clone(),
        })
    }

    fn calls_url(&self, account_sid: &str) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Calls.json",
            self.api_base, account_sid
        )
    }

    /// Full form body for one call creation request.
    fn form_params(&self, from: &str, to: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("From", from.to_string()),
            ("To", to.to_string()),
            ("Url", self.connect_url.clone()),
        ];
        params.extend(self.amd.form_params(&self.status_callback_url));
        params
    }
}

#[async_trait]
impl CallPlacer for TwilioCallPlacer {
    async fn place_call(&self, request: &CallRequest) -> Result<PlacedCall, LaunchError> {
        let account_sid = self
            .account_sid
            .as_deref()
            .ok_or(LaunchError::MissingCredentials("TWILIO_ACCOUNT_SID"))?;
        let auth_token = self
            .auth_token
            .as_deref()
            .ok_or(LaunchError::MissingCredentials("TWILIO_AUTH_TOKEN"))?;
        let from = self
            .from_number
            .as_deref()
            .ok_or(LaunchError::MissingCredentials("OUTBOUND_PHONE_NUMBER"))?;
        let to = self
            .to_number
            .as_deref()
            .ok_or(LaunchError::MissingCredentials("INBOUND_PHONE_NUMBER"))?;

        let params = self.form_params(from, to);
        tracing::debug!(clip = %request.clip, to, url = %self.connect_url, "Placing call");

        let response = self
            .client
            .post(self.calls_url(account_sid))
            .basic_auth(account_sid, Some(auth_token))
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let parsed = serde_json::from_str::<ProviderErrorBody>(&body).ok();
            return Err(LaunchError::Provider {
                status: status.as_u16(),
                code: parsed.as_ref().and_then(|p| p.code),
                message: parsed
                    .and_then(|p| p.message)
                    .unwrap_or(body),
            });
        }

        Ok(response.json::<PlacedCall>().await?)
    }
}
