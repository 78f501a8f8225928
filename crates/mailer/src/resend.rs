//! Resend HTTP API client.
//!
//! Single-shot sends with a client-side timeout and no retry: a failed
//! send surfaces as a delivery error and the submitter resubmits.

use async_trait::async_trait;
use relay_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

use crate::{Mailer, OutboundEmail};

/// Resend delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResendConfig {
    /// API credential.
    pub api_key: String,
    /// API base URL, overridable for tests.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ResendConfig {
    /// Config with the default API endpoint and timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.resend.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Wire format of `POST /emails`.
#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    reply_to: &'a str,
    subject: &'a str,
    text: &'a str,
    html: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: String,
}

/// Mailer backed by the Resend API.
pub struct ResendMailer {
    config: ResendConfig,
    http: reqwest::Client,
    last_send_ok: AtomicBool,
}

impl ResendMailer {
    pub fn new(config: ResendConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            http,
            last_send_ok: AtomicBool::new(true),
        })
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: OutboundEmail) -> Result<()> {
        let url = format!("{}/emails", self.config.base_url);
        let request = SendEmailRequest {
            from: &email.from,
            to: &email.to,
            reply_to: &email.reply_to,
            subject: &email.subject,
            text: &email.text,
            html: &email.html,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Resend request failed");
                self.last_send_ok.store(false, Ordering::Relaxed);
                Error::delivery(format!("resend unreachable: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Resend returned error");
            self.last_send_ok.store(false, Ordering::Relaxed);
            return Err(Error::delivery(format!("resend returned {status}")));
        }

        let receipt: SendEmailResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse Resend response");
            Error::delivery(format!("invalid resend response: {e}"))
        })?;

        debug!(email_id = %receipt.id, "Email accepted by Resend");
        self.last_send_ok.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        self.last_send_ok.load(Ordering::Relaxed)
    }
}
