//! Application state shared across handlers.

use crate::middleware::rate_limit::{RateLimitConfig, RateLimiter, SharedRateLimiter};
use mailer::Mailer;
use relay_core::{Error, Result};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Interval between rate-limiter sweeps, doubling as the idle cutoff.
const RATE_LIMIT_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

/// Typed gate configuration for the submission handler.
///
/// Whether the optional gates run is decided here at construction, so the
/// handler branches on configuration rather than inspecting the
/// environment per request.
#[derive(Debug, Clone)]
pub struct ContactConfig {
    /// CAPTCHA gate runs only when true (verification secret deployed).
    pub verification_enabled: bool,
    /// Emails are sent only when true (delivery credential deployed);
    /// otherwise submissions are logged locally and still succeed.
    pub delivery_enabled: bool,
    /// Destination mailbox.
    pub contact_email: String,
    /// Sender display address.
    pub from_email: String,
    /// Submissions scoring below this on verification are rejected.
    pub captcha_min_score: f32,
}

/// Verdict from the verification service.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptchaVerdict {
    pub success: bool,
    /// Trust score; present only for score-based CAPTCHA variants.
    #[serde(default)]
    pub score: Option<f32>,
    #[serde(default, rename = "error-codes")]
    pub error_codes: Vec<String>,
}

impl CaptchaVerdict {
    /// Whether the verdict clears the trust threshold.
    ///
    /// A missing score passes: checkbox-style responses carry none.
    pub fn passes(&self, min_score: f32) -> bool {
        self.success && self.score.map_or(true, |s| s >= min_score)
    }
}

/// CAPTCHA verification client.
///
/// Posts the token to the configured siteverify endpoint. Mock mode when
/// the verify URL is `mock`: deterministic verdicts derived from the
/// token (`reject` fails outright, `low-score` verifies at 0.3,
/// everything else passes at 0.9) so tests can exercise every branch
/// without a network.
#[derive(Clone)]
pub struct CaptchaClient {
    verify_url: String,
    secret: String,
    http: reqwest::Client,
    mock_mode: bool,
}

impl CaptchaClient {
    /// Creates a new verification client.
    pub fn new(secret: impl Into<String>, verify_url: impl Into<String>) -> Self {
        let verify_url = verify_url.into();
        let mock_mode = verify_url.is_empty() || verify_url == "mock";

        Self {
            secret: secret.into(),
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(5))
                .build()
                .expect("Failed to create HTTP client"),
            verify_url,
            mock_mode,
        }
    }

    /// Verify a token with the CAPTCHA service.
    pub async fn verify(&self, token: &str, remote_ip: Option<&str>) -> Result<CaptchaVerdict> {
        if self.mock_mode {
            return Ok(self.mock_verify(token));
        }

        let mut form = vec![("secret", self.secret.as_str()), ("response", token)];
        if let Some(ip) = remote_ip {
            form.push(("remoteip", ip));
        }

        debug!(url = %self.verify_url, "Calling verification service");

        let response = self
            .http
            .post(&self.verify_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Verification service request failed");
                Error::internal(format!("verification service unavailable: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(status = %status, "Verification service returned error");
            return Err(Error::internal(format!(
                "verification service returned {status}"
            )));
        }

        let verdict: CaptchaVerdict = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse verification response");
            Error::internal(format!("invalid verification response: {e}"))
        })?;

        Ok(verdict)
    }

    /// Mock verdicts for testing/development.
    fn mock_verify(&self, token: &str) -> CaptchaVerdict {
        debug!("Using mock captcha verification");

        if token.contains("reject") {
            CaptchaVerdict {
                success: false,
                score: None,
                error_codes: vec!["invalid-input-response".into()],
            }
        } else if token.contains("low-score") {
            CaptchaVerdict {
                success: true,
                score: Some(0.3),
                error_codes: vec![],
            }
        } else {
            CaptchaVerdict {
                success: true,
                score: Some(0.9),
                error_codes: vec![],
            }
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Email delivery (Resend in production, mock in tests)
    pub mailer: Arc<dyn Mailer>,
    /// CAPTCHA verification client
    pub captcha: CaptchaClient,
    /// Rate limiter
    pub rate_limiter: SharedRateLimiter,
    /// Gate configuration
    pub config: Arc<ContactConfig>,
}

impl AppState {
    pub fn new(mailer: Arc<dyn Mailer>, captcha: CaptchaClient, config: ContactConfig) -> Self {
        Self::with_rate_limit(mailer, captcha, config, RateLimitConfig::default())
    }

    /// Create with custom rate limit config.
    pub fn with_rate_limit(
        mailer: Arc<dyn Mailer>,
        captcha: CaptchaClient,
        config: ContactConfig,
        rate_config: RateLimitConfig,
    ) -> Self {
        Self {
            mailer,
            captcha,
            rate_limiter: Arc::new(RateLimiter::new(rate_config)),
            config: Arc::new(config),
        }
    }

    /// Start the rate limiter cleanup background task.
    /// Returns a handle that can be used to cancel the task.
    pub fn start_rate_limiter_cleanup(&self) -> tokio::task::JoinHandle<()> {
        let rate_limiter = self.rate_limiter.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(RATE_LIMIT_SWEEP_INTERVAL);
            loop {
                interval.tick().await;
                rate_limiter.cleanup(RATE_LIMIT_SWEEP_INTERVAL);
            }
        })
    }
}
