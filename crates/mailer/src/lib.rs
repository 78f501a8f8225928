//! Email delivery for the contact relay.

pub mod resend;
pub mod template;

use async_trait::async_trait;
use relay_core::Result;
use serde::Serialize;

pub use resend::{ResendConfig, ResendMailer};
pub use template::render;

/// A fully rendered outbound email.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Email delivery behind a trait so tests can capture sends without a
/// live credential.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one email. A failure here is terminal for the submission;
    /// nothing retries.
    async fn send(&self, email: OutboundEmail) -> Result<()>;

    /// Whether the delivery channel is believed usable.
    fn is_healthy(&self) -> bool;
}

/// Mailer wired in when no delivery credential is configured.
///
/// The handler skips the notify gate entirely in that case; this type
/// keeps `AppState` total and makes the skip explicit in the wiring.
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, _email: OutboundEmail) -> Result<()> {
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        true
    }
}
