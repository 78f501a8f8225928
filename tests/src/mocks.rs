//! Mock implementations for testing.

use async_trait::async_trait;
use mailer::{Mailer, OutboundEmail};
use parking_lot::Mutex;
use relay_core::Result;
use std::sync::Arc;

/// Mock mailer that captures outbound emails in memory.
///
/// Implements the same `Mailer` trait as the real Resend client, so tests
/// can verify the exact email a submission would produce without a live
/// credential.
#[derive(Clone)]
pub struct MockMailer {
    /// All emails sent through this mailer.
    emails: Arc<Mutex<Vec<OutboundEmail>>>,
    /// Simulate failures if set.
    should_fail: Arc<Mutex<bool>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            emails: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    /// Get all captured emails.
    pub fn sent_emails(&self) -> Vec<OutboundEmail> {
        self.emails.lock().clone()
    }

    /// Get the count of captured emails.
    pub fn sent_count(&self) -> usize {
        self.emails.lock().len()
    }

    /// Set failure mode for testing error handling.
    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.lock() = fail;
    }
}

impl Default for MockMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, email: OutboundEmail) -> Result<()> {
        if *self.should_fail.lock() {
            return Err(relay_core::Error::delivery("Mock mailer failure"));
        }

        self.emails.lock().push(email);
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        !*self.should_fail.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_email() -> OutboundEmail {
        OutboundEmail {
            from: "noreply@example.dev".into(),
            to: "owner@example.com".into(),
            reply_to: "jo@example.com".into(),
            subject: "New contact from Jo".into(),
            text: "body".into(),
            html: "<p>body</p>".into(),
        }
    }

    #[tokio::test]
    async fn mock_mailer_captures_emails() {
        let mock = MockMailer::new();

        mock.send(test_email()).await.unwrap();

        assert_eq!(mock.sent_count(), 1);
        assert_eq!(mock.sent_emails()[0].reply_to, "jo@example.com");
    }

    #[tokio::test]
    async fn mock_mailer_failure_mode() {
        let mock = MockMailer::new();
        mock.set_should_fail(true);

        let result = mock.send(test_email()).await;
        assert!(result.is_err());
        assert!(!mock.is_healthy());
        assert_eq!(mock.sent_count(), 0);
    }
}
