//! Rendering of contact notifications.
//!
//! The plain-text body keeps raw newlines; the HTML body escapes every
//! interpolated field and renders message newlines as `<br>`.

use relay_core::{escape_html, ValidatedSubmission};

use crate::OutboundEmail;

/// Render a validated submission into the notification email.
///
/// `reply_to` is set to the submitter so the recipient can answer
/// directly from their mail client.
pub fn render(submission: &ValidatedSubmission, from: &str, to: &str) -> OutboundEmail {
    let subject = format!("New contact from {}", submission.name());

    let text = format!(
        "Name: {}\nEmail: {}\n\nMessage:\n{}",
        submission.name(),
        submission.email(),
        submission.message(),
    );

    let name = escape_html(submission.name());
    let email = escape_html(submission.email());
    let message = escape_html(submission.message()).replace('\n', "<br>");
    let html = format!(
        "<h2>New Contact Form Submission</h2>\n\
         <p><strong>Name:</strong> {name}</p>\n\
         <p><strong>Email:</strong> <a href=\"mailto:{email}\">{email}</a></p>\n\
         <h3>Message:</h3>\n\
         <p>{message}</p>"
    );

    OutboundEmail {
        from: from.to_string(),
        to: to.to_string(),
        reply_to: submission.email().to_string(),
        subject,
        text,
        html,
    }
}
