//! Size limits for the contact relay.
//!
//! The form is tiny, so the limits exist to keep abusive payloads from
//! tying up memory or landing multi-megabyte emails in the inbox.

// === Message Limits (chars, after trimming) ===

/// Minimum message length.
///
/// Filters out empty pings and single-word spam.
pub const MESSAGE_MIN_CHARS: usize = 20;

/// Maximum message length.
///
/// Generous for a contact form; anything longer belongs in an attachment.
pub const MESSAGE_MAX_CHARS: usize = 5000;

// === Request Limits ===

/// Maximum request body size in bytes (64KB).
///
/// A maximal valid submission is well under 32KB even with multi-byte
/// characters; everything above this is rejected before parsing.
pub const MAX_BODY_BYTES: usize = 64 * 1024;
