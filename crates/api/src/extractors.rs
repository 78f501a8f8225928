//! Request extractors.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

/// Client identifier used to bucket rate-limit counters.
///
/// First entry of `X-Forwarded-For` (the chain head is the original
/// client when a proxy sits in front), falling back to `X-Real-IP`.
/// `None` when neither header carries a usable value; the handler
/// buckets those under a sentinel key.
#[derive(Debug, Clone)]
pub struct ClientIp(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Try X-Forwarded-For first (for proxied requests)
        if let Some(xff) = parts.headers.get("X-Forwarded-For") {
            if let Ok(xff_str) = xff.to_str() {
                // Take the first IP in the chain
                if let Some(ip) = xff_str.split(',').next() {
                    let ip = ip.trim();
                    if !ip.is_empty() {
                        return Ok(ClientIp(Some(ip.to_string())));
                    }
                }
            }
        }

        // Try X-Real-IP
        if let Some(real_ip) = parts.headers.get("X-Real-IP") {
            if let Ok(ip) = real_ip.to_str() {
                if !ip.is_empty() {
                    return Ok(ClientIp(Some(ip.to_string())));
                }
            }
        }

        Ok(ClientIp(None))
    }
}
