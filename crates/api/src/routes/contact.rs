//! Contact submission endpoint handler.
//!
//! One pass through ordered gates: identify, rate limit, parse, validate,
//! optional CAPTCHA verification, email dispatch. The first failing gate
//! produces the terminal outcome; nothing is retried.

use axum::{body::Bytes, extract::State, Json};
use relay_core::{limits::MAX_BODY_BYTES, SubmissionInput, ValidatedSubmission};
use std::time::Instant;
use telemetry::metrics;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::extractors::ClientIp;
use crate::response::{ApiError, ContactResponse};
use crate::state::AppState;

/// Client key used when no forwarding header identifies the caller.
const UNKNOWN_CLIENT: &str = "unknown";

/// POST /contact - submission intake endpoint.
pub async fn contact_handler(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    body: Bytes,
) -> Result<Json<ContactResponse>, ApiError> {
    let start = Instant::now();
    let submission_id = Uuid::new_v4();

    metrics().submissions_received.inc();

    let client_key = client_ip.as_deref().unwrap_or(UNKNOWN_CLIENT);

    if !state.rate_limiter.check(client_key) {
        metrics().rate_limited_requests.inc();
        info!(%submission_id, client = %client_key, "Submission rate limited");
        return Err(ApiError::rate_limited());
    }

    // Size check before parsing
    if body.len() > MAX_BODY_BYTES {
        warn!(%submission_id, payload_size = body.len(), "Oversized submission body");
        return Err(ApiError::bad_request("Invalid form data"));
    }

    let input: SubmissionInput = serde_json::from_slice(&body).map_err(|e| {
        warn!(%submission_id, error = %e, "Failed to parse submission body");
        ApiError::bad_request("Invalid form data")
    })?;

    let submission = ValidatedSubmission::parse(input).map_err(|errors| {
        metrics().submissions_invalid.inc();
        info!(%submission_id, fields = %errors, "Submission failed validation");
        ApiError::validation(errors)
    })?;

    // CAPTCHA gate: only when a secret is deployed and the form sent a token
    if state.config.verification_enabled {
        if let Some(token) = submission.verification_token() {
            let verdict = state
                .captcha
                .verify(token, client_ip.as_deref())
                .await
                .map_err(|e| {
                    error!(%submission_id, error = %e, "Verification service call failed");
                    ApiError::from(e)
                })?;

            if !verdict.passes(state.config.captcha_min_score) {
                metrics().captcha_rejections.inc();
                info!(%submission_id, score = ?verdict.score, "Submission failed verification");
                return Err(ApiError::verification_failed());
            }
        }
    }

    // Notify gate: send when delivery is configured, otherwise observe locally
    if state.config.delivery_enabled {
        let email = mailer::render(
            &submission,
            &state.config.from_email,
            &state.config.contact_email,
        );

        state.mailer.send(email).await.map_err(|e| {
            metrics().email_send_errors.inc();
            telemetry::health().mailer.set_unhealthy("last send failed");
            error!(%submission_id, error = %e, "Failed to deliver contact email");
            ApiError::from(e)
        })?;

        metrics().emails_sent.inc();
        telemetry::health().mailer.set_healthy();
    } else {
        info!(
            %submission_id,
            name = %submission.name(),
            email = %submission.email(),
            "Contact submission received (delivery disabled)"
        );
    }

    let latency_ms = start.elapsed().as_millis() as u64;
    metrics().submit_latency_ms.observe(latency_ms);
    metrics().submissions_accepted.inc();

    info!(%submission_id, client = %client_key, latency_ms, "Submission accepted");

    Ok(Json(ContactResponse::accepted()))
}
