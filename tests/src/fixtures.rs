//! Test fixtures and payload generators.

/// A well-formed submission payload.
pub fn valid_payload() -> serde_json::Value {
    serde_json::json!({
        "name": "Jo Doe",
        "email": "jo@example.com",
        "message": "I would like to talk about a project with you."
    })
}

/// A submission payload with explicit field values.
pub fn payload(name: &str, email: &str, message: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "email": email,
        "message": message,
    })
}

/// A well-formed payload carrying a verification token.
pub fn payload_with_token(token: &str) -> serde_json::Value {
    let mut payload = valid_payload();
    payload["verificationToken"] = serde_json::Value::String(token.to_string());
    payload
}

/// A payload whose body size exceeds the transport limit.
pub fn oversized_payload() -> String {
    payload("Jo Doe", "jo@example.com", &"x".repeat(70_000)).to_string()
}
