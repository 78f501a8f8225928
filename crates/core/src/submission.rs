//! Contact submission types and field validation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::limits::{MESSAGE_MAX_CHARS, MESSAGE_MIN_CHARS};

/// Raw, untrusted form payload as posted by the site.
///
/// Field names are camelCase on the wire. Unknown fields are ignored so
/// the frontend can evolve independently.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionInput {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[validate(custom(function = "validate_email"))]
    pub email: String,
    #[validate(custom(function = "validate_message"))]
    pub message: String,
    #[serde(default)]
    pub verification_token: Option<String>,
}

/// A submission that passed every field check.
///
/// Fields are trimmed and immutable once constructed; downstream code can
/// rely on the invariants without re-checking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedSubmission {
    name: String,
    email: String,
    message: String,
    verification_token: Option<String>,
}

impl ValidatedSubmission {
    /// Validate a raw submission.
    ///
    /// All fields are checked independently and every violation lands in
    /// the returned [`FieldErrors`], so the form can surface them at once.
    pub fn parse(input: SubmissionInput) -> Result<Self, FieldErrors> {
        input.validate().map_err(FieldErrors::from)?;

        Ok(Self {
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            message: input.message.trim().to_string(),
            verification_token: input.verification_token,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn verification_token(&self) -> Option<&str> {
        self.verification_token.as_deref()
    }
}

/// Field-name to human-readable messages mapping, produced only on
/// validation failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut map = BTreeMap::new();
        for (field, field_errors) in errors.field_errors() {
            let messages = field_errors
                .iter()
                .map(|e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => e.code.to_string(),
                })
                .collect();
            map.insert(field.to_string(), messages);
        }
        Self(map)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for msg in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {msg}")?;
                first = false;
            }
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("Name is required".into());
        return Err(err);
    }
    Ok(())
}

/// Minimal local@domain grammar: non-empty local part, domain with a dot.
fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    };

    if !well_formed {
        let mut err = ValidationError::new("invalid_format");
        err.message = Some("Invalid email address".into());
        return Err(err);
    }
    Ok(())
}

fn validate_message(message: &str) -> Result<(), ValidationError> {
    let chars = message.trim().chars().count();

    if chars < MESSAGE_MIN_CHARS {
        let mut err = ValidationError::new("too_short");
        err.message = Some(format!("Message must be at least {MESSAGE_MIN_CHARS} characters").into());
        return Err(err);
    }
    if chars > MESSAGE_MAX_CHARS {
        let mut err = ValidationError::new("too_long");
        err.message = Some(format!("Message must be at most {MESSAGE_MAX_CHARS} characters").into());
        return Err(err);
    }
    Ok(())
}
