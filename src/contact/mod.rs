//! Contact form pipeline: validate a submission and relay it to the email
//! provider.

pub mod email;
pub mod form;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

use crate::constants::EMAIL_PATTERN;
use email::{compose_email, DeliveryError, EmailSender, Mailbox};

/// A validated contact form submission. Only exists for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub project_type: Option<String>,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("missing_fields")]
    MissingFields,
    #[error("invalid_email")]
    InvalidEmail,
    #[error("delivery failed: {0}")]
    Delivery(#[from] DeliveryError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ContactError {
    pub fn status(&self) -> StatusCode {
        match self {
            ContactError::MissingFields | ContactError::InvalidEmail => StatusCode::BAD_REQUEST,
            ContactError::Delivery(_) | ContactError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The message shown to the visitor. Provider details never leak here.
    pub fn public_message(&self) -> &'static str {
        match self {
            ContactError::MissingFields => "Name, email, and message are required",
            ContactError::InvalidEmail => "Invalid email address",
            ContactError::Delivery(_) => "Failed to send email",
            ContactError::Internal(_) => "Internal server error",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        match &self {
            ContactError::Delivery(e) => tracing::error!("Email provider error: {}", e),
            ContactError::Internal(e) => tracing::error!("Contact API error: {}", e),
            _ => tracing::debug!("Rejected contact submission: {}", self),
        }
        (self.status(), Json(ErrorBody::new(self.public_message()))).into_response()
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ContactAccepted {
    pub success: bool,
    pub id: String,
}

fn email_regex() -> Option<&'static Regex> {
    static EMAIL_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL_REGEX
        .get_or_init(|| Regex::new(EMAIL_PATTERN).ok())
        .as_ref()
}

/// Deliberately permissive `local@domain.tld` shape check.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_some_and(|re| re.is_match(email))
}

fn text_field(body: &Value, key: &str) -> Option<String> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl ContactSubmission {
    /// Presence first, then the email shape. `projectType` is never validated.
    pub fn from_json(body: &Value) -> Result<Self, ContactError> {
        let name = text_field(body, "name");
        let email = text_field(body, "email");
        let message = text_field(body, "message");

        let (Some(name), Some(email), Some(message)) = (name, email, message) else {
            return Err(ContactError::MissingFields);
        };

        if !is_valid_email(&email) {
            return Err(ContactError::InvalidEmail);
        }

        Ok(ContactSubmission {
            name,
            email,
            project_type: text_field(body, "projectType"),
            message,
        })
    }
}

/// Runs one submission through validation and delivery.
///
/// Exactly one send is attempted for a valid body and none otherwise.
pub async fn handle_submission(
    mailer: &dyn EmailSender,
    mailbox: &Mailbox,
    raw_body: &[u8],
) -> Result<ContactAccepted, ContactError> {
    let body: Value = serde_json::from_slice(raw_body)
        .map_err(|e| ContactError::Internal(format!("unreadable request body: {e}")))?;

    let submission = ContactSubmission::from_json(&body)?;
    let outbound = compose_email(&submission, mailbox);

    let id = mailer.send(&outbound).await?;
    tracing::info!("Contact email sent (id {})", id);

    Ok(ContactAccepted { success: true, id })
}
