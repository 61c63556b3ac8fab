use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ContactSubmission;
use crate::constants::RESEND_API_URL;
use crate::html_template::escape_html;

/// Sender and destination addresses for contact emails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    pub from: String,
    pub to: String,
}

/// A send request as the provider expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("email provider API key is not configured")]
    NotConfigured,
    #[error("provider rejected the message (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected provider response: {0}")]
    InvalidResponse(String),
}

/// Anything that can deliver an [`OutboundEmail`] and hand back the
/// provider's message id.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<String, DeliveryError>;
}

pub fn subject_for(submission: &ContactSubmission) -> String {
    match &submission.project_type {
        Some(project_type) => format!("New Contact: {} - {}", submission.name, project_type),
        None => format!("New Contact: {}", submission.name),
    }
}

fn field_block(label: &str, value_html: &str, extra_style: &str) -> String {
    format!(
        r#"
  <div style="margin: 20px 0;">
    <p style="margin: 5px 0; color: #666;"><strong>{label}:</strong></p>
    <p style="margin: 5px 0;{extra_style}">{value_html}</p>
  </div>"#
    )
}

/// Renders every submitted field into the notification body.
pub fn render_html(submission: &ContactSubmission) -> String {
    let name = escape_html(&submission.name);
    let email = escape_html(&submission.email);
    let message = escape_html(&submission.message);

    let mut html = String::from(
        r#"<div style="font-family: sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #ff4d00; border-bottom: 2px solid #ff4d00; padding-bottom: 10px;">
    New Contact Form Submission
  </h2>"#,
    );
    html.push_str(&field_block("Name", &name, ""));
    html.push_str(&field_block(
        "Email",
        &format!(r#"<a href="mailto:{email}">{email}</a>"#),
        "",
    ));
    if let Some(project_type) = &submission.project_type {
        html.push_str(&field_block("Project Type", &escape_html(project_type), ""));
    }
    html.push_str(&field_block("Message", &message, " white-space: pre-wrap;"));
    html.push_str(&format!(
        r#"
  <hr style="border: none; border-top: 1px solid #eee; margin: 30px 0;" />
  <p style="color: #999; font-size: 12px;">
    Sent from your portfolio contact form at {}
  </p>
</div>"#,
        chrono::Utc::now().format("%Y-%m-%d %H:%M UTC")
    ));
    html
}

pub fn compose_email(submission: &ContactSubmission, mailbox: &Mailbox) -> OutboundEmail {
    OutboundEmail {
        from: mailbox.from.clone(),
        to: mailbox.to.clone(),
        reply_to: submission.email.clone(),
        subject: subject_for(submission),
        html: render_html(submission),
    }
}

#[derive(Debug, Deserialize)]
struct ResendAccepted {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ResendFailure {
    #[serde(default)]
    message: String,
}

/// Sends through the Resend HTTP API.
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
}

impl ResendMailer {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_endpoint(api_key, RESEND_API_URL)
    }

    pub fn with_endpoint(api_key: Option<String>, endpoint: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            endpoint: endpoint.to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl EmailSender for ResendMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<String, DeliveryError> {
        let api_key = self.api_key.as_deref().ok_or(DeliveryError::NotConfigured)?;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(email)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ResendFailure>(&body)
                .map(|f| f.message)
                .unwrap_or(body);
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let accepted: ResendAccepted = response
            .json()
            .await
            .map_err(|e| DeliveryError::InvalidResponse(e.to_string()))?;
        Ok(accepted.id)
    }
}
