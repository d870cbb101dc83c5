// src/mailer.rs

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("API error: {0}")]
    ApiError(String),
}

/// An outgoing HTML mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Delivery seam; the router only knows this trait.
pub trait Mailer: Send + Sync {
    /// Sends the mail and returns the provider's message id.
    fn send(&self, mail: &OutgoingMail) -> Result<String, MailerError>;
}

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

pub struct ResendMailer {
    api_key: String,
    sender: String,
    client: Client,
}

#[derive(Serialize)]
struct ResendPayload<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    html: &'a str,
}

#[derive(Deserialize)]
struct ResendResponse {
    id: String,
}

impl ResendMailer {
    pub fn new(api_key: String, sender: String) -> Self {
        Self {
            api_key,
            sender,
            client: Client::new(),
        }
    }
}

impl Mailer for ResendMailer {
    fn send(&self, mail: &OutgoingMail) -> Result<String, MailerError> {
        let payload = ResendPayload {
            from: &self.sender,
            to: vec![mail.to.as_str()],
            subject: &mail.subject,
            html: &mail.html,
        };

        let resp = self
            .client
            .post(RESEND_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .map_err(|e| MailerError::RequestFailed(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_body = resp.text().unwrap_or_else(|_| "(no body)".to_string());
            return Err(MailerError::ApiError(format!("{status} - {error_body}")));
        }

        let body: ResendResponse = resp
            .json()
            .map_err(|e| MailerError::ApiError(format!("unreadable response: {e}")))?;
        Ok(body.id)
    }
}

/// Used when no API key is configured: the mail is only logged.
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, mail: &OutgoingMail) -> Result<String, MailerError> {
        info!(to = %mail.to, subject = %mail.subject, bytes = mail.html.len(), "mail not sent, no API key configured");
        Ok("logged".to_string())
    }
}
