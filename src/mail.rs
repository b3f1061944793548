//! Outgoing mail transport.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::MailConfig;

const RESEND_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail transport is not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("invalid API key: {0}")]
    InvalidKey(String),

    #[error("rejected recipient: {0}")]
    Rejected(String),

    #[error("template error: {0}")]
    Template(#[from] askama::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Provider acknowledgement; `id` is absent when the provider accepted
/// the request without queueing a message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SentMail {
    pub id: Option<String>,
}

pub type MailFuture<'a> = Pin<Box<dyn Future<Output = Result<SentMail, MailError>> + Send + 'a>>;

pub trait Mailer: Send + Sync {
    fn send<'a>(&'a self, mail: &'a OutgoingMail) -> MailFuture<'a>;

    fn is_configured(&self) -> bool {
        true
    }
}

/// Resend HTTP API client.
#[derive(Clone)]
pub struct ResendMailer {
    client: reqwest::Client,
}

impl ResendMailer {
    pub fn new(api_key: &str) -> Result<Self, MailError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| MailError::InvalidKey(e.to_string()))?,
        );
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;
        Ok(Self { client })
    }

    async fn deliver(&self, mail: &OutgoingMail) -> Result<SentMail, MailError> {
        let response = self.client.post(RESEND_URL).json(mail).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MailError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<SentMail>().await?)
    }
}

impl Mailer for ResendMailer {
    fn send<'a>(&'a self, mail: &'a OutgoingMail) -> MailFuture<'a> {
        Box::pin(self.deliver(mail))
    }
}

/// Stand-in used when `RESEND_API_KEY` is not set.
pub struct DisabledMailer;

impl Mailer for DisabledMailer {
    fn send<'a>(&'a self, _mail: &'a OutgoingMail) -> MailFuture<'a> {
        Box::pin(async { Err(MailError::NotConfigured) })
    }

    fn is_configured(&self) -> bool {
        false
    }
}

pub fn mailer_from_config(config: &MailConfig) -> Result<Box<dyn Mailer>, MailError> {
    match config.api_key.as_deref() {
        Some(key) => Ok(Box::new(ResendMailer::new(key)?)),
        None => {
            tracing::warn!("RESEND_API_KEY not set; newsletter campaigns are disabled");
            Ok(Box::new(DisabledMailer))
        }
    }
}

/// Keeps every message in memory. Addresses registered with
/// [`RecordingMailer::failing_for`] are rejected.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
    reject: HashSet<String>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sent: Mutex::new(Vec::new()),
            reject: addresses.into_iter().map(Into::into).collect(),
        }
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

impl Mailer for RecordingMailer {
    fn send<'a>(&'a self, mail: &'a OutgoingMail) -> MailFuture<'a> {
        Box::pin(async move {
            if self.reject.contains(&mail.to) {
                return Err(MailError::Rejected(mail.to.clone()));
            }
            let mut sent = self
                .sent
                .lock()
                .map_err(|_| MailError::Rejected(mail.to.clone()))?;
            sent.push(mail.clone());
            Ok(SentMail {
                id: Some(format!("rec-{}", sent.len())),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail(to: &str) -> OutgoingMail {
        OutgoingMail {
            from: "shop@nut-things.com".into(),
            to: to.into(),
            subject: "Hi".into(),
            html: "<p>Hi</p>".into(),
        }
    }

    #[tokio::test]
    async fn recording_mailer_keeps_messages() {
        let mailer = RecordingMailer::new();
        let sent = mailer.send(&mail("a@b.de")).await.expect("sent");
        assert_eq!(sent.id.as_deref(), Some("rec-1"));
        assert_eq!(mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn recording_mailer_rejects_listed_addresses() {
        let mailer = RecordingMailer::failing_for(["bad@b.de"]);
        assert!(mailer.send(&mail("bad@b.de")).await.is_err());
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn disabled_mailer_reports_not_configured() {
        let mailer = DisabledMailer;
        assert!(!mailer.is_configured());
        assert!(matches!(
            mailer.send(&mail("a@b.de")).await,
            Err(MailError::NotConfigured)
        ));
    }
}
