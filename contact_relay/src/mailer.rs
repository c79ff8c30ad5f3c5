use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::email::OutgoingEmail;

pub const DEFAULT_API_BASE: &str = "https://api.resend.com";
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("mail provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("mail provider rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("unexpected mail provider response: {0}")]
    Decode(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct DeliveryReceipt {
    pub id: String,
}

pub trait Mailer: Send + Sync {
    fn send(&self, email: &OutgoingEmail) -> Result<DeliveryReceipt, DeliveryError>;
}

/// Delivers through the Resend HTTP API.
pub struct ResendMailer {
    client: reqwest::blocking::Client,
    api_base: String,
    api_key: String,
}

impl ResendMailer {
    pub fn new(api_base: &str, api_key: &str) -> Result<Self, DeliveryError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}

impl Mailer for ResendMailer {
    fn send(&self, email: &OutgoingEmail) -> Result<DeliveryReceipt, DeliveryError> {
        let url = format!("{}/emails", self.api_base);
        debug!(%url, subject = %email.subject, "posting email to provider");
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()?;
        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(|err| DeliveryError::Decode(format!("{err}: {body}")))
    }
}

/// Keeps delivered messages in memory. Used by tests and dry runs.
#[derive(Clone, Default)]
pub struct MemoryMailer {
    sent: Arc<Mutex<Vec<OutgoingEmail>>>,
    fail: bool,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose every delivery is rejected.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

impl Mailer for MemoryMailer {
    fn send(&self, email: &OutgoingEmail) -> Result<DeliveryReceipt, DeliveryError> {
        if self.fail {
            return Err(DeliveryError::Rejected {
                status: 503,
                body: "memory mailer configured to fail".to_string(),
            });
        }
        let mut sent = self
            .sent
            .lock()
            .map_err(|_| DeliveryError::Decode("memory mailer poisoned".to_string()))?;
        sent.push(email.clone());
        Ok(DeliveryReceipt {
            id: format!("mem-{}", sent.len()),
        })
    }
}
