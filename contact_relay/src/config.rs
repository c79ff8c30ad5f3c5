use thiserror::Error;

use crate::email::{MailSettings, DEFAULT_FROM, DEFAULT_TO};
use crate::mailer::DEFAULT_API_BASE;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RelayConfigError {
    #[error("RESEND_API_KEY is not set")]
    MissingApiKey,
}

#[derive(Clone, Debug)]
pub struct RelayConfig {
    pub bind: String,
    pub api_base: String,
    pub api_key: String,
    pub mail: MailSettings,
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, RelayConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RelayConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let api_key = get("RESEND_API_KEY").ok_or(RelayConfigError::MissingApiKey)?;
        Ok(Self {
            bind: get("RELAY_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
            api_base: get("RESEND_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            api_key,
            mail: MailSettings {
                from: get("CONTACT_MAIL_FROM").unwrap_or_else(|| DEFAULT_FROM.to_string()),
                to: get("CONTACT_MAIL_TO").unwrap_or_else(|| DEFAULT_TO.to_string()),
            },
        })
    }
}
