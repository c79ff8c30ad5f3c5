use serde::Deserialize;
use thiserror::Error;

use crate::interest::interest_label;

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("body is not a JSON object: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
}

#[derive(Debug, Deserialize)]
struct RawSubmission {
    name: Option<String>,
    phone: Option<String>,
    wechat: Option<String>,
    interest: Option<String>,
    message: Option<String>,
}

/// A contact-form submission with every required field present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub phone: String,
    pub wechat: String,
    pub interest: String,
    pub message: Option<String>,
}

impl Submission {
    pub fn parse(body: &[u8]) -> Result<Self, SubmissionError> {
        let raw: RawSubmission = serde_json::from_slice(body)?;
        Ok(Self {
            name: required("name", raw.name)?,
            phone: required("phone", raw.phone)?,
            wechat: required("wechat", raw.wechat)?,
            interest: required("interest", raw.interest)?,
            message: raw.message.filter(|m| !m.is_empty()),
        })
    }

    pub fn interest_label(&self) -> &str {
        interest_label(&self.interest)
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String, SubmissionError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(SubmissionError::MissingField(field)),
    }
}
