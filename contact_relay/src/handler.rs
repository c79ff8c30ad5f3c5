use serde_json::{json, Value};
use tiny_http::Method;
use tracing::{error, info, warn};

use crate::email::{compose, MailSettings};
use crate::mailer::Mailer;
use crate::submission::{Submission, SubmissionError};

pub const MSG_MISSING_FIELDS: &str = "请填写所有必填字段";
pub const MSG_MALFORMED: &str = "请求格式错误";
pub const MSG_METHOD: &str = "方法不允许";
pub const MSG_DELIVERY: &str = "发送邮件失败，请稍后重试";
pub const MSG_TOO_LARGE: &str = "请求内容过大";

#[derive(Debug, Clone, PartialEq)]
pub struct RelayResponse {
    pub status: u16,
    pub body: Value,
}

impl RelayResponse {
    pub(crate) fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: json!({ "error": message }),
        }
    }

    pub fn not_found() -> Self {
        Self::error(404, "not found")
    }
}

/// Validates one contact-form request and hands it to the mailer.
pub fn handle_submission(
    method: &Method,
    body: &[u8],
    mailer: &dyn Mailer,
    mail: &MailSettings,
) -> RelayResponse {
    if *method != Method::Post {
        return RelayResponse::error(405, MSG_METHOD);
    }

    let submission = match Submission::parse(body) {
        Ok(s) => s,
        Err(err @ SubmissionError::MissingField(_)) => {
            info!(%err, "rejected submission");
            return RelayResponse::error(400, MSG_MISSING_FIELDS);
        }
        Err(err @ SubmissionError::Malformed(_)) => {
            warn!(%err, "rejected submission");
            return RelayResponse::error(400, MSG_MALFORMED);
        }
    };

    let email = compose(&submission, mail);
    match mailer.send(&email) {
        Ok(receipt) => {
            info!(id = %receipt.id, interest = %submission.interest, "submission relayed");
            RelayResponse {
                status: 200,
                body: json!({
                    "success": true,
                    "subject": email.subject,
                    "data": { "id": receipt.id },
                }),
            }
        }
        Err(err) => {
            error!(error = %err, "error sending email");
            RelayResponse::error(500, MSG_DELIVERY)
        }
    }
}
