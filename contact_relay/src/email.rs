use serde::Serialize;

use crate::submission::Submission;

pub const DEFAULT_FROM: &str = "onboarding@resend.dev";
pub const DEFAULT_TO: &str = "xianhua_trading@outlook.com";

/// Sender and recipient for relayed submissions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MailSettings {
    pub from: String,
    pub to: String,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            from: DEFAULT_FROM.to_string(),
            to: DEFAULT_TO.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

pub fn subject_for(submission: &Submission) -> String {
    format!(
        "新的联系表单提交 - {} - 显化资本",
        submission.interest_label()
    )
}

pub fn compose(submission: &Submission, mail: &MailSettings) -> OutgoingEmail {
    let message = submission.message.as_deref().unwrap_or("无");
    let html = format!(
        "<h2>新的联系表单提交</h2>\
         <p><strong>姓名：</strong>{}</p>\
         <p><strong>手机号码：</strong>{}</p>\
         <p><strong>微信号：</strong>{}</p>\
         <p><strong>感兴趣的问题：</strong>{}</p>\
         <p><strong>留言内容：</strong>{}</p>",
        escape_html(&submission.name),
        escape_html(&submission.phone),
        escape_html(&submission.wechat),
        escape_html(submission.interest_label()),
        escape_html(message),
    );
    OutgoingEmail {
        from: mail.from.clone(),
        to: vec![mail.to.clone()],
        subject: subject_for(submission),
        html,
    }
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
