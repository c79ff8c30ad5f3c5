// Drives ResendMailer against a local stand-in for the provider API.

use std::io::Read;
use std::sync::mpsc;
use std::thread;

use contact_relay::{DeliveryError, Mailer, OutgoingEmail, ResendMailer};
use serde_json::Value;
use tiny_http::{Response, Server};

struct Captured {
    method: String,
    url: String,
    authorization: Option<String>,
    body: Value,
}

/// Answers exactly one request with `status`/`reply` and reports what it saw.
fn fake_provider(status: u16, reply: &'static str) -> (String, mpsc::Receiver<Captured>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut request = server.recv().unwrap();
        let mut raw = String::new();
        request.as_reader().read_to_string(&mut raw).unwrap();
        let authorization = request
            .headers()
            .iter()
            .find(|h| h.field.equiv("Authorization"))
            .map(|h| h.value.as_str().to_string());
        let captured = Captured {
            method: request.method().to_string(),
            url: request.url().to_string(),
            authorization,
            body: serde_json::from_str(&raw).unwrap(),
        };
        let _ = request.respond(Response::from_string(reply).with_status_code(status));
        let _ = tx.send(captured);
    });
    (format!("http://127.0.0.1:{port}"), rx)
}

fn email() -> OutgoingEmail {
    OutgoingEmail {
        from: "onboarding@resend.dev".into(),
        to: vec!["xianhua_trading@outlook.com".into()],
        subject: "新的联系表单提交 - 系统交易策略 - 显化资本".into(),
        html: "<p>x</p>".into(),
    }
}

#[test]
fn posts_to_emails_with_bearer_token() {
    let (base, rx) = fake_provider(200, r#"{"id":"49a3999c-0ce1"}"#);
    let mailer = ResendMailer::new(&base, "re_test_key").unwrap();

    let receipt = mailer.send(&email()).unwrap();
    assert_eq!(receipt.id, "49a3999c-0ce1");

    let seen = rx.recv().unwrap();
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.url, "/emails");
    assert_eq!(seen.authorization.as_deref(), Some("Bearer re_test_key"));
    assert_eq!(seen.body["subject"], email().subject);
    assert_eq!(seen.body["to"][0], "xianhua_trading@outlook.com");
}

#[test]
fn non_success_status_is_rejected() {
    let (base, _rx) = fake_provider(422, r#"{"message":"invalid from"}"#);
    let mailer = ResendMailer::new(&base, "k").unwrap();
    match mailer.send(&email()) {
        Err(DeliveryError::Rejected { status, body }) => {
            assert_eq!(status, 422);
            assert!(body.contains("invalid from"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[test]
fn unparseable_reply_is_a_decode_error() {
    let (base, _rx) = fake_provider(200, "ok");
    let mailer = ResendMailer::new(&base, "k").unwrap();
    assert!(matches!(
        mailer.send(&email()),
        Err(DeliveryError::Decode(_))
    ));
}
