use std::io::{self, Read};
use std::net::SocketAddr;

use anyhow::{anyhow, Result};
use thiserror::Error;
use tiny_http::{Header, Method, Request, Response, Server};
use tracing::{debug, info, warn};

use crate::email::MailSettings;
use crate::handler::{handle_submission, RelayResponse, MSG_MALFORMED, MSG_TOO_LARGE};
use crate::mailer::Mailer;

pub const SEND_EMAIL_PATH: &str = "/api/send-email";
pub const MAX_BODY_BYTES: u64 = 64 * 1024;

#[derive(Debug, Error)]
enum BodyError {
    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: u64 },
    #[error("reading request body: {0}")]
    Io(#[from] io::Error),
}

/// Reads at most `limit` bytes; anything longer is refused rather than cut.
fn read_body(reader: &mut dyn Read, limit: u64) -> Result<Vec<u8>, BodyError> {
    let mut body = Vec::new();
    reader.take(limit + 1).read_to_end(&mut body)?;
    if body.len() as u64 > limit {
        return Err(BodyError::TooLarge { limit });
    }
    Ok(body)
}

/// Everything a request needs: where mail goes and how it is delivered.
pub struct Relay {
    mailer: Box<dyn Mailer>,
    mail: MailSettings,
}

impl Relay {
    pub fn new(mailer: Box<dyn Mailer>, mail: MailSettings) -> Self {
        Self { mailer, mail }
    }

    fn respond_to(&self, request: &mut Request) -> RelayResponse {
        let path = request.url().split('?').next().unwrap_or("");
        if path != SEND_EMAIL_PATH {
            return RelayResponse::not_found();
        }
        if *request.method() != Method::Post {
            return handle_submission(request.method(), &[], self.mailer.as_ref(), &self.mail);
        }
        let body = match read_body(request.as_reader(), MAX_BODY_BYTES) {
            Ok(body) => body,
            Err(err @ BodyError::TooLarge { .. }) => {
                warn!(%err, "oversized submission refused");
                return RelayResponse::error(413, MSG_TOO_LARGE);
            }
            Err(err @ BodyError::Io(_)) => {
                warn!(%err, "failed reading request body");
                return RelayResponse::error(400, MSG_MALFORMED);
            }
        };
        handle_submission(request.method(), &body, self.mailer.as_ref(), &self.mail)
    }
}

pub fn bind(addr: &str) -> Result<Server> {
    Server::http(addr).map_err(|err| anyhow!("start contact relay on {addr}: {err}"))
}

/// Serves requests one at a time until the server is unblocked.
pub fn serve(server: &Server, relay: &Relay) {
    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();
        let resp = relay.respond_to(&mut request);
        debug!(%method, %url, status = resp.status, "handled request");
        let mut response =
            Response::from_string(resp.body.to_string()).with_status_code(resp.status);
        if let Some(header) = content_type("application/json; charset=utf-8") {
            response.add_header(header);
        }
        if let Err(err) = request.respond(response) {
            warn!(error = %err, %url, "failed writing response");
        }
    }
    info!("contact relay stopped");
}

fn content_type(value: &str) -> Option<Header> {
    Header::from_bytes(&b"Content-Type"[..], value.as_bytes()).ok()
}

pub fn format_addr(addr: tiny_http::ListenAddr) -> String {
    match addr.to_ip() {
        Some(SocketAddr::V4(v4)) => format!("{}:{}", v4.ip(), v4.port()),
        Some(SocketAddr::V6(v6)) => format!("[{}]:{}", v6.ip(), v6.port()),
        None => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct BrokenPipe;

    impl Read for BrokenPipe {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "client went away"))
        }
    }

    #[test]
    fn body_at_limit_is_read_whole() {
        let data = vec![b'x'; 16];
        let body = read_body(&mut Cursor::new(data.clone()), 16).unwrap();
        assert_eq!(body, data);
    }

    #[test]
    fn body_over_limit_is_refused_not_truncated() {
        let err = read_body(&mut Cursor::new(vec![b'x'; 17]), 16).unwrap_err();
        assert!(matches!(err, BodyError::TooLarge { limit: 16 }));
    }

    #[test]
    fn read_failure_is_reported() {
        let err = read_body(&mut BrokenPipe, 16).unwrap_err();
        assert!(matches!(err, BodyError::Io(_)));
    }
}
