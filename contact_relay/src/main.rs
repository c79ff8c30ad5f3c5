// contact_relay/src/main.rs
//
// Run:
//   RESEND_API_KEY=re_xxx cargo run -p contact_relay
//
//   # optional overrides
//   RELAY_BIND=0.0.0.0:3000 CONTACT_MAIL_TO=desk@example.com cargo run -p contact_relay
//
// Ctrl-C stops the accept loop.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use contact_relay::{bind, format_addr, serve, Relay, RelayConfig, ResendMailer, SEND_EMAIL_PATH};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = RelayConfig::from_env().context("load relay config")?;
    let mailer = ResendMailer::new(&cfg.api_base, &cfg.api_key).context("init mail client")?;
    let relay = Relay::new(Box::new(mailer), cfg.mail.clone());

    let server = Arc::new(bind(&cfg.bind)?);
    {
        let server = Arc::clone(&server);
        ctrlc::set_handler(move || server.unblock()).context("install ctrl-c handler")?;
    }

    info!(
        addr = %format_addr(server.server_addr()),
        path = SEND_EMAIL_PATH,
        to = %cfg.mail.to,
        "contact relay listening"
    );
    serve(&server, &relay);
    Ok(())
}
