//! Contact-form relay for the academy landing page.
//!
//! Accepts `POST /api/send-email` with the visitor's name, phone, WeChat id,
//! course interest and an optional message, formats a notification email and
//! hands it to a [`Mailer`] (Resend in production, in-memory in tests).

pub mod config;
pub mod email;
pub mod handler;
pub mod interest;
pub mod mailer;
pub mod server;
pub mod submission;

pub use config::{RelayConfig, RelayConfigError};
pub use email::{compose, MailSettings, OutgoingEmail};
pub use handler::{handle_submission, RelayResponse};
pub use interest::{interest_label, Interest};
pub use mailer::{DeliveryError, DeliveryReceipt, Mailer, MemoryMailer, ResendMailer};
pub use server::{bind, format_addr, serve, Relay, SEND_EMAIL_PATH};
pub use submission::{Submission, SubmissionError};
