//! Outbound email
//!
//! Handlers and services talk to a [`Mailer`]; the production transport is
//! [`ResendMailer`]. Every failure propagates to the caller.

pub mod invitation;
pub mod resend;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub use invitation::{render_invitation, send_invitation, INVITATION_SUBJECT};
pub use resend::ResendMailer;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Email provider API key is not configured")]
    MissingCredential,

    #[error("Email provider error: {0}")]
    Provider(String),
}

/// A rendered message ready for dispatch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotificationError>;
}
