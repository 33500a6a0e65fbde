use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, error, instrument};

use super::{EmailMessage, Mailer, NotificationError};
use crate::config::MailConfig;

/// Transactional email through the Resend HTTP API
#[derive(Clone)]
pub struct ResendMailer {
    client: Client,
    config: MailConfig,
}

impl ResendMailer {
    pub fn new(config: MailConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/emails", self.config.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    #[instrument(skip(self, message), fields(to = %message.to))]
    async fn send(&self, message: &EmailMessage) -> Result<(), NotificationError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(NotificationError::MissingCredential)?;

        let body = json!({
            "from": self.config.from,
            "to": [message.to],
            "subject": message.subject,
            "html": message.html,
        });

        debug!("Posting email to provider");
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Email provider request failed");
                NotificationError::Provider(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Email provider rejected message");
            return Err(NotificationError::Provider(format!(
                "provider returned {status}"
            )));
        }

        Ok(())
    }
}
