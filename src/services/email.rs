//! SMTP delivery through lettre.

use std::sync::Arc;

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, warn};

use crate::config::SmtpConfig;
use crate::error::{AppError, Result};

/// Async SMTP transport wrapper.
///
/// When no SMTP host is configured the service runs in no-op mode and only
/// logs, which keeps local development free of mail infrastructure.
#[derive(Clone)]
pub struct EmailService {
    transport: Option<Arc<AsyncSmtpTransport<Tokio1Executor>>>,
    from: Mailbox,
}

impl EmailService {
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| AppError::Config(format!("invalid SMTP_FROM address: {}", e)))?;

        let transport = if config.host.trim().is_empty() {
            warn!("SMTP host not configured; email delivery will operate in no-op mode");
            None
        } else {
            let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| AppError::Config(format!("failed to configure SMTP transport: {}", e)))?
                .port(config.port);

            if let (Some(username), Some(password)) = (&config.username, &config.password) {
                builder =
                    builder.credentials(Credentials::new(username.clone(), password.clone()));
            }

            Some(Arc::new(builder.build()))
        };

        Ok(Self { transport, from })
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Send one HTML email. A single attempt; transport or authentication
    /// failure surfaces as `EmailDelivery` and is not retried here.
    pub async fn send(
        &self,
        to: &str,
        subject: &str,
        html: String,
        cc: &[String],
        bcc: &[String],
    ) -> Result<()> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(to)?)
            .subject(subject)
            .header(ContentType::TEXT_HTML);

        for address in cc {
            builder = builder.cc(parse_mailbox(address)?);
        }
        for address in bcc {
            builder = builder.bcc(parse_mailbox(address)?);
        }

        let message = builder
            .body(html)
            .map_err(|e| AppError::EmailDelivery(format!("failed to build message: {}", e)))?;

        match &self.transport {
            Some(transport) => {
                transport
                    .send(message)
                    .await
                    .map_err(|e| AppError::EmailDelivery(e.to_string()))?;
                info!(to, subject, "Email sent");
            }
            None => {
                info!(to, subject, "SMTP disabled; skipping email delivery");
            }
        }

        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address
        .parse::<Mailbox>()
        .map_err(|e| AppError::EmailDelivery(format!("invalid recipient {}: {}", address, e)))
}
