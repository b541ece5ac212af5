//! Outbound email: SMTP via lettre, or a logging fallback when SMTP is not configured.

use async_trait::async_trait;
use cradle_core::config::SmtpConfig;
use cradle_core::AppError;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a plain-text email to a single recipient.
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), AppError>;
}

/// Pick the SMTP mailer when configured, the logging mailer otherwise.
pub fn mailer_from_config(smtp: &SmtpConfig) -> Arc<dyn Mailer> {
    match SmtpMailer::from_config(smtp) {
        Some(mailer) => Arc::new(mailer),
        None => {
            tracing::warn!("SMTP not configured; emails will be logged instead of sent");
            Arc::new(LogMailer)
        }
    }
}

#[derive(Clone)]
pub struct SmtpMailer {
    transport: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
}

impl SmtpMailer {
    /// Returns `None` if `SMTP_HOST` or `SMTP_FROM` is missing.
    pub fn from_config(smtp: &SmtpConfig) -> Option<Self> {
        let host = smtp.smtp_host.as_deref()?;
        let from = smtp.smtp_from.clone()?;
        let port = smtp.smtp_port;
        let credentials = match (&smtp.smtp_user, &smtp.smtp_password) {
            (Some(u), Some(p)) => Some(Credentials::new(u.clone(), p.clone())),
            _ => None,
        };

        let transport = if smtp.smtp_tls {
            let b = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .ok()?
                .port(port);
            let b = match credentials {
                Some(c) => b.credentials(c),
                None => b,
            };
            tracing::info!(host = %host, port = port, "Email service initialized (SMTP with STARTTLS)");
            b.build()
        } else {
            let b = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(port);
            let b = match credentials {
                Some(c) => b.credentials(c),
                None => b,
            };
            tracing::info!(host = %host, port = port, "Email service initialized (SMTP)");
            b.build()
        };

        Some(Self {
            transport: Arc::new(transport),
            from,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), AppError> {
        let to_addr: Mailbox = to
            .parse()
            .map_err(|e| AppError::InvalidInput(format!("Invalid recipient address: {}", e)))?;
        let from_addr: Mailbox = self
            .from
            .parse()
            .map_err(|e| AppError::Internal(format!("Invalid SMTP_FROM: {}", e)))?;

        let email = Message::builder()
            .from(from_addr)
            .to(to_addr)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        self.transport.send(email).await.map_err(|e| {
            tracing::error!(error = %e, "SMTP send failed");
            AppError::Internal(format!("Failed to send email: {}", e))
        })?;

        tracing::info!(subject = %subject, "Email sent");
        Ok(())
    }
}

/// Development mailer: writes the message to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), AppError> {
        tracing::info!(to = %to, subject = %subject, body = %body, "Email (not sent, SMTP disabled)");
        Ok(())
    }
}

pub fn otp_email_body(otp: &str, ttl_minutes: i64) -> String {
    format!(
        "Your Cradle verification code is {}.\n\nThe code expires in {} minutes. \
         If you did not request it, ignore this email.",
        otp, ttl_minutes
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smtp(host: Option<&str>, from: Option<&str>) -> SmtpConfig {
        SmtpConfig {
            smtp_host: host.map(String::from),
            smtp_port: 587,
            smtp_user: None,
            smtp_password: None,
            smtp_from: from.map(String::from),
            smtp_tls: false,
        }
    }

    #[test]
    fn test_from_config_requires_host_and_sender() {
        assert!(SmtpMailer::from_config(&smtp(None, Some("no-reply@cradle.test"))).is_none());
        assert!(SmtpMailer::from_config(&smtp(Some("localhost"), None)).is_none());
        assert!(SmtpMailer::from_config(&smtp(Some("localhost"), Some("no-reply@cradle.test")))
            .is_some());
    }

    #[test]
    fn test_otp_body_mentions_code_and_expiry() {
        let body = otp_email_body("4821", 10);
        assert!(body.contains("4821"));
        assert!(body.contains("10 minutes"));
    }

    #[tokio::test]
    async fn test_log_mailer_always_succeeds() {
        assert!(LogMailer
            .send("someone@cradle.test", "Hello", "Body")
            .await
            .is_ok());
    }
}
