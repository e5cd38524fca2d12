//! Email notification service.
//!
//! Sends the registration welcome mail over SMTP. The service is optional:
//! without SMTP configuration every send becomes a logged no-op, so
//! callers never need to care whether mail is wired up.

use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use quill_common::{config::EmailConfig, AppError, AppResult};

/// Email service.
#[derive(Clone)]
pub struct EmailService {
    smtp: Option<Smtp>,
    site_name: String,
    site_url: String,
}

#[derive(Clone)]
struct Smtp {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl EmailService {
    /// Create a new email service.
    ///
    /// With `config = None` the service is disabled and sends are no-ops.
    pub fn new(config: Option<&EmailConfig>, site_name: &str, site_url: &str) -> AppResult<Self> {
        let smtp = match config {
            Some(cfg) => {
                let mut builder =
                    AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.smtp_host)
                        .map_err(|e| AppError::Email(e.to_string()))?
                        .port(cfg.smtp_port);

                if let (Some(username), Some(password)) = (&cfg.smtp_username, &cfg.smtp_password)
                {
                    builder =
                        builder.credentials(Credentials::new(username.clone(), password.clone()));
                }

                let from = format!("{} <{}>", cfg.from_name, cfg.from_address)
                    .parse::<Mailbox>()
                    .map_err(|e| AppError::Email(format!("Invalid from address: {e}")))?;

                Some(Smtp {
                    transport: builder.build(),
                    from,
                })
            }
            None => None,
        };

        Ok(Self {
            smtp,
            site_name: site_name.to_string(),
            site_url: site_url.to_string(),
        })
    }

    /// Check if email delivery is configured.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.smtp.is_some()
    }

    /// Send the registration welcome mail.
    pub async fn send_welcome(&self, to: &str, username: &str) -> AppResult<()> {
        let Some(smtp) = &self.smtp else {
            tracing::debug!(to = %to, "Email disabled, skipping welcome mail");
            return Ok(());
        };

        let mailbox = to
            .parse::<Mailbox>()
            .map_err(|e| AppError::Email(format!("Invalid recipient address: {e}")))?;

        let body = format!(
            "Hi {username}!\n\n\
            Welcome to {}! We're glad to have you.\n\n\
            Get started: {}\n\n\
            If you have any questions, feel free to reach out.",
            self.site_name, self.site_url
        );

        let message = Message::builder()
            .from(smtp.from.clone())
            .to(mailbox)
            .subject(format!("Welcome to {}!", self.site_name))
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| AppError::Email(e.to_string()))?;

        smtp.transport
            .send(message)
            .await
            .map_err(|e| AppError::Email(e.to_string()))?;

        tracing::info!(to = %to, "Sent welcome email");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_service_skips_sends() {
        let service = EmailService::new(None, "Quill", "https://example.com").unwrap();

        assert!(!service.is_enabled());
        // A disabled service accepts sends without attempting delivery
        assert!(service
            .send_welcome("alice@example.com", "alice")
            .await
            .is_ok());
    }

    #[test]
    fn invalid_from_address_is_rejected() {
        let config = EmailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            smtp_username: None,
            smtp_password: None,
            from_address: "not an address".to_string(),
            from_name: "Quill".to_string(),
        };

        let result = EmailService::new(Some(&config), "Quill", "https://example.com");

        assert!(result.is_err());
    }
}
