//! Confirmation email service (SMTP via lettre).

use std::sync::Arc;

use intake_core::Config;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Sends the submitter a confirmation after a successful submission.
/// No-op if mail is disabled or SMTP is not configured.
#[derive(Clone)]
pub struct EmailService {
    mailer: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
}

impl EmailService {
    /// Create the email service from config. Returns `None` if disabled or
    /// SMTP is not configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        if !config.mail_enabled {
            tracing::debug!("Confirmation mail disabled (MAIL_ENABLED=false)");
            return None;
        }
        let host = config.smtp_host.as_deref()?;
        let from = config.mail_from.as_deref()?.to_string();
        let port = config.smtp_port.unwrap_or(587);

        let mailer = if config.smtp_tls {
            let b = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host).ok()?;
            let b = b.port(port);
            let b = if let (Some(u), Some(p)) = (&config.smtp_user, &config.smtp_password) {
                b.credentials(Credentials::new(u.clone(), p.clone()))
            } else {
                b
            };
            tracing::info!(host = %host, port = port, "Email service initialized (SMTP with STARTTLS)");
            b.build()
        } else {
            let b = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(port);
            let b = if let (Some(u), Some(p)) = (&config.smtp_user, &config.smtp_password) {
                b.credentials(Credentials::new(u.clone(), p.clone()))
            } else {
                b
            };
            tracing::info!(host = %host, port = port, "Email service initialized (SMTP)");
            b.build()
        };

        Some(Self {
            mailer: Arc::new(mailer),
            from,
        })
    }

    /// Send the submission confirmation to one recipient.
    pub async fn send_confirmation(
        &self,
        to: &str,
        first_name: Option<&str>,
    ) -> Result<(), String> {
        let to_addr: Mailbox = to
            .parse()
            .map_err(|e| format!("Invalid recipient address: {}", e))?;
        let from_addr: Mailbox = self
            .from
            .parse()
            .map_err(|e| format!("Invalid MAIL_FROM: {}", e))?;

        let greeting = match first_name {
            Some(name) => format!("Hello {},", name),
            None => "Hello,".to_string(),
        };
        let body = format!(
            "{}\n\nWe received your registration and will review the submitted \
             documents. You will hear from us once the review is complete.\n",
            greeting
        );

        let email = Message::builder()
            .from(from_addr)
            .to(to_addr)
            .subject("We received your registration")
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| e.to_string())?;

        self.mailer.send(email).await.map_err(|e| e.to_string())?;
        tracing::info!(recipient = %to, "Confirmation email sent");
        Ok(())
    }
}
