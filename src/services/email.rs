use crate::config::email::EmailConfig;
use anyhow::Result;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

#[derive(Clone)]
pub struct EmailService {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from_address: Option<String>,
    frontend_url: String,
    contact_address: Option<String>,
}

impl EmailService {
    /// Build from environment variables. If SMTP is not configured, email
    /// sending is silently skipped (graceful degradation).
    pub fn from_env() -> Self {
        match EmailConfig::from_env() {
            Some(cfg) => {
                let creds = Credentials::new(cfg.smtp_username.clone(), cfg.smtp_password.clone());
                let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.smtp_host)
                    .map(|builder| builder.port(cfg.smtp_port).credentials(creds).build());

                match transport {
                    Ok(t) => Self {
                        transport: Some(t),
                        from_address: Some(cfg.from_address),
                        frontend_url: cfg.frontend_url,
                        contact_address: cfg.contact_address,
                    },
                    Err(e) => {
                        tracing::warn!("Failed to build SMTP transport: {e}");
                        Self {
                            transport: None,
                            from_address: None,
                            frontend_url: cfg.frontend_url,
                            contact_address: cfg.contact_address,
                        }
                    }
                }
            }
            None => {
                let frontend_url = std::env::var("FRONTEND_URL")
                    .unwrap_or_else(|_| "http://localhost:5173".to_string());
                Self {
                    transport: None,
                    from_address: None,
                    frontend_url,
                    contact_address: std::env::var("CONTACT_EMAIL").ok(),
                }
            }
        }
    }

    /// Returns true if SMTP is configured and available.
    pub fn is_configured(&self) -> bool {
        self.transport.is_some()
    }

    /// Send the 6-digit verification code. Silently succeeds if SMTP is
    /// not configured.
    pub async fn send_verification_email(
        &self,
        to: &str,
        first_name: &str,
        code: &str,
    ) -> Result<()> {
        let body = format!(
            "Hi {first_name},\n\nWelcome to AI Habits! Enter this 6-digit code on the verification page to activate your account:\n\n    {code}\n\n{}/verify-email\n\nThe code expires in 24 hours. If you did not create an account, you can safely ignore this email.",
            self.frontend_url
        );

        self.send_email(to, "Confirm your AI Habits account", &body)
            .await
    }

    /// Send a habit reminder to its owner.
    pub async fn send_reminder_email(
        &self,
        to: &str,
        first_name: &str,
        habit_title: &str,
    ) -> Result<()> {
        let body = format!(
            "Hi {first_name},\n\nThis is your AI Habits reminder to work on: \"{habit_title}\".\nTrack your progress now and keep your streak going!\n\n— AI Habits"
        );

        self.send_email(to, "Habit Reminder - AI Habits", &body)
            .await
    }

    /// Forward a contact-form message to the operator address.
    pub async fn send_contact_email(
        &self,
        name: &str,
        reply_to: &str,
        phone: Option<&str>,
        message: &str,
    ) -> Result<()> {
        let to = match &self.contact_address {
            Some(addr) => addr.clone(),
            None => {
                tracing::warn!("CONTACT_EMAIL not configured, dropping contact message");
                return Ok(());
            }
        };

        let phone_line = phone
            .map(|p| format!("Phone: {p}\n"))
            .unwrap_or_default();
        let body = format!("Name: {name}\nEmail: {reply_to}\n{phone_line}\n{message}");
        let subject = format!("New contact message - {name}");

        self.send_email(&to, &subject, &body).await
    }

    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let transport = match &self.transport {
            Some(t) => t,
            None => {
                tracing::debug!("SMTP not configured, skipping email to {to}");
                return Ok(());
            }
        };
        let from_address = match &self.from_address {
            Some(f) => f,
            None => return Ok(()),
        };

        let from_mailbox: Mailbox =
            from_address
                .parse()
                .map_err(|e: lettre::address::AddressError| {
                    anyhow::anyhow!("Invalid from address '{}': {}", from_address, e)
                })?;
        let to_mailbox: Mailbox = to.parse().map_err(|e: lettre::address::AddressError| {
            anyhow::anyhow!("Invalid to address '{}': {}", to, e)
        })?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        transport.send(email).await?;
        tracing::info!("Email sent to {to}: {subject}");
        Ok(())
    }
}
