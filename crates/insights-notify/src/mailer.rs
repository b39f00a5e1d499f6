//! Dashboard-link email.

use async_trait::async_trait;
use insights_core::AppConfig;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::NotifyError;

/// The email announcing the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub from: String,
    pub to: Vec<String>,
    pub dashboard_url: String,
}

impl Notification {
    /// Build from configuration. The sender is the SMTP username.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::MissingSender`] without `SMTP_USERNAME` and
    /// [`NotifyError::NoRecipients`] with an empty recipient list.
    pub fn from_config(config: &AppConfig) -> Result<Self, NotifyError> {
        let from = config
            .smtp_username
            .clone()
            .ok_or(NotifyError::MissingSender)?;
        if config.recipients.is_empty() {
            return Err(NotifyError::NoRecipients);
        }
        Ok(Self {
            subject: config.email_subject.clone(),
            from,
            to: config.recipients.clone(),
            dashboard_url: config.dashboard_url.clone(),
        })
    }

    #[must_use]
    pub fn plain_body(&self) -> String {
        format!(
            "Hello,\n\nYour Facebook Insights Dashboard is ready.\n\nView Dashboard: {}\n\nRegards,\nInsights Bot\n",
            self.dashboard_url
        )
    }

    #[must_use]
    pub fn html_body(&self) -> String {
        let url = escape_attr(&self.dashboard_url);
        format!(
            "<html>\n  <body>\n    <p>Hello,<br><br>\n       Your <b>Facebook Insights Dashboard</b> is ready.<br>\n       \
             <a href=\"{url}\" target=\"_blank\">Click here to view the dashboard</a>.<br><br>\n       \
             Regards,<br>\n       Insights Bot\n    </p>\n  </body>\n</html>\n"
        )
    }

    /// Assemble the `multipart/alternative` message.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Address`] for an unparseable address,
    /// [`NotifyError::NoRecipients`] with no recipients and
    /// [`NotifyError::Build`] if `lettre` rejects the message.
    pub fn to_message(&self) -> Result<Message, NotifyError> {
        if self.to.is_empty() {
            return Err(NotifyError::NoRecipients);
        }
        let mut builder = Message::builder()
            .from(parse_mailbox(&self.from)?)
            .subject(self.subject.clone());
        for recipient in &self.to {
            builder = builder.to(parse_mailbox(recipient)?);
        }
        let message = builder.multipart(MultiPart::alternative_plain_html(
            self.plain_body(),
            self.html_body(),
        ))?;
        Ok(message)
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|source| NotifyError::Address {
            address: address.to_string(),
            source,
        })
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Delivers a [`Notification`].
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// SMTP delivery over implicit TLS (SMTPS).
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
}

impl std::fmt::Debug for SmtpNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpNotifier")
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

impl SmtpNotifier {
    /// # Errors
    ///
    /// Returns [`NotifyError::Smtp`] if the TLS parameters for `host` cannot
    /// be built.
    pub fn new(host: &str, port: u16, username: &str, password: &str) -> Result<Self, NotifyError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
            .port(port)
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .build();
        Ok(Self {
            transport,
            host: host.to_string(),
        })
    }

    /// Both `SMTP_USERNAME` and `SMTP_PASSWORD` are required.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::MissingCredentials`] if either is unset or
    /// blank, otherwise the same as [`SmtpNotifier::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, NotifyError> {
        let present = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());
        let (Some(username), Some(password)) =
            (present(&config.smtp_username), present(&config.smtp_password))
        else {
            return Err(NotifyError::MissingCredentials);
        };
        Self::new(&config.smtp_host, config.smtp_port, &username, &password)
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let message = notification.to_message()?;
        self.transport.send(message).await?;
        tracing::info!(
            host = %self.host,
            recipients = notification.to.len(),
            "notification email sent"
        );
        Ok(())
    }
}
