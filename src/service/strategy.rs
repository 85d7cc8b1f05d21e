use lettre::{Message, message::header::ContentType};

use std::{fmt, str::FromStr, sync::Arc};

use super::transport::{DeliveryError, MailTransport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Gmail,
    Outlook,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown email provider '{0}'")]
pub struct UnknownProvider(pub String);

impl Provider {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gmail => "gmail",
            Self::Outlook => "outlook",
        }
    }

    pub const fn default_smtp_host(self) -> &'static str {
        match self {
            Self::Gmail => "smtp.gmail.com",
            Self::Outlook => "smtp.office365.com",
        }
    }
}

impl FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gmail" => Ok(Self::Gmail),
            "outlook" => Ok(Self::Outlook),
            other => Err(UnknownProvider(other.to_string())),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sends plain-text mail as one provider account.
///
/// Both providers use this type; they differ only in sender identity and
/// the transport behind it.
#[derive(Clone)]
pub struct EmailStrategy {
    provider: Provider,
    sender: String,
    transport: Arc<dyn MailTransport>,
}

impl fmt::Debug for EmailStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailStrategy")
            .field("provider", &self.provider)
            .field("sender", &self.sender)
            .field("relay", &self.relay())
            .finish()
    }
}

impl EmailStrategy {
    pub fn new(
        provider: Provider,
        sender: impl Into<String>,
        transport: Arc<dyn MailTransport>,
    ) -> Self {
        Self {
            provider,
            sender: sender.into(),
            transport,
        }
    }

    pub const fn provider(&self) -> Provider {
        self.provider
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn relay(&self) -> &str {
        self.transport.relay()
    }

    pub async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), DeliveryError> {
        let message = self.build_message(to_email, subject, body)?;

        tracing::info!(
            "Sending email via {} ({}) to '{}' with subject '{}'",
            self.provider,
            self.relay(),
            to_email,
            subject
        );

        self.transport.submit(message).await
    }

    fn build_message(
        &self,
        to_email: &str,
        subject: &str,
        body: &str,
    ) -> Result<Message, DeliveryError> {
        let message = Message::builder()
            .from(self.sender.parse()?)
            .to(to_email.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        Ok(message)
    }
}
