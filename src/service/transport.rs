use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    transport::smtp::authentication::Credentials,
};
use secrecy::{ExposeSecret, SecretString};

use crate::config::ProviderConfig;

use super::strategy::Provider;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Any failure on the way from request fields to an accepted message.
///
/// Callers only ever see the display text; the variant and the logs keep
/// the cause apart.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("{0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("{0}")]
    MessageBuild(#[from] lettre::error::Error),

    #[error("{0}")]
    Transport(BoxError),
}

/// Hands a finished message to a mail submission endpoint.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn submit(&self, message: Message) -> Result<(), DeliveryError>;

    /// `host:port` of the endpoint, for logs
    fn relay(&self) -> &str;
}

/// STARTTLS submission with username/password authentication.
#[derive(Debug)]
pub struct SmtpTransport {
    host: String,
    port: u16,
    relay: String,
    username: String,
    password: SecretString,
}

impl SmtpTransport {
    pub const SUBMISSION_PORT: u16 = 587;

    pub fn new(provider: Provider, config: &ProviderConfig) -> Self {
        let host = config
            .smtp_host
            .clone()
            .unwrap_or_else(|| provider.default_smtp_host().to_string());
        let port = config.smtp_port.unwrap_or(Self::SUBMISSION_PORT);

        Self {
            relay: format!("{host}:{port}"),
            host,
            port,
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }
}

#[async_trait]
impl MailTransport for SmtpTransport {
    async fn submit(&self, message: Message) -> Result<(), DeliveryError> {
        let creds = Credentials::new(
            self.username.clone(),
            self.password.expose_secret().to_string(),
        );

        // A transport per submission: the connection never outlives this call
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)
            .map_err(|e| DeliveryError::Transport(e.into()))?
            .port(self.port)
            .credentials(creds)
            .build();

        match mailer.send(message).await {
            Ok(response) => {
                tracing::debug!(
                    relay = %self.relay,
                    code = %response.code(),
                    "SMTP relay accepted message"
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    relay = %self.relay,
                    permanent = e.is_permanent(),
                    transient = e.is_transient(),
                    timeout = e.is_timeout(),
                    "SMTP submission failed: {e:?}"
                );
                Err(DeliveryError::Transport(e.into()))
            }
        }
    }

    fn relay(&self) -> &str {
        &self.relay
    }
}
