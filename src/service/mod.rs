pub mod strategy;
pub mod transport;

use std::sync::Arc;

use crate::{
    config::Config,
    dto::{SendEmailRequest, SendEmailResponse},
};

pub use strategy::{EmailStrategy, Provider, UnknownProvider};
pub use transport::{DeliveryError, MailTransport, SmtpTransport};

#[derive(Debug, thiserror::Error)]
pub enum EmailServiceError {
    #[error("Invalid email provider: {0}")]
    InvalidProvider(#[from] UnknownProvider),

    #[error("Failed to deliver email: {0}")]
    Delivery(#[from] DeliveryError),
}

#[derive(Clone)]
pub struct EmailService {
    gmail: EmailStrategy,
    outlook: EmailStrategy,
}

impl EmailService {
    pub fn new(config: &Config) -> Self {
        Self::with_strategies(
            EmailStrategy::new(
                Provider::Gmail,
                config.gmail.username.clone(),
                Arc::new(SmtpTransport::new(Provider::Gmail, &config.gmail)),
            ),
            EmailStrategy::new(
                Provider::Outlook,
                config.outlook.username.clone(),
                Arc::new(SmtpTransport::new(Provider::Outlook, &config.outlook)),
            ),
        )
    }

    pub const fn with_strategies(gmail: EmailStrategy, outlook: EmailStrategy) -> Self {
        Self { gmail, outlook }
    }

    /// Resolves a provider name to its strategy.
    pub fn strategy(&self, provider: &str) -> Result<&EmailStrategy, EmailServiceError> {
        match provider.parse::<Provider>()? {
            Provider::Gmail => Ok(&self.gmail),
            Provider::Outlook => Ok(&self.outlook),
        }
    }

    pub async fn send_email(
        &self,
        request: SendEmailRequest,
    ) -> Result<SendEmailResponse, EmailServiceError> {
        let strategy = self.strategy(&request.provider)?;

        strategy
            .send_email(&request.to_email, &request.subject, &request.body)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    provider = %strategy.provider(),
                    relay = strategy.relay(),
                    "Failed to send email to '{}': {e:?}",
                    request.to_email
                );
            })?;

        tracing::info!(
            "Message to {} sent successfully via {}",
            request.to_email,
            strategy.provider()
        );

        Ok(SendEmailResponse::sent())
    }
}
