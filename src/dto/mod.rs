use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SendEmailRequest {
    /// Provider to send through, `gmail` or `outlook`
    #[schema(example = "gmail")]
    pub provider: String,
    /// Recipient address
    #[schema(example = "someone@example.com")]
    pub to_email: String,
    /// Message subject
    pub subject: String,
    /// Plain-text message body
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SendEmailResponse {
    #[schema(example = "Email sent successfully")]
    pub message: String,
}

impl SendEmailResponse {
    pub fn sent() -> Self {
        Self {
            message: "Email sent successfully".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
