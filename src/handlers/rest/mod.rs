use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;
use utoipa::OpenApi;

use std::sync::Arc;

use crate::{
    dto::{ErrorResponse, SendEmailRequest, SendEmailResponse},
    service::{EmailService, EmailServiceError},
};

#[derive(OpenApi)]
#[openapi(
    paths(send_email, health_check),
    components(schemas(SendEmailRequest, SendEmailResponse, ErrorResponse)),
    tags(
        (name = "email", description = "Email dispatch API")
    )
)]
pub struct ApiDoc;

#[utoipa::path(
    post,
    path = "/send-email",
    request_body = SendEmailRequest,
    responses(
        (status = 200, description = "Email sent successfully", body = SendEmailResponse),
        (status = 400, description = "Invalid email provider", body = ErrorResponse),
        (status = 422, description = "Malformed request payload"),
        (status = 500, description = "Delivery error", body = ErrorResponse)
    ),
    tag = "email"
)]
#[debug_handler]
pub async fn send_email(
    State(service): State<Arc<EmailService>>,
    Json(payload): Json<SendEmailRequest>,
) -> Response {
    match service.send_email(payload).await {
        Ok(r) => (StatusCode::OK, Json(r)).into_response(),
        Err(EmailServiceError::InvalidProvider(e)) => {
            tracing::debug!("Rejected send request: {e}");
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Invalid email provider")),
            )
                .into_response()
        }
        Err(EmailServiceError::Delivery(e)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(format!("An error occurred: {e}"))),
        )
            .into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is up")
    ),
    tag = "email"
)]
#[debug_handler]
pub async fn health_check() -> Response {
    (StatusCode::OK, "Hello from mail dispatch!").into_response()
}
