use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, Bytes},
    http::{Request, StatusCode},
};
use lettre::Message;
use tower::ServiceExt;

use std::sync::{Arc, LazyLock, Mutex};

use mail_dispatch::{
    handlers::rest::ApiDoc,
    service::{DeliveryError, EmailService, EmailStrategy, MailTransport, Provider},
    startup,
};
use utoipa::OpenApi;

static TRACING: LazyLock<()> = LazyLock::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }
});

pub const GMAIL_SENDER: &str = "team@gmail.com";
pub const OUTLOOK_SENDER: &str = "team@outlook.com";

/// Stands in for an SMTP relay: keeps every submitted message, or fails
/// each submission with a fixed error.
pub struct RecordingTransport {
    relay: String,
    failure: Option<String>,
    sent: Mutex<Vec<Message>>,
}

impl RecordingTransport {
    pub fn accepting(relay: &str) -> Arc<Self> {
        Arc::new(Self {
            relay: relay.to_string(),
            failure: None,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(relay: &str, error: &str) -> Arc<Self> {
        Arc::new(Self {
            relay: relay.to_string(),
            failure: Some(error.to_string()),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent(&self) -> Vec<Message> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn submit(&self, message: Message) -> Result<(), DeliveryError> {
        if let Some(error) = &self.failure {
            return Err(DeliveryError::Transport(error.clone().into()));
        }
        // Give concurrent requests a chance to interleave
        tokio::task::yield_now().await;
        self.sent.lock().unwrap().push(message);
        Ok(())
    }

    fn relay(&self) -> &str {
        &self.relay
    }
}

pub struct TestApp {
    pub router: Router,
    pub gmail: Arc<RecordingTransport>,
    pub outlook: Arc<RecordingTransport>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(
        RecordingTransport::accepting("smtp.gmail.test:587"),
        RecordingTransport::accepting("smtp.outlook.test:587"),
    )
}

pub fn spawn_app_with(
    gmail: Arc<RecordingTransport>,
    outlook: Arc<RecordingTransport>,
) -> TestApp {
    LazyLock::force(&TRACING);

    let service = EmailService::with_strategies(
        EmailStrategy::new(Provider::Gmail, GMAIL_SENDER, gmail.clone()),
        EmailStrategy::new(Provider::Outlook, OUTLOOK_SENDER, outlook.clone()),
    );
    let router = startup::router(Arc::new(service), ApiDoc::openapi());

    TestApp {
        router,
        gmail,
        outlook,
    }
}

impl TestApp {
    pub async fn request(&self, request: Request<Body>) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn post_send_email(&self, body: &serde_json::Value) -> TestResponse {
        post_send_email(self.router.clone(), body).await
    }
}

/// Posts `body` to `/send-email`; takes an owned router so it can run in a
/// spawned task.
pub async fn post_send_email(router: Router, body: &serde_json::Value) -> TestResponse {
    let request = Request::builder()
        .method("POST")
        .uri("/send-email")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = router.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");

    TestResponse { status, body }
}

pub fn formatted(message: &Message) -> String {
    String::from_utf8(message.formatted()).expect("message is not UTF-8")
}
