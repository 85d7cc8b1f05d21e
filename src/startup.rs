use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    OpenApi,
    openapi::{self, server::Server},
};
use utoipa_swagger_ui::SwaggerUi;

use std::{fs, path::Path, sync::Arc};

use crate::{config::Config, handlers::rest, service::EmailService};

/// OpenAPI document advertising the local server on `port`.
pub fn api_doc(port: u16) -> openapi::OpenApi {
    let mut doc = rest::ApiDoc::openapi();
    doc.servers = Some(vec![Server::new(format!("http://localhost:{port}"))]);
    doc
}

/// Writes the OpenAPI document as pretty-printed JSON, creating parent
/// directories as needed.
pub fn export_openapi(
    doc: &openapi::OpenApi,
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, doc.to_pretty_json()?)?;
    Ok(())
}

// Mirrors the caller's origin, method and headers so that credentialed
// requests from any origin are accepted
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub fn router(service: Arc<EmailService>, doc: openapi::OpenApi) -> Router {
    Router::new()
        .route("/", get(rest::health_check))
        .route("/send-email", post(rest::send_email))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", doc))
        .with_state(service)
        .layer(TraceLayer::new_for_http())
        .layer(cors())
}

pub async fn run(cfg: Config) -> std::io::Result<()> {
    // Setup service
    let service = Arc::new(EmailService::new(&cfg));

    // Export API description
    let doc = api_doc(cfg.server.port);
    match export_openapi(&doc, &cfg.server.openapi_path) {
        Ok(()) => tracing::info!(
            "OpenAPI document written to '{}'",
            cfg.server.openapi_path.display()
        ),
        Err(e) => tracing::warn!(
            "Failed to write OpenAPI document to '{}': {e}",
            cfg.server.openapi_path.display()
        ),
    }

    let router = router(service, doc);

    // Start server
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", cfg.server.host, cfg.server.port)).await?;
    let addr = listener.local_addr()?;

    tracing::info!("Mail dispatch starting, listening on {}", addr);

    axum::serve(listener, router).await
}
