// Server module - router assembly and the HTTP listener

use axum::Router;
use axum::http::HeaderValue;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api;
use crate::api_docs::ApiDoc;
use crate::infrastructure::AppState;

/// CORS layer for the configured origins; any origin when the list is empty
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let mut origins = Vec::new();
    for origin in allowed_origins {
        match origin.parse::<HeaderValue>() {
            Ok(v) => origins.push(v),
            Err(e) => tracing::error!("Failed to parse CORS origin '{}': {}", origin, e),
        }
    }
    cors.allow_origin(origins)
}

/// Full application: `/api` routes, Swagger UI, tracing and CORS
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/api/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api::api_router(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins))
}

/// Bind `port` on all interfaces and serve until the process exits
pub async fn serve(app: Router, port: u16) -> Result<(), std::io::Error> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Kedai listening on {}", addr);
    tracing::info!("API docs at http://{}/api/docs", addr);
    axum::serve(listener, app).await
}
