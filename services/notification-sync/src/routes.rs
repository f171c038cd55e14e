use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    routing::{delete, get, post},
    Json, Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::{AppState, HealthStatus},
    handlers::{bell, notification, page},
};

// OpenAPI Documentation untuk Notification Sync
#[derive(OpenApi)]
#[openapi(
    info(
        title = "HR Portal - Notification Sync API",
        version = "1.0.0",
        description = "Local bell API untuk presentation layer\n\n## Features\n\n- 🔔 Bell projection (all notifications + unread count)\n- ✅ Mark notification as read\n- 📬 Mark all notifications as read\n- 🔄 Refetch all notifications\n- 👁️ Page visibility & focus events\n- 🚨 Active transient alerts\n",
    ),
    paths(
        bell::get_bell,
        bell::open_bell,
        bell::close_bell,
        bell::get_alerts,
        bell::dismiss_alert,
        notification::mark_as_read,
        notification::mark_all_as_read,
        notification::refetch_all_notifications,
        page::set_visibility,
        page::focus,
    ),
    components(
        schemas(
            crate::domain::BellProjection,
            crate::domain::Alert,
            crate::domain::AlertSeverity,
            notification::SyncActionResponse,
            page::VisibilityRequest,
            HealthStatus,
        )
    ),
    tags(
        (name = "Bell", description = "Bell presentation surface"),
        (name = "Notifications", description = "Read-state mutation endpoints"),
        (name = "Page", description = "Host page lifecycle events")
    )
)]
struct ApiDoc;

// Health check handler
async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.health_check().await)
}

/// Build CORS configuration untuk frontend
fn configure_cors(frontend_url: &str) -> CorsLayer {
    let allowed_methods = vec![Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

    let allowed_headers = vec![header::ACCEPT, header::CONTENT_TYPE];

    let origin = match frontend_url.parse::<HeaderValue>() {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(_) => {
            tracing::warn!("⚠️ FRONTEND_URL tidak valid, CORS hanya untuk localhost");
            AllowOrigin::exact(HeaderValue::from_static("http://localhost:5173"))
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(allowed_methods)
        .allow_headers(allowed_headers)
        .allow_credentials(false)
        .max_age(std::time::Duration::from_secs(86400))
}

/// Security headers middleware
async fn security_headers_middleware(
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let mut response = next.run(request).await;

    // Add security headers
    response.headers_mut().insert("X-Content-Type-Options", HeaderValue::from_static("nosniff"));
    response.headers_mut().insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    response.headers_mut().insert("Referrer-Policy", HeaderValue::from_static("strict-origin-when-cross-origin"));
    response.headers_mut().insert("Cache-Control", HeaderValue::from_static("no-store"));

    response
}

/// Buat router untuk local bell API
pub fn create_router(state: AppState) -> Router {
    let openapi = ApiDoc::openapi();
    let cors = configure_cors(&state.config.frontend_url);

    Router::new()
        .route("/health", get(health_check))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .nest("/api", build_api_routes())
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(cors)
        .with_state(state)
}

// Build API routes
fn build_api_routes() -> Router<AppState> {
    Router::new()
        // Bell endpoints
        .route("/bell", get(bell::get_bell))
        .route("/bell/open", post(bell::open_bell))
        .route("/bell/close", post(bell::close_bell))
        .route("/alerts", get(bell::get_alerts))
        .route("/alerts/{id}", delete(bell::dismiss_alert))
        // Notification endpoints
        .route("/notifications/read-all", post(notification::mark_all_as_read))
        .route("/notifications/refetch", post(notification::refetch_all_notifications))
        .route("/notifications/{id}/read", post(notification::mark_as_read))
        // Page lifecycle endpoints
        .route("/page/visibility", post(page::set_visibility))
        .route("/page/focus", post(page::focus))
}
