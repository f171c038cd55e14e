// Notification Sync - HR Portal

mod config;
mod domain;
mod error;
mod handlers;
mod repositories;
mod routes;
mod sync;

use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing untuk logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notification_sync=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("🚀 Starting HR Portal - Notification Sync");

    tracing::info!("🔌 Initializing application state...");
    let config = config::AppConfig::from_env()
        .map_err(|e| format!("Failed to load configuration: {}", e))?;
    let state = config::AppState::new(config)
        .map_err(|e| format!("Failed to initialize app state: {}", e))?;
    tracing::info!("✅ Application state initialized");

    if state.config.is_production() {
        tracing::warn!("⚙️  Running in PRODUCTION mode");
    } else {
        tracing::info!("⚙️  Running in DEVELOPMENT mode");
    }

    tracing::info!("🌐 HR API: {}", state.config.hr_api_url);
    if state.config.hr_api_token.is_none() {
        tracing::warn!("⚠️ HR_API_TOKEN tidak diset - request ke HR API tanpa Authorization header");
    }

    // Mulai polling unread feed
    state.sync.mount().await;

    let app = routes::create_router(state.clone()).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", state.config.server_host, state.config.server_port);
    tracing::info!("🎯 Notification Sync listening on {}", addr);
    tracing::info!("📚 API Documentation:");
    tracing::info!("   - Health Check: http://{}/health", addr);
    tracing::info!("   - Swagger UI: http://{}/swagger-ui", addr);
    tracing::info!("   - OpenAPI JSON: http://{}/api-docs/openapi.json", addr);

    tracing::info!("🚀 Notification Sync Features:");
    tracing::info!("   ✅ Unread feed polling tiap {}s", state.config.poll_interval.as_secs());
    tracing::info!("   ✅ Alert untuk notifikasi baru ({}ms)", state.config.alert_duration.as_millis());
    tracing::info!("   ✅ Read-state sync ke kedua cache");
    tracing::info!("   ✅ Bell open/close dengan deferred mark-all-as-read");

    // Graceful shutdown setup
    let shutdown_state = state.clone();
    let shutdown_signal = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("❌ Failed to listen for shutdown signal: {}", e);
        }
        tracing::info!("🛑 Received shutdown signal");
        shutdown_state.bell.close();
        shutdown_state.sync.unmount().await;
    };

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🌐 Server bound to {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    tracing::info!("👋 Notification Sync shutdown complete");

    Ok(())
}
