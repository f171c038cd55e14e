use serde::Serialize;
use shared::utils::http_client::ServiceClient;
use std::env;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    repositories::{HttpNotificationApi, NotificationApi},
    sync::{AlertBoard, BellController, NotificationSync},
};

/// Page size minimum untuk feed on-demand
const MIN_ALL_PAGE_SIZE: u32 = 20;

/// Konfigurasi utama aplikasi yang di-load dari environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub hr_api_url: String,
    pub hr_api_token: Option<String>,
    pub hr_api_timeout: Duration,
    pub poll_interval: Duration,
    pub all_feed_stale_after: Duration,
    pub poll_page_size: u32,
    pub all_page_size: u32,
    pub alert_duration: Duration,
    pub bell_read_delay: Duration,
    pub server_host: String,
    pub server_port: u16,
    pub frontend_url: String,
    pub environment: String,
}

/// Parameter timing dan paging untuk sync engine
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub poll_interval: Duration,
    pub all_feed_stale_after: Duration,
    pub poll_page_size: u32,
    pub all_page_size: u32,
    pub alert_duration: Duration,
    pub bell_read_delay: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(60),
            all_feed_stale_after: Duration::from_secs(5 * 60),
            poll_page_size: 50,
            all_page_size: MIN_ALL_PAGE_SIZE,
            alert_duration: Duration::from_millis(8000),
            bell_read_delay: Duration::from_millis(500),
        }
    }
}

// Parse angka dari env, fallback ke default kalau tidak diset
fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, String> {
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| format!("{} harus berupa angka yang valid, dapat: {}", key, raw)),
        _ => Ok(default),
    }
}

impl AppConfig {
    /// Load semua konfigurasi dari env dengan validasi
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let defaults = SyncConfig::default();

        let hr_api_url = lookup("HR_API_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or("HR_API_URL environment variable harus diset")?;

        let hr_api_token = lookup("HR_API_TOKEN").filter(|v| !v.trim().is_empty());

        let hr_api_timeout = Duration::from_secs(parse_or(&lookup, "HR_API_TIMEOUT_SECS", 30)?);

        let poll_interval_secs: u64 = parse_or(
            &lookup,
            "NOTIFICATION_POLL_INTERVAL_SECS",
            defaults.poll_interval.as_secs(),
        )?;
        if poll_interval_secs == 0 {
            return Err("NOTIFICATION_POLL_INTERVAL_SECS harus lebih dari 0".to_string());
        }

        let all_feed_stale_after = Duration::from_secs(parse_or(
            &lookup,
            "NOTIFICATION_ALL_FEED_STALE_SECS",
            defaults.all_feed_stale_after.as_secs(),
        )?);

        let poll_page_size: u32 =
            parse_or(&lookup, "NOTIFICATION_POLL_PAGE_SIZE", defaults.poll_page_size)?;
        if poll_page_size == 0 {
            return Err("NOTIFICATION_POLL_PAGE_SIZE harus lebih dari 0".to_string());
        }

        let all_page_size: u32 =
            parse_or(&lookup, "NOTIFICATION_ALL_PAGE_SIZE", defaults.all_page_size)?;

        let alert_duration = Duration::from_millis(parse_or(
            &lookup,
            "NOTIFICATION_ALERT_DURATION_MS",
            defaults.alert_duration.as_millis() as u64,
        )?);

        let bell_read_delay = Duration::from_millis(parse_or(
            &lookup,
            "NOTIFICATION_BELL_READ_DELAY_MS",
            defaults.bell_read_delay.as_millis() as u64,
        )?);

        let server_host = lookup("NOTIFICATION_SYNC_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let server_port = parse_or(&lookup, "NOTIFICATION_SYNC_PORT", 3009)?;

        let frontend_url =
            lookup("FRONTEND_URL").unwrap_or_else(|| "http://localhost:5173".to_string());

        let environment = lookup("RUST_ENV").unwrap_or_else(|| "development".to_string());

        Ok(AppConfig {
            hr_api_url,
            hr_api_token,
            hr_api_timeout,
            poll_interval: Duration::from_secs(poll_interval_secs),
            all_feed_stale_after,
            poll_page_size,
            all_page_size: all_page_size.max(MIN_ALL_PAGE_SIZE),
            alert_duration,
            bell_read_delay,
            server_host,
            server_port,
            frontend_url,
            environment,
        })
    }

    /// Helper untuk cek apakah running di production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            poll_interval: self.poll_interval,
            all_feed_stale_after: self.all_feed_stale_after,
            poll_page_size: self.poll_page_size,
            all_page_size: self.all_page_size,
            alert_duration: self.alert_duration,
            bell_read_delay: self.bell_read_delay,
        }
    }
}

/// State aplikasi yang akan di-share ke semua handlers
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub sync: NotificationSync,
    pub bell: Arc<BellController>,
    pub alerts: Arc<AlertBoard>,
}

impl AppState {
    /// Buat AppState baru dengan HTTP client ke HR portal API
    pub fn new(config: AppConfig) -> Result<Self, String> {
        let client = ServiceClient::new(
            &config.hr_api_url,
            config.hr_api_token.clone(),
            config.hr_api_timeout,
        )
        .map_err(|e| format!("Gagal menginisialisasi HTTP client: {}", e))?;

        Ok(Self::with_api(config, Arc::new(HttpNotificationApi::new(client))))
    }

    pub fn with_api(config: AppConfig, api: Arc<dyn NotificationApi>) -> Self {
        let sync_config = config.sync_config();
        let alerts = Arc::new(AlertBoard::new());
        let sync = NotificationSync::new(api, alerts.clone(), sync_config.clone());
        let bell = Arc::new(BellController::new(sync.clone(), sync_config.bell_read_delay));

        AppState {
            config,
            sync,
            bell,
            alerts,
        }
    }

    /// Health check berdasarkan status polling terakhir
    pub async fn health_check(&self) -> HealthStatus {
        let mounted = self.sync.is_mounted().await;
        let polling_error = self.sync.projection().await.polling_error;

        HealthStatus {
            hr_api: if polling_error.is_none() { "healthy" } else { "unhealthy" }.to_string(),
            sync: if mounted { "running" } else { "stopped" }.to_string(),
            overall: if mounted && polling_error.is_none() {
                "healthy"
            } else {
                "degraded"
            }
            .to_string(),
        }
    }
}

/// Struktur untuk response health check endpoint
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthStatus {
    pub hr_api: String,
    pub sync: String,
    pub overall: String,
}
