use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::models::{Notification, NotificationType};
use std::time::Duration;
use utoipa::ToSchema;
use uuid::Uuid;

/// Default durasi alert tampil sebelum auto-dismiss
pub const DEFAULT_ALERT_DURATION: Duration = Duration::from_millis(8000);

/// Klasifikasi tampilan alert (display hint saja)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Success,
    Warning,
    Info,
}

impl AlertSeverity {
    pub fn classify(notification_type: NotificationType) -> Self {
        match notification_type {
            NotificationType::LeaveApproved => AlertSeverity::Success,
            NotificationType::LeaveRejected => AlertSeverity::Warning,
            _ => AlertSeverity::Info,
        }
    }
}

/// Alert transient untuk notifikasi yang baru masuk
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: Uuid,
    pub notification_id: String,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: Option<String>,
    pub duration_ms: u64,
    pub created_at: DateTime<Utc>,
}

impl Alert {
    pub fn from_notification(notification: &Notification, duration: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            notification_id: notification.id.clone(),
            severity: AlertSeverity::classify(notification.notification_type),
            title: notification.title.clone(),
            message: notification.message.clone(),
            duration_ms: duration.as_millis() as u64,
            created_at: Utc::now(),
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}
