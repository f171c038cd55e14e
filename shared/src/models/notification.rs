use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Jenis notifikasi dari HR portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    LeaveRequest,
    LeaveApproved,
    LeaveRejected,
    Success,
    Error,
    Warning,
    Info,
    // Type baru dari server tidak boleh menggagalkan polling
    #[serde(other)]
    Other,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::LeaveRequest => "leave_request",
            NotificationType::LeaveApproved => "leave_approved",
            NotificationType::LeaveRejected => "leave_rejected",
            NotificationType::Success => "success",
            NotificationType::Error => "error",
            NotificationType::Warning => "warning",
            NotificationType::Info => "info",
            NotificationType::Other => "other",
        }
    }
}

/// Employee yang mengirim notifikasi (display only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SenderSummary {
    pub name: String,
    #[serde(default)]
    pub employee_id: Option<String>,
}

/// Sender bisa berupa object populated atau hanya id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum SenderRef {
    Employee(SenderSummary),
    Id(String),
}

/// Ringkasan leave record yang direferensikan notifikasi (display only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveSummary {
    #[serde(default)]
    pub leave_type: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub total_days: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum LeaveRef {
    Leave(LeaveSummary),
    Id(String),
}

/// Notification seperti yang dikirim oleh HR portal API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(rename = "type")]
    #[schema(value_type = String, example = "leave_approved")]
    pub notification_type: NotificationType,
    pub title: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub sender: Option<SenderRef>,
    #[serde(default, rename = "leaveId")]
    pub leave: Option<LeaveRef>,
}

/// Metadata pagination dari feed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub unread_count: u64,
    #[serde(default)]
    pub total: u64,
}

/// Response `GET /notifications`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NotificationPage {
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub pagination: Pagination,
}
