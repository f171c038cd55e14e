// Notification Handlers - read-state mutation dan refetch
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{config::AppState, error::AppResult};

/// Response setelah operasi read-state / refetch
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncActionResponse {
    pub message: String,
    pub unread_count: u64,
}

/// Mark single notification as read
#[utoipa::path(
    post,
    path = "/api/notifications/{id}/read",
    tag = "Notifications",
    params(
        ("id" = String, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification marked as read", body = SyncActionResponse),
        (status = 400, description = "Invalid notification id"),
        (status = 404, description = "Notification not found on HR API"),
        (status = 502, description = "HR API error, cache left untouched")
    )
)]
pub async fn mark_as_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<SyncActionResponse>> {
    state.sync.mark_as_read(&id).await?;

    Ok(Json(SyncActionResponse {
        message: "Notifikasi ditandai sebagai dibaca".to_string(),
        unread_count: state.sync.unread_count().await,
    }))
}

/// Mark all notifications as read
#[utoipa::path(
    post,
    path = "/api/notifications/read-all",
    tag = "Notifications",
    responses(
        (status = 200, description = "All notifications marked as read", body = SyncActionResponse),
        (status = 502, description = "HR API error, cache left untouched")
    )
)]
pub async fn mark_all_as_read(State(state): State<AppState>) -> AppResult<Json<SyncActionResponse>> {
    state.sync.mark_all_as_read().await?;

    Ok(Json(SyncActionResponse {
        message: "Semua notifikasi ditandai sebagai dibaca".to_string(),
        unread_count: state.sync.unread_count().await,
    }))
}

/// Refetch feed lengkap (on-demand)
#[utoipa::path(
    post,
    path = "/api/notifications/refetch",
    tag = "Notifications",
    responses(
        (status = 200, description = "All-notifications feed refreshed", body = SyncActionResponse),
        (status = 502, description = "HR API error, stale feed kept")
    )
)]
pub async fn refetch_all_notifications(
    State(state): State<AppState>,
) -> AppResult<Json<SyncActionResponse>> {
    state.sync.refetch_all_notifications().await?;

    Ok(Json(SyncActionResponse {
        message: "Feed notifikasi diperbarui".to_string(),
        unread_count: state.sync.unread_count().await,
    }))
}
