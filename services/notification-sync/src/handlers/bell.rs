// Bell Handlers - proyeksi read-only, open/close dropdown, alert aktif
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    config::AppState,
    domain::{Alert, BellProjection},
};

/// Proyeksi bell saat ini
#[utoipa::path(
    get,
    path = "/api/bell",
    tag = "Bell",
    responses(
        (status = 200, description = "Current bell projection", body = BellProjection)
    )
)]
pub async fn get_bell(State(state): State<AppState>) -> Json<BellProjection> {
    Json(state.sync.projection().await)
}

/// Dropdown dibuka: refresh feed lengkap, jadwalkan mark-all kalau ada unread
#[utoipa::path(
    post,
    path = "/api/bell/open",
    tag = "Bell",
    responses(
        (status = 200, description = "Bell opened, projection after refresh", body = BellProjection)
    )
)]
pub async fn open_bell(State(state): State<AppState>) -> Json<BellProjection> {
    Json(state.bell.open().await)
}

/// Dropdown ditutup: batalkan mark-all yang belum jalan
#[utoipa::path(
    post,
    path = "/api/bell/close",
    tag = "Bell",
    responses(
        (status = 204, description = "Bell closed")
    )
)]
pub async fn close_bell(State(state): State<AppState>) -> StatusCode {
    state.bell.close();
    StatusCode::NO_CONTENT
}

/// Alert transient yang belum expired
#[utoipa::path(
    get,
    path = "/api/alerts",
    tag = "Bell",
    responses(
        (status = 200, description = "Active alerts, newest first", body = Vec<Alert>)
    )
)]
pub async fn get_alerts(State(state): State<AppState>) -> Json<Vec<Alert>> {
    Json(state.alerts.active())
}

/// Dismiss alert sebelum durasinya habis
#[utoipa::path(
    delete,
    path = "/api/alerts/{id}",
    tag = "Bell",
    params(
        ("id" = Uuid, Path, description = "Alert ID")
    ),
    responses(
        (status = 204, description = "Alert dismissed"),
        (status = 404, description = "Alert not found or already expired")
    )
)]
pub async fn dismiss_alert(State(state): State<AppState>, Path(id): Path<Uuid>) -> StatusCode {
    if state.alerts.dismiss(id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
