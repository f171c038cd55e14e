// Page lifecycle Handlers - visibility dan focus dari host page
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::config::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct VisibilityRequest {
    pub hidden: bool,
}

/// Host page masuk/keluar background
#[utoipa::path(
    post,
    path = "/api/page/visibility",
    tag = "Page",
    request_body = VisibilityRequest,
    responses(
        (status = 204, description = "Visibility updated")
    )
)]
pub async fn set_visibility(
    State(state): State<AppState>,
    Json(request): Json<VisibilityRequest>,
) -> StatusCode {
    state.sync.set_hidden(request.hidden);
    StatusCode::NO_CONTENT
}

/// Window mendapatkan fokus lagi
#[utoipa::path(
    post,
    path = "/api/page/focus",
    tag = "Page",
    responses(
        (status = 202, description = "Focus refetch scheduled")
    )
)]
pub async fn focus(State(state): State<AppState>) -> StatusCode {
    state.sync.focus_regained();
    StatusCode::ACCEPTED
}
