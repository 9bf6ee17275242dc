use crate::AppState;
use crate::error::AppError;
use crate::validation;

use axum::{
    Json,
    extract::{Path, State},
    response::Html,
};
use axum_macros::debug_handler;
use lantern_core::{PlayerActivity, ReferenceZone, ServerStatus, SessionSpan, StatusView};
use serde::Serialize;
use std::sync::Arc;

const DASHBOARD_HTML: &str = include_str!("../assets/dashboard.html");

#[derive(Debug, Serialize)]
pub struct SpanResponse {
    /// ISO-8601 in the reference timezone
    start: String,
    end: Option<String>,
    start_local: String,
    end_local: Option<String>,
    label: String,
}

#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    player: String,
    online: bool,
    sessions: Vec<SpanResponse>,
    total_seconds: i64,
    total: String,
    summary: String,
}

#[derive(Debug, Serialize)]
pub struct OnlineResponse {
    status: ServerStatus,
    status_text: String,
    color: String,
    server_name: String,
    players: Vec<String>,
    sessions: Vec<ActivityResponse>,
    uptime: String,
    uptime_seconds: Option<i64>,
    last_update: Option<String>,
}

impl SpanResponse {
    fn from_span(span: &SessionSpan, zone: ReferenceZone) -> Self {
        Self {
            start: zone.local(span.start).to_rfc3339(),
            end: span.end.map(|end| zone.local(end).to_rfc3339()),
            start_local: span.start_local.clone(),
            end_local: span.end_local.clone(),
            label: span.label(),
        }
    }
}

impl ActivityResponse {
    fn from_activity(activity: &PlayerActivity, zone: ReferenceZone) -> Self {
        Self {
            player: activity.player.clone(),
            online: activity.is_online(),
            sessions: activity
                .sessions
                .iter()
                .map(|s| SpanResponse::from_span(s, zone))
                .collect(),
            total_seconds: activity.total.num_seconds(),
            total: activity.total_label(),
            summary: activity.spans_label(),
        }
    }
}

impl OnlineResponse {
    pub fn from_view(view: &StatusView, zone: ReferenceZone) -> Self {
        Self {
            status: view.status,
            status_text: view.status_text.clone(),
            color: view.color.hex(),
            server_name: view.server_name.clone(),
            players: view.players.clone(),
            sessions: view
                .sessions
                .iter()
                .map(|a| ActivityResponse::from_activity(a, zone))
                .collect(),
            uptime: view.uptime_text(),
            uptime_seconds: view.uptime.map(|u| u.num_seconds()),
            last_update: view.last_update.map(|at| zone.format_hms(at)),
        }
    }
}

pub(crate) async fn dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

#[debug_handler]
pub(crate) async fn online(State(state): State<Arc<AppState>>) -> Json<OnlineResponse> {
    let view = state.board.latest();
    Json(OnlineResponse::from_view(&view, state.zone))
}

#[debug_handler]
pub(crate) async fn player(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<ActivityResponse>, AppError> {
    validation::validate_player_name(&name)?;

    let view = state.board.latest();
    let activity = view
        .activity_for(&name)
        .ok_or_else(|| AppError::PlayerNotFound(name.clone()))?;

    Ok(Json(ActivityResponse::from_activity(activity, state.zone)))
}
