use crate::errors::AppError;
use crate::models::{DashboardView, SelectCountryRequest, SelectStatRequest, SessionResponse, StatKind};
use crate::session::SessionState;
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    Json,
};
use tracing::{error, info, warn};
use uuid::Uuid;

pub async fn index() -> Html<String> {
    Html(render_index(&StatKind::ALL))
}

/// Starts a session. Any failure while loading the initial data is returned
/// to the caller and no session is registered.
pub async fn create_session(State(state): State<AppState>) -> Result<Json<SessionResponse>, AppError> {
    let mut session = SessionState::new(state.default_country.clone());
    if let Err(err) = session.initialize(&state.source).await {
        error!("session initialization failed: {err}");
        return Err(err.into());
    }

    let view = session.view()?;
    let id = state.register(session).await;
    let active = state.session_count().await;
    info!(%id, country = %view.selected_country, active, "session started");

    Ok(Json(SessionResponse { id, view }))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DashboardView>, AppError> {
    let shared = state.session(id).await?;
    let session = shared.lock().await;
    Ok(Json(session.view()?))
}

/// Refresh failures leave the session usable: the response still carries the
/// last good view, with a notice describing what went wrong.
pub async fn select_country(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SelectCountryRequest>,
) -> Result<Json<DashboardView>, AppError> {
    let shared = state.session(id).await?;
    let mut session = shared.lock().await;
    let country = payload.country.trim();

    match session.select_country(country, &state.source).await {
        Ok(()) => info!(%id, country, "country selected"),
        Err(err) if err.is_source_failure() => warn!(%id, country, "country refresh failed: {err}"),
        Err(err) => return Err(err.into()),
    }

    Ok(Json(session.view()?))
}

pub async fn select_stat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SelectStatRequest>,
) -> Result<Json<DashboardView>, AppError> {
    let stat: StatKind = payload.stat.parse()?;
    let shared = state.session(id).await?;
    let mut session = shared.lock().await;
    session.select_stat(stat)?;
    Ok(Json(session.view()?))
}

pub async fn end_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, AppError> {
    if state.end(id).await {
        let active = state.session_count().await;
        info!(%id, active, "session ended");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(format!("unknown session {id}")))
    }
}
