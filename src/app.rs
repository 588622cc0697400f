use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/sessions", post(handlers::create_session))
        .route(
            "/api/sessions/:id",
            get(handlers::get_session).delete(handlers::end_session),
        )
        .route("/api/sessions/:id/country", post(handlers::select_country))
        .route("/api/sessions/:id/stat", post(handlers::select_stat))
        .with_state(state)
}
