//! Language listing handler

use axum::{extract::State, routing::get, Json, Router};

use crate::{models::PublicLanguage, state::AppState};

/// `GET /languages/` — the UI-facing listing of supported languages.
async fn list_languages(State(state): State<AppState>) -> Json<Vec<PublicLanguage>> {
    Json(state.languages().public_list())
}

/// Language routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(list_languages))
}
