//! Solution (submission) handlers (C8)

mod handler;
pub mod request;

use axum::{middleware, routing::get, Router};

use crate::{middleware::auth::auth_middleware, state::AppState};

/// Solution routes. `POST /` and `GET /my/{problem_id}` require a bearer
/// token; the rest are open reads.
pub fn routes() -> Router<AppState> {
    let authenticated = Router::new()
        .route("/", axum::routing::post(handler::create_solution))
        .route("/my/{problem_id}", get(handler::list_my_solutions))
        .route_layer(middleware::from_fn(auth_middleware));

    let public = Router::new()
        .route("/by-problem/{problem_id}", get(handler::list_by_problem))
        .route("/{contest_id}/solutions", get(handler::list_contest_solutions))
        .route("/{id}", get(handler::get_solution));

    authenticated.merge(public)
}
