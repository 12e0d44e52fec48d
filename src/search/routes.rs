use super::handlers::*;
use super::state::AppState;

use axum::Router;
use axum::routing::get;

/// All webtool routes. Search routes accept GET and POST, reading parameters from the query string.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/index", get(handle_index))
        .route("/content0", get(handle_content0))
        .route("/content1", get(handle_content1))
        .route("/search0", get(handle_search0).post(handle_search0))
        .route("/search1", get(handle_search1).post(handle_search1))
        .route("/search2", get(handle_search2).post(handle_search2))
        .route("/search3", get(handle_search3).post(handle_search3))
        .route("/search4", get(handle_search4).post(handle_search4))
        .with_state(state)
}
