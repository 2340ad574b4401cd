//! Upload, session and file route groups.

use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::routing::{delete, get, post};
use axum::Router;
use std::sync::Arc;

pub fn upload_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/upload/", API_PREFIX),
            post(handlers::upload::upload_files),
        )
        .with_state(state)
}

pub fn session_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/sessions/", API_PREFIX),
            get(handlers::sessions::list_sessions),
        )
        .route(
            &format!("{}/sessions/{{id}}/", API_PREFIX),
            get(handlers::sessions::get_session),
        )
        .with_state(state)
}

pub fn file_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/files/{{id}}/delete/", API_PREFIX),
            delete(handlers::files::delete_file),
        )
        .with_state(state)
}
