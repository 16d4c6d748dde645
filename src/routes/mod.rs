/// Application routes configuration
use crate::handlers::{
    close_detail, detail_state, drain_effects, health, list_state, load_satellites, open_detail,
    search_satellites, AppState,
};
use axum::{
    routing::{delete, get, post},
    Router,
};

/// Build the application router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health))
        // List screen
        .route("/satellites", get(list_state))
        .route("/satellites/load", post(load_satellites))
        .route("/satellites/search", post(search_satellites))
        // Detail screen
        .route("/satellites/:id", get(detail_state))
        .route("/satellites/:id/open", post(open_detail))
        .route("/detail", delete(close_detail))
        // One-shot effects of both screens
        .route("/effects", get(drain_effects))
        .with_state(state)
}
