use super::handlers;
use super::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::public::index))
        .route("/home", get(handlers::public::home_redirect))
        .route("/robots.txt", get(handlers::public::robots_txt))
}

pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/health", get(handlers::api::health))
        .route("/api/logout", post(handlers::api::logout))
        .route("/api/sign-image", post(handlers::api::sign_image))
        .route("/api/slug", get(handlers::api::slug_preview))
}
