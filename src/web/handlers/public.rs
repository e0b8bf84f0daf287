use crate::web::error::AppResult;
use crate::web::state::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use std::sync::Arc;
use tera::Context;

fn make_context(state: &AppState) -> Context {
    let mut ctx = Context::new();
    ctx.insert("site", &state.config.site);
    ctx
}

pub async fn index(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let ctx = make_context(&state);
    let html = state.templates.render("public/index.html", &ctx)?;
    Ok(Html(html))
}

pub async fn home_redirect() -> Redirect {
    Redirect::permanent("/")
}

pub async fn robots_txt(State(state): State<Arc<AppState>>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        state.robots.render(),
    )
        .into_response()
}

pub async fn not_found(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let ctx = make_context(&state);
    let html = state.templates.render("public/404.html", &ctx)?;
    Ok((StatusCode::NOT_FOUND, Html(html)).into_response())
}
