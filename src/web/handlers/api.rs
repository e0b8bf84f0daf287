use crate::services::slug::slugify_opt;
use crate::web::error::ApiError;
use crate::web::state::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use time::Duration;

const LOGOUT_MESSAGE: &str = "Đăng xuất thành công";
const SIGN_FAILED_MESSAGE: &str = "Không thể tạo chữ ký tải ảnh";

/// GET /api/health
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    match state.db.ping().await {
        Ok(()) => Json(serde_json::json!({
            "status": "ok",
            "database": "connected",
        }))
        .into_response(),
        Err(e) => {
            tracing::error!("Health check failed: {:#}", e);
            let body = serde_json::json!({
                "status": "error",
                "message": format!("{:#}", e),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

/// POST /api/logout
pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let name = state.session_cookie().to_string();
    if jar.get(&name).is_none() {
        tracing::debug!("Logout without a session cookie");
    }

    let cookie = Cookie::build((name, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .build();

    let body = serde_json::json!({
        "success": true,
        "message": LOGOUT_MESSAGE,
    });
    (jar.remove(cookie), Json(body)).into_response()
}

#[derive(Deserialize)]
pub struct SignRequest {
    #[serde(rename = "paramsToSign", default)]
    pub params_to_sign: Map<String, Value>,
}

/// POST /api/sign-image
pub async fn sign_image(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignRequest>,
) -> Result<Response, ApiError> {
    match state.signer.sign(request.params_to_sign) {
        Ok(signed) => Ok(Json(signed).into_response()),
        Err(e) => {
            tracing::error!("Upload signing failed: {}", e);
            Err(ApiError::internal(SIGN_FAILED_MESSAGE))
        }
    }
}

#[derive(Deserialize)]
pub struct SlugQuery {
    pub text: Option<String>,
}

/// GET /api/slug
pub async fn slug_preview(Query(query): Query<SlugQuery>) -> Json<Value> {
    Json(serde_json::json!({
        "slug": slugify_opt(query.text.as_deref()),
    }))
}
