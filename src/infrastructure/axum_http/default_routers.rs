use axum::{http::StatusCode, response::IntoResponse};
use tracing::{debug, info};

use super::error_responses::AppError;

pub async fn not_found() -> impl IntoResponse {
    info!("router: not_found handler invoked");
    AppError::NotFound("resource not found".to_string())
}

pub async fn health_check() -> impl IntoResponse {
    debug!("router: health_check handler invoked");
    (StatusCode::OK, "OK").into_response()
}
