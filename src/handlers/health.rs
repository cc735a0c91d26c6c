use axum::{Json, http::StatusCode, response::IntoResponse};

pub async fn root_handler() -> &'static str {
    "Hello, World!"
}

// Browsers ask for it on every page load, answer without a body
pub async fn favicon_handler() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
