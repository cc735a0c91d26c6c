use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::{ErrorBody, MessageBody};
use crate::upstream::UpstreamError;

// Errors returned by the API handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Please enter a city name.")]
    MissingCity,
    #[error(transparent)]
    Weather(UpstreamError),
    #[error(transparent)]
    Countries(UpstreamError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            ApiError::MissingCity => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody { error: message })).into_response()
            }
            ApiError::Weather(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody { error: message }),
            )
                .into_response(),
            // the country list endpoint reports failures under "message"
            ApiError::Countries(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(MessageBody { message })).into_response()
            }
        }
    }
}
