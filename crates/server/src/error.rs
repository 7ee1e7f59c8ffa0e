use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mkvconv_core::error::{ApiError, ErrorEnvelope};
use mkvconv_transcoder::ConvertError;

/// Newtype wrapper so we can implement `IntoResponse` in this crate.
#[derive(Debug)]
pub struct AppError(pub ApiError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let envelope = ErrorEnvelope::from(&self.0);
        (status, Json(envelope)).into_response()
    }
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        Self(e)
    }
}

impl From<ConvertError> for AppError {
    fn from(e: ConvertError) -> Self {
        let message = e.to_string();
        Self(match e {
            ConvertError::ConversionFailed(_) => ApiError::ConversionFailed(message),
            ConvertError::ExecutionError(_) => ApiError::Execution(message),
        })
    }
}
