use crate::domain::SatelliteId;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Unified error response format
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// Errors of the HTTP view adapter
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("no detail screen is open")]
    NoDetailOpen,
    #[error("satellite {requested} is not the open detail screen (open: {open})")]
    OtherDetailOpen {
        requested: SatelliteId,
        open: SatelliteId,
    },
}

impl IntoResponse for ViewError {
    fn into_response(self) -> Response {
        let code = match &self {
            ViewError::NoDetailOpen => "NO_DETAIL_OPEN",
            ViewError::OtherDetailOpen { .. } => "OTHER_DETAIL_OPEN",
        };

        let error_response = ErrorResponse {
            ok: false,
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        // Errors travel in the body; the status stays 200.
        (StatusCode::OK, Json(error_response)).into_response()
    }
}
