use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use art_observe_common::ErrorResponse;

#[derive(Error, Debug)]
pub enum AppError {
    /// 入力不足（400）
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Configuration(String),

    #[error("Gemini API error: HTTP {status} {body}")]
    RemoteService { status: u16, body: String },

    #[error("{0}")]
    EmptyResult(String),

    #[error("Failed to fetch image: {0}")]
    ImageFetch(String),

    #[error("HTTP通信エラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON解析エラー: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn missing_api_key() -> Self {
        AppError::Configuration("Missing GEMINI_API_KEY".into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(error = %self, "request failed");
        }
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
