//! APIハンドラ
//!
//! - POST /api/ai_hints: 画像と学生の文章から補足質問2つ
//! - POST /api/generate_prompt: 修正観察を画像生成用の一文に整形

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::de::DeserializeOwned;

use art_observe_common::{HintRequest, HintsResponse, PromptRequest, PromptResponse};

use crate::error::{AppError, Result};
use crate::gemini::{fetch_image, GeminiClient};
use crate::server::AppState;
use crate::service;

/// ボディをJSONとして読む（空・不正は `{}` 扱い）
fn parse_body<T: DeserializeOwned + Default>(body: &[u8]) -> T {
    serde_json::from_slice(body).unwrap_or_else(|e| {
        if !body.is_empty() {
            tracing::debug!(error = %e, "malformed request body, treating as empty");
        }
        T::default()
    })
}

pub async fn ai_hints(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<HintsResponse>> {
    let request: HintRequest = parse_body(&body);

    let image_url = request.image_url.trim();
    if image_url.is_empty() {
        return Err(AppError::Validation("imageUrl is required".into()));
    }

    let client = GeminiClient::from_config(state.http.clone(), &state.config)?;

    // 画像取得に失敗したらGeminiは呼ばない
    let image = fetch_image(&state.http, image_url).await?;

    let hints = service::generate_hints(&client, &request, &image).await?;
    tracing::info!(title = %request.title, "hints generated");
    Ok(Json(HintsResponse { hints }))
}

pub async fn generate_prompt(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<PromptResponse>> {
    let request: PromptRequest = parse_body(&body);

    let refined = request.refined_text.trim();
    if refined.is_empty() {
        return Err(AppError::Validation("refinedText is required".into()));
    }

    let client = GeminiClient::from_config(state.http.clone(), &state.config)?;
    let prompt = service::generate_image_prompt(&client, refined).await?;
    tracing::info!(title = %request.title, empty = prompt.is_empty(), "prompt generated");
    Ok(Json(PromptResponse { prompt }))
}

/// POST以外
pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::CONTENT_TYPE, "text/plain")],
        "Method Not Allowed",
    )
}
