//! ヒント・プロンプト生成の本体
//!
//! HTTPハンドラとCLIの両方から使う。

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use art_observe_common::{
    build_hint_prompt, build_image_prompt_instruction, clean_prompt_text, normalize_hints,
    HintRequest,
};

use crate::error::{AppError, Result};
use crate::gemini::{fetch_image, GeminiClient, InlineImage};

/// 画像付きでヒントを生成し、2つの質問に整形
///
/// 上流が空を返した場合は EmptyResult。
pub async fn generate_hints(
    client: &GeminiClient,
    request: &HintRequest,
    image: &InlineImage,
) -> Result<String> {
    let prompt = build_hint_prompt(
        &request.meta(),
        &request.free_text,
        request.analysis.as_ref(),
        request.observation.as_ref(),
    );
    let raw = client.generate(&prompt, Some(image)).await?;
    if raw.is_empty() {
        return Err(AppError::EmptyResult("Empty response from Gemini".into()));
    }
    Ok(normalize_hints(&raw))
}

/// 修正観察から画像生成プロンプトを作る（空文字もあり得る）
pub async fn generate_image_prompt(client: &GeminiClient, refined_text: &str) -> Result<String> {
    let raw = client
        .generate(&build_image_prompt_instruction(refined_text), None)
        .await?;
    Ok(clean_prompt_text(&raw))
}

/// 画像を読み込む
///
/// http(s) はダウンロード、それ以外は `public_dir` 基準のローカルファイル。
pub async fn load_image(
    http: &reqwest::Client,
    image_url: &str,
    public_dir: &Path,
) -> Result<InlineImage> {
    if image_url.starts_with("http://") || image_url.starts_with("https://") {
        return fetch_image(http, image_url).await;
    }

    let relative = image_url.trim_start_matches("./").trim_start_matches('/');
    let path = public_dir.join(relative);
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| AppError::ImageFetch(format!("{}: {}", path.display(), e)))?;

    Ok(InlineImage {
        mime_type: mime_from_extension(&path).to_string(),
        data: STANDARD.encode(&bytes),
    })
}

fn mime_from_extension(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}
