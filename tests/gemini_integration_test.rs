//! 実APIを使う結合テスト（GEMINI_API_KEY がなければスキップ）

use art_observe::config::{DEFAULT_API_BASE_URL, DEFAULT_MODEL};
use art_observe::gemini::GeminiClient;
use art_observe::service;

#[tokio::test]
async fn gemini_prompt_integration() {
    let api_key = match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => key,
        _ => {
            eprintln!("GEMINI_API_KEY not set; skipping integration test");
            return;
        }
    };

    let client = GeminiClient::new(
        reqwest::Client::new(),
        &api_key,
        DEFAULT_MODEL,
        DEFAULT_API_BASE_URL,
    );

    let prompt = service::generate_image_prompt(&client, "노란 별, 푸른 밤하늘, 소용돌이")
        .await
        .expect("request failed");

    assert!(!prompt.is_empty());
    assert!(!prompt.contains('\n'));
}
