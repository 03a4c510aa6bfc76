//! Gemini API連携
//!
//! generateContent を1回だけ呼び、最初の候補のテキストを返す。リトライはしない。

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{AppError, Result};

const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Gemini APIリクエスト
#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineImage },
}

/// Base64化した画像
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

/// Gemini APIレスポンス
#[derive(Deserialize, Default)]
#[serde(default)]
struct GeminiResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ResponseContent {
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ResponsePart {
    text: Option<String>,
}

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(http: reqwest::Client, api_key: &str, model: &str, base_url: &str) -> Self {
        Self {
            http,
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 設定から作成（APIキーがなければ Configuration エラー）
    pub fn from_config(http: reqwest::Client, config: &Config) -> Result<Self> {
        let api_key = config.api_key().ok_or_else(AppError::missing_api_key)?;
        Ok(Self::new(http, api_key, &config.model, &config.api_base_url))
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// テキスト（と任意の画像）を送り、候補テキストを連結して返す
    ///
    /// 候補がなければ空文字。
    pub async fn generate(&self, prompt: &str, image: Option<&InlineImage>) -> Result<String> {
        let mut parts = vec![Part::Text {
            text: prompt.to_string(),
        }];
        if let Some(image) = image {
            parts.push(Part::InlineData {
                inline_data: image.clone(),
            });
        }
        let request = GeminiRequest {
            contents: vec![Content { role: "user", parts }],
        };

        tracing::debug!(model = %self.model, with_image = image.is_some(), "calling generateContent");

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::RemoteService {
                status: status.as_u16(),
                body,
            });
        }

        let payload: GeminiResponse = response.json().await?;
        Ok(first_candidate_text(payload))
    }
}

fn first_candidate_text(payload: GeminiResponse) -> String {
    payload
        .candidates
        .into_iter()
        .next()
        .map(|c| {
            c.content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// 画像を取得してBase64化
///
/// リダイレクトは追従する。Content-Type のパラメータは落とし、なければ image/jpeg。
pub async fn fetch_image(http: &reqwest::Client, url: &str) -> Result<InlineImage> {
    let response = http
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::ImageFetch(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::ImageFetch(format!("HTTP {}", status.as_u16())));
    }

    let mime_type = mime_from_content_type(
        response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
    );
    let bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::ImageFetch(e.to_string()))?;

    tracing::debug!(%url, %mime_type, size = bytes.len(), "image fetched");

    Ok(InlineImage {
        mime_type,
        data: STANDARD.encode(&bytes),
    })
}

fn mime_from_content_type(header: Option<&str>) -> String {
    header
        .and_then(|v| v.split(';').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_IMAGE_MIME)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = GeminiRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part::Text { text: "질문".into() },
                    Part::InlineData {
                        inline_data: InlineImage {
                            mime_type: "image/png".into(),
                            data: "AAAA".into(),
                        },
                    },
                ],
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "질문");
        assert_eq!(
            json["contents"][0]["parts"][1]["inline_data"]["mime_type"],
            "image/png"
        );
        assert_eq!(json["contents"][0]["parts"][1]["inline_data"]["data"], "AAAA");
    }

    #[test]
    fn test_first_candidate_text_joins_parts() {
        let payload: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":" 하나. "},{"inlineData":{}},{"text":"둘. "}]}},{"content":{"parts":[{"text":"무시"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(first_candidate_text(payload), "하나. 둘.");
    }

    #[test]
    fn test_first_candidate_text_empty() {
        let payload: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(first_candidate_text(payload), "");
        let payload: GeminiResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert_eq!(first_candidate_text(payload), "");
    }

    #[test]
    fn test_mime_from_content_type() {
        assert_eq!(mime_from_content_type(Some("image/png; charset=binary")), "image/png");
        assert_eq!(mime_from_content_type(Some("")), "image/jpeg");
        assert_eq!(mime_from_content_type(None), "image/jpeg");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = GeminiClient::new(
            reqwest::Client::new(),
            "key",
            "gemini-2.5-flash",
            "http://127.0.0.1:9999/v1beta/",
        );
        assert_eq!(
            client.endpoint(),
            "http://127.0.0.1:9999/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
