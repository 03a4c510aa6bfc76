//! HTTP API の入出力型
//!
//! サーバーのハンドラとWebクライアントで同じ型を使う。
//! リクエストは欠けたフィールドをすべてデフォルト値で受ける。

use serde::{Deserialize, Serialize};

use crate::prompts::ArtworkMeta;
use crate::types::{string_or_number, Artwork, Observation, PreAnalysis};

/// `POST /api/ai_hints` のリクエスト
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HintRequest {
    pub image_url: String,
    pub title: String,
    pub artist: String,
    #[serde(deserialize_with = "string_or_number")]
    pub year: String,
    pub free_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<PreAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation: Option<Observation>,
}

impl HintRequest {
    /// 選択中の作品と観察からリクエストを組み立てる
    ///
    /// `free_text` は元の自由観察。修正版は `observation` 側で渡る。
    pub fn for_artwork(
        artwork: &Artwork,
        image_url: impl Into<String>,
        observation: &Observation,
        analysis: Option<&PreAnalysis>,
    ) -> Self {
        Self {
            image_url: image_url.into(),
            title: artwork.title.clone(),
            artist: artwork.artist.clone(),
            year: artwork.year.clone(),
            free_text: observation.free.clone(),
            analysis: analysis.cloned(),
            observation: Some(observation.clone()),
        }
    }

    pub fn meta(&self) -> ArtworkMeta {
        ArtworkMeta {
            title: self.title.clone(),
            artist: self.artist.clone(),
            year: self.year.clone(),
        }
    }
}

/// `POST /api/generate_prompt` のリクエスト
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PromptRequest {
    pub refined_text: String,
    pub title: String,
    pub artist: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintsResponse {
    pub hints: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptResponse {
    pub prompt: String,
}

/// エラー時の共通レスポンス `{"error": "..."}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_request_empty_body() {
        let req: HintRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req, HintRequest::default());
        assert!(req.analysis.is_none());
    }

    #[test]
    fn test_hint_request_numeric_year_and_analysis() {
        let json = r#"{
            "imageUrl": "https://example.com/a.jpg",
            "title": "절규",
            "year": 1893,
            "freeText": "하늘이 붉다",
            "analysis": {"key_features": ["다리"], "color": "주황"},
            "observation": {"color": "빨강"}
        }"#;
        let req: HintRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.year, "1893");
        assert_eq!(req.analysis.as_ref().unwrap().key_features, vec!["다리"]);
        assert_eq!(req.observation.as_ref().unwrap().color, "빨강");
        assert_eq!(req.meta().title, "절규");
    }

    #[test]
    fn test_for_artwork_carries_observation() {
        let artwork = Artwork {
            title: "절규".into(),
            artist: "뭉크".into(),
            year: "1893".into(),
            ..Default::default()
        };
        let mut obs = Observation {
            free: "원본".into(),
            ..Default::default()
        };
        let req = HintRequest::for_artwork(&artwork, "http://x/a.jpg", &obs, None);
        assert_eq!(req.free_text, "원본");

        obs.free_refined = "수정본".into();
        let req = HintRequest::for_artwork(&artwork, "http://x/a.jpg", &obs, None);
        assert_eq!(req.free_text, "원본");

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["imageUrl"], "http://x/a.jpg");
        assert_eq!(json["year"], "1893");
        assert_eq!(json["observation"]["freeRefined"], "수정본");
        assert!(json.get("analysis").is_none());
    }

    #[test]
    fn test_prompt_request_camel_case() {
        let req: PromptRequest = serde_json::from_str(r#"{"refinedText": "노란 별"}"#).unwrap();
        assert_eq!(req.refined_text, "노란 별");
        assert_eq!(req.title, "");
    }

    #[test]
    fn test_error_response_shape() {
        let json = serde_json::to_string(&ErrorResponse::new("imageUrl is required")).unwrap();
        assert_eq!(json, r#"{"error":"imageUrl is required"}"#);
    }
}
