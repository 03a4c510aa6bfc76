//! 作品・観察データの型定義
//!
//! サーバーとWeb(WASM)で共有される型:
//! - Artwork: 作品カタログの1件（参照専用）
//! - Observation: 学生が入力する観察フィールド
//! - PreAnalysis: 作品ごとの事前分析（ヒント生成の参考資料）
//! - Preset: プロンプトの詳細度

use serde::{Deserialize, Deserializer, Serialize};

/// 作品の出典情報
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtworkSource {
    pub name: String,
    pub url: String,
    pub license: String,
}

/// 作品（カタログから読み込むだけで変更しない）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Artwork {
    pub id: String,
    pub title: String,
    pub artist: String,
    /// 制作年（データセットでは数値の場合もある）
    #[serde(deserialize_with = "string_or_number")]
    pub year: String,
    pub image_url: String,
    pub tags: Vec<String>,
    pub source: ArtworkSource,
}

impl Artwork {
    /// カード表示用の「作者 · 年」
    pub fn caption(&self) -> String {
        format!("{} · {}", self.artist, self.year)
    }
}

/// 学生の観察入力
///
/// 全フィールドが任意の自由記述。部分的なJSONはデフォルト値にマージされる。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Observation {
    pub free: String,
    pub free_refined: String,
    pub color: String,
    pub form_texture: String,
    pub composition: String,
    pub motif_symbol: String,
    pub mood_emotion: String,
    pub notes: String,
}

/// 観察フィールドの識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObservationField {
    Free,
    FreeRefined,
    Color,
    FormTexture,
    Composition,
    MotifSymbol,
    MoodEmotion,
    Notes,
}

impl ObservationField {
    pub const ALL: [ObservationField; 8] = [
        ObservationField::Free,
        ObservationField::FreeRefined,
        ObservationField::Color,
        ObservationField::FormTexture,
        ObservationField::Composition,
        ObservationField::MotifSymbol,
        ObservationField::MoodEmotion,
        ObservationField::Notes,
    ];

    /// 構造化観察の5項目
    pub const STRUCTURED: [ObservationField; 5] = [
        ObservationField::Color,
        ObservationField::FormTexture,
        ObservationField::Composition,
        ObservationField::MotifSymbol,
        ObservationField::MoodEmotion,
    ];

    /// JSONキー名
    pub fn key(&self) -> &'static str {
        match self {
            ObservationField::Free => "free",
            ObservationField::FreeRefined => "freeRefined",
            ObservationField::Color => "color",
            ObservationField::FormTexture => "formTexture",
            ObservationField::Composition => "composition",
            ObservationField::MotifSymbol => "motifSymbol",
            ObservationField::MoodEmotion => "moodEmotion",
            ObservationField::Notes => "notes",
        }
    }

    /// フォーム要素のID（`obs-free` など）
    pub fn input_id(&self) -> &'static str {
        match self {
            ObservationField::Free => "obs-free",
            ObservationField::FreeRefined => "obs-free-refined",
            ObservationField::Color => "obs-color",
            ObservationField::FormTexture => "obs-formTexture",
            ObservationField::Composition => "obs-composition",
            ObservationField::MotifSymbol => "obs-motifSymbol",
            ObservationField::MoodEmotion => "obs-moodEmotion",
            ObservationField::Notes => "obs-notes",
        }
    }

    /// 画面表示ラベル
    pub fn label(&self) -> &'static str {
        match self {
            ObservationField::Free => "자유 관찰",
            ObservationField::FreeRefined => "수정 관찰",
            ObservationField::Color => "색채",
            ObservationField::FormTexture => "형태/질감",
            ObservationField::Composition => "구도/시점",
            ObservationField::MotifSymbol => "소재/상징",
            ObservationField::MoodEmotion => "분위기/감정",
            ObservationField::Notes => "메모",
        }
    }
}

impl Observation {
    pub fn get(&self, field: ObservationField) -> &str {
        match field {
            ObservationField::Free => &self.free,
            ObservationField::FreeRefined => &self.free_refined,
            ObservationField::Color => &self.color,
            ObservationField::FormTexture => &self.form_texture,
            ObservationField::Composition => &self.composition,
            ObservationField::MotifSymbol => &self.motif_symbol,
            ObservationField::MoodEmotion => &self.mood_emotion,
            ObservationField::Notes => &self.notes,
        }
    }

    pub fn set(&mut self, field: ObservationField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ObservationField::Free => self.free = value,
            ObservationField::FreeRefined => self.free_refined = value,
            ObservationField::Color => self.color = value,
            ObservationField::FormTexture => self.form_texture = value,
            ObservationField::Composition => self.composition = value,
            ObservationField::MotifSymbol => self.motif_symbol = value,
            ObservationField::MoodEmotion => self.mood_emotion = value,
            ObservationField::Notes => self.notes = value,
        }
    }

    /// 空白を除いて値があるか
    pub fn has(&self, field: ObservationField) -> bool {
        !self.get(field).trim().is_empty()
    }

    /// 3段階進入時の初期値コピー
    ///
    /// `free_refined` が空の場合のみ `free` をコピーする。コピーした場合 true。
    pub fn seed_refined_from_free(&mut self) -> bool {
        if self.free_refined.trim().is_empty() {
            self.free_refined = self.free.clone();
            true
        } else {
            false
        }
    }
}

/// 作品の事前分析
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreAnalysis {
    pub id: String,
    pub key_features: Vec<String>,
    pub color: String,
    pub composition: String,
    pub form_texture: String,
    pub motif_symbol: String,
    pub mood_emotion: String,
    pub questions: Vec<String>,
}

impl PreAnalysis {
    /// プロンプトに載せる内容が何もないか
    pub fn is_empty(&self) -> bool {
        self.key_features.iter().all(|f| f.trim().is_empty())
            && [
                &self.color,
                &self.composition,
                &self.form_texture,
                &self.motif_symbol,
                &self.mood_emotion,
            ]
            .iter()
            .all(|s| s.trim().is_empty())
    }
}

/// プロンプトの詳細度プリセット
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    #[default]
    General,
    Detailed,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::General => "general",
            Preset::Detailed => "detailed",
        }
    }

    /// 保存値から復元（不明な値は None）
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "general" => Some(Preset::General),
            "detailed" => Some(Preset::Detailed),
            _ => None,
        }
    }
}

pub(crate) fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artwork_deserialize() {
        let json = r#"{
            "id": "starry-night",
            "title": "별이 빛나는 밤",
            "artist": "Vincent van Gogh",
            "year": 1889,
            "imageUrl": "https://example.com/starry.jpg",
            "tags": ["후기인상주의", "풍경"],
            "source": {"name": "MoMA", "url": "https://moma.org", "license": "Public Domain"}
        }"#;

        let artwork: Artwork = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(artwork.id, "starry-night");
        assert_eq!(artwork.year, "1889");
        assert_eq!(artwork.image_url, "https://example.com/starry.jpg");
        assert_eq!(artwork.tags.len(), 2);
        assert_eq!(artwork.source.license, "Public Domain");
        assert_eq!(artwork.caption(), "Vincent van Gogh · 1889");
    }

    #[test]
    fn test_artwork_deserialize_minimal() {
        let artwork: Artwork = serde_json::from_str(r#"{"id": "a"}"#).expect("デシリアライズ失敗");
        assert_eq!(artwork.id, "a");
        assert_eq!(artwork.year, "");
        assert!(artwork.tags.is_empty());
    }

    #[test]
    fn test_observation_partial_json_merges_defaults() {
        let obs: Observation =
            serde_json::from_str(r#"{"free": "하늘이 소용돌이친다", "color": "파랑"}"#).unwrap();
        assert_eq!(obs.free, "하늘이 소용돌이친다");
        assert_eq!(obs.color, "파랑");
        assert_eq!(obs.free_refined, "");
        assert_eq!(obs.notes, "");
    }

    #[test]
    fn test_observation_serialize_camel_case() {
        let obs = Observation {
            free_refined: "수정".into(),
            form_texture: "거친 붓질".into(),
            ..Default::default()
        };
        let json = serde_json::to_string(&obs).unwrap();
        assert!(json.contains("\"freeRefined\":\"수정\""));
        assert!(json.contains("\"formTexture\":\"거친 붓질\""));
    }

    #[test]
    fn test_observation_get_set_all_fields() {
        let mut obs = Observation::default();
        for field in ObservationField::ALL {
            obs.set(field, field.key());
        }
        for field in ObservationField::ALL {
            assert_eq!(obs.get(field), field.key());
        }
    }

    #[test]
    fn test_seed_refined_only_when_empty() {
        let mut obs = Observation {
            free: "색이 강렬하다".into(),
            ..Default::default()
        };
        assert!(obs.seed_refined_from_free());
        assert_eq!(obs.free_refined, "색이 강렬하다");

        obs.free = "다른 내용".into();
        assert!(!obs.seed_refined_from_free());
        assert_eq!(obs.free_refined, "색이 강렬하다");
    }

    #[test]
    fn test_seed_refined_replaces_blank() {
        let mut obs = Observation {
            free: "원본".into(),
            free_refined: "   ".into(),
            ..Default::default()
        };
        assert!(obs.seed_refined_from_free());
        assert_eq!(obs.free_refined, "원본");
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!(Preset::parse("general"), Some(Preset::General));
        assert_eq!(Preset::parse("detailed"), Some(Preset::Detailed));
        assert_eq!(Preset::parse("fancy"), None);
        assert_eq!(Preset::default().as_str(), "general");
    }

    #[test]
    fn test_pre_analysis_is_empty() {
        assert!(PreAnalysis::default().is_empty());
        let pre = PreAnalysis {
            key_features: vec!["소용돌이".into()],
            ..Default::default()
        };
        assert!(!pre.is_empty());
    }
}
