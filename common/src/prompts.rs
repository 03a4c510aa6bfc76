//! プロンプト生成モジュール
//!
//! サーバーとWeb(WASM)で共有されるプロンプト生成ロジック:
//! - build_hint_prompt: AIヒント（質問2つ）用プロンプト
//! - build_image_prompt_instruction: 画像生成プロンプト整形用の指示文
//! - build_prompt_preview: ローカルのプロンプトプレビュー（プリセット別）
//! - refine_user_prompt_text / fallback_image_prompt: AI失敗時のローカル整形

use crate::types::{Artwork, Observation, ObservationField, PreAnalysis, Preset};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref PROMPT_SEPARATORS: Regex = Regex::new(r"[,;·•∙●/|\x{2215}\r\n]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// プロンプトに差し込む作品メタデータ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtworkMeta {
    pub title: String,
    pub artist: String,
    pub year: String,
}

impl From<&Artwork> for ArtworkMeta {
    fn from(artwork: &Artwork) -> Self {
        Self {
            title: artwork.title.clone(),
            artist: artwork.artist.clone(),
            year: artwork.year.clone(),
        }
    }
}

impl ArtworkMeta {
    /// `제목 (작가, 연도)` 形式。年が空なら `제목 (작가)`
    pub fn heading(&self) -> String {
        if self.year.trim().is_empty() {
            format!("{} ({})", self.title, self.artist)
        } else {
            format!("{} ({}, {})", self.title, self.artist, self.year)
        }
    }
}

/// AIヒント用プロンプト生成
///
/// 画像と学生の文章を比べ、すぐ直せる補足を「質問2つ」で求める。
/// 事前分析・構造化観察は値があるものだけを載せ、空ならセクションごと省く。
///
/// # Arguments
/// * `meta` - 作品メタデータ
/// * `free_text` - 学生の自由観察（下書き）
/// * `analysis` - 作品の事前分析（任意）
/// * `observation` - 学生の構造化観察（任意）
pub fn build_hint_prompt(
    meta: &ArtworkMeta,
    free_text: &str,
    analysis: Option<&PreAnalysis>,
    observation: Option<&Observation>,
) -> String {
    let mut prompt = format!(
        r#"선택 작품: {heading}
대상: 초등학교 4학년.
역할: 그림(이미지)과 학생의 글을 비교하여, 학생이 바로 고칠 수 있는 가장 중요한 보완 2가지를 '질문' 형태로 제시해 주세요.
규칙:
- 두 개의 질문만 출력 (각 1문장).
- 쉬운 한국어, 간단한 질문 (가능하면 20~30자).
- 새로운 내용 추정/추가 금지. 이미지와 학생 글의 차이에만 근거.
- 각 질문은 큰따옴표로 감싸고 물음표로 끝내기.
- 번호/불릿/설명/접두 문구 없이 질문만, 각 질문은 줄바꿈으로 구분.

"#,
        heading = meta.heading()
    );

    if let Some(section) = analysis.and_then(analysis_section) {
        prompt.push_str("[작품 사전 분석 (참고용)]\n");
        prompt.push_str(&section);
        prompt.push_str("\n\n");
    }

    if let Some(section) = observation.and_then(observation_section) {
        prompt.push_str("[학생 항목별 관찰]\n");
        prompt.push_str(&section);
        prompt.push_str("\n\n");
    }

    prompt.push_str("[학생 자유 관찰 초안]\n");
    prompt.push_str(free_text.trim());
    prompt.push('\n');
    prompt
}

fn analysis_section(pre: &PreAnalysis) -> Option<String> {
    let mut lines = Vec::new();

    let features: Vec<&str> = pre
        .key_features
        .iter()
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .collect();
    if !features.is_empty() {
        lines.push(format!("- 핵심 특징: {}", features.join(", ")));
    }

    for (label, value) in [
        ("색채", &pre.color),
        ("구도/시점", &pre.composition),
        ("형태/질감", &pre.form_texture),
        ("소재/상징", &pre.motif_symbol),
        ("분위기/감정", &pre.mood_emotion),
    ] {
        if !value.trim().is_empty() {
            lines.push(format!("- {}: {}", label, value.trim()));
        }
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn observation_section(observation: &Observation) -> Option<String> {
    let lines: Vec<String> = ObservationField::ALL
        .iter()
        .filter(|f| !matches!(f, ObservationField::Free))
        .filter(|f| observation.has(**f))
        .map(|f| format!("- {}: {}", f.label(), observation.get(*f).trim()))
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// 画像生成プロンプト整形の指示文
///
/// 「수정 관찰(요약)」のテキストだけを使って1文にまとめるよう指示する。
pub fn build_image_prompt_instruction(refined_text: &str) -> String {
    [
        "아래 '수정 관찰(요약)' 텍스트만 사용하여, 새로운 내용을 추가하지 말고 자연스러운 한국어 한 문장으로 정리하세요.",
        "- 핵심 명사/형용사/관계어를 보존하고, 의미가 겹치는 표현은 병합",
        "- 불필요한 조사/어미/군더더기 제거",
        "- 제목/작품명/원작/느낀/반영 등의 단어 사용 금지",
        "- 결과는 한 문장(마침표 하나)만 출력. 접두/해설/따옴표/코드블록 금지",
        &format!("\n[수정 관찰(요약)]\n{}", refined_text.trim()),
    ]
    .join("\n")
}

/// ローカルのプロンプトプレビュー
///
/// 作品未選択なら空文字。
pub fn build_prompt_preview(
    artwork: Option<&Artwork>,
    observation: &Observation,
    preset: Preset,
) -> String {
    let Some(artwork) = artwork else {
        return String::new();
    };

    let o = observation;
    let mut parts = Vec::new();
    if !o.free_refined.is_empty() {
        parts.push(format!("자유 관찰(수정): {}", o.free_refined));
    } else if !o.free.is_empty() {
        parts.push(format!("자유 관찰 요약: {}", o.free));
    }
    for field in [
        ObservationField::Color,
        ObservationField::FormTexture,
        ObservationField::Composition,
        ObservationField::MotifSymbol,
        ObservationField::MoodEmotion,
    ] {
        let value = o.get(field);
        if !value.is_empty() {
            parts.push(format!("{}: {}", field.label(), value));
        }
    }
    let parts = parts.join(", ");

    match preset {
        Preset::Detailed => format!(
            "원작 '{}'( {}, {} )의 관찰 요소를 반영하여, {}. 원작의 주요 특성을 유지하되, 불필요한 텍스트/워터마크/프레임 없이 고해상도 이미지를 생성.",
            artwork.title, artwork.artist, artwork.year, parts
        ),
        Preset::General => format!(
            "{}에서 느낀 핵심 특징을 반영: {}. 원작 분위기에 가깝게.",
            artwork.title, parts
        ),
    }
}

/// 学生の入力を句読点区切りの一文に整える（内容は足さない）
///
/// 改行・中黒・スラッシュ・セミコロン等を区切りとみなし、
/// 重複を除いて「, 」で連結する。
pub fn refine_user_prompt_text(raw: &str) -> String {
    let mut seen = HashSet::new();
    PROMPT_SEPARATORS
        .split(raw)
        .map(|chunk| WHITESPACE.replace_all(chunk, " ").trim().to_string())
        .filter(|chunk| !chunk.is_empty())
        .filter(|chunk| seen.insert(chunk.clone()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// AI失敗時の画像プロンプト
pub fn fallback_image_prompt(refined_text: &str) -> String {
    let body = refine_user_prompt_text(refined_text);
    if body.is_empty() {
        String::new()
    } else {
        format!("{}를(을) 반영한 한 장면.", body)
    }
}
