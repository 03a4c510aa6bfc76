//! ローカル代替ヒント
//!
//! AIヒントの取得に失敗したとき、入力の抜けや事前分析との差から
//! 補足質問を組み立てる。表示はAI側と揃えて上位2件のみ。

use crate::types::{Artwork, Observation, ObservationField, PreAnalysis};

/// 代替ヒントの見出し
pub const FALLBACK_HEADER: &str = "아래 보완 질문 (로컬 폴백):";

const PRE_ANALYSIS_HEADER: &str = "아래 보완 질문을 참고해 관찰을 더 구체화해 보세요:";

/// 事前分析の値を質問に引用するときの最大文字数
const QUOTE_MAX_CHARS: usize = 26;

/// 事前分析由来の質問の最低数（足りなければ作品固有の質問で補う）
const MIN_PRE_ANALYSIS_QUESTIONS: usize = 4;

const MAX_PRE_ANALYSIS_QUESTIONS: usize = 8;

const SURFACED_HINTS: usize = 2;

/// 入力の抜けに対する定型の提案
fn empty_field_suggestion(field: ObservationField) -> Option<&'static str> {
    match field {
        ObservationField::Free => Some("자유 관찰 요약을 1–2문장으로 먼저 적어보세요."),
        ObservationField::Color => {
            Some("색채에 대한 관찰이 비어 있어요. 주요 색과 대비를 적어보세요.")
        }
        ObservationField::Composition => {
            Some("구도/시점 언급이 없어요. 배치, 균형, 원근을 확인해보세요.")
        }
        ObservationField::FormTexture => {
            Some("형태/질감에 대해 더 적어보면 좋아요. 선, 붓질, 질감 등을 살펴보세요.")
        }
        ObservationField::MoodEmotion => Some("분위기/감정 표현을 추가하면 더 풍부해져요."),
        ObservationField::MotifSymbol => {
            Some("소재/상징 요소(사물, 배경의 의미)를 점검해보세요.")
        }
        ObservationField::FreeRefined | ObservationField::Notes => None,
    }
}

/// 完成度チェックの順序
const COMPLETENESS_ORDER: [ObservationField; 6] = [
    ObservationField::Free,
    ObservationField::Color,
    ObservationField::Composition,
    ObservationField::FormTexture,
    ObservationField::MoodEmotion,
    ObservationField::MotifSymbol,
];

/// 入力の抜けから代替ヒントを作る
///
/// 1行目は作品名（箇条書きではない）。以降は `- ` で始まる提案。
pub fn build_local_hints(artwork: &Artwork, observation: &Observation) -> String {
    let mut lines = vec![format!("선택 작품: {} ({})", artwork.title, artwork.artist)];

    if observation.has(ObservationField::Free) {
        lines.push("- 자유 관찰 요약은 좋습니다. 핵심어를 2–3개로 압축해보세요.".to_string());
    }

    lines.extend(
        COMPLETENESS_ORDER
            .iter()
            .filter(|f| !observation.has(**f))
            .filter_map(|f| empty_field_suggestion(*f))
            .map(|s| format!("- {}", s)),
    );

    lines.join("\n")
}

/// 事前分析と学生の記述の差から補足質問を作る
///
/// - 核心特徴のうち学生の文章に現れないもの（大小無視の部分一致）
/// - 学生の項目が空で、事前分析に値がある項目
/// - 自由観察が両方空なら第一印象を促す質問
/// - 4件未満なら作品固有の質問で補う
pub fn build_hints_from_pre_analysis(pre: &PreAnalysis, observation: &Observation) -> String {
    let student_text = ObservationField::ALL
        .iter()
        .map(|f| observation.get(*f))
        .collect::<Vec<_>>()
        .join(" \n ")
        .to_lowercase();

    let not_covered = |phrase: &str| {
        let phrase = phrase.trim().to_lowercase();
        !phrase.is_empty() && !student_text.contains(&phrase)
    };

    let mut questions: Vec<String> = Vec::new();

    for feature in &pre.key_features {
        if not_covered(feature) {
            push_question(
                &mut questions,
                &format!("핵심 특징 ‘{}’에 대한 설명을 한 줄 추가해볼까요?", shorten(feature)),
            );
        }
    }

    let targeted = [
        (
            ObservationField::Color,
            &pre.color,
            "색채(예: {})에 대한 관찰을 덧붙여 볼까요?",
        ),
        (
            ObservationField::Composition,
            &pre.composition,
            "구도/시선 흐름(예: {})을 어떻게 느꼈는지 적어볼까요?",
        ),
        (
            ObservationField::FormTexture,
            &pre.form_texture,
            "형태/질감(예: {})에서 인상적인 점을 추가해볼까요?",
        ),
        (
            ObservationField::MotifSymbol,
            &pre.motif_symbol,
            "소재/상징(예: {})의 의미를 한 줄로 정리해볼까요?",
        ),
        (
            ObservationField::MoodEmotion,
            &pre.mood_emotion,
            "분위기/감정(예: {})을 2–3개 키워드로 요약해볼까요?",
        ),
    ];
    for (field, reference, template) in targeted {
        if !observation.has(field) && !reference.trim().is_empty() {
            push_question(&mut questions, &template.replacen("{}", &shorten(reference), 1));
        }
    }

    if !observation.has(ObservationField::Free) && !observation.has(ObservationField::FreeRefined) {
        push_question(
            &mut questions,
            "자유 관찰(요약)에서 작품의 첫인상/핵심 인상을 1–2문장으로 적어볼까요?",
        );
    }

    let shortfall = MIN_PRE_ANALYSIS_QUESTIONS.saturating_sub(questions.len());
    for q in pre.questions.iter().take(shortfall) {
        push_question(&mut questions, q);
    }

    if questions.is_empty() {
        push_question(
            &mut questions,
            "아주 좋아요. 핵심을 잘 짚었습니다. 마지막으로 한 문장으로 요약해볼까요?",
        );
    }

    std::iter::once(PRE_ANALYSIS_HEADER.to_string())
        .chain(questions.into_iter().take(MAX_PRE_ANALYSIS_QUESTIONS))
        .collect::<Vec<_>>()
        .join("\n")
}

/// 表示用の代替ヒント（見出し + 上位2件）
///
/// 事前分析があればそちらを優先する。箇条書きが1件も取れなければ定型の2件。
pub fn surface_fallback_hints(
    artwork: &Artwork,
    observation: &Observation,
    pre: Option<&PreAnalysis>,
) -> String {
    let full = match pre {
        Some(pre) => build_hints_from_pre_analysis(pre, observation),
        None => build_local_hints(artwork, observation),
    };

    let top: Vec<&str> = full
        .lines()
        .filter(|line| line.trim_start().starts_with("- "))
        .take(SURFACED_HINTS)
        .collect();

    if top.is_empty() {
        format!(
            "{}\n- 자유 관찰 핵심을 1–2문장으로 적어볼까요?\n- 색/구도 중 한 가지를 골라 한 줄로 보완해볼까요?",
            FALLBACK_HEADER
        )
    } else {
        format!("{}\n{}", FALLBACK_HEADER, top.join("\n"))
    }
}

fn push_question(questions: &mut Vec<String>, question: &str) {
    let question = question.trim();
    if !question.is_empty() {
        questions.push(format!("- {}", question));
    }
}

fn shorten(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() > QUOTE_MAX_CHARS {
        let head: String = text.chars().take(QUOTE_MAX_CHARS).collect();
        format!("{}…", head)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artwork() -> Artwork {
        Artwork {
            id: "starry".into(),
            title: "별이 빛나는 밤".into(),
            artist: "반 고흐".into(),
            ..Default::default()
        }
    }

    fn pre() -> PreAnalysis {
        PreAnalysis {
            id: "starry".into(),
            key_features: vec!["소용돌이".into(), "Cypress".into()],
            color: "짙은 파랑과 노랑".into(),
            composition: "왼쪽의 사이프러스 나무가 화면을 세로로 가르고 마을은 아래에 낮게 깔린다".into(),
            questions: vec!["별은 몇 개인가요?".into(), "마을은 어디에 있나요?".into()],
            ..Default::default()
        }
    }

    fn bullets(text: &str) -> Vec<&str> {
        text.lines().filter(|l| l.starts_with("- ")).collect()
    }

    // =============================================
    // build_local_hints テスト
    // =============================================

    #[test]
    fn test_local_hints_empty_observation() {
        let hints = build_local_hints(&artwork(), &Observation::default());
        let lines: Vec<&str> = hints.lines().collect();
        assert_eq!(lines[0], "선택 작품: 별이 빛나는 밤 (반 고흐)");
        assert_eq!(bullets(&hints).len(), 6);
        assert_eq!(lines[1], "- 자유 관찰 요약을 1–2문장으로 먼저 적어보세요.");
        assert!(lines[2].contains("색채"));
    }

    #[test]
    fn test_local_hints_flags_only_empty_fields() {
        let obs = Observation {
            free: "하늘이 움직인다".into(),
            color: "파랑".into(),
            composition: "대각선".into(),
            form_texture: "두꺼운 붓질".into(),
            motif_symbol: "별".into(),
            ..Default::default()
        };
        let hints = build_local_hints(&artwork(), &obs);
        let b = bullets(&hints);
        assert_eq!(b.len(), 2);
        assert!(b[0].contains("핵심어를 2–3개로 압축"));
        assert!(b[1].contains("분위기/감정"));
    }

    // =============================================
    // build_hints_from_pre_analysis テスト
    // =============================================

    #[test]
    fn test_pre_analysis_uncovered_features() {
        let obs = Observation {
            free: "하늘에 큰 소용돌이가 있다".into(),
            color: "파랑".into(),
            composition: "나무가 왼쪽에".into(),
            ..Default::default()
        };
        let hints = build_hints_from_pre_analysis(&pre(), &obs);
        assert!(hints.starts_with(PRE_ANALYSIS_HEADER));
        assert!(!hints.contains("‘소용돌이’"));
        assert!(hints.contains("핵심 특징 ‘Cypress’"));
    }

    #[test]
    fn test_pre_analysis_case_insensitive_match() {
        let obs = Observation {
            notes: "the CYPRESS tree".into(),
            ..Default::default()
        };
        let hints = build_hints_from_pre_analysis(&pre(), &obs);
        assert!(!hints.contains("‘Cypress’"));
    }

    #[test]
    fn test_pre_analysis_targeted_questions_shortened() {
        let hints = build_hints_from_pre_analysis(&pre(), &Observation::default());
        assert!(hints.contains("색채(예: 짙은 파랑과 노랑)에 대한 관찰을 덧붙여 볼까요?"));
        // 26文字を超える引用は省略記号付きで切り詰める
        let expected: String = pre().composition.chars().take(26).collect();
        assert!(hints.contains(&format!("구도/시선 흐름(예: {}…)", expected)));
        assert!(hints.contains("첫인상/핵심 인상"));
    }

    #[test]
    fn test_pre_analysis_tops_up_from_questions() {
        let obs = Observation {
            free: "소용돌이 cypress".into(),
            color: "노랑".into(),
            composition: "세로".into(),
            ..Default::default()
        };
        let hints = build_hints_from_pre_analysis(&pre(), &obs);
        let b = bullets(&hints);
        assert_eq!(b, vec!["- 별은 몇 개인가요?", "- 마을은 어디에 있나요?"]);
    }

    #[test]
    fn test_pre_analysis_praise_when_nothing_missing() {
        let pre = PreAnalysis {
            key_features: vec!["별".into()],
            ..Default::default()
        };
        let obs = Observation {
            free: "별이 많다".into(),
            ..Default::default()
        };
        let hints = build_hints_from_pre_analysis(&pre, &obs);
        assert_eq!(bullets(&hints), vec!["- 아주 좋아요. 핵심을 잘 짚었습니다. 마지막으로 한 문장으로 요약해볼까요?"]);
    }

    #[test]
    fn test_pre_analysis_caps_at_eight() {
        let pre = PreAnalysis {
            key_features: (0..12).map(|i| format!("특징{}", i)).collect(),
            ..Default::default()
        };
        let hints = build_hints_from_pre_analysis(&pre, &Observation::default());
        assert_eq!(bullets(&hints).len(), 8);
    }

    // =============================================
    // surface_fallback_hints テスト
    // =============================================

    #[test]
    fn test_surface_two_lines_with_header() {
        let hints = surface_fallback_hints(&artwork(), &Observation::default(), None);
        let lines: Vec<&str> = hints.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], FALLBACK_HEADER);
        assert!(lines[1].starts_with("- ") && lines[2].starts_with("- "));
    }

    #[test]
    fn test_surface_prefers_pre_analysis() {
        let hints = surface_fallback_hints(&artwork(), &Observation::default(), Some(&pre()));
        assert!(hints.contains("핵심 특징 ‘소용돌이’"));
        assert!(!hints.contains("선택 작품"));
    }

    #[test]
    fn test_surface_single_bullet() {
        let obs = Observation {
            free: "a".into(),
            color: "b".into(),
            composition: "c".into(),
            form_texture: "d".into(),
            motif_symbol: "e".into(),
            mood_emotion: "f".into(),
            ..Default::default()
        };
        let hints = surface_fallback_hints(&artwork(), &obs, None);
        assert_eq!(bullets(&hints).len(), 1);
    }

    #[test]
    fn test_shorten() {
        assert_eq!(shorten("  짧다 "), "짧다");
        let long = "가".repeat(30);
        assert_eq!(shorten(&long), format!("{}…", "가".repeat(26)));
    }
}
