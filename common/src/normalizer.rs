//! AIレスポンス整形
//!
//! Geminiの生テキストを画面表示用に整える:
//! - normalize_hints: 最大2行の「"質問?"」形式に変換
//! - clean_prompt_text: 画像生成プロンプトの前置き・引用符・改行を除去

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// 「프롬프트:」などの見出し
    static ref LABEL_PREFIX: Regex = Regex::new(r"(?i)^\s*프롬프트\s*[:：\-]\s*").unwrap();
    static ref WRAP_BACKTICKS: Regex = Regex::new(r"^`+|`+$").unwrap();
    static ref WRAP_QUOTES: Regex = Regex::new(r#"^"+|"+$"#).unwrap();
    static ref TABS: Regex = Regex::new(r"\t+").unwrap();
    static ref NEWLINES: Regex = Regex::new(r"[\r\n]+").unwrap();
    static ref BULLETS: Regex = Regex::new(r"[•·\-]\s*").unwrap();
    static ref LEADING_BULLET: Regex = Regex::new(r"^[•·\-]+\s*").unwrap();
    static ref MULTI_SPACE: Regex = Regex::new(r"\s{2,}").unwrap();
    static ref TRAILING_PUNCT: Regex = Regex::new(r"[.!…]+$").unwrap();
}

/// 文末とみなす文字
const SENTENCE_TERMINALS: [char; 4] = ['.', '!', '?', '…'];

/// 表示する質問の最大数
pub const MAX_HINTS: usize = 2;

/// ヒント用の生テキストを最大2つの質問に整形
///
/// 各行は `"...?"` の形（二重引用符で囲み、疑問符で終わる）。
/// 文が1つも取れない場合は全体を1つの質問として扱う。
/// 空入力は `"?"` になる。
///
/// # Examples
/// ```
/// use art_observe_common::normalize_hints;
///
/// let hints = normalize_hints("색이 강렬하다. 배경이 단순하다.");
/// assert_eq!(hints, "\"색이 강렬하다?\"\n\"배경이 단순하다?\"");
/// ```
pub fn normalize_hints(raw: &str) -> String {
    let cleaned = clean_hint_text(raw);

    let sentences: Vec<String> = split_sentences(&cleaned)
        .into_iter()
        .map(|s| MULTI_SPACE.replace_all(&s, " ").trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let units: Vec<&str> = if sentences.is_empty() {
        vec![cleaned.as_str()]
    } else {
        sentences.iter().take(MAX_HINTS).map(String::as_str).collect()
    };

    units
        .into_iter()
        .map(to_quoted_question)
        .collect::<Vec<_>>()
        .join("\n")
}

/// 画像生成プロンプトの後処理
///
/// 見出し・外側のバッククォート/引用符を除き、改行は「, 」に置き換える。
pub fn clean_prompt_text(raw: &str) -> String {
    let text = raw.trim();
    let text = LABEL_PREFIX.replace(text, "");
    let text = WRAP_BACKTICKS.replace_all(&text, "");
    let text = WRAP_QUOTES.replace_all(&text, "");
    let text = NEWLINES.replace_all(&text, ", ");
    text.trim().to_string()
}

fn clean_hint_text(raw: &str) -> String {
    let text = raw.trim();
    let text = LABEL_PREFIX.replace(text, "");
    let text = WRAP_BACKTICKS.replace_all(&text, "");
    let text = WRAP_QUOTES.replace_all(&text, "");
    let text = TABS.replace_all(&text, " ");
    let text = NEWLINES.replace_all(&text, " ");
    BULLETS.replace_all(&text, "").into_owned()
}

/// 1パスで文に分割
///
/// 文末文字を見るたびにバッファを確定する。末尾の未終端バッファも1文とする。
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        current.push(ch);
        if SENTENCE_TERMINALS.contains(&ch) {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                sentences.push(trimmed.to_string());
            }
            current.clear();
        }
    }

    let rest = current.trim();
    if !rest.is_empty() {
        sentences.push(rest.to_string());
    }

    sentences
}

fn to_quoted_question(unit: &str) -> String {
    // `" "질문?` のように引用符と空白が交互に残るため、まとめて剥がす
    let text = unit.trim_matches(|c: char| c == '`' || c == '"' || c.is_whitespace());
    let text = LEADING_BULLET.replace(text, "");
    let text = TRAILING_PUNCT.replace(&text, "");

    if text.ends_with('?') {
        format!("\"{}\"", text)
    } else {
        format!("\"{}?\"", text)
    }
}
