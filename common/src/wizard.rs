//! 4段階ウィザードの状態機械
//!
//! 作品選択 → 観察 → 修正 → プロンプト。
//! 遷移表 `transition` は純粋関数で、UIに依存しない。
//! `Wizard` はセッション・現在の段階・編集中のプロンプト・ヒント・
//! 実行中フラグ・一時通知を持ち、変更のたびにストアへ保存する。

use std::collections::HashSet;

use thiserror::Error;

use crate::api::{HintRequest, PromptRequest};
use crate::catalog::Catalog;
use crate::error::Result;
use crate::fallback::surface_fallback_hints;
use crate::prompts::{build_prompt_preview, fallback_image_prompt};
use crate::session::{KeyValueStore, Session};
use crate::types::{Artwork, Observation, ObservationField, Preset};

pub const NOTICE_SELECT_FIRST: &str = "작품을 먼저 선택하세요";
pub const NOTICE_REFINED_MISSING: &str = "3단계에서 수정 관찰을 먼저 작성하세요";
pub const NOTICE_PROMPT_FALLBACK: &str = "AI 프롬프트 생성 실패, 로컬 형식으로 대체";
pub const NOTICE_RESET: &str = "초기화 완료";
pub const NOTICE_DRAFT_MISSING: &str = "저장된 내용이 없습니다";
pub const NOTICE_DRAFT_RESTORED: &str = "임시 저장 불러옴";
pub const NOTICE_DRAFT_FAILED: &str = "복원 실패";

/// 処理中モーダルの文言
pub const PROCESSING_MESSAGE: &str = "인공지능이 사용자의 입력을 정리하고 있습니다.";
pub const HINTS_PENDING: &str = "분석을 준비하고 있습니다...";

/// ウィザードの段階
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Step {
    #[default]
    Select,
    Observe,
    Refine,
    Summary,
}

impl Step {
    pub const ALL: [Step; 4] = [Step::Select, Step::Observe, Step::Refine, Step::Summary];

    /// 1始まりの段階番号
    pub fn number(&self) -> u8 {
        match self {
            Step::Select => 1,
            Step::Observe => 2,
            Step::Refine => 3,
            Step::Summary => 4,
        }
    }

    pub fn from_number(number: u8) -> Option<Step> {
        Step::ALL.into_iter().find(|s| s.number() == number)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Step::Select => "작품 선택",
            Step::Observe => "관찰하기",
            Step::Refine => "수정하기",
            Step::Summary => "프롬프트 만들기",
        }
    }

    fn next(&self) -> Option<Step> {
        Step::from_number(self.number() + 1)
    }

    fn prev(&self) -> Option<Step> {
        self.number().checked_sub(1).and_then(Step::from_number)
    }
}

/// 遷移のきっかけ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Next,
    Back,
    GoTo(Step),
    Reset,
}

/// 遷移に伴う副作用（適用は `Wizard` 側）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// 修正観察が空なら自由観察をコピー
    SeedRefined,
    /// 画像プロンプトを生成（完了まで書き出し不可）
    GeneratePrompt,
    ClearSession,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: Step,
    pub to: Step,
    pub effects: Vec<Effect>,
}

/// 二重実行を防ぐ非同期処理の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Hints,
    PromptGeneration,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("작품을 먼저 선택하세요")]
    NoArtworkSelected,

    #[error("no step for {event:?} from {from:?}")]
    NoSuchStep { from: Step, event: Event },
}

/// 遷移表
///
/// 作品未選択のまま選択画面より先へは進めない。戻る操作は常に可能。
pub fn transition(
    from: Step,
    event: Event,
    session: &Session,
) -> std::result::Result<Transition, WizardError> {
    let to = match event {
        Event::Reset => {
            return Ok(Transition {
                from,
                to: Step::Select,
                effects: vec![Effect::ClearSession],
            })
        }
        Event::Next => from.next().ok_or(WizardError::NoSuchStep { from, event })?,
        Event::Back => from.prev().ok_or(WizardError::NoSuchStep { from, event })?,
        Event::GoTo(target) => target,
    };

    if to != Step::Select && !session.has_selection() {
        return Err(WizardError::NoArtworkSelected);
    }

    let effects = match to {
        Step::Refine => vec![Effect::SeedRefined],
        Step::Summary => vec![Effect::GeneratePrompt],
        Step::Select | Step::Observe => Vec::new(),
    };

    Ok(Transition { from, to, effects })
}

/// 相対URLをオリジン基準の絶対URLにする
pub fn absolutize_url(url: &str, origin: &str) -> String {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }
    let origin = origin.trim_end_matches('/');
    let path = url.trim_start_matches("./").trim_start_matches('/');
    format!("{}/{}", origin, path)
}

/// ウィザードのコントローラ
pub struct Wizard<S: KeyValueStore> {
    store: S,
    catalog: Catalog,
    session: Session,
    step: Step,
    prompt_text: String,
    hints: String,
    export_blocked: bool,
    in_flight: HashSet<Action>,
    notice: Option<String>,
}

impl<S: KeyValueStore> Wizard<S> {
    /// 保存済みセッションから開始（段階は常に作品選択から）
    pub fn restore(store: S, catalog: Catalog) -> Self {
        let session = Session::restore(&store, &catalog);
        Self {
            store,
            catalog,
            session,
            step: Step::Select,
            prompt_text: String::new(),
            hints: String::new(),
            export_blocked: false,
            in_flight: HashSet::new(),
            notice: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn observation(&self) -> &Observation {
        &self.session.observation
    }

    pub fn preset(&self) -> Preset {
        self.session.preset
    }

    pub fn selected(&self) -> Option<&Artwork> {
        self.session.selected(&self.catalog)
    }

    pub fn prompt_text(&self) -> &str {
        &self.prompt_text
    }

    pub fn hints(&self) -> &str {
        &self.hints
    }

    pub fn is_busy(&self, action: Action) -> bool {
        self.in_flight.contains(&action)
    }

    pub fn export_blocked(&self) -> bool {
        self.export_blocked
    }

    /// 一時通知を取り出す（表示側が消費する）
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    /// セッションをストアへ書き込む
    pub fn save(&mut self) -> Result<()> {
        self.session.persist(&mut self.store)
    }

    // 保存失敗は入力を失わせないため無視する
    fn save_quietly(&mut self) {
        let _ = self.save();
    }

    /// 作品を選択（カタログにないIDは false）
    pub fn select(&mut self, id: &str) -> bool {
        if self.catalog.find(id).is_none() {
            return false;
        }
        if self.session.selected_artwork_id.as_deref() != Some(id) {
            self.hints.clear();
        }
        self.session.selected_artwork_id = Some(id.to_string());
        self.save_quietly();
        true
    }

    pub fn set_field(&mut self, field: ObservationField, value: impl Into<String>) {
        self.session.observation.set(field, value);
        self.save_quietly();
    }

    pub fn set_preset(&mut self, preset: Preset) {
        self.session.preset = preset;
        self.save_quietly();
    }

    /// 4段階目のエディタ入力
    pub fn set_prompt_text(&mut self, text: impl Into<String>) {
        self.prompt_text = text.into();
    }

    /// イベントを適用して段階を進める
    ///
    /// `GeneratePrompt` を含む遷移の後、呼び出し側は `begin_prompt_generation` を呼ぶ。
    pub fn dispatch(&mut self, event: Event) -> std::result::Result<Transition, WizardError> {
        let t = transition(self.step, event, &self.session)?;
        for effect in &t.effects {
            match effect {
                Effect::SeedRefined => {
                    if self.session.observation.seed_refined_from_free() {
                        self.save_quietly();
                    }
                }
                Effect::GeneratePrompt => self.export_blocked = true,
                Effect::ClearSession => self.clear(),
            }
        }
        self.step = t.to;
        Ok(t)
    }

    /// 全消去して作品選択に戻る（確認はUI側）
    pub fn reset(&mut self) {
        // Reset は常に成功する
        let _ = self.dispatch(Event::Reset);
        self.notify(NOTICE_RESET);
    }

    fn clear(&mut self) {
        let _ = Session::clear(&mut self.store);
        self.session = Session::default();
        self.prompt_text.clear();
        self.hints.clear();
        self.export_blocked = false;
    }

    /// 画像プロンプト生成の開始
    ///
    /// 実行中なら None。修正観察が空なら通知を出してプロンプトを空にする。
    pub fn begin_prompt_generation(&mut self) -> Option<PromptRequest> {
        if self.is_busy(Action::PromptGeneration) {
            return None;
        }

        let Some(artwork) = self.selected() else {
            self.export_blocked = false;
            self.notify(NOTICE_SELECT_FIRST);
            return None;
        };
        let (title, artist) = (artwork.title.clone(), artwork.artist.clone());

        let refined = self.session.observation.free_refined.trim().to_string();
        if refined.is_empty() {
            self.prompt_text.clear();
            self.export_blocked = false;
            self.notify(NOTICE_REFINED_MISSING);
            return None;
        }

        self.in_flight.insert(Action::PromptGeneration);
        Some(PromptRequest {
            refined_text: refined,
            title,
            artist,
        })
    }

    /// 画像プロンプト生成の完了
    ///
    /// 失敗時はエディタが空ならローカル整形で埋め、通知を出す。
    pub fn finish_prompt_generation(&mut self, result: std::result::Result<String, String>) {
        self.in_flight.remove(&Action::PromptGeneration);
        self.export_blocked = false;

        match result {
            Ok(prompt) => self.prompt_text = prompt.trim().to_string(),
            Err(_) => {
                // エディタに入力済みならそのまま残す
                if self.prompt_text.trim().is_empty() {
                    self.prompt_text =
                        fallback_image_prompt(&self.session.observation.free_refined);
                }
                self.notify(NOTICE_PROMPT_FALLBACK);
            }
        }
    }

    /// AIヒント取得の開始
    ///
    /// `origin` は相対画像URLの解決に使う。
    pub fn begin_hints(&mut self, origin: &str) -> Option<HintRequest> {
        if self.is_busy(Action::Hints) {
            return None;
        }
        let Some(artwork) = self.selected() else {
            self.notify(NOTICE_SELECT_FIRST);
            return None;
        };

        let request = HintRequest::for_artwork(
            artwork,
            absolutize_url(&artwork.image_url, origin),
            &self.session.observation,
            self.catalog.analysis_for(&artwork.id),
        );

        self.in_flight.insert(Action::Hints);
        self.hints = HINTS_PENDING.to_string();
        Some(request)
    }

    /// AIヒント取得の完了
    ///
    /// 失敗時は事前分析または入力の抜けから2件の代替ヒントを出す。
    pub fn finish_hints(&mut self, result: std::result::Result<String, String>) {
        self.in_flight.remove(&Action::Hints);

        let hints = match (result, self.selected()) {
            (Ok(hints), _) => hints,
            (Err(_), Some(artwork)) => surface_fallback_hints(
                artwork,
                &self.session.observation,
                self.catalog.analysis_for(&artwork.id),
            ),
            (Err(_), None) => String::new(),
        };
        self.hints = hints;
    }

    /// 保存済みの観察を読み直す
    pub fn restore_draft(&mut self) {
        match Session::load_draft(&self.store) {
            Ok(None) => self.notify(NOTICE_DRAFT_MISSING),
            Ok(Some(observation)) => {
                self.session.observation = observation;
                self.notify(NOTICE_DRAFT_RESTORED);
            }
            Err(_) => self.notify(NOTICE_DRAFT_FAILED),
        }
    }

    /// ローカルのプロンプトプレビュー
    pub fn prompt_preview(&self) -> String {
        build_prompt_preview(self.selected(), &self.session.observation, self.session.preset)
    }

    /// 要約欄の箇条書き（修正観察を優先）
    pub fn observation_summary(&self) -> Vec<String> {
        let o = &self.session.observation;
        let mut items = Vec::new();
        if !o.free_refined.is_empty() {
            items.push(format!("자유 관찰(수정): {}", o.free_refined));
        } else if !o.free.is_empty() {
            items.push(format!("자유 관찰: {}", o.free));
        }
        items.extend(
            ObservationField::STRUCTURED
                .into_iter()
                .chain([ObservationField::Notes])
                .filter(|f| !o.get(*f).is_empty())
                .map(|f| format!("{}: {}", f.label(), o.get(f))),
        );
        items
    }

    /// 4段階目の観察一覧（全項目）
    pub fn observation_preview(&self) -> String {
        let o = &self.session.observation;
        ObservationField::ALL
            .into_iter()
            .filter(|f| !o.get(*f).is_empty())
            .map(|f| format!("{}: {}", f.label(), o.get(f)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// コピー・保存の対象（エディタ優先、空ならプレビュー）
    pub fn export_text(&self) -> Option<String> {
        let text = if !self.prompt_text.trim().is_empty() {
            self.prompt_text.clone()
        } else if self.step == Step::Summary {
            String::new()
        } else {
            self.prompt_preview()
        };
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// 書き出しボタンの有効判定
    pub fn can_export(&self) -> bool {
        if self.step == Step::Summary {
            return !self.export_blocked && !self.prompt_text.trim().is_empty();
        }
        let o = &self.session.observation;
        !self.prompt_preview().is_empty()
            && (o.has(ObservationField::FreeRefined) || o.has(ObservationField::Free))
    }

    /// 保存ファイル名 `prompt-<題名>-<日付>.txt`
    pub fn export_file_name(&self, date: &str) -> String {
        let title = self
            .selected()
            .map(|a| a.title.split_whitespace().collect::<Vec<_>>().join("_"))
            .unwrap_or_else(|| "art".to_string());
        format!("prompt-{}-{}.txt", title, date)
    }
}
