//! メインアプリケーションコンポーネント
//!
//! ウィザードの状態はすべて `Wizard` が持ち、画面はそれを読むだけ。

use art_observe_common::{Catalog, Effect, Event, Step, Wizard};
use gloo::timers::callback::Timeout;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::api;
use crate::components::{
    artwork_grid::ArtworkGrid,
    observation_form::ObservationForm,
    overlays::{ProcessingModal, Toast},
    refine_step::RefineStep,
    stepper::{Header, Stepper},
    summary_step::SummaryStep,
};
use crate::storage::LocalStore;

/// トースト表示時間（ミリ秒）
const TOAST_MS: u32 = 1600;

/// 画面全体で共有する状態
#[derive(Clone, Copy)]
pub struct AppContext {
    /// データセット読み込み前は None
    pub wizard: RwSignal<Option<Wizard<LocalStore>>>,
    pub toast: RwSignal<Option<String>>,
    toast_seq: RwSignal<u32>,
    pub load_error: RwSignal<Option<String>>,
}

impl AppContext {
    fn new() -> Self {
        Self {
            wizard: RwSignal::new(None),
            toast: RwSignal::new(None),
            toast_seq: RwSignal::new(0),
            load_error: RwSignal::new(None),
        }
    }

    /// ウィザードを読む（リアクティブ）
    pub fn read<R>(&self, f: impl FnOnce(&Wizard<LocalStore>) -> R) -> Option<R> {
        self.wizard.with(|w| w.as_ref().map(f))
    }

    pub fn read_untracked<R>(&self, f: impl FnOnce(&Wizard<LocalStore>) -> R) -> Option<R> {
        self.wizard.with_untracked(|w| w.as_ref().map(f))
    }

    /// ウィザードを更新し、出た通知をトーストにする
    pub fn update<R>(&self, f: impl FnOnce(&mut Wizard<LocalStore>) -> R) -> Option<R> {
        let (result, notice) = self
            .wizard
            .try_update(|w| {
                w.as_mut().map(|w| {
                    let result = f(w);
                    (result, w.take_notice())
                })
            })
            .flatten()?;
        if let Some(message) = notice {
            self.show_toast(message);
        }
        Some(result)
    }

    pub fn show_toast(&self, message: impl Into<String>) {
        let seq = self.toast_seq.get_untracked().wrapping_add(1);
        self.toast_seq.set(seq);
        self.toast.set(Some(message.into()));

        let ctx = *self;
        Timeout::new(TOAST_MS, move || {
            // 後から出たトーストは消さない
            if ctx.toast_seq.get_untracked() == seq {
                ctx.toast.set(None);
            }
        })
        .forget();
    }

    pub fn step(&self) -> Step {
        self.read(|w| w.step()).unwrap_or_default()
    }

    /// 段階を移動（4段階目に入ったらプロンプト生成を始める）
    pub fn go(&self, event: Event) {
        let Some(result) = self.update(|w| w.dispatch(event)) else {
            return;
        };
        match result {
            Ok(transition) => {
                if transition.effects.contains(&Effect::GeneratePrompt) {
                    self.generate_prompt();
                }
                scroll_to_top();
            }
            Err(e) => self.show_toast(e.to_string()),
        }
    }

    /// 画像プロンプトの生成（実行中なら何もしない）
    pub fn generate_prompt(&self) {
        let Some(request) = self.update(|w| w.begin_prompt_generation()).flatten() else {
            return;
        };
        let ctx = *self;
        spawn_local(async move {
            let result = api::generate_prompt(&request).await;
            if let Err(e) = &result {
                gloo::console::warn!(format!("generate_prompt failed: {}", e));
            }
            ctx.update(|w| w.finish_prompt_generation(result));
        });
    }

    /// AIヒントの取得（失敗時は代替ヒント）
    pub fn request_hints(&self) {
        let origin = api::origin();
        let Some(request) = self.update(|w| w.begin_hints(&origin)).flatten() else {
            return;
        };
        let ctx = *self;
        spawn_local(async move {
            let result = api::request_hints(&request).await;
            if let Err(e) = &result {
                gloo::console::warn!(format!("ai_hints failed: {}", e));
            }
            ctx.update(|w| w.finish_hints(result));
        });
    }

    pub fn copy(&self, text: String, done_message: &'static str) {
        let ctx = *self;
        spawn_local(async move {
            match api::copy_to_clipboard(&text).await {
                Ok(()) => ctx.show_toast(done_message),
                Err(e) => {
                    gloo::console::warn!(format!("clipboard failed: {}", e));
                    ctx.show_toast("복사 실패");
                }
            }
        });
    }

    /// 確認してから全消去
    pub fn confirm_reset(&self) {
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message("모든 내용을 초기화할까요?").ok())
            .unwrap_or(false);
        if confirmed {
            self.update(|w| w.reset());
            scroll_to_top();
        }
    }
}

pub fn use_app() -> AppContext {
    expect_context::<AppContext>()
}

fn scroll_to_top() {
    if let Some(window) = web_sys::window() {
        window.scroll_to_with_x_and_y(0.0, 0.0);
    }
}

/// データセットを読み込んでカタログを作る
///
/// 事前分析は任意。取得できなければ無しで続ける。
async fn load_catalog() -> Result<Catalog, String> {
    let (artworks, analyses) = futures::join!(
        api::fetch_text(api::ARTWORKS_URL),
        api::fetch_text(api::ANALYSES_URL)
    );

    let artworks = artworks?.ok_or_else(|| format!("{} が見つかりません", api::ARTWORKS_URL))?;
    let analyses = analyses.unwrap_or_else(|e| {
        gloo::console::warn!(format!("analyses unavailable: {}", e));
        None
    });

    Catalog::from_json(&artworks, analyses.as_deref()).map_err(|e| e.to_string())
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new();
    provide_context(ctx);

    spawn_local(async move {
        match load_catalog().await {
            Ok(catalog) => ctx.wizard.set(Some(Wizard::restore(LocalStore, catalog))),
            Err(e) => {
                gloo::console::error!(format!("catalog load failed: {}", e));
                ctx.load_error.set(Some("작품 데이터를 불러오지 못했습니다".to_string()));
            }
        }
    });

    // 入力のたびに段階全体を作り直さないよう段階の変化だけを見る
    let loaded = Memo::new(move |_| ctx.read(|_| ()).is_some());
    let step = Memo::new(move |_| ctx.step());

    view! {
        <div class="container">
            <Header />
            <Show
                when=move || loaded.get()
                fallback=move || view! {
                    <p class="text-muted">
                        {move || ctx.load_error.get().unwrap_or_else(|| "불러오는 중...".to_string())}
                    </p>
                }
            >
                <Stepper />
                <main class="step-panel">
                    {move || match step.get() {
                        Step::Select => view! { <ArtworkGrid /> }.into_any(),
                        Step::Observe => view! { <ObservationForm /> }.into_any(),
                        Step::Refine => view! { <RefineStep /> }.into_any(),
                        Step::Summary => view! { <SummaryStep /> }.into_any(),
                    }}
                </main>
            </Show>
            <ProcessingModal />
            <Toast />
        </div>
    }
}
