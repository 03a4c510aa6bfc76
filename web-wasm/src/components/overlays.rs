//! トーストと処理中モーダル

use art_observe_common::wizard::PROCESSING_MESSAGE;
use art_observe_common::Action;
use leptos::prelude::*;

use crate::app::use_app;

#[component]
pub fn Toast() -> impl IntoView {
    let ctx = use_app();

    view! {
        <Show when=move || ctx.toast.with(|t| t.is_some())>
            <div class="toast" role="status">
                {move || ctx.toast.get().unwrap_or_default()}
            </div>
        </Show>
    }
}

/// 4段階目の自動生成中は操作を止める
#[component]
pub fn ProcessingModal() -> impl IntoView {
    let ctx = use_app();
    let busy = Memo::new(move |_| {
        ctx.read(|w| w.is_busy(Action::PromptGeneration))
            .unwrap_or(false)
    });

    view! {
        <Show when=move || busy.get()>
            <div class="modal-backdrop processing">
                <div class="modal">
                    <div class="spinner"></div>
                    <p>{PROCESSING_MESSAGE}</p>
                </div>
            </div>
        </Show>
    }
}
