//! 作品画像と選択中の作品カード

use art_observe_common::Artwork;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

use crate::app::use_app;

/// 画像が読めないときの代替
pub const FALLBACK_IMAGE: &str = "images/background.png";

/// 読み込み失敗した画像を代替画像に差し替える
pub fn swap_to_fallback(ev: &web_sys::Event) {
    let Some(img) = ev
        .target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlImageElement>().ok())
    else {
        return;
    };
    // 代替画像自体が失敗した場合に繰り返さない
    if !img.src().ends_with(FALLBACK_IMAGE) {
        img.set_src(FALLBACK_IMAGE);
    }
}

/// 3・4段階目の上部に出す選択作品（画像・題名・作者と年）
#[component]
pub fn SelectionCard() -> impl IntoView {
    let ctx = use_app();
    let selected = Memo::new(move |_| ctx.read(|w| w.selected().cloned()).flatten());

    view! {
        <div class="selection-card">
            {move || match selected.get() {
                Some(artwork) => view! { <SelectedArtwork artwork=artwork /> }.into_any(),
                None => view! { <p class="text-muted">"작품을 선택하세요"</p> }.into_any(),
            }}
        </div>
    }
}

#[component]
fn SelectedArtwork(artwork: Artwork) -> impl IntoView {
    view! {
        <img
            class="artwork-large"
            src=artwork.image_url.clone()
            alt=artwork.title.clone()
            referrerpolicy="no-referrer"
            on:error=move |ev| swap_to_fallback(&ev)
        />
        <div class="artwork-meta">
            <strong>{artwork.title.clone()}</strong>
            <span>{artwork.caption()}</span>
        </div>
    }
}
