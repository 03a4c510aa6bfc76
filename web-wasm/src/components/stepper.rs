//! ヘッダーと段階表示

use art_observe_common::{Event, Step};
use leptos::prelude::*;

use crate::app::use_app;

#[component]
pub fn Header() -> impl IntoView {
    let ctx = use_app();
    let has_wizard = move || ctx.read(|_| ()).is_some();

    view! {
        <header class="header">
            <button
                class="home-logo"
                title="처음으로"
                on:click=move |_| ctx.go(Event::GoTo(Step::Select))
            >
                <h1>"작품 관찰 도우미"</h1>
            </button>
            <Show when=has_wizard>
                <button class="btn btn-tertiary btn-small" on:click=move |_| ctx.confirm_reset()>
                    "초기화"
                </button>
            </Show>
        </header>
    }
}

/// 4段階の進行表示（クリックで移動）
#[component]
pub fn Stepper() -> impl IntoView {
    let ctx = use_app();
    let current = Memo::new(move |_| ctx.step());

    view! {
        <nav class="stepper">
            {Step::ALL
                .into_iter()
                .map(|step| {
                    let class = move || {
                        let current = current.get();
                        if step == current {
                            "step active"
                        } else if step.number() < current.number() {
                            "step done"
                        } else {
                            "step"
                        }
                    };
                    view! {
                        <button class=class on:click=move |_| ctx.go(Event::GoTo(step))>
                            <span class="step-number">{step.number()}</span>
                            <span class="step-label">{step.label()}</span>
                        </button>
                    }
                })
                .collect_view()}
        </nav>
    }
}
