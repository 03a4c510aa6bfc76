//! 2段階目: 観察の入力

use art_observe_common::{Event, ObservationField};
use leptos::prelude::*;

use crate::app::use_app;

/// 入力欄の例文
fn placeholder(field: ObservationField) -> &'static str {
    match field {
        ObservationField::Free => "작품을 보고 처음 떠오른 것을 자유롭게 적어 보세요.",
        ObservationField::FreeRefined => "관찰을 다듬어 다시 적어 보세요.",
        ObservationField::Color => "어떤 색이 보이나요? 밝기와 대비는?",
        ObservationField::FormTexture => "선과 모양, 붓질이나 질감은?",
        ObservationField::Composition => "무엇이 어디에 있나요? 시선은 어디로?",
        ObservationField::MotifSymbol => "무엇이 그려져 있나요? 어떤 의미일까요?",
        ObservationField::MoodEmotion => "어떤 느낌이 드나요?",
        ObservationField::Notes => "그 밖에 적어 두고 싶은 것",
    }
}

/// 観察項目1つ分の入力欄（入力のたびに保存）
#[component]
pub fn FieldInput(field: ObservationField, #[prop(default = 2)] rows: u32) -> impl IntoView {
    let ctx = use_app();
    let value = move || {
        ctx.read(|w| w.observation().get(field).to_string())
            .unwrap_or_default()
    };

    view! {
        <div class="form-group">
            <label for=field.input_id()>{field.label()}</label>
            <textarea
                id=field.input_id()
                rows=rows
                placeholder=placeholder(field)
                prop:value=value
                on:input=move |ev| {
                    let text = event_target_value(&ev);
                    ctx.update(|w| w.set_field(field, text));
                }
            ></textarea>
        </div>
    }
}

#[component]
pub fn ObservationForm() -> impl IntoView {
    let ctx = use_app();
    let title = move || {
        ctx.read(|w| w.selected().map(|a| format!("{} · {}", a.title, a.caption())))
            .flatten()
            .unwrap_or_default()
    };

    view! {
        <section class="observe">
            <h2>{title}</h2>
            <FieldInput field=ObservationField::Free rows=5 />
            <div class="structured">
                {ObservationField::STRUCTURED
                    .into_iter()
                    .map(|field| view! { <FieldInput field=field /> })
                    .collect_view()}
            </div>
            <FieldInput field=ObservationField::Notes />

            <div class="step-actions">
                <button class="btn btn-secondary" on:click=move |_| ctx.go(Event::Back)>"이전"</button>
                <button
                    class="btn btn-tertiary"
                    on:click=move |_| {
                        ctx.update(|w| w.restore_draft());
                    }
                >
                    "임시 저장 불러오기"
                </button>
                <button class="btn btn-primary" on:click=move |_| ctx.go(Event::Next)>"다음"</button>
            </div>
        </section>
    }
}
