//! 3段階目: 観察の修正とAIヒント

use art_observe_common::{Action, Event, ObservationField};
use leptos::prelude::*;

use crate::app::use_app;
use crate::components::selection_card::SelectionCard;
use crate::components::observation_form::FieldInput;

#[component]
pub fn RefineStep() -> impl IntoView {
    let ctx = use_app();
    let busy = Memo::new(move |_| ctx.read(|w| w.is_busy(Action::Hints)).unwrap_or(false));
    let hints = move || ctx.read(|w| w.hints().to_string()).unwrap_or_default();
    let summary = move || ctx.read(|w| w.observation_summary()).unwrap_or_default();

    let copy_hints = move |_| {
        let text = ctx.read_untracked(|w| w.hints().trim().to_string()).unwrap_or_default();
        if text.is_empty() {
            ctx.show_toast("복사할 힌트가 없습니다");
        } else {
            ctx.copy(text, "힌트를 복사했습니다");
        }
    };

    view! {
        <section class="refine">
            <SelectionCard />
            <div class="first-draft">
                <h3>{ObservationField::Free.label()}</h3>
                <p class="text-muted">
                    {move || ctx.read(|w| w.observation().free.clone()).unwrap_or_default()}
                </p>
            </div>

            <FieldInput field=ObservationField::FreeRefined rows=6 />

            <div class="hints-panel">
                <div class="hints-actions">
                    <button
                        class="btn btn-primary"
                        disabled=move || busy.get()
                        on:click=move |_| ctx.request_hints()
                    >
                        {move || if busy.get() { "분석 중..." } else { "AI 힌트 받기" }}
                    </button>
                    <button class="btn btn-secondary btn-small" on:click=copy_hints>
                        "힌트 복사"
                    </button>
                </div>
                <pre class="hints">{hints}</pre>
            </div>

            <ul class="observation-summary">
                {move || summary().into_iter().map(|item| view! { <li>{item}</li> }).collect_view()}
            </ul>

            <div class="step-actions">
                <button class="btn btn-secondary" on:click=move |_| ctx.go(Event::Back)>"이전"</button>
                <button class="btn btn-primary" on:click=move |_| ctx.go(Event::Next)>"다음"</button>
            </div>
        </section>
    }
}
