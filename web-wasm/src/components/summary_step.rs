//! 4段階目: 画像生成プロンプトの確認と書き出し

use art_observe_common::{Action, Event, Preset};
use leptos::prelude::*;

use crate::api;
use crate::app::use_app;
use crate::components::selection_card::SelectionCard;

#[component]
pub fn SummaryStep() -> impl IntoView {
    let ctx = use_app();
    let can_export = Memo::new(move |_| ctx.read(|w| w.can_export()).unwrap_or(false));
    let generating = Memo::new(move |_| {
        ctx.read(|w| w.is_busy(Action::PromptGeneration))
            .unwrap_or(false)
    });
    let preset = move || ctx.read(|w| w.preset()).unwrap_or_default();

    let copy_observation = move |_| {
        let text = ctx.read_untracked(|w| w.observation_preview()).unwrap_or_default();
        if text.is_empty() {
            ctx.show_toast("복사할 관찰이 없습니다");
        } else {
            ctx.copy(text, "복사되었습니다");
        }
    };

    let copy_prompt = move |_| {
        if let Some(text) = ctx.read_untracked(|w| w.export_text()).flatten() {
            ctx.copy(text, "복사되었습니다");
        }
    };

    let download = move |_| {
        let Some((text, name)) = ctx
            .read_untracked(|w| {
                w.export_text()
                    .map(|text| (text, w.export_file_name(&api::today())))
            })
            .flatten()
        else {
            return;
        };
        match api::download_text(&name, &text) {
            Ok(()) => ctx.show_toast("다운로드 시작"),
            Err(e) => {
                gloo::console::warn!(format!("download failed: {}", e));
                ctx.show_toast("다운로드 실패");
            }
        }
    };

    view! {
        <section class="summary">
            <SelectionCard />
            <div class="observation-preview">
                <h3>"관찰 내용"</h3>
                <pre>{move || ctx.read(|w| w.observation_preview()).unwrap_or_default()}</pre>
                <button class="btn btn-secondary btn-small" on:click=copy_observation>
                    "관찰 복사"
                </button>
            </div>

            <div class="form-group">
                <label for="prompt-preset">"상세도"</label>
                <select
                    id="prompt-preset"
                    on:change=move |ev| {
                        let preset = Preset::parse(&event_target_value(&ev)).unwrap_or_default();
                        ctx.update(|w| w.set_preset(preset));
                    }
                >
                    <option value="general" selected=move || preset() == Preset::General>"일반"</option>
                    <option value="detailed" selected=move || preset() == Preset::Detailed>"자세히"</option>
                </select>
            </div>

            <div class="form-group">
                <label for="prompt-editor">"이미지 생성 프롬프트"</label>
                <textarea
                    id="prompt-editor"
                    rows=6
                    placeholder=move || ctx.read(|w| w.prompt_preview()).unwrap_or_default()
                    prop:value=move || ctx.read(|w| w.prompt_text().to_string()).unwrap_or_default()
                    on:input=move |ev| {
                        let text = event_target_value(&ev);
                        ctx.update(|w| w.set_prompt_text(text));
                    }
                ></textarea>
            </div>

            <div class="step-actions">
                <button class="btn btn-secondary" on:click=move |_| ctx.go(Event::Back)>"이전"</button>
                <button
                    class="btn btn-tertiary"
                    disabled=move || generating.get()
                    on:click=move |_| ctx.generate_prompt()
                >
                    "다시 만들기"
                </button>
                <button class="btn btn-primary" disabled=move || !can_export.get() on:click=copy_prompt>
                    "복사"
                </button>
                <button class="btn btn-primary" disabled=move || !can_export.get() on:click=download>
                    "다운로드"
                </button>
            </div>
        </section>
    }
}
