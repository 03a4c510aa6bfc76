//! 1段階目: 作品の検索と選択

use art_observe_common::{Artwork, Event};
use leptos::ev;
use leptos::prelude::*;

use crate::app::use_app;
use crate::components::selection_card::swap_to_fallback;

#[component]
pub fn ArtworkGrid() -> impl IntoView {
    let ctx = use_app();
    let (query, set_query) = signal(String::new());
    let (tag, set_tag) = signal(String::new());
    let detail = RwSignal::new(None::<Artwork>);

    let handle = window_event_listener(ev::keydown, move |e| {
        if e.key() == "Escape" {
            detail.set(None);
        }
    });
    on_cleanup(move || handle.remove());

    let tags = ctx.read_untracked(|w| w.catalog().tags()).unwrap_or_default();
    let results = Memo::new(move |_| {
        let (query, tag) = (query.get(), tag.get());
        ctx.read(|w| {
            w.catalog()
                .filter(&query, &tag)
                .into_iter()
                .cloned()
                .collect::<Vec<_>>()
        })
        .unwrap_or_default()
    });
    let selected_id = Memo::new(move |_| {
        ctx.read(|w| w.selected().map(|a| a.id.clone())).flatten()
    });

    view! {
        <section class="artwork-select">
            <div class="filters">
                <input
                    type="search"
                    id="artwork-search"
                    placeholder="제목, 작가, 태그 검색"
                    prop:value=move || query.get()
                    on:input=move |ev| set_query.set(event_target_value(&ev))
                />
                <select id="artwork-tag" on:change=move |ev| set_tag.set(event_target_value(&ev))>
                    <option value="">"전체"</option>
                    {tags
                        .into_iter()
                        .map(|t| view! { <option value=t.clone()>{t.clone()}</option> })
                        .collect_view()}
                </select>
            </div>

            <Show
                when=move || !results.with(|r| r.is_empty())
                fallback=|| view! { <p class="text-muted">"검색 결과가 없습니다."</p> }
            >
                <div class="artwork-grid">
                    <For
                        each=move || results.get()
                        key=|artwork| artwork.id.clone()
                        children=move |artwork| {
                            let id = artwork.id.clone();
                            let is_selected = {
                                let id = id.clone();
                                move || selected_id.get().as_deref() == Some(id.as_str())
                            };
                            let for_detail = artwork.clone();
                            view! {
                                <div
                                    class="artwork-card"
                                    class:selected=is_selected
                                    on:click=move |_| {
                                        ctx.update(|w| w.select(&id));
                                    }
                                >
                                    <img
                                        src=artwork.image_url.clone()
                                        alt=artwork.title.clone()
                                        loading="lazy"
                                        referrerpolicy="no-referrer"
                                        on:error=move |ev| swap_to_fallback(&ev)
                                    />
                                    <div class="artwork-meta">
                                        <strong>{artwork.title.clone()}</strong>
                                        <span>{artwork.caption()}</span>
                                    </div>
                                    <button
                                        class="btn btn-tertiary btn-small"
                                        on:click=move |ev| {
                                            ev.stop_propagation();
                                            detail.set(Some(for_detail.clone()));
                                        }
                                    >
                                        "자세히"
                                    </button>
                                </div>
                            }
                        }
                    />
                </div>
            </Show>

            <div class="selection-summary">
                {move || {
                    ctx.read(|w| w.selected().map(|a| format!("선택 작품: {} ({})", a.title, a.artist)))
                        .flatten()
                        .unwrap_or_else(|| "작품을 선택하세요".to_string())
                }}
            </div>

            <div class="step-actions">
                <button class="btn btn-primary" on:click=move |_| ctx.go(Event::Next)>"다음"</button>
            </div>

            {move || detail.get().map(|artwork| view! { <ArtworkDetail artwork=artwork detail=detail /> })}
        </section>
    }
}

/// 作品詳細モーダル（Escか背景クリックで閉じる、画像クリックで観察へ）
#[component]
fn ArtworkDetail(artwork: Artwork, detail: RwSignal<Option<Artwork>>) -> impl IntoView {
    let ctx = use_app();
    let id = artwork.id.clone();
    let image_id = artwork.id.clone();
    let source = artwork.source.clone();
    let has_source = !source.name.is_empty();

    view! {
        <div class="modal-backdrop" on:click=move |_| detail.set(None)>
            <div class="modal artwork-detail" on:click=|ev| ev.stop_propagation()>
                <img
                    class="artwork-large"
                    src=artwork.image_url.clone()
                    alt=artwork.title.clone()
                    title="이 작품으로 관찰 시작"
                    referrerpolicy="no-referrer"
                    on:error=move |ev| swap_to_fallback(&ev)
                    on:click=move |_| {
                        // 画像クリックで選択して2段階目へ
                        ctx.update(|w| w.select(&image_id));
                        detail.set(None);
                        ctx.go(Event::Next);
                    }
                />
                <h2>{artwork.title.clone()}</h2>
                <p>{artwork.caption()}</p>
                <p class="tags">{artwork.tags.join(", ")}</p>
                <Show when=move || has_source>
                    <p class="source">
                        <a href=source.url.clone() target="_blank" rel="noopener noreferrer">
                            {source.name.clone()}
                        </a>
                        " · "
                        {source.license.clone()}
                    </p>
                </Show>
                <div class="modal-actions">
                    <button class="btn btn-secondary" on:click=move |_| detail.set(None)>"닫기"</button>
                    <button
                        class="btn btn-primary"
                        on:click=move |_| {
                            ctx.update(|w| w.select(&id));
                            detail.set(None);
                        }
                    >
                        "이 작품 선택"
                    </button>
                </div>
            </div>
        </div>
    }
}
