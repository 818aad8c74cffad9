//! 建物（フロア）タブ

use inventory_map_common::Session;
use leptos::prelude::*;

#[component]
pub fn BuildingTabs<F>(session: RwSignal<Session>, on_select: F) -> impl IntoView
where
    F: Fn(String) + Copy + Send + Sync + 'static,
{
    let tabs: Vec<(String, String)> = session.with_untracked(|s| {
        s.registry()
            .iter()
            .map(|b| (b.key.clone(), b.label.clone()))
            .collect()
    });

    view! {
        <nav class="building-tabs">
            {tabs
                .into_iter()
                .map(|(key, label)| {
                    let active_key = key.clone();
                    view! {
                        <button
                            class="tab-btn"
                            class:active=move || session.with(|s| s.active_key() == active_key)
                            on:click=move |_| on_select(key.clone())
                        >
                            {label}
                        </button>
                    }
                })
                .collect_view()}
        </nav>
    }
}
