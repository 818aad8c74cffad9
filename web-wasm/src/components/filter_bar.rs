//! フィルタ（カテゴリ・状態・検索）

use inventory_map_common::{category, condition, Category, Condition, Session};
use leptos::prelude::*;

#[component]
pub fn FilterBar(session: RwSignal<Session>) -> impl IntoView {
    view! {
        <div class="filters">
            <select
                id="filter-category"
                on:change=move |ev| {
                    let value = event_target_value(&ev);
                    session.update(|s| s.set_category(Category::from_key(&value)));
                }
            >
                {category::filter_options()
                    .into_iter()
                    .map(|(value, label)| view! { <option value=value>{label}</option> })
                    .collect_view()}
            </select>

            <select
                id="filter-condition"
                on:change=move |ev| {
                    let value = event_target_value(&ev);
                    session.update(|s| s.set_condition(Condition::parse(&value)));
                }
            >
                {condition::filter_options()
                    .into_iter()
                    .map(|(value, label)| view! { <option value=value>{label}</option> })
                    .collect_view()}
            </select>

            <input
                type="search"
                id="filter-search"
                placeholder="Search..."
                prop:value=move || session.with(|s| s.filters().search.clone())
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    session.update(|s| s.set_search(&value));
                }
            />
        </div>
    }
}
