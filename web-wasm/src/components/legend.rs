//! カテゴリ凡例

use inventory_map_common::category;
use leptos::prelude::*;

#[component]
pub fn Legend() -> impl IntoView {
    view! {
        <div class="legend">
            {category::legend()
                .into_iter()
                .map(|entry| {
                    view! {
                        <div class="legend-item">
                            <span class="legend-dot" style:background-color=entry.color></span>
                            {entry.icon}" "{entry.key}
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}
