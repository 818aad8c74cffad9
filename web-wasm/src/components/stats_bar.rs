//! 件数表示（読み込み失敗時はエラーバナー）

use crate::app::MapData;
use inventory_map_common::Session;
use leptos::prelude::*;

#[component]
pub fn StatsBar(session: RwSignal<Session>, map_data: Memo<MapData>) -> impl IntoView {
    view! {
        <div
            class="stats"
            class:error=move || session.with(|s| s.banner().is_some())
        >
            {move || map_data.with(|data| session.with(|s| s.stats_line(&data.view)))}
        </div>
    }
}
