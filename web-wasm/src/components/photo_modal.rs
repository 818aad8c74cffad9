//! 写真の拡大表示

use inventory_map_common::Session;
use leptos::prelude::*;
use web_sys::MouseEvent;

#[component]
pub fn PhotoModal(session: RwSignal<Session>) -> impl IntoView {
    let close = move |_: MouseEvent| session.update(Session::close_photo);

    move || {
        session.with(|s| s.photo().map(str::to_string)).map(|url| {
            view! {
                // 背景クリックで閉じる
                <div class="photo-modal" on:click=close>
                    <div class="modal-content" on:click=|ev: MouseEvent| ev.stop_propagation()>
                        <button class="modal-close" on:click=close>"×"</button>
                        <img src=url alt="Photo" />
                    </div>
                </div>
            }
        })
    }
}
