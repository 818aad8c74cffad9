//! 部屋の詳細パネル

use inventory_map_common::session::{ItemCard, NO_ITEMS};
use inventory_map_common::{FloorMap, Session};
use leptos::prelude::*;
use web_sys::MouseEvent;

#[component]
pub fn RoomPanel(session: RwSignal<Session>, map: RwSignal<FloorMap>) -> impl IntoView {
    let close = move |_: MouseEvent| {
        session.update(Session::close_panel);
        map.update(FloorMap::clear_selection);
    };

    move || {
        session.with(Session::panel).map(|detail| {
            let items = if detail.is_empty() {
                view! { <div class="no-items">{NO_ITEMS}</div> }.into_any()
            } else {
                detail
                    .items
                    .iter()
                    .cloned()
                    .map(|card| view! { <ItemCardView card=card session=session /> })
                    .collect_view()
                    .into_any()
            };

            view! {
                <aside class="sidebar">
                    <div class="sidebar-header">
                        <h2>{detail.title()}</h2>
                        <button class="close-btn" on:click=close>"×"</button>
                    </div>
                    <div class="items-count">{detail.count_label()}</div>
                    <div class="items-list">{items}</div>
                </aside>
            }
        })
    }
}

/// 備品カード
#[component]
fn ItemCardView(card: ItemCard, session: RwSignal<Session>) -> impl IntoView {
    view! {
        <div class="item-card">
            <div class="item-header">
                <span class="category-badge" style:background-color=card.category_color>
                    {card.category_label}
                </span>
                <span class="item-room">{card.room_code}</span>
            </div>
            <div class="item-description">{card.description}</div>
            <div class="item-meta">
                <span class="condition-badge" style:background-color=card.condition_color>
                    {card.condition}
                </span>
                <span class="item-quantity">
                    <strong>"Qty:"</strong>
                    " "
                    {card.quantity}
                </span>
            </div>
            <div class="item-photos">
                {card
                    .photos
                    .into_iter()
                    .map(|photo| {
                        let source = photo.source;
                        view! {
                            <img
                                class="item-photo"
                                src=photo.thumbnail_url
                                alt="Photo"
                                loading="lazy"
                                on:click=move |_| {
                                    session.update(|s| {
                                        s.open_photo(&source);
                                    });
                                }
                            />
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}
