//! フロアマップ（平面図 + SVGオーバーレイ）
//!
//! SVGは常に平面図のネイティブ座標で描き、表示サイズへの合わせ込みは
//! `viewBox` に任せる。マーカーの状態は [`FloorMap`] が持ち、ここでは
//! [`Scene`] に描き出したものを要素にするだけ。

use gloo::events::EventListener;
use inventory_map_common::map::{DebugPoint, MapStyle, PlanGeometry, Surface, PRESERVE_ASPECT_RATIO};
use inventory_map_common::{FloorMap, MarkerSpec, Session};
use leptos::html;
use leptos::prelude::*;
use web_sys::MouseEvent;

/// これ以下のコンテナ寸法では縮尺を更新しない（非表示・レイアウト途中）
const MIN_CONTAINER_SIZE: f64 = 100.0;

/// デバッグ用の点
#[derive(Debug, Clone, PartialEq)]
pub struct DebugDot {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub fill: String,
}

/// 1回分の描画結果
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub geometry: PlanGeometry,
    pub markers: Vec<MarkerSpec>,
    pub debug_dots: Vec<DebugDot>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            geometry: PlanGeometry::new(0, 0),
            markers: Vec::new(),
            debug_dots: Vec::new(),
        }
    }
}

impl Scene {
    pub fn capture(map: &FloorMap) -> Self {
        let mut scene = Self::default();
        map.draw(&mut scene);
        scene
    }
}

impl Surface for Scene {
    fn begin(&mut self, geometry: &PlanGeometry) {
        self.geometry = *geometry;
        self.markers.clear();
        self.debug_dots.clear();
    }

    fn marker(&mut self, marker: &MarkerSpec) {
        self.markers.push(marker.clone());
    }

    fn debug_point(&mut self, point: &DebugPoint, style: &MapStyle) {
        self.debug_dots.push(DebugDot {
            cx: point.x as f64,
            cy: point.y as f64,
            r: style.debug_radius,
            fill: style.debug_color.clone(),
        });
    }

    fn end(&mut self) {}
}

#[component]
pub fn FloorMapView(map: RwSignal<FloorMap>, session: RwSignal<Session>, debug: bool) -> impl IntoView {
    let wrapper = NodeRef::<html::Div>::new();
    let image = NodeRef::<html::Img>::new();
    let scene = Memo::new(move |_| map.with(Scene::capture));

    let update_scale = move || {
        let Some(element) = wrapper.get_untracked() else {
            return;
        };
        let width = f64::from(element.client_width());
        let height = f64::from(element.client_height());
        if width > MIN_CONTAINER_SIZE && height > MIN_CONTAINER_SIZE {
            map.update(|m| {
                m.resize(width);
            });
        }
    };

    // 画像の読み込み完了（失敗時もマーカーは出す）
    let on_plan_settled = move |ok: bool| {
        if !ok {
            let src = session.with_untracked(|s| s.active_building().floor_plan.clone());
            tracing::warn!(%src, "floor plan image failed to load");
        }
        map.update(FloorMap::mark_plan_ready);
        update_scale();
    };

    if let Some(window) = web_sys::window() {
        EventListener::new(&window, "resize", move |_| update_scale()).forget();
    }

    Effect::new(move |_| {
        if wrapper.get().is_some() {
            update_scale();
        }
    });

    let on_debug_click = move |ev: MouseEvent| {
        if !debug {
            return;
        }
        let Some(img) = image.get_untracked() else {
            return;
        };
        let rect = img.get_bounding_client_rect();
        let x = f64::from(ev.client_x()) - rect.left();
        let y = f64::from(ev.client_y()) - rect.top();
        map.update(|m| {
            m.record_debug_click(x, y, rect.width(), rect.height());
        });
    };

    view! {
        <div
            class="map-container"
            class:loading=move || session.with(Session::is_loading)
            on:click=on_debug_click
        >
            <div
                class="map-wrapper"
                node_ref=wrapper
                style:max-width=move || format!("{}px", scene.with(|s| s.geometry.width))
                style:aspect-ratio=move || scene.with(|s| s.geometry.aspect_ratio())
            >
                <img
                    id="floor-plan"
                    node_ref=image
                    src=move || session.with(|s| s.active_building().floor_plan.clone())
                    alt="Floor plan"
                    on:load=move |_| on_plan_settled(true)
                    on:error=move |_| on_plan_settled(false)
                />
                <svg
                    class="pins-layer"
                    viewBox=move || scene.with(|s| s.geometry.view_box())
                    preserveAspectRatio=PRESERVE_ASPECT_RATIO
                    width="100%"
                    height="100%"
                >
                    {move || {
                        scene
                            .with(|s| s.markers.clone())
                            .into_iter()
                            .map(|marker| view! { <Pin marker=marker map=map /> })
                            .collect_view()
                    }}
                    {move || {
                        scene
                            .with(|s| s.debug_dots.clone())
                            .into_iter()
                            .map(|dot| {
                                view! {
                                    <circle
                                        class="debug-dot"
                                        cx=dot.cx.to_string()
                                        cy=dot.cy.to_string()
                                        r=dot.r.to_string()
                                        fill=dot.fill
                                    />
                                }
                            })
                            .collect_view()
                    }}
                </svg>
            </div>
            {move || {
                map.with(|m| m.tooltip().cloned())
                    .map(|tip| {
                        view! {
                            <div
                                class="tooltip"
                                style:left=format!("{}px", tip.left)
                                style:top=format!("{}px", tip.top)
                            >
                                {tip.text}
                            </div>
                        }
                    })
            }}
        </div>
    }
}

/// 部屋マーカー
#[component]
fn Pin(marker: MarkerSpec, map: RwSignal<FloorMap>) -> impl IntoView {
    let class = marker.class_list();
    let enter_code = marker.code.clone();
    let leave_code = marker.code.clone();
    let click_code = marker.code.clone();

    view! {
        <circle
            class=class
            data-code=marker.code
            data-base-r=marker.base_r.to_string()
            cx=marker.cx.to_string()
            cy=marker.cy.to_string()
            r=marker.r.to_string()
            fill=marker.fill
            stroke=marker.stroke
            stroke-width=marker.stroke_width.to_string()
            opacity=marker.opacity.to_string()
            on:mouseenter=move |ev: MouseEvent| {
                map.update(|m| {
                    m.hover_enter(&enter_code, f64::from(ev.client_x()), f64::from(ev.client_y()));
                });
            }
            on:mouseleave=move |_| map.update(|m| m.hover_leave(&leave_code))
            on:click=move |ev: MouseEvent| {
                ev.stop_propagation();
                map.update(|m| {
                    m.click(&click_code);
                });
            }
        />
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod tests {
    use super::*;
    use inventory_map_common::{Building, CoordinateMap, RoomCoord};
    use wasm_bindgen_test::*;

    fn ready_map() -> FloorMap {
        let mut map = FloorMap::default();
        let mut coordinates = CoordinateMap::new();
        coordinates.insert("A1".to_string(), RoomCoord::new(100.0, 200.0, "Hall"));
        map.show_building(&Building::new("mc-1f", "MC", 1), coordinates);
        map.mark_plan_ready();
        map
    }

    #[wasm_bindgen_test]
    fn test_scene_is_empty_before_plan_ready() {
        let scene = Scene::capture(&FloorMap::default());
        assert!(scene.markers.is_empty());
        assert_eq!(scene.geometry.view_box(), "0 0 1545 763");
    }

    #[wasm_bindgen_test]
    fn test_scene_collects_markers_and_debug_dots() {
        let mut map = ready_map();
        map.resize(772.5);
        map.record_debug_click(50.0, 25.0, 772.5, 381.5).expect("画像内のはず");

        let scene = Scene::capture(&map);
        assert_eq!(scene.markers.len(), 1);
        assert_eq!(scene.markers[0].code, "A1");
        assert_eq!(
            scene.debug_dots,
            vec![DebugDot { cx: 100.0, cy: 50.0, r: 5.0, fill: "red".to_string() }]
        );
    }

    #[wasm_bindgen_test]
    fn test_capture_replaces_previous_scene() {
        let map = ready_map();
        let mut scene = Scene::capture(&map);
        map.draw(&mut scene);
        assert_eq!(scene.markers.len(), 1);
    }
}
