//! メインアプリケーションコンポーネント

use crate::api::fetch::FetchTransport;
use crate::api::page::{self, PageParams};
use crate::components::{
    building_tabs::BuildingTabs,
    filter_bar::FilterBar,
    floor_map::FloorMapView,
    header::Header,
    legend::Legend,
    photo_modal::PhotoModal,
    room_panel::RoomPanel,
    stats_bar::StatsBar,
};
use inventory_map_common::{load_building, CoordinateMap, FloorMap, Gateway, MapStyle, Session, ViewModel};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::BTreeSet;

/// マップへ渡す表示データ
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapData {
    pub view: ViewModel,
    /// 減光しない部屋コード
    pub visible: BTreeSet<String>,
}

impl MapData {
    pub fn from_session(session: &Session) -> Self {
        let view = session.view_model();
        let visible = view.visible_codes(session.filters());
        Self { view, visible }
    }
}

/// 建物を読み込む（古い読み込みの結果は捨てる）
fn load(session: RwSignal<Session>, map: RwSignal<FloorMap>, key: String) {
    let Some(ticket) = session.try_update(|s| s.begin_load(&key)) else {
        return;
    };
    let building = session.with_untracked(|s| s.active_building().clone());
    map.update(|m| m.show_building(&building, CoordinateMap::new()));

    spawn_local(async move {
        let gateway = Gateway::new(page::api_url(), FetchTransport);
        let loaded = load_building(&gateway, &building).await;
        let coordinates = loaded.coordinates.clone();

        let applied = session
            .try_update(|s| s.complete_load(&ticket, loaded))
            .unwrap_or(false);
        if applied {
            map.update(|m| m.show_building(&building, coordinates));
        }
    });
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let params = PageParams::current();

    // アプリケーション状態
    let session = RwSignal::new(Session::new(page::registry()));
    let map = RwSignal::new(FloorMap::new(MapStyle::default(), page::calibration()));
    let map_data = Memo::new(move |_| session.with(MapData::from_session));

    // マーカー選択で詳細パネルを開く
    map.update_untracked(|m| {
        m.on_room_select(Box::new(move |code: &str| {
            session.update(|s| {
                s.select_room(code);
            });
        }))
    });

    // 表示データをマップへ反映
    Effect::new(move |_| {
        let data = map_data.get();
        map.update(|m| {
            m.set_data(&data.view);
            m.highlight_rooms(data.visible);
        });
    });

    // 建物切り替えハンドラ
    let on_select_building = move |key: String| load(session, map, key);

    let initial = session.with_untracked(|s| s.registry().default_key().to_string());
    load(session, map, initial);

    view! {
        <div class="container">
            <Header />

            <BuildingTabs session=session on_select=on_select_building />

            <FilterBar session=session />

            <StatsBar session=session map_data=map_data />

            <div class="main-layout">
                <FloorMapView map=map session=session debug=params.debug />
                <RoomPanel session=session map=map />
            </div>

            <Legend />

            <PhotoModal session=session />
        </div>
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod tests {
    use super::*;
    use inventory_map_common::{BuildingLoad, BuildingRegistry, Fetched, RawItem, Room, RoomCoord};
    use serde_json::json;
    use wasm_bindgen_test::*;

    fn loaded_session() -> Session {
        let mut session = Session::new(BuildingRegistry::default());
        let ticket = session.begin_load("mc-1f");
        let mut coordinates = CoordinateMap::new();
        coordinates.insert("A1".to_string(), RoomCoord::new(10.0, 20.0, "Hall"));
        coordinates.insert("A2".to_string(), RoomCoord::new(30.0, 40.0, "Study"));
        let item: RawItem = serde_json::from_value(json!({
            "id": "1", "building_id": 1, "room_code": "A1", "category": "art"
        }))
        .expect("デシリアライズ失敗");
        let load = BuildingLoad {
            coordinates,
            rooms: Fetched::Live(Vec::<Room>::new()),
            items: Fetched::Live(vec![item]),
        };
        assert!(session.complete_load(&ticket, load));
        session
    }

    #[wasm_bindgen_test]
    fn test_map_data_without_filters_shows_every_room() {
        let session = loaded_session();
        let data = MapData::from_session(&session);
        assert_eq!(data.view.total_items, 1);
        assert_eq!(data.visible.len(), 2);
    }

    #[wasm_bindgen_test]
    fn test_map_data_with_filter_keeps_matching_rooms() {
        let mut session = loaded_session();
        session.set_search("zzz");
        assert!(MapData::from_session(&session).visible.is_empty());
        session.set_search("hall");
        let data = MapData::from_session(&session);
        assert_eq!(data.visible.into_iter().collect::<Vec<_>>(), vec!["A1".to_string()]);
    }
}
