//! ダッシュボードのセッション状態
//!
//! 表示中の建物・フィルタ・読み込んだ部屋/備品・詳細パネル・写真モーダルを
//! 1つの値として持つ。ビューモデルと描画はこの値からの純粋な導出。
//!
//! 建物の読み込みはチケット（建物キー + 世代番号）付きで発行し、
//! 完了時にチケットが古ければ結果を捨てる。

use crate::building::{Building, BuildingRegistry};
use crate::category::Category;
use crate::condition::{self, Condition};
use crate::coords::load_building_coordinates;
use crate::filter::FilterState;
use crate::gateway::{Fetched, Gateway, Transport};
use crate::normalize::{normalize_items, NormalizedItem};
use crate::photo::{full_size_url, photo_links, PhotoLink};
use crate::types::{CoordinateMap, RawItem, Room};
use crate::view_model::{build_view_model, RoomIndex, ViewContext, ViewModel};
use serde::Serialize;

/// 部屋・備品の両方が取得に失敗したときのバナー
pub const LOAD_ERROR_MESSAGE: &str = "⚠️ Failed to load data. Check API settings.";
/// 詳細パネルの空表示
pub const NO_ITEMS: &str = "No items";
/// 説明が空のときの表示
pub const NO_DESCRIPTION: &str = "Без описания";
/// 値がないときの表示
pub const MISSING: &str = "—";

/// 読み込みチケット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub building: String,
    pub generation: u64,
}

/// 1建物分の読み込み結果
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingLoad {
    pub coordinates: CoordinateMap,
    pub rooms: Fetched<Vec<Room>>,
    pub items: Fetched<Vec<RawItem>>,
}

/// 座標・部屋・備品をまとめて取得する
///
/// 部屋と備品は並行して取得する。失敗はすべて空の座標かフィクスチャに置き換わる。
pub async fn load_building<T: Transport>(gateway: &Gateway<T>, building: &Building) -> BuildingLoad {
    let coordinates = load_building_coordinates(gateway.transport(), building).await;
    let (rooms, items) = futures::join!(gateway.fetch_rooms(), gateway.fetch_items());
    tracing::debug!(
        building = %building.key,
        coordinates = coordinates.len(),
        rooms = rooms.data().len(),
        items = items.data().len(),
        live = rooms.is_live() && items.is_live(),
        "building data loaded"
    );
    BuildingLoad { coordinates, rooms, items }
}

/// 詳細パネルの備品カード
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCard {
    pub id: String,
    pub category: Category,
    pub category_label: &'static str,
    pub category_color: &'static str,
    pub room_code: String,
    pub description: String,
    pub condition: String,
    pub condition_color: &'static str,
    pub quantity: u32,
    pub photos: Vec<PhotoLink>,
}

impl ItemCard {
    pub fn new(item: &NormalizedItem) -> Self {
        let non_empty = |text: &str, fallback: &str| {
            let text = text.trim();
            if text.is_empty() { fallback.to_string() } else { text.to_string() }
        };
        let condition_color = match item.condition {
            Some(c) => c.color(),
            None => condition::label_color(&item.condition_label),
        };
        Self {
            id: item.id.clone(),
            category: item.category,
            category_label: item.category.badge_label(),
            category_color: item.category.color(),
            room_code: non_empty(&item.room_code, MISSING),
            description: non_empty(&item.description, NO_DESCRIPTION),
            condition: non_empty(&item.condition_label, MISSING),
            condition_color,
            quantity: item.quantity,
            photos: photo_links(&item.photos),
        }
    }
}

/// 部屋の詳細（フィルタに関係なく部屋の全備品）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetail {
    pub code: String,
    pub name: String,
    pub items: Vec<ItemCard>,
}

impl RoomDetail {
    /// `"<code> — <name>"`
    pub fn title(&self) -> String {
        format!("{} — {}", self.code, self.name)
    }

    pub fn count_label(&self) -> String {
        format!("{} items", self.items.len())
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// セッション状態
#[derive(Debug, Clone)]
pub struct Session {
    registry: BuildingRegistry,
    active: String,
    generation: u64,
    filters: FilterState,
    rooms: Vec<Room>,
    items: Vec<NormalizedItem>,
    room_index: RoomIndex,
    coordinates: CoordinateMap,
    panel: Option<String>,
    photo: Option<String>,
    loading: bool,
    banner: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(BuildingRegistry::default())
    }
}

impl Session {
    pub fn new(registry: BuildingRegistry) -> Self {
        let active = registry.default_key().to_string();
        Self {
            registry,
            active,
            generation: 0,
            filters: FilterState::default(),
            rooms: Vec::new(),
            items: Vec::new(),
            room_index: RoomIndex::default(),
            coordinates: CoordinateMap::new(),
            panel: None,
            photo: None,
            loading: false,
            banner: None,
        }
    }

    pub fn registry(&self) -> &BuildingRegistry {
        &self.registry
    }

    pub fn active_key(&self) -> &str {
        &self.active
    }

    pub fn active_building(&self) -> &Building {
        self.registry.get(&self.active)
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn items(&self) -> &[NormalizedItem] {
        &self.items
    }

    pub fn coordinates(&self) -> &CoordinateMap {
        &self.coordinates
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// 建物の読み込みを始める
    ///
    /// 未登録キーは既定の建物。詳細パネルと写真は閉じ、座標は空にする。
    pub fn begin_load(&mut self, building_key: &str) -> LoadTicket {
        let key = self.registry.get(building_key).key.clone();
        if key != building_key {
            tracing::warn!(requested = building_key, resolved = %key, "unknown building, using default");
        }
        self.generation += 1;
        self.active = key.clone();
        self.coordinates = CoordinateMap::new();
        self.panel = None;
        self.photo = None;
        self.loading = true;
        LoadTicket { building: key, generation: self.generation }
    }

    /// チケットが現在の状態に対応しているか
    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation && ticket.building == self.active
    }

    /// 読み込み結果を反映する。古いチケットなら捨てて `false`
    pub fn complete_load(&mut self, ticket: &LoadTicket, load: BuildingLoad) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                building = %ticket.building,
                generation = ticket.generation,
                current = self.generation,
                "discarding stale load"
            );
            return false;
        }

        self.banner = (load.rooms.is_failure() && load.items.is_failure())
            .then(|| LOAD_ERROR_MESSAGE.to_string());
        self.coordinates = load.coordinates;
        self.rooms = load.rooms.into_data();
        self.room_index = RoomIndex::new(&self.rooms);
        self.items = normalize_items(&load.items.into_data());
        self.loading = false;
        true
    }

    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
    }

    pub fn set_category(&mut self, category: Option<Category>) {
        self.filters.category = category;
    }

    pub fn set_condition(&mut self, condition: Option<Condition>) {
        self.filters.condition = condition;
    }

    pub fn set_search(&mut self, search: &str) {
        self.filters.search = search.trim().to_string();
    }

    pub fn view_context(&self) -> ViewContext<'_> {
        ViewContext {
            building: self.active_building(),
            registry: &self.registry,
            coordinates: &self.coordinates,
            room_index: &self.room_index,
        }
    }

    /// 現在の状態からビューモデルを作る
    pub fn view_model(&self) -> ViewModel {
        build_view_model(&self.view_context(), &self.items, &self.filters)
    }

    /// 統計行（エラー時はバナー文言）
    pub fn stats_line(&self, view: &ViewModel) -> String {
        match &self.banner {
            Some(banner) => banner.clone(),
            None => format!("Showing: {} items in {} rooms", view.total_items, view.visible_rooms),
        }
    }

    /// 部屋の詳細を作る（座標ストアにない部屋は `None`）
    pub fn room_detail(&self, code: &str) -> Option<RoomDetail> {
        let coord = self.coordinates.get(code)?;
        let name = if coord.name.trim().is_empty() { code.to_string() } else { coord.name.clone() };
        let items = self
            .view_context()
            .room_items(&self.items, code)
            .iter()
            .map(ItemCard::new)
            .collect();
        Some(RoomDetail { code: code.to_string(), name, items })
    }

    /// 部屋を選択して詳細パネルを開く
    pub fn select_room(&mut self, code: &str) -> Option<RoomDetail> {
        let detail = self.room_detail(code)?;
        self.panel = Some(code.to_string());
        Some(detail)
    }

    /// 開いている詳細パネル
    pub fn panel(&self) -> Option<RoomDetail> {
        self.panel.as_deref().and_then(|code| self.room_detail(code))
    }

    pub fn panel_code(&self) -> Option<&str> {
        self.panel.as_deref()
    }

    pub fn close_panel(&mut self) {
        self.panel = None;
    }

    /// 写真モーダルを開く（認識できないリンクは開かない）
    pub fn open_photo(&mut self, source: &str) -> Option<&str> {
        self.photo = full_size_url(source);
        self.photo.as_deref()
    }

    pub fn photo(&self) -> Option<&str> {
        self.photo.as_deref()
    }

    pub fn close_photo(&mut self) {
        self.photo = None;
    }
}
