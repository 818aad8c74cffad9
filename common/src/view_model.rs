//! ビューモデル構築
//!
//! 正規化済み備品 + 座標 + フィルタ → 部屋コードごとの表示データ。
//! 入力は読み取り専用のスナップショットとして扱い、出力は毎回作り直す。
//!
//! ## 手順
//! 1. 建物所属の判定（建物IDなしは常に表示）
//! 2. 部屋コードの解決（`room_code` → `room_id` 逆引き）
//! 3. 部屋ごとにグループ化（到着順を維持）
//! 4. 座標ストアの全部屋についてフィルタ適用・代表カテゴリ算出

use crate::building::{Building, BuildingRegistry};
use crate::category::{Category, DominantCategory};
use crate::filter::FilterState;
use crate::normalize::NormalizedItem;
use crate::types::{CoordinateMap, Room};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// 部屋ID → 部屋コードの逆引き
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomIndex {
    id_to_code: HashMap<String, String>,
}

impl RoomIndex {
    /// 部屋一覧から作る（ID重複時は後勝ち）
    pub fn new(rooms: &[Room]) -> Self {
        let id_to_code = rooms
            .iter()
            .filter(|r| !r.id.is_empty() && !r.code.is_empty())
            .map(|r| (r.id.clone(), r.code.clone()))
            .collect();
        Self { id_to_code }
    }

    pub fn code_for(&self, room_id: &str) -> Option<&str> {
        self.id_to_code.get(room_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.id_to_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_code.is_empty()
    }
}

/// 1部屋分の表示データ
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomViewModel {
    pub items: Vec<NormalizedItem>,
    pub dominant_category: DominantCategory,
}

impl RoomViewModel {
    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }
}

/// 地図全体の表示データ
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    pub rooms: BTreeMap<String, RoomViewModel>,
    /// フィルタ後の備品件数
    pub total_items: usize,
    /// フィルタ後に備品が1件以上ある部屋数
    pub visible_rooms: usize,
}

impl ViewModel {
    pub fn room(&self, code: &str) -> Option<&RoomViewModel> {
        self.rooms.get(code)
    }

    /// 強調表示する部屋コード
    ///
    /// フィルタが有効なときは備品のある部屋だけ、無効なら全部屋。
    pub fn visible_codes(&self, filters: &FilterState) -> BTreeSet<String> {
        let active = filters.is_active();
        self.rooms
            .iter()
            .filter(|(_, room)| !active || room.has_items())
            .map(|(code, _)| code.clone())
            .collect()
    }
}

/// 表示中の建物に関する参照一式
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub building: &'a Building,
    pub registry: &'a BuildingRegistry,
    pub coordinates: &'a CoordinateMap,
    pub room_index: &'a RoomIndex,
}

impl<'a> ViewContext<'a> {
    /// 備品の部屋コードを解決する
    ///
    /// 座標ストアにある `room_code` を優先し、なければ `room_id` から逆引きする。
    /// 解決したコードが座標ストアにない場合は `None`。
    pub fn resolve_room_code(&self, item: &NormalizedItem) -> Option<&'a str> {
        if !item.room_code.is_empty() {
            if let Some((code, _)) = self.coordinates.get_key_value(&item.room_code) {
                return Some(code.as_str());
            }
        }
        let code = self.room_index.code_for(&item.room_id)?;
        self.coordinates
            .get_key_value(code)
            .map(|(code, _)| code.as_str())
    }

    /// 備品が表示中の建物（フロア）に属するか
    pub fn belongs_to_building(&self, item: &NormalizedItem) -> bool {
        let Some(building_id) = item.building_id else {
            return true;
        };
        if building_id != self.building.building_id {
            return false;
        }
        if self.registry.is_shared(building_id) {
            return self.resolve_room_code(item).is_some();
        }
        true
    }

    /// 部屋コードごとにグループ化する（部屋内は到着順）
    pub fn group_by_room<'i>(
        &self,
        items: &'i [NormalizedItem],
    ) -> BTreeMap<&'a str, Vec<&'i NormalizedItem>> {
        let mut grouped: BTreeMap<&'a str, Vec<&'i NormalizedItem>> = BTreeMap::new();
        let mut dropped = 0usize;
        for item in items {
            if !self.belongs_to_building(item) {
                continue;
            }
            match self.resolve_room_code(item) {
                Some(code) => grouped.entry(code).or_default().push(item),
                None => {
                    dropped += 1;
                    tracing::debug!(
                        item = %item.id,
                        room_code = %item.room_code,
                        room_id = %item.room_id,
                        "item dropped: room not resolved"
                    );
                }
            }
        }
        if dropped > 0 {
            tracing::debug!(building = %self.building.key, dropped, "items without a resolvable room");
        }
        grouped
    }

    /// 部屋の全備品（フィルタなし）
    pub fn room_items(&self, items: &[NormalizedItem], code: &str) -> Vec<NormalizedItem> {
        items
            .iter()
            .filter(|item| self.belongs_to_building(item))
            .filter(|item| self.resolve_room_code(item) == Some(code))
            .cloned()
            .collect()
    }
}

/// 代表カテゴリを求める
///
/// 数量をカテゴリごとに合計し最大のものを選ぶ。`unknown` は `other` として数える。
/// 同数の場合はカテゴリ名の辞書順で先のもの。
pub fn dominant_category<'i, I>(items: I) -> DominantCategory
where
    I: IntoIterator<Item = &'i NormalizedItem>,
{
    let mut totals: BTreeMap<&'static str, (Category, u64)> = BTreeMap::new();
    for item in items {
        let category = match item.category {
            Category::Unknown => Category::Other,
            other => other,
        };
        totals.entry(category.as_str()).or_insert((category, 0)).1 += u64::from(item.quantity);
    }

    let mut best: Option<(Category, u64)> = None;
    for (_, (category, total)) in totals {
        if best.map_or(true, |(_, max)| total > max) {
            best = Some((category, total));
        }
    }
    best.map_or(DominantCategory::Empty, |(category, _)| DominantCategory::Category(category))
}

/// ビューモデルを構築する
pub fn build_view_model(
    ctx: &ViewContext<'_>,
    items: &[NormalizedItem],
    filters: &FilterState,
) -> ViewModel {
    let grouped = ctx.group_by_room(items);
    let needle = filters.search_needle();

    let mut view = ViewModel::default();
    for (code, coord) in ctx.coordinates {
        let matched: Vec<NormalizedItem> = grouped
            .get(code.as_str())
            .map(|room_items| {
                room_items
                    .iter()
                    .filter(|item| filters.matches_with(item, code, &coord.name, needle.as_deref()))
                    .map(|item| (*item).clone())
                    .collect()
            })
            .unwrap_or_default();

        view.total_items += matched.len();
        if !matched.is_empty() {
            view.visible_rooms += 1;
        }
        let dominant = dominant_category(&matched);
        view.rooms.insert(
            code.clone(),
            RoomViewModel { items: matched, dominant_category: dominant },
        );
    }
    view
}
