//! テキスト・JSONのレポート出力

use crate::error::Result;
use inventory_map_common::session::{RoomDetail, NO_ITEMS};
use inventory_map_common::{Building, BuildingRegistry, FilterState, Session, ViewModel};
use serde::Serialize;
use std::fmt::Write;

/// 集計の1行
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRow {
    pub code: String,
    pub name: String,
    pub item_count: usize,
    pub dominant_category: String,
    pub visible: bool,
}

/// 集計レポート
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub building: String,
    pub label: String,
    pub filters: FilterState,
    pub stats: String,
    pub total_items: usize,
    pub visible_rooms: usize,
    pub rooms: Vec<RoomRow>,
}

impl SummaryReport {
    pub fn new(session: &Session, view: &ViewModel) -> Self {
        let building = session.active_building();
        let visible = view.visible_codes(session.filters());
        let rooms = view
            .rooms
            .iter()
            .map(|(code, room)| RoomRow {
                code: code.clone(),
                name: session
                    .coordinates()
                    .get(code)
                    .map(|c| c.name.clone())
                    .unwrap_or_default(),
                item_count: room.items.len(),
                dominant_category: room.dominant_category.to_string(),
                visible: visible.contains(code),
            })
            .collect();
        Self {
            building: building.key.clone(),
            label: building.label.clone(),
            filters: session.filters().clone(),
            stats: session.stats_line(view),
            total_items: view.total_items,
            visible_rooms: view.visible_rooms,
            rooms,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} ({})", self.label, self.building);
        let _ = writeln!(out, "{}", self.stats);
        if self.rooms.is_empty() {
            let _ = writeln!(out, "座標ファイルに部屋がありません");
            return out;
        }
        let _ = writeln!(out);
        let name_width = self
            .rooms
            .iter()
            .map(|r| r.name.chars().count())
            .max()
            .unwrap_or(0)
            .max(4);
        let _ = writeln!(out, "  {:<8} {:<name_width$} {:>5}  DOMINANT", "CODE", "NAME", "ITEMS");
        for row in &self.rooms {
            let marker = if row.visible { ' ' } else { '·' };
            let padding = name_width.saturating_sub(row.name.chars().count());
            let _ = writeln!(
                out,
                "{} {:<8} {}{} {:>5}  {}",
                marker,
                row.code,
                row.name,
                " ".repeat(padding),
                row.item_count,
                row.dominant_category
            );
        }
        out
    }
}

/// 部屋詳細のテキスト
pub fn room_text(detail: &RoomDetail) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", detail.title());
    let _ = writeln!(out, "{}", detail.count_label());
    if detail.is_empty() {
        let _ = writeln!(out, "  {}", NO_ITEMS);
        return out;
    }
    for card in &detail.items {
        let _ = writeln!(out);
        let _ = writeln!(out, "  [{}] {}", card.category_label, card.description);
        let _ = writeln!(
            out,
            "    {}  Состояние: {}  Qty: {}",
            card.room_code, card.condition, card.quantity
        );
        for photo in &card.photos {
            let _ = writeln!(out, "    📷 {}", photo.thumbnail_url);
        }
    }
    out
}

/// 建物一覧のテキスト（座標件数つき）
pub fn buildings_text(registry: &BuildingRegistry, entries: &[(Building, usize)]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  {:<10} {:<22} {:>3} {:>6}  PLAN", "KEY", "LABEL", "ID", "ROOMS");
    for (building, rooms) in entries {
        let default_mark = if building.key == registry.default_key() { '*' } else { ' ' };
        let shared = if registry.is_shared(building.building_id) { " (shared id)" } else { "" };
        let _ = writeln!(
            out,
            "{} {:<10} {:<22} {:>3} {:>6}  {} {}x{}{}",
            default_mark,
            building.key,
            building.label,
            building.building_id,
            rooms,
            building.floor_plan,
            building.width,
            building.height,
            shared
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_map_common::session::ItemCard;
    use inventory_map_common::{normalize_item, RawItem};

    #[test]
    fn test_room_text_empty() {
        let detail = RoomDetail { code: "MC131".into(), name: "Bar".into(), items: Vec::new() };
        let text = room_text(&detail);
        assert!(text.starts_with("MC131 — Bar\n0 items\n"));
        assert!(text.contains("No items"));
    }

    #[test]
    fn test_room_text_cards() {
        let raw: RawItem = serde_json::from_value(serde_json::json!({
            "id": 1, "room_code": "MC131", "category": "furniture", "description": "Sofa",
            "condition": "Хорошее", "quantity": 2,
            "photos": ["https://drive.google.com/file/d/abc/view"]
        }))
        .expect("デシリアライズ失敗");
        let detail = RoomDetail {
            code: "MC131".into(),
            name: "Bar".into(),
            items: vec![ItemCard::new(&normalize_item(&raw))],
        };
        let text = room_text(&detail);
        assert!(text.contains("[Furniture / Мебель] Sofa"));
        assert!(text.contains("Состояние: Хорошее  Qty: 2"));
        assert!(text.contains("https://drive.google.com/thumbnail?id=abc&sz=w400"));
    }

    #[test]
    fn test_buildings_text_marks_default_and_shared() {
        let registry = BuildingRegistry::default();
        let entries: Vec<(Building, usize)> = registry.iter().map(|b| (b.clone(), 0)).collect();
        let text = buildings_text(&registry, &entries);
        let mc = text.lines().find(|l| l.contains("mc-1f")).expect("mc-1f がない");
        assert!(mc.starts_with('*'));
        assert!(!mc.contains("shared"));
        let mv = text.lines().find(|l| l.contains("mv-2f")).expect("mv-2f がない");
        assert!(mv.contains("(shared id)"));
    }
}
