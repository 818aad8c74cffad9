//! 組み込みフィクスチャ
//!
//! バックエンド未設定・到達不能のときに返す小さなデータセット。
//! 備品には `building_id` がないため、どの建物タブでも表示対象になる。

use crate::types::{RawItem, Room};
use serde_json::{json, Value};

const ROOMS: &[(u32, &str, &str)] = &[
    (1, "Bar", "MC131"),
    (2, "Grand Dining", "MC132"),
    (3, "Grand Living", "MC133"),
    (4, "Sunken Lounge", "MC134"),
    (5, "Grand Colonade", "MC130"),
    (6, "Asian Kitchen", "MC129"),
    (7, "Owner Kitchen", "MC121"),
    (8, "Wine Cellar", "MC119"),
    (9, "Powder Room", "MC117"),
    (10, "Linen Store", "MC127"),
    (11, "Walk In Fridge", "MC126"),
    (12, "Entry", "MC124"),
    (13, "Store", "MC120A"),
    (14, "Exterior Lounge", "MC135"),
    (15, "Grand Lobby", "MC116"),
    (16, "Reading", "MC138"),
    (17, "Library", "MC137"),
    (18, "Office", "MC139"),
    (19, "Grand Colonnade R", "MC112"),
    (20, "Powder Room R", "MC115"),
    (21, "Hollywood Movie Theatre", "MC113"),
    (22, "Walk In Freezer", "MC125"),
    (23, "Toilet", "MC123"),
    (24, "Refuse", "MC120"),
];

/// (id, room_id, category, description, condition, quantity)
const ITEMS: &[(&str, u32, &str, &str, &str, u32)] = &[
    ("INV-MOCK-001", 1, "furniture", "Bar counter marble top", "Отличное", 1),
    ("INV-MOCK-002", 2, "furniture", "Dining table 20 seats", "Отличное", 1),
    ("INV-MOCK-003", 2, "chandelier", "Crystal chandelier main", "Отличное", 1),
    ("INV-MOCK-004", 3, "furniture", "Sofa set Italian leather", "Удовлетворительное", 2),
    ("INV-MOCK-005", 3, "art", "Oil painting landscape", "Отличное", 3),
    ("INV-MOCK-006", 8, "other", "Wine rack 200 bottles", "Отличное", 1),
    ("INV-MOCK-007", 17, "furniture", "Antique bookshelf oak", "Отличное", 4),
    ("INV-MOCK-008", 21, "tech", "Sony 4K laser projector", "Отличное", 1),
    ("INV-MOCK-009", 21, "furniture", "Cinema seats row", "Отличное", 12),
];

/// フィクスチャの部屋一覧
pub fn rooms() -> Vec<Room> {
    ROOMS
        .iter()
        .map(|(id, name, code)| Room {
            id: id.to_string(),
            zone_id: "1".to_string(),
            name: name.to_string(),
            code: code.to_string(),
        })
        .collect()
}

/// フィクスチャの備品一覧
pub fn items() -> Vec<RawItem> {
    ITEMS
        .iter()
        .map(|(id, room_id, category, description, condition, quantity)| RawItem {
            id: id.to_string(),
            room_id: room_id.to_string(),
            room_code: String::new(),
            building_id: Value::Null,
            category: category.to_string(),
            description: description.to_string(),
            condition: json!(condition),
            quantity: json!(quantity),
            photos: Vec::new(),
        })
        .collect()
}
