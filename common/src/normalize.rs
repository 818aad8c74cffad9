//! 備品レコードの正規化
//!
//! バックエンドのシートには数量列と状態列が入れ替わって書き込まれる不具合がある。
//! カテゴリ・状態に関わる処理より前に、各備品につき一度だけここを通す。
//!
//! ## 処理
//! 1. 数量欄に正規の状態ラベルが入っていれば数量と状態を入れ替える
//! 2. 数量を正の整数にする（読めなければ 1）
//! 3. 空・部屋コードと同じカテゴリは `unknown`

use crate::category::Category;
use crate::condition::Condition;
use crate::types::{value_to_integer, value_to_text, RawItem};
use serde::Serialize;
use serde_json::Value;

/// 正規化済みの備品
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedItem {
    pub id: String,
    pub room_id: String,
    pub room_code: String,
    pub building_id: Option<i64>,
    pub category: Category,
    pub description: String,
    /// 認識できた状態（フィルタ判定用）
    pub condition: Option<Condition>,
    /// 表示用の状態ラベル（入れ替え後・前後空白除去）
    pub condition_label: String,
    pub quantity: u32,
    /// 写真の元URL（未検証）
    pub photos: Vec<String>,
    /// 数量/状態の入れ替えを行ったか
    pub swapped: bool,
}

/// 数量欄の値が正規の状態ラベルかどうか（絵文字付き・旧表記は対象外）
fn holds_condition_label(value: &Value) -> bool {
    matches!(value, Value::String(s) if Condition::from_canonical(s).is_some())
}

/// 数量を正の整数にする
pub fn parse_quantity(value: &Value) -> u32 {
    value_to_integer(value)
        .filter(|n| *n > 0)
        .map(|n| n.min(u32::MAX as i64) as u32)
        .unwrap_or(1)
}

/// 建物IDを読む（空・数値にならなければ `None`）
pub fn parse_building_id(value: &Value) -> Option<i64> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        other => value_to_integer(other),
    }
}

/// カテゴリを決める
///
/// 空または部屋コードと一致（シートの書式崩れ）なら `unknown`。
/// 列挙にない値は `other` に寄せる。
pub fn normalize_category(raw: &str, room_code: &str) -> Category {
    let trimmed = raw.trim();
    if trimmed.is_empty() || raw == room_code || trimmed == room_code.trim() {
        return Category::Unknown;
    }
    Category::from_key(trimmed).unwrap_or_else(|| {
        tracing::debug!(category = trimmed, "unrecognized category, counted as other");
        Category::Other
    })
}

/// 写真欄の値をURL文字列にする（文字列 / `{url}` / その他）
fn photo_source(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        Value::Object(map) => map.get("url").map(value_to_text)?,
        other => value_to_text(other),
    };
    let text = text.trim().to_string();
    (!text.is_empty()).then_some(text)
}

/// 備品を正規化する
pub fn normalize_item(raw: &RawItem) -> NormalizedItem {
    let swapped = holds_condition_label(&raw.quantity);
    let (condition_value, quantity_value) = if swapped {
        tracing::warn!(
            item = %raw.id,
            quantity = %value_to_text(&raw.quantity),
            "quantity column holds a condition label, swapping with condition"
        );
        (&raw.quantity, &raw.condition)
    } else {
        (&raw.condition, &raw.quantity)
    };

    let condition_label = value_to_text(condition_value).trim().to_string();

    NormalizedItem {
        id: raw.id.clone(),
        room_id: raw.room_id.trim().to_string(),
        room_code: raw.room_code.trim().to_string(),
        building_id: parse_building_id(&raw.building_id),
        category: normalize_category(&raw.category, &raw.room_code),
        description: raw.description.clone(),
        condition: Condition::parse(&condition_label),
        condition_label,
        quantity: parse_quantity(quantity_value),
        photos: raw.photos.iter().filter_map(photo_source).collect(),
        swapped,
    }
}

/// まとめて正規化する（到着順を保つ）
pub fn normalize_items(raw: &[RawItem]) -> Vec<NormalizedItem> {
    raw.iter().map(normalize_item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawItem {
        serde_json::from_value(value).expect("デシリアライズ失敗")
    }

    #[test]
    fn test_swap_quantity_and_condition() {
        let item = normalize_item(&raw(json!({
            "id": 1, "room_code": "A1", "category": "furniture",
            "quantity": "Хорошее", "condition": "3"
        })));
        assert!(item.swapped);
        assert_eq!(item.condition, Some(Condition::Good));
        assert_eq!(item.condition_label, "Хорошее");
        assert_eq!(item.quantity, 3);
    }

    #[test]
    fn test_swap_every_canonical_label() {
        for condition in Condition::ALL {
            let item = normalize_item(&raw(json!({
                "id": "x", "quantity": condition.label(), "condition": 2
            })));
            assert!(item.swapped);
            assert_eq!(item.condition, Some(condition));
            assert_eq!(item.quantity, 2);
        }
    }

    #[test]
    fn test_swap_with_non_numeric_condition_defaults_to_one() {
        let item = normalize_item(&raw(json!({"quantity": "Неисправно", "condition": ""})));
        assert!(item.swapped);
        assert_eq!(item.quantity, 1);
    }

    #[test]
    fn test_no_swap_for_legacy_or_emoji_label() {
        let item = normalize_item(&raw(json!({"quantity": "Новое", "condition": "5"})));
        assert!(!item.swapped);
        assert_eq!(item.quantity, 1);
        assert_eq!(item.condition_label, "5");
        assert_eq!(item.condition, None);

        let item = normalize_item(&raw(json!({"quantity": "👍 Хорошее", "condition": "2"})));
        assert!(!item.swapped);
        assert_eq!(item.quantity, 1);
        assert_eq!(item.condition_label, "2");
    }

    #[test]
    fn test_no_swap_for_numeric_quantity() {
        let item = normalize_item(&raw(json!({"quantity": 4, "condition": "Отличное"})));
        assert!(!item.swapped);
        assert_eq!(item.quantity, 4);
        assert_eq!(item.condition, Some(Condition::Excellent));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let first = normalize_item(&raw(json!({
            "id": "INV-7", "room_code": "MC131", "category": "art",
            "quantity": "Удовлетворительное", "condition": "2"
        })));
        let again = normalize_item(&raw(json!({
            "id": first.id, "room_code": first.room_code, "category": first.category.as_str(),
            "quantity": first.quantity, "condition": first.condition_label
        })));
        assert!(!again.swapped);
        assert_eq!(again.quantity, first.quantity);
        assert_eq!(again.condition, first.condition);
        assert_eq!(again.category, first.category);
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity(&json!("1")), 1);
        assert_eq!(parse_quantity(&json!(12)), 12);
        assert_eq!(parse_quantity(&json!("7 шт")), 7);
        assert_eq!(parse_quantity(&json!(null)), 1);
        assert_eq!(parse_quantity(&json!("")), 1);
        assert_eq!(parse_quantity(&json!("abc")), 1);
        assert_eq!(parse_quantity(&json!(0)), 1);
        assert_eq!(parse_quantity(&json!(-3)), 1);
    }

    #[test]
    fn test_category_unknown_when_empty() {
        let item = normalize_item(&raw(json!({"room_code": "MC131", "category": "  "})));
        assert_eq!(item.category, Category::Unknown);
        let item = normalize_item(&raw(json!({"room_code": "MC131"})));
        assert_eq!(item.category, Category::Unknown);
    }

    #[test]
    fn test_category_unknown_when_equals_room_code() {
        let item = normalize_item(&raw(json!({"room_code": "MC131", "category": "MC131"})));
        assert_eq!(item.category, Category::Unknown);
    }

    #[test]
    fn test_category_unrecognized_is_other() {
        let item = normalize_item(&raw(json!({"room_code": "MC131", "category": "statue"})));
        assert_eq!(item.category, Category::Other);
        let item = normalize_item(&raw(json!({"category": "Tech"})));
        assert_eq!(item.category, Category::Tech);
    }

    #[test]
    fn test_building_id() {
        assert_eq!(parse_building_id(&json!(2)), Some(2));
        assert_eq!(parse_building_id(&json!("3")), Some(3));
        assert_eq!(parse_building_id(&json!("")), None);
        assert_eq!(parse_building_id(&json!(null)), None);
        assert_eq!(parse_building_id(&json!("n/a")), None);
    }

    #[test]
    fn test_photo_sources() {
        let item = normalize_item(&raw(json!({
            "photos": [
                "https://drive.google.com/file/d/abc/view",
                {"url": "https://drive.google.com/open?id=xyz"},
                null,
                ""
            ]
        })));
        assert_eq!(
            item.photos,
            vec![
                "https://drive.google.com/file/d/abc/view".to_string(),
                "https://drive.google.com/open?id=xyz".to_string(),
            ]
        );
    }
}
