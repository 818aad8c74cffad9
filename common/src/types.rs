//! バックエンドとの受け渡し型
//!
//! スプレッドシート由来のため、ID・コード・名称は文字列でも数値でも届く。
//! ここでは形を揃えるだけで、意味的な正規化は `normalize` で行う:
//! - Room: 部屋（`getRooms`）
//! - RawItem: 備品（`getItems`）
//! - RoomCoord: 座標ファイルの1エントリ

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// 部屋コード → 座標のマッピング（建物ごと）
pub type CoordinateMap = BTreeMap<String, RoomCoord>;

/// 部屋（バックエンド）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Room {
    #[serde(deserialize_with = "loose_string")]
    pub id: String,
    #[serde(deserialize_with = "loose_string")]
    pub zone_id: String,
    #[serde(deserialize_with = "loose_string")]
    pub name: String,
    #[serde(deserialize_with = "loose_string")]
    pub code: String,
}

/// 備品（バックエンドの生レコード）
///
/// `condition` と `quantity` は列ずれの補正前なので型を決めずに保持する。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawItem {
    #[serde(deserialize_with = "loose_string")]
    pub id: String,
    #[serde(deserialize_with = "loose_string")]
    pub room_id: String,
    #[serde(deserialize_with = "loose_string")]
    pub room_code: String,
    pub building_id: Value,
    #[serde(deserialize_with = "loose_string")]
    pub category: String,
    #[serde(deserialize_with = "loose_string")]
    pub description: String,
    pub condition: Value,
    pub quantity: Value,
    #[serde(deserialize_with = "loose_array")]
    pub photos: Vec<Value>,
}

/// 座標ファイルの1エントリ（フロアプラン画像のピクセル座標）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomCoord {
    #[serde(deserialize_with = "loose_number")]
    pub x: f64,
    #[serde(deserialize_with = "loose_number")]
    pub y: f64,
    #[serde(default, deserialize_with = "loose_string")]
    pub name: String,
}

impl RoomCoord {
    pub fn new(x: f64, y: f64, name: impl Into<String>) -> Self {
        Self { x, y, name: name.into() }
    }
}

/// セル値を表示用文字列に変換する
///
/// 数値は整数で表せる場合は小数点なしで出す（`1.0` → `"1"`）。
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                let f = n.as_f64().unwrap_or_default();
                if f.fract() == 0.0 && f.abs() < 1e15 {
                    (f as i64).to_string()
                } else {
                    f.to_string()
                }
            }
        }
        other => other.to_string(),
    }
}

/// 文字列先頭の整数を読む（`"3 шт"` → 3）
///
/// 符号と数字以外で止まる。数字が1つもなければ `None`。
pub fn leading_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// セル値を整数として読む（数値は切り捨て、文字列は先頭の整数）
pub fn value_to_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => leading_integer(s),
        _ => None,
    }
}

/// 数値または数値文字列（`"100"`, `" 20.5 "`）
fn loose_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let number = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number
        .filter(|n| n.is_finite())
        .ok_or_else(|| serde::de::Error::custom(format!("not a coordinate: {}", value)))
}

fn loose_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_text(&value))
}

fn loose_array<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(values) => Ok(values),
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_room_deserialize_numeric_fields() {
        let room: Room = serde_json::from_value(json!({
            "id": 7, "zone_id": 1, "name": "Owner Kitchen", "code": "MC121"
        }))
        .expect("デシリアライズ失敗");
        assert_eq!(room.id, "7");
        assert_eq!(room.zone_id, "1");
        assert_eq!(room.code, "MC121");
    }

    #[test]
    fn test_raw_item_missing_fields() {
        let item: RawItem = serde_json::from_value(json!({"id": "INV-1"})).expect("デシリアライズ失敗");
        assert_eq!(item.id, "INV-1");
        assert_eq!(item.room_code, "");
        assert!(item.quantity.is_null());
        assert!(item.photos.is_empty());
    }

    #[test]
    fn test_raw_item_photos_not_array() {
        let item: RawItem = serde_json::from_value(json!({
            "id": 1, "photos": "https://drive.google.com/file/d/abc/view"
        }))
        .expect("デシリアライズ失敗");
        assert!(item.photos.is_empty());
    }

    #[test]
    fn test_room_coord_without_name() {
        let coord: RoomCoord = serde_json::from_value(json!({"x": 10, "y": 20.5})).expect("デシリアライズ失敗");
        assert_eq!(coord.x, 10.0);
        assert_eq!(coord.y, 20.5);
        assert_eq!(coord.name, "");
    }

    #[test]
    fn test_room_coord_numeric_strings() {
        let coord: RoomCoord =
            serde_json::from_value(json!({"x": "100", "y": " 20.5 ", "name": "Bar"})).expect("デシリアライズ失敗");
        assert_eq!(coord.x, 100.0);
        assert_eq!(coord.y, 20.5);
        assert!(serde_json::from_value::<RoomCoord>(json!({"x": "left", "y": 1})).is_err());
    }

    #[test]
    fn test_value_to_text() {
        assert_eq!(value_to_text(&json!(null)), "");
        assert_eq!(value_to_text(&json!(1.0)), "1");
        assert_eq!(value_to_text(&json!(2.5)), "2.5");
        assert_eq!(value_to_text(&json!("MC131")), "MC131");
        assert_eq!(value_to_text(&json!(true)), "true");
    }

    #[test]
    fn test_leading_integer() {
        assert_eq!(leading_integer("3"), Some(3));
        assert_eq!(leading_integer("  12 шт"), Some(12));
        assert_eq!(leading_integer("-2"), Some(-2));
        assert_eq!(leading_integer("Хорошее"), None);
        assert_eq!(leading_integer(""), None);
    }

    #[test]
    fn test_value_to_integer() {
        assert_eq!(value_to_integer(&json!(4)), Some(4));
        assert_eq!(value_to_integer(&json!(2.7)), Some(2));
        assert_eq!(value_to_integer(&json!("5")), Some(5));
        assert_eq!(value_to_integer(&json!(null)), None);
        assert_eq!(value_to_integer(&json!([1])), None);
    }
}
