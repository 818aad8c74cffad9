//! 座標ストア
//!
//! 建物ごとの静的JSON（部屋コード → {x, y, name}）を読み込む。
//! ファイルがない・読めない・JSONが壊れている場合は空のマッピングを返す。
//! 座標ファイルのない建物も正当な（空の）構成として扱う。

use crate::building::{Building, BuildingRegistry};
use crate::error::Result;
use crate::gateway::Transport;
use crate::types::{CoordinateMap, RoomCoord};
use serde_json::Value;
use std::collections::BTreeMap;

/// 座標ファイルの内容を解釈する
///
/// 形の崩れたエントリは個別にスキップする。全体がオブジェクトでなければエラー。
pub fn parse_coordinates(json: &str) -> Result<CoordinateMap> {
    let entries: BTreeMap<String, Value> = serde_json::from_str(json)?;
    let coords = entries
        .into_iter()
        .filter_map(|(code, value)| match serde_json::from_value::<RoomCoord>(value) {
            Ok(coord) => Some((code, coord)),
            Err(e) => {
                tracing::debug!(code = %code, error = %e, "coordinate entry skipped");
                None
            }
        })
        .collect();
    Ok(coords)
}

/// 建物の座標を読み込む
pub async fn load_building_coordinates<T: Transport>(transport: &T, building: &Building) -> CoordinateMap {
    let path = building.rooms_file.as_str();
    let response = match transport.get(path).await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!(building = %building.key, path, error = %e, "coordinate file unavailable");
            return CoordinateMap::new();
        }
    };
    if !response.is_success() {
        tracing::debug!(building = %building.key, path, status = response.status, "coordinate file unavailable");
        return CoordinateMap::new();
    }
    match parse_coordinates(&response.body) {
        Ok(coords) => coords,
        Err(e) => {
            tracing::debug!(building = %building.key, path, error = %e, "coordinate file malformed");
            CoordinateMap::new()
        }
    }
}

/// 建物キーから座標を読み込む（未登録キーは既定の建物）
pub async fn load_coordinates<T: Transport>(
    transport: &T,
    registry: &BuildingRegistry,
    building_key: &str,
) -> CoordinateMap {
    load_building_coordinates(transport, registry.get(building_key)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::tests::MockTransport;
    use futures::executor::block_on;

    #[test]
    fn test_parse_coordinates() {
        let coords = parse_coordinates(r#"{"A1": {"x": 10, "y": 20, "name": "Bar"}}"#).expect("解析失敗");
        assert_eq!(coords.len(), 1);
        assert_eq!(coords["A1"].x, 10.0);
        assert_eq!(coords["A1"].name, "Bar");
    }

    #[test]
    fn test_parse_coordinates_keeps_good_entries() {
        let json = r#"{
            "A1": {"x": "100", "y": "200", "name": "Bar"},
            "A2": {"x": "left", "y": 5},
            "A3": {"x": 30, "y": 40}
        }"#;
        let coords = parse_coordinates(json).expect("解析失敗");
        assert_eq!(coords.len(), 2);
        assert_eq!(coords["A1"].x, 100.0);
        assert_eq!(coords["A1"].y, 200.0);
        assert!(!coords.contains_key("A2"));
        assert_eq!(coords["A3"].name, "");
    }

    #[test]
    fn test_load_coordinates() {
        let transport = MockTransport::with(
            "data/rooms-mv-1f.json",
            200,
            r#"{"MV101": {"x": 100, "y": 200, "name": "Spa"}, "MV102": {"x": 1, "y": 2, "name": "Gym"}}"#,
        );
        let coords = block_on(load_coordinates(&transport, &BuildingRegistry::default(), "mv-1f"));
        assert_eq!(coords.len(), 2);
        assert!(coords.contains_key("MV101"));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let transport = MockTransport::with("data/rooms-ent.json", 404, "Not Found");
        let coords = block_on(load_coordinates(&transport, &BuildingRegistry::default(), "ent"));
        assert!(coords.is_empty());
    }

    #[test]
    fn test_transport_error_is_empty() {
        let transport = MockTransport::default();
        let coords = block_on(load_coordinates(&transport, &BuildingRegistry::default(), "mc-1f"));
        assert!(coords.is_empty());
    }

    #[test]
    fn test_malformed_json_is_empty() {
        let transport = MockTransport::with("data/rooms-mc-1f.json", 200, "{not json");
        let coords = block_on(load_coordinates(&transport, &BuildingRegistry::default(), "mc-1f"));
        assert!(coords.is_empty());
    }

    #[test]
    fn test_unknown_key_uses_default_file() {
        let transport = MockTransport::with("data/rooms-mc-1f.json", 200, r#"{"MC131": {"x": 1, "y": 1, "name": "Bar"}}"#);
        let coords = block_on(load_coordinates(&transport, &BuildingRegistry::default(), "missing"));
        assert_eq!(coords.len(), 1);
    }
}
