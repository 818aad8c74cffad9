//! 設定ファイルのテスト

use inventory_map::config::Config;
use inventory_map::error::InventoryError;
use inventory_map_common::map::Calibration;
use std::path::PathBuf;
use tempfile::tempdir;

/// 保存と読み込み
#[test]
fn test_save_and_load() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("config.json");

    let mut config = Config {
        site_root: PathBuf::from("/srv/inventory"),
        default_building: Some("mv-2f".into()),
        calibration: Calibration { x_offset: 4.0, y_offset: -2.0, x_scale: 1.01, y_scale: 0.99 },
        ..Default::default()
    };
    config.set_api_url(" https://script.example/exec ".into());
    config.save_to(&path).expect("保存失敗");

    let loaded = Config::load_from(&path).expect("読み込み失敗");
    assert_eq!(loaded.api_url.as_deref(), Some("https://script.example/exec"));
    assert_eq!(loaded.site_root, PathBuf::from("/srv/inventory"));
    assert_eq!(loaded.calibration.x_scale, 1.01);
    assert_eq!(loaded.timeout_seconds, 30);

    let mut cleared = loaded;
    cleared.clear_api_url();
    assert!(cleared.api_url.is_none());
}

/// ファイルがなければ既定値
#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = Config::load_from(&dir.path().join("none.json")).expect("読み込み失敗");
    assert!(config.api_url.is_none());
    assert!(config.calibration.is_identity());
    assert_eq!(config.site_root, PathBuf::from("."));
}

/// 一部のフィールドだけの設定も読める
#[test]
fn test_partial_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"calibration": {"x_offset": 12}}"#).expect("書き込み失敗");

    let config = Config::load_from(&path).expect("読み込み失敗");
    assert_eq!(config.calibration.x_offset, 12.0);
    assert_eq!(config.calibration.x_scale, 1.0);
}

/// 壊れた設定ファイルは設定エラー
#[test]
fn test_malformed_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").expect("書き込み失敗");

    let result = Config::load_from(&path);
    assert!(matches!(result, Err(InventoryError::Config(_))));
}

/// 建物レジストリの差し替え
#[test]
fn test_registry_from_file_and_default() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("buildings.json");
    std::fs::write(
        &path,
        r#"{
            "defaultBuilding": "north",
            "buildings": {
                "north": {"label": "North", "floorPlan": "n.png", "width": 800, "height": 600, "roomsFile": "n.json", "buildingId": 1},
                "south": {"label": "South", "floorPlan": "s.png", "width": 800, "height": 600, "roomsFile": "s.json", "buildingId": 2}
            }
        }"#,
    )
    .expect("書き込み失敗");

    let config = Config { buildings_file: Some(path.clone()), ..Default::default() };
    let registry = config.registry().expect("レジストリ読み込み失敗");
    assert_eq!(registry.default_key(), "north");
    assert_eq!(registry.get("south").width, 800);

    let config = Config {
        buildings_file: Some(path),
        default_building: Some("south".into()),
        ..Default::default()
    };
    assert_eq!(config.registry().expect("レジストリ読み込み失敗").default_key(), "south");

    let config = Config { default_building: Some("nowhere".into()), ..Default::default() };
    assert!(matches!(config.registry(), Err(InventoryError::Common(_))));

    let config = Config { buildings_file: Some(dir.path().join("none.json")), ..Default::default() };
    assert!(matches!(config.registry(), Err(InventoryError::FileNotFound(_))));
}
