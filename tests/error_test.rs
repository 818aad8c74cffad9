//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use inventory_map::error::InventoryError;
use inventory_map::spreadsheet::read_workbook;
use tempfile::tempdir;

/// Excelでないファイルを読んだ場合
#[test]
fn test_read_non_workbook() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("fake.xlsx");
    std::fs::write(&path, "hello").expect("書き込み失敗");

    let result = read_workbook(&path);
    assert!(matches!(result, Err(InventoryError::Spreadsheet(_))));
}

/// InventoryErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        InventoryError::Config("テスト設定エラー".to_string()),
        InventoryError::FileNotFound("rooms.json".to_string()),
        InventoryError::Spreadsheet("シートがありません".to_string()),
        InventoryError::Http("接続失敗".to_string()),
        InventoryError::Render("描画失敗".to_string()),
        InventoryError::RoomNotFound("MC999".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// 共通ライブラリのエラーはそのまま表示される
#[test]
fn test_common_error_is_transparent() {
    let common = inventory_map_common::Error::Config("default building 'x' is not registered".into());
    let err: InventoryError = common.into();
    assert!(format!("{}", err).contains("default building 'x'"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: InventoryError = io_err.into();
    assert!(matches!(err, InventoryError::Io(_)));
    assert!(format!("{}", err).starts_with("IOエラー"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let result: Result<serde_json::Value, _> = serde_json::from_str("{ invalid");
    let err: InventoryError = result.unwrap_err().into();
    assert!(matches!(err, InventoryError::JsonParse(_)));
}
