//! SVG出力のテスト

use inventory_map::config::Config;
use inventory_map::error::InventoryError;
use inventory_map::render::{floor_plan_data_uri, render_svg, RenderOptions};
use inventory_map_common::session::BuildingLoad;
use inventory_map_common::{Building, BuildingRegistry, Fetched, FilterState, RawItem, RoomCoord, Session};
use std::path::Path;
use tempfile::tempdir;

fn session_with_rooms() -> Session {
    let mut session = Session::new(BuildingRegistry::default());
    let ticket = session.begin_load("mc-1f");
    let mut coordinates = inventory_map_common::CoordinateMap::new();
    coordinates.insert("MC131".into(), RoomCoord::new(100.0, 200.0, "Bar"));
    coordinates.insert("MC137".into(), RoomCoord::new(300.0, 400.0, "Library"));
    let items: Vec<RawItem> = serde_json::from_value(serde_json::json!([
        {"id": 1, "room_code": "MC131", "category": "furniture", "quantity": 2}
    ]))
    .expect("デシリアライズ失敗");
    session.complete_load(
        &ticket,
        BuildingLoad {
            coordinates,
            rooms: Fetched::Live(Vec::new()),
            items: Fetched::Live(items),
        },
    );
    session
}

/// 画像なしで描画（背景は相対パス参照）
#[test]
fn test_render_without_embedding() {
    let session = session_with_rooms();
    let view = session.view_model();
    let options = RenderOptions { select: Some("MC137".into()), ..Default::default() };

    let svg = render_svg(&session, &view, &Config::default(), &options).expect("描画失敗");
    assert!(svg.contains(r#"viewBox="0 0 1545 763""#));
    assert!(svg.contains(r#"href="assets/floor-plan-mc-1f.png""#));
    assert!(svg.contains(r##"data-code="MC131" cx="100" cy="200" r="11" fill="#4CAF50""##));
    assert!(svg.contains(r#"class="pin selected empty" data-code="MC137""#));
    assert!(svg.contains(r##"fill="#2196F3""##));
}

/// フィルタ有効時は該当なしの部屋が減光される
#[test]
fn test_render_dims_filtered_rooms() {
    let mut session = session_with_rooms();
    session.set_filters(FilterState { search: "bar".into(), ..Default::default() });
    let view = session.view_model();

    let svg = render_svg(&session, &view, &Config::default(), &RenderOptions::default()).expect("描画失敗");
    assert!(svg.contains(r#"class="pin empty dimmed" data-code="MC137""#));
    assert!(svg.contains(r#"class="pin" data-code="MC131""#));
}

/// 座標ストアにない部屋は選択できない
#[test]
fn test_render_unknown_selection() {
    let session = session_with_rooms();
    let view = session.view_model();
    let options = RenderOptions { select: Some("ZZ1".into()), ..Default::default() };
    let result = render_svg(&session, &view, &Config::default(), &options);
    assert!(matches!(result, Err(InventoryError::RoomNotFound(_))));
}

/// フロアプランの埋め込み（寸法違いは警告のみ）
#[test]
fn test_embed_floor_plan() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::create_dir_all(dir.path().join("assets")).expect("ディレクトリ作成失敗");
    let plan = dir.path().join("assets/floor-plan-mc-1f.png");
    image::RgbImage::new(4, 2).save(&plan).expect("画像保存失敗");

    let building = Building::new("mc-1f", "MC", 1);
    let uri = floor_plan_data_uri(&plan, &building).expect("埋め込み失敗").expect("画像がない");
    assert!(uri.starts_with("data:image/png;base64,"));

    let session = session_with_rooms();
    let view = session.view_model();
    let config = Config { site_root: dir.path().to_path_buf(), ..Default::default() };
    let options = RenderOptions { embed_plan: true, ..Default::default() };
    let svg = render_svg(&session, &view, &config, &options).expect("描画失敗");
    assert!(svg.contains(r#"<image href="data:image/png;base64,"#));
}

/// 画像がなければ背景なし
#[test]
fn test_missing_floor_plan() {
    let building = Building::new("ent", "Entertainment", 4);
    let uri = floor_plan_data_uri(Path::new("/nonexistent/floor.png"), &building).expect("失敗");
    assert!(uri.is_none());
}

/// 壊れた画像は背景なしで描画を続ける
#[test]
fn test_corrupt_floor_plan() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::create_dir_all(dir.path().join("assets")).expect("ディレクトリ作成失敗");
    let plan = dir.path().join("assets/floor-plan-mc-1f.png");
    std::fs::write(&plan, b"not a png").expect("書き込み失敗");

    let building = Building::new("mc-1f", "MC", 1);
    let uri = floor_plan_data_uri(&plan, &building).expect("失敗");
    assert!(uri.is_none());

    let session = session_with_rooms();
    let view = session.view_model();
    let config = Config { site_root: dir.path().to_path_buf(), ..Default::default() };
    let options = RenderOptions { embed_plan: true, ..Default::default() };
    let svg = render_svg(&session, &view, &config, &options).expect("描画失敗");
    assert!(svg.contains(r#"viewBox="0 0 1545 763""#));
    assert!(!svg.contains("<image"));
    assert!(svg.contains(r#"data-code="MC131""#));
    assert!(svg.contains(r#"data-code="MC137""#));
}
