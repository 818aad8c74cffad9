//! フロアマップのSVG出力
//!
//! フロアプラン画像があればデータURIとして埋め込む。画像の実寸がレジストリの
//! 寸法と異なる場合は警告だけ出し、描画はレジストリの寸法で行う。

use crate::config::Config;
use crate::error::{InventoryError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use inventory_map_common::map::FloorMap;
use inventory_map_common::{Building, MapStyle, Session, SvgSurface, ViewModel};
use std::path::Path;

/// 描画オプション
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// 選択状態にする部屋コード
    pub select: Option<String>,
    /// フロアプラン画像を埋め込む
    pub embed_plan: bool,
    pub category_dots: bool,
}

/// 画像ファイルのMIMEタイプ（拡張子から）
fn mime_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("gif") => "image/gif",
        _ => "image/png",
    }
}

/// フロアプランをデータURIにする（なければ・読めなければ `None`）
pub fn floor_plan_data_uri(path: &Path, building: &Building) -> Result<Option<String>> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "floor plan image not found, rendering without background");
        return Ok(None);
    }
    if mime_type(path) != "image/svg+xml" {
        let (width, height) = match image::image_dimensions(path) {
            Ok(size) => size,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "floor plan image unreadable, rendering without background");
                return Ok(None);
            }
        };
        if (width, height) != (building.width, building.height) {
            tracing::warn!(
                path = %path.display(),
                actual = %format!("{}x{}", width, height),
                expected = %format!("{}x{}", building.width, building.height),
                "floor plan size differs from registry"
            );
        }
    }
    let bytes = std::fs::read(path)?;
    Ok(Some(format!("data:{};base64,{}", mime_type(path), STANDARD.encode(bytes))))
}

/// 表示中の建物をSVGにする
pub fn render_svg(
    session: &Session,
    view: &ViewModel,
    config: &Config,
    options: &RenderOptions,
) -> Result<String> {
    let building = session.active_building();

    let mut map = FloorMap::new(MapStyle::default(), config.calibration);
    map.show_building(building, session.coordinates().clone());
    map.mark_plan_ready();
    map.set_data(view);
    map.highlight_rooms(view.visible_codes(session.filters()));
    if let Some(code) = &options.select {
        if !map.click(code) {
            return Err(InventoryError::RoomNotFound(code.clone()));
        }
    }

    let mut surface = SvgSurface::new().with_category_dots(options.category_dots);
    if options.embed_plan {
        let plan_path = config.site_path(&building.floor_plan);
        if let Some(uri) = floor_plan_data_uri(&plan_path, building)? {
            surface = surface.with_background(uri);
        }
    } else {
        surface = surface.with_background(building.floor_plan.clone());
    }

    map.draw(&mut surface);
    Ok(surface.finish())
}
