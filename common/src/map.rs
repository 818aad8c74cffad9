//! フロアマップ描画（ブラウザ非依存部分）
//!
//! 座標ストアの1部屋につき1マーカー。マーカー位置はフロアプラン画像の
//! ネイティブピクセル座標で計算し、viewBox によって表示サイズに追従させる。
//! 実際の描画は [`Surface`] の実装（SVG文字列・Leptosコンポーネント）が担う。
//!
//! ## 状態
//! - ホバー: `idle -> hovered -> idle`（見た目のみ）
//! - 選択: `unselected <-> selected`（同時に1つ、クリックでのみ変化）

use crate::building::{Building, DEFAULT_PLAN_HEIGHT, DEFAULT_PLAN_WIDTH};
use crate::category::DominantCategory;
use crate::types::{CoordinateMap, RoomCoord};
use crate::view_model::ViewModel;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// SVGの `preserveAspectRatio`
pub const PRESERVE_ASPECT_RATIO: &str = "xMinYMin meet";

/// マーカーの見た目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapStyle {
    /// マーカー直径（px, 画像座標）
    pub pin_size: f64,
    /// ホバー時の半径倍率
    pub hover_factor: f64,
    pub has_items_color: String,
    pub empty_color: String,
    pub selected_color: String,
    pub stroke_color: String,
    pub empty_stroke_color: String,
    pub stroke_width: f64,
    pub empty_stroke_width: f64,
    /// フィルタ対象外マーカーの不透明度
    pub dimmed_opacity: f64,
    pub debug_color: String,
    pub debug_radius: f64,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            pin_size: 22.0,
            hover_factor: 1.3,
            has_items_color: "#4CAF50".to_string(),
            empty_color: "#9E9E9E".to_string(),
            selected_color: "#2196F3".to_string(),
            stroke_color: "#fff".to_string(),
            empty_stroke_color: "#999".to_string(),
            stroke_width: 2.0,
            empty_stroke_width: 1.5,
            dimmed_opacity: 0.25,
            debug_color: "red".to_string(),
            debug_radius: 5.0,
        }
    }
}

impl MapStyle {
    pub fn base_radius(&self) -> f64 {
        self.pin_size / 2.0
    }
}

/// 座標の線形補正（軸ごとに `coord * scale + offset`）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    pub x_offset: f64,
    pub y_offset: f64,
    pub x_scale: f64,
    pub y_scale: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self { x_offset: 0.0, y_offset: 0.0, x_scale: 1.0, y_scale: 1.0 }
    }
}

impl Calibration {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, coord: &RoomCoord) -> (f64, f64) {
        (
            coord.x * self.x_scale + self.x_offset,
            coord.y * self.y_scale + self.y_offset,
        )
    }
}

/// フロアプランのネイティブ寸法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanGeometry {
    pub width: u32,
    pub height: u32,
}

impl Default for PlanGeometry {
    fn default() -> Self {
        Self { width: DEFAULT_PLAN_WIDTH, height: DEFAULT_PLAN_HEIGHT }
    }
}

impl PlanGeometry {
    /// 0 は既定寸法に置き換える
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: if width == 0 { DEFAULT_PLAN_WIDTH } else { width },
            height: if height == 0 { DEFAULT_PLAN_HEIGHT } else { height },
        }
    }

    pub fn view_box(&self) -> String {
        format!("0 0 {} {}", self.width, self.height)
    }

    /// CSS の `aspect-ratio`
    pub fn aspect_ratio(&self) -> String {
        format!("{} / {}", self.width, self.height)
    }
}

/// 描画する1マーカー
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub code: String,
    pub name: String,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub base_r: f64,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
    pub selected: bool,
    pub empty: bool,
    pub dimmed: bool,
    pub hovered: bool,
    pub opacity: f64,
    pub item_count: usize,
    pub dominant: DominantCategory,
}

impl MarkerSpec {
    /// CSSクラス（`pin selected empty dimmed`）
    pub fn class_list(&self) -> String {
        let mut classes = vec!["pin"];
        if self.selected {
            classes.push("selected");
        }
        if self.empty {
            classes.push("empty");
        }
        if self.dimmed {
            classes.push("dimmed");
        }
        classes.join(" ")
    }
}

/// ツールチップ（表示座標はカーソル位置からのずれ込み）
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipSpec {
    pub code: String,
    pub text: String,
    pub left: f64,
    pub top: f64,
}

/// デバッグモードのクリック位置（画像座標）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugPoint {
    pub x: i64,
    pub y: i64,
}

/// 描画先
pub trait Surface {
    fn begin(&mut self, geometry: &PlanGeometry);
    fn marker(&mut self, marker: &MarkerSpec);
    fn debug_point(&mut self, point: &DebugPoint, style: &MapStyle);
    fn end(&mut self);
}

/// 部屋選択時のコールバック
pub type RoomSelectHandler = Box<dyn Fn(&str) + Send + Sync>;

/// 部屋ごとの集計（マーカー表示に必要な分だけ）
#[derive(Debug, Clone, Copy, PartialEq)]
struct RoomStatus {
    item_count: usize,
    dominant: DominantCategory,
}

/// フロアマップの状態
pub struct FloorMap {
    style: MapStyle,
    calibration: Calibration,
    geometry: PlanGeometry,
    rooms: CoordinateMap,
    status: BTreeMap<String, RoomStatus>,
    /// `None` は減光なし
    visible: Option<BTreeSet<String>>,
    selected: Option<String>,
    hovered: Option<String>,
    tooltip: Option<TooltipSpec>,
    container_width: Option<f64>,
    plan_ready: bool,
    debug_points: Vec<DebugPoint>,
    on_room_select: Option<RoomSelectHandler>,
}

impl fmt::Debug for FloorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FloorMap")
            .field("geometry", &self.geometry)
            .field("rooms", &self.rooms.len())
            .field("selected", &self.selected)
            .field("hovered", &self.hovered)
            .field("container_width", &self.container_width)
            .field("plan_ready", &self.plan_ready)
            .finish_non_exhaustive()
    }
}

impl Default for FloorMap {
    fn default() -> Self {
        Self::new(MapStyle::default(), Calibration::default())
    }
}

impl FloorMap {
    pub fn new(style: MapStyle, calibration: Calibration) -> Self {
        Self {
            style,
            calibration,
            geometry: PlanGeometry::default(),
            rooms: CoordinateMap::new(),
            status: BTreeMap::new(),
            visible: None,
            selected: None,
            hovered: None,
            tooltip: None,
            container_width: None,
            plan_ready: false,
            debug_points: Vec::new(),
            on_room_select: None,
        }
    }

    pub fn style(&self) -> &MapStyle {
        &self.style
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn set_calibration(&mut self, calibration: Calibration) {
        self.calibration = calibration;
    }

    pub fn geometry(&self) -> PlanGeometry {
        self.geometry
    }

    pub fn rooms(&self) -> &CoordinateMap {
        &self.rooms
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn tooltip(&self) -> Option<&TooltipSpec> {
        self.tooltip.as_ref()
    }

    pub fn debug_points(&self) -> &[DebugPoint] {
        &self.debug_points
    }

    pub fn on_room_select(&mut self, handler: RoomSelectHandler) {
        self.on_room_select = Some(handler);
    }

    pub fn set_plan_dimensions(&mut self, width: u32, height: u32) {
        self.geometry = PlanGeometry::new(width, height);
    }

    /// 建物切り替え: 寸法と座標をまとめて差し替える
    pub fn show_building(&mut self, building: &Building, coordinates: CoordinateMap) {
        self.set_plan_dimensions(building.width, building.height);
        self.set_rooms(coordinates);
    }

    /// 座標を差し替える（選択・ホバー・デバッグ点は解除）
    pub fn set_rooms(&mut self, rooms: CoordinateMap) {
        tracing::debug!(rooms = rooms.len(), view_box = %self.geometry.view_box(), "markers replaced");
        self.rooms = rooms;
        self.selected = None;
        self.hovered = None;
        self.tooltip = None;
        self.debug_points.clear();
    }

    /// 表示データを差し替える
    pub fn set_data(&mut self, view: &ViewModel) {
        self.status = view
            .rooms
            .iter()
            .map(|(code, room)| {
                let status = RoomStatus {
                    item_count: room.items.len(),
                    dominant: room.dominant_category,
                };
                (code.clone(), status)
            })
            .collect();
    }

    /// 指定コード以外のマーカーを減光する
    pub fn highlight_rooms<I, S>(&mut self, visible_codes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.visible = Some(visible_codes.into_iter().map(Into::into).collect());
    }

    pub fn is_dimmed(&self, code: &str) -> bool {
        self.visible.as_ref().is_some_and(|v| !v.contains(code))
    }

    /// ホバー開始。ツールチップを返す（未知のコードは無視）
    pub fn hover_enter(&mut self, code: &str, client_x: f64, client_y: f64) -> Option<&TooltipSpec> {
        let coord = self.rooms.get(code)?;
        self.hovered = Some(code.to_string());
        self.tooltip = Some(TooltipSpec {
            code: code.to_string(),
            text: format!("{} — {}", code, coord.name),
            left: client_x + 10.0,
            top: client_y - 30.0,
        });
        self.tooltip.as_ref()
    }

    pub fn hover_leave(&mut self, code: &str) {
        if self.hovered.as_deref() == Some(code) {
            self.hovered = None;
            self.tooltip = None;
        }
    }

    /// マーカークリック。選択を切り替えてコールバックを呼ぶ
    pub fn click(&mut self, code: &str) -> bool {
        if !self.rooms.contains_key(code) {
            return false;
        }
        tracing::debug!(code, previous = ?self.selected, "marker selected");
        self.selected = Some(code.to_string());
        if let Some(handler) = &self.on_room_select {
            handler(code);
        }
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// コンテナ幅の変化。0以下は無視
    pub fn resize(&mut self, container_width: f64) -> bool {
        if !(container_width > 0.0) {
            return false;
        }
        self.container_width = Some(container_width);
        true
    }

    /// 表示幅 / ネイティブ幅
    pub fn scale(&self) -> f64 {
        match self.container_width {
            Some(width) => width / f64::from(self.geometry.width),
            None => 1.0,
        }
    }

    /// 画像の読み込み完了（失敗時も呼ぶ）
    pub fn mark_plan_ready(&mut self) {
        self.plan_ready = true;
    }

    pub fn is_plan_ready(&self) -> bool {
        self.plan_ready
    }

    /// マーカー一覧（画像準備前は空）
    pub fn markers(&self) -> Vec<MarkerSpec> {
        if !self.plan_ready {
            return Vec::new();
        }
        self.rooms
            .iter()
            .map(|(code, coord)| self.marker_for(code, coord))
            .collect()
    }

    fn marker_for(&self, code: &str, coord: &RoomCoord) -> MarkerSpec {
        let status = self.status.get(code).copied().unwrap_or(RoomStatus {
            item_count: 0,
            dominant: DominantCategory::Empty,
        });
        let selected = self.selected.as_deref() == Some(code);
        let hovered = self.hovered.as_deref() == Some(code);
        let empty = status.item_count == 0;
        let dimmed = self.is_dimmed(code);

        let fill = if selected {
            &self.style.selected_color
        } else if !empty {
            &self.style.has_items_color
        } else {
            &self.style.empty_color
        };
        let (stroke, stroke_width) = if empty {
            (&self.style.empty_stroke_color, self.style.empty_stroke_width)
        } else {
            (&self.style.stroke_color, self.style.stroke_width)
        };

        let base_r = self.style.base_radius();
        let (cx, cy) = self.calibration.apply(coord);
        MarkerSpec {
            code: code.to_string(),
            name: coord.name.clone(),
            cx,
            cy,
            r: if hovered { base_r * self.style.hover_factor } else { base_r },
            base_r,
            fill: fill.clone(),
            stroke: stroke.clone(),
            stroke_width,
            selected,
            empty,
            dimmed,
            hovered,
            opacity: if dimmed { self.style.dimmed_opacity } else { 1.0 },
            item_count: status.item_count,
            dominant: status.dominant,
        }
    }

    /// 描画先に全マーカーを流す
    pub fn draw<S: Surface>(&self, surface: &mut S) {
        surface.begin(&self.geometry);
        for marker in self.markers() {
            surface.marker(&marker);
        }
        for point in &self.debug_points {
            surface.debug_point(point, &self.style);
        }
        surface.end();
    }

    /// 表示座標（画像左上基準）→ 画像座標。画像外は `None`
    pub fn display_to_image(
        &self,
        x_display: f64,
        y_display: f64,
        display_width: f64,
        display_height: f64,
    ) -> Option<DebugPoint> {
        if x_display < 0.0 || y_display < 0.0 || x_display > display_width || y_display > display_height {
            return None;
        }
        let scale = self.scale();
        if !(scale > 0.0) {
            return None;
        }
        Some(DebugPoint {
            x: (x_display / scale).round() as i64,
            y: (y_display / scale).round() as i64,
        })
    }

    /// デバッグモードのクリックを記録する
    pub fn record_debug_click(
        &mut self,
        x_display: f64,
        y_display: f64,
        display_width: f64,
        display_height: f64,
    ) -> Option<DebugPoint> {
        let point = self.display_to_image(x_display, y_display, display_width, display_height)?;
        tracing::info!(x = point.x, y = point.y, "debug click (image coords)");
        self.debug_points.push(point);
        Some(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::view_model::RoomViewModel;
    use std::sync::{Arc, Mutex};

    fn coords() -> CoordinateMap {
        let mut map = CoordinateMap::new();
        map.insert("A1".into(), RoomCoord::new(100.0, 200.0, "Bar"));
        map.insert("A2".into(), RoomCoord::new(300.0, 50.0, "Lobby"));
        map
    }

    fn ready_map() -> FloorMap {
        let mut map = FloorMap::default();
        map.set_rooms(coords());
        map.mark_plan_ready();
        map
    }

    fn view_with_items(code: &str) -> ViewModel {
        let mut view = ViewModel::default();
        for c in ["A1", "A2"] {
            view.rooms.insert(
                c.to_string(),
                RoomViewModel { items: Vec::new(), dominant_category: DominantCategory::Empty },
            );
        }
        let item: crate::types::RawItem =
            serde_json::from_value(serde_json::json!({"id": 1, "category": "art"}))
                .expect("デシリアライズ失敗");
        view.rooms.insert(
            code.to_string(),
            RoomViewModel {
                items: vec![crate::normalize::normalize_item(&item)],
                dominant_category: DominantCategory::Category(Category::Art),
            },
        );
        view
    }

    fn marker<'a>(markers: &'a [MarkerSpec], code: &str) -> &'a MarkerSpec {
        markers.iter().find(|m| m.code == code).expect("マーカーがない")
    }

    #[test]
    fn test_no_markers_before_plan_ready() {
        let mut map = FloorMap::default();
        map.set_rooms(coords());
        assert!(map.markers().is_empty());
        map.mark_plan_ready();
        assert_eq!(map.markers().len(), 2);
    }

    #[test]
    fn test_marker_color_precedence() {
        let mut map = ready_map();
        map.set_data(&view_with_items("A1"));

        let markers = map.markers();
        assert_eq!(marker(&markers, "A1").fill, "#4CAF50");
        assert_eq!(marker(&markers, "A1").stroke, "#fff");
        assert_eq!(marker(&markers, "A2").fill, "#9E9E9E");
        assert_eq!(marker(&markers, "A2").stroke, "#999");
        assert_eq!(marker(&markers, "A2").stroke_width, 1.5);

        assert!(map.click("A2"));
        let markers = map.markers();
        assert_eq!(marker(&markers, "A2").fill, "#2196F3");
        assert!(marker(&markers, "A2").empty);
        assert_eq!(marker(&markers, "A2").class_list(), "pin selected empty");
    }

    #[test]
    fn test_selection_is_exclusive_and_calls_handler() {
        let mut map = ready_map();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        map.on_room_select(Box::new(move |code| {
            sink.lock().expect("ロック失敗").push(code.to_string());
        }));

        assert!(map.click("A1"));
        assert!(map.click("A2"));
        assert!(!map.click("ZZ"));

        let selected: Vec<bool> = map.markers().iter().map(|m| m.selected).collect();
        assert_eq!(selected.iter().filter(|s| **s).count(), 1);
        assert_eq!(map.selected(), Some("A2"));
        assert_eq!(*seen.lock().expect("ロック失敗"), vec!["A1", "A2"]);
    }

    #[test]
    fn test_filter_changes_keep_selection() {
        let mut map = ready_map();
        map.click("A1");
        map.set_data(&view_with_items("A2"));
        map.highlight_rooms(["A2"]);
        assert_eq!(map.selected(), Some("A1"));
    }

    #[test]
    fn test_set_rooms_resets_selection() {
        let mut map = ready_map();
        map.click("A1");
        map.set_rooms(coords());
        assert_eq!(map.selected(), None);
    }

    #[test]
    fn test_hover_enlarges_and_shows_tooltip() {
        let mut map = ready_map();
        let tooltip = map.hover_enter("A1", 50.0, 80.0).cloned().expect("ツールチップなし");
        assert_eq!(tooltip.text, "A1 — Bar");
        assert_eq!((tooltip.left, tooltip.top), (60.0, 50.0));

        let markers = map.markers();
        assert!((marker(&markers, "A1").r - 14.3).abs() < 1e-9);
        assert_eq!(marker(&markers, "A2").r, 11.0);
        assert_eq!(map.selected(), None);

        map.hover_leave("A1");
        assert!(map.tooltip().is_none());
        assert_eq!(marker(&map.markers(), "A1").r, 11.0);
    }

    #[test]
    fn test_highlight_dims_others() {
        let mut map = ready_map();
        assert!(map.markers().iter().all(|m| !m.dimmed));
        map.highlight_rooms(vec!["A1".to_string()]);
        let markers = map.markers();
        assert!(!marker(&markers, "A1").dimmed);
        assert!(marker(&markers, "A2").dimmed);
        assert_eq!(marker(&markers, "A2").opacity, 0.25);
    }

    #[test]
    fn test_calibration_applied() {
        let mut map = ready_map();
        map.set_calibration(Calibration { x_offset: 5.0, y_offset: -10.0, x_scale: 2.0, y_scale: 0.5 });
        let markers = map.markers();
        let a1 = marker(&markers, "A1");
        assert_eq!((a1.cx, a1.cy), (205.0, 90.0));
        assert!(Calibration::default().is_identity());
    }

    #[test]
    fn test_geometry_and_view_box() {
        let mut map = FloorMap::default();
        assert_eq!(map.geometry().view_box(), "0 0 1545 763");
        map.set_plan_dimensions(800, 0);
        assert_eq!(map.geometry(), PlanGeometry { width: 800, height: 763 });
        assert_eq!(map.geometry().aspect_ratio(), "800 / 763");
    }

    #[test]
    fn test_debug_click_conversion() {
        let mut map = ready_map();
        assert!(map.resize(772.5));
        assert!(!map.resize(0.0));
        assert!((map.scale() - 0.5).abs() < 1e-12);

        let point = map.record_debug_click(100.0, 40.2, 772.5, 381.5).expect("画像内");
        assert_eq!(point, DebugPoint { x: 200, y: 80 });
        assert!(map.record_debug_click(-1.0, 10.0, 772.5, 381.5).is_none());
        assert!(map.record_debug_click(800.0, 10.0, 772.5, 381.5).is_none());
        assert_eq!(map.debug_points().len(), 1);
    }

    struct Recorder(Vec<String>);

    impl Surface for Recorder {
        fn begin(&mut self, geometry: &PlanGeometry) {
            self.0.push(format!("begin {}", geometry.view_box()));
        }
        fn marker(&mut self, marker: &MarkerSpec) {
            self.0.push(format!("marker {}", marker.code));
        }
        fn debug_point(&mut self, point: &DebugPoint, _style: &MapStyle) {
            self.0.push(format!("debug {} {}", point.x, point.y));
        }
        fn end(&mut self) {
            self.0.push("end".into());
        }
    }

    #[test]
    fn test_draw_order() {
        let mut map = ready_map();
        map.resize(1545.0);
        map.record_debug_click(10.0, 20.0, 1545.0, 763.0);
        let mut recorder = Recorder(Vec::new());
        map.draw(&mut recorder);
        assert_eq!(
            recorder.0,
            vec!["begin 0 0 1545 763", "marker A1", "marker A2", "debug 10 20", "end"]
        );
    }
}
