//! SVG文字列への描画
//!
//! CLIの `render` と、ブラウザ外での描画確認に使う。

use crate::map::{DebugPoint, MapStyle, MarkerSpec, PlanGeometry, Surface, PRESERVE_ASPECT_RATIO};
use std::fmt::Write;

/// SVG文書を組み立てる [`Surface`]
#[derive(Debug, Clone, Default)]
pub struct SvgSurface {
    /// 背景画像（パスまたはデータURI）
    background: Option<String>,
    /// 代表カテゴリ色のドットを重ねるか
    category_colors: bool,
    out: String,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_background(mut self, href: impl Into<String>) -> Self {
        self.background = Some(href.into());
        self
    }

    /// マーカー内側に代表カテゴリ色のドットを重ねる
    pub fn with_category_dots(mut self, enabled: bool) -> Self {
        self.category_colors = enabled;
        self
    }

    pub fn finish(self) -> String {
        self.out
    }
}

impl Surface for SvgSurface {
    fn begin(&mut self, geometry: &PlanGeometry) {
        self.out.clear();
        let _ = writeln!(
            self.out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{}" width="{}" height="{}" preserveAspectRatio="{}">"#,
            geometry.view_box(),
            geometry.width,
            geometry.height,
            PRESERVE_ASPECT_RATIO
        );
        if let Some(href) = &self.background {
            let _ = writeln!(
                self.out,
                r#"  <image href="{}" x="0" y="0" width="{}" height="{}"/>"#,
                escape(href),
                geometry.width,
                geometry.height
            );
        }
    }

    fn marker(&mut self, marker: &MarkerSpec) {
        let _ = writeln!(
            self.out,
            r#"  <circle class="{}" data-code="{}" cx="{}" cy="{}" r="{}" fill="{}" stroke="{}" stroke-width="{}" opacity="{}"><title>{} — {} ({})</title></circle>"#,
            marker.class_list(),
            escape(&marker.code),
            marker.cx,
            marker.cy,
            marker.r,
            escape(&marker.fill),
            escape(&marker.stroke),
            marker.stroke_width,
            marker.opacity,
            escape(&marker.code),
            escape(&marker.name),
            marker.item_count
        );
        if self.category_colors && !marker.empty {
            let _ = writeln!(
                self.out,
                r#"  <circle class="pin-dot" cx="{}" cy="{}" r="{}" fill="{}" opacity="{}"/>"#,
                marker.cx,
                marker.cy,
                marker.base_r / 2.5,
                marker.dominant.color(),
                marker.opacity
            );
        }
    }

    fn debug_point(&mut self, point: &DebugPoint, style: &MapStyle) {
        let _ = writeln!(
            self.out,
            r#"  <circle class="debug" cx="{}" cy="{}" r="{}" fill="{}"/>"#,
            point.x,
            point.y,
            style.debug_radius,
            escape(&style.debug_color)
        );
    }

    fn end(&mut self) {
        self.out.push_str("</svg>\n");
    }
}

/// XML属性・テキスト用のエスケープ
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
