//! 写真URLの変換
//!
//! クラウドストレージの共有リンク（`/d/<id>` または `?id=<id>`）だけを
//! 埋め込み可能なサムネイルURLに変換する。それ以外は画像として扱わない。

use regex::Regex;
use serde::Serialize;

/// 一覧のサムネイル幅
pub const THUMBNAIL_WIDTH: u32 = 400;
/// モーダル表示の幅
pub const FULL_WIDTH: u32 = 1200;

const THUMBNAIL_BASE: &str = "https://drive.google.com/thumbnail";

/// 表示できる写真
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoLink {
    /// 元の共有リンク
    pub source: String,
    pub file_id: String,
    pub thumbnail_url: String,
}

/// 共有リンクからファイルIDを取り出す
pub fn drive_file_id(url: &str) -> Option<String> {
    lazy_static::lazy_static! {
        static ref PATH_ID: Regex = Regex::new(r"/d/([a-zA-Z0-9_-]+)").unwrap();
        static ref QUERY_ID: Regex = Regex::new(r"[?&]id=([a-zA-Z0-9_-]+)").unwrap();
    }

    if !url.starts_with("http") {
        return None;
    }
    QUERY_ID
        .captures(url)
        .or_else(|| PATH_ID.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// 指定幅のサムネイルURL
pub fn thumbnail_url(file_id: &str, width: u32) -> String {
    format!("{}?id={}&sz=w{}", THUMBNAIL_BASE, file_id, width)
}

/// 写真リンクを解釈する（認識できなければ `None`）
pub fn photo_link(url: &str) -> Option<PhotoLink> {
    let file_id = drive_file_id(url.trim())?;
    Some(PhotoLink {
        source: url.trim().to_string(),
        thumbnail_url: thumbnail_url(&file_id, THUMBNAIL_WIDTH),
        file_id,
    })
}

/// モーダル用の大きい画像URL
pub fn full_size_url(url: &str) -> Option<String> {
    drive_file_id(url.trim()).map(|id| thumbnail_url(&id, FULL_WIDTH))
}

/// 表示できる写真だけを残す（認識できないものは個別にスキップ）
pub fn photo_links(sources: &[String]) -> Vec<PhotoLink> {
    sources
        .iter()
        .filter_map(|source| {
            let link = photo_link(source);
            if link.is_none() {
                tracing::debug!(photo = %source, "photo link not recognized, skipped");
            }
            link
        })
        .collect()
}
