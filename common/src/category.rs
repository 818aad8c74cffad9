//! 備品カテゴリ
//!
//! 固定の列挙。色・アイコン・ラベルは地図のマーカーと凡例、
//! 部屋詳細のバッジで共通に使う。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 備品カテゴリ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Light,
    Chandelier,
    Furniture,
    Art,
    Plumbing,
    Carpet,
    Curtain,
    Tech,
    Spa,
    Other,
    Unknown,
}

impl Category {
    /// 表示順（凡例・フィルタ選択肢）
    pub const ALL: [Category; 11] = [
        Category::Light,
        Category::Chandelier,
        Category::Furniture,
        Category::Art,
        Category::Plumbing,
        Category::Carpet,
        Category::Curtain,
        Category::Tech,
        Category::Spa,
        Category::Other,
        Category::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Light => "light",
            Category::Chandelier => "chandelier",
            Category::Furniture => "furniture",
            Category::Art => "art",
            Category::Plumbing => "plumbing",
            Category::Carpet => "carpet",
            Category::Curtain => "curtain",
            Category::Tech => "tech",
            Category::Spa => "spa",
            Category::Other => "other",
            Category::Unknown => "unknown",
        }
    }

    /// キー文字列から変換（大文字小文字・前後空白は無視）
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == key)
    }

    pub fn color(&self) -> &'static str {
        match self {
            Category::Light => "#FFD93D",
            Category::Chandelier => "#F6B93B",
            Category::Furniture => "#8B4513",
            Category::Art => "#9B59B6",
            Category::Plumbing => "#3498DB",
            Category::Carpet => "#922B21",
            Category::Curtain => "#E91E63",
            Category::Tech => "#607D8B",
            Category::Spa => "#1ABC9C",
            Category::Other => "#95A5A6",
            Category::Unknown => "#999999",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Category::Light => "💡",
            Category::Chandelier => "✨",
            Category::Furniture => "🪑",
            Category::Art => "🎨",
            Category::Plumbing => "🚿",
            Category::Carpet => "🧶",
            Category::Curtain => "🪟",
            Category::Tech => "📺",
            Category::Spa => "💆",
            Category::Other | Category::Unknown => "❓",
        }
    }

    /// 部屋詳細のバッジ表示
    pub fn badge_label(&self) -> &'static str {
        match self {
            Category::Light => "Light / Освещение",
            Category::Chandelier => "Chandelier / Люстра",
            Category::Furniture => "Furniture / Мебель",
            Category::Art => "Art / Искусство",
            Category::Plumbing => "Plumbing / Сантехника",
            Category::Carpet => "Carpet / Ковёр",
            Category::Curtain => "Curtain / Шторы",
            Category::Tech => "Tech / Техника",
            Category::Spa => "Spa / СПА",
            Category::Other => "Other / Другое",
            Category::Unknown => "❓ Unknown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| format!("Unknown category: {}", s))
    }
}

/// 部屋の支配的カテゴリ（備品なしは `empty`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DominantCategory {
    Empty,
    Category(Category),
}

impl DominantCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DominantCategory::Empty => "empty",
            DominantCategory::Category(c) => c.as_str(),
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            DominantCategory::Empty => "#FFFFFF",
            DominantCategory::Category(c) => c.color(),
        }
    }
}

impl fmt::Display for DominantCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for DominantCategory {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// 凡例の1項目
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub key: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
}

/// 凡例（`empty` 以外の全カテゴリ）
pub fn legend() -> Vec<LegendEntry> {
    Category::ALL
        .iter()
        .map(|c| LegendEntry {
            key: c.as_str(),
            color: c.color(),
            icon: c.icon(),
        })
        .collect()
}

/// フィルタの選択肢 (値, 表示)。先頭は「全カテゴリ」
pub fn filter_options() -> Vec<(String, String)> {
    let mut options = vec![(String::new(), "All categories".to_string())];
    options.extend(
        Category::ALL
            .iter()
            .map(|c| (c.as_str().to_string(), format!("{} {}", c.icon(), c.as_str()))),
    );
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_key() {
        assert_eq!(Category::from_key("furniture"), Some(Category::Furniture));
        assert_eq!(Category::from_key(" Furniture "), Some(Category::Furniture));
        assert_eq!(Category::from_key("sofa"), None);
        assert_eq!(Category::from_key(""), None);
    }

    #[test]
    fn test_serialize_lowercase() {
        let json = serde_json::to_string(&Category::Chandelier).expect("シリアライズ失敗");
        assert_eq!(json, "\"chandelier\"");
        let json = serde_json::to_string(&DominantCategory::Empty).expect("シリアライズ失敗");
        assert_eq!(json, "\"empty\"");
    }

    #[test]
    fn test_legend_excludes_empty() {
        let legend = legend();
        assert_eq!(legend.len(), 11);
        assert!(legend.iter().all(|e| e.key != "empty"));
        assert_eq!(legend[0].key, "light");
        assert_eq!(legend[0].color, "#FFD93D");
    }

    #[test]
    fn test_filter_options() {
        let options = filter_options();
        assert_eq!(options[0], (String::new(), "All categories".to_string()));
        assert!(options.contains(&("tech".to_string(), "📺 tech".to_string())));
    }

    #[test]
    fn test_dominant_color() {
        assert_eq!(DominantCategory::Empty.color(), "#FFFFFF");
        assert_eq!(DominantCategory::Category(Category::Art).color(), "#9B59B6");
    }
}
