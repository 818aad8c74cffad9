//! 状態（コンディション）ラベル
//!
//! 正規ラベルは5種類のロシア語。ボットの現行表記は絵文字付きで、
//! 古いシートには別表記も残っているため、すべて正規値に寄せて扱う。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 認識できない状態の表示色
pub const UNKNOWN_CONDITION_COLOR: &str = "#888";

/// 備品の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    #[serde(rename = "Отличное")]
    Excellent,
    #[serde(rename = "Хорошее")]
    Good,
    #[serde(rename = "Удовлетворительное")]
    Satisfactory,
    #[serde(rename = "Требует ремонта")]
    NeedsRepair,
    #[serde(rename = "Неисправно")]
    Broken,
}

/// 旧表記 → 正規値
const LEGACY_LABELS: &[(&str, Condition)] = &[
    ("Новое", Condition::Excellent),
    ("Б/У", Condition::Satisfactory),
    ("Повреждено", Condition::NeedsRepair),
];

impl Condition {
    pub const ALL: [Condition; 5] = [
        Condition::Excellent,
        Condition::Good,
        Condition::Satisfactory,
        Condition::NeedsRepair,
        Condition::Broken,
    ];

    /// 正規ラベル（絵文字なし）
    pub fn label(&self) -> &'static str {
        match self {
            Condition::Excellent => "Отличное",
            Condition::Good => "Хорошее",
            Condition::Satisfactory => "Удовлетворительное",
            Condition::NeedsRepair => "Требует ремонта",
            Condition::Broken => "Неисправно",
        }
    }

    /// ボットが書き込む絵文字付きラベル
    pub fn emoji_label(&self) -> &'static str {
        match self {
            Condition::Excellent => "✅ Отличное",
            Condition::Good => "👍 Хорошее",
            Condition::Satisfactory => "⚠️ Удовлетворительное",
            Condition::NeedsRepair => "🔧 Требует ремонта",
            Condition::Broken => "❌ Неисправно",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Condition::Excellent => "#27AE60",
            Condition::Good => "#2ECC71",
            Condition::Satisfactory => "#F39C12",
            Condition::NeedsRepair => "#E74C3C",
            Condition::Broken => "#95A5A6",
        }
    }

    /// 正規ラベルと完全一致する場合のみ
    pub fn from_canonical(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == text)
    }

    /// 表記ゆれを含めて解釈する
    ///
    /// 正規ラベル・絵文字付き・旧表記を受け付ける。先頭の絵文字や記号は
    /// 異体字セレクタの有無に関係なく読み飛ばす。
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if let Some(c) = Self::ALL.into_iter().find(|c| c.emoji_label() == text) {
            return Some(c);
        }
        let stripped = text.trim_start_matches(|c: char| !c.is_alphabetic()).trim();
        Self::from_canonical(stripped).or_else(|| {
            LEGACY_LABELS
                .iter()
                .find(|(label, _)| *label == stripped || *label == text)
                .map(|(_, c)| *c)
        })
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown condition: {}", s))
    }
}

/// 状態ラベルの表示色（認識できなければ `#888`）
pub fn label_color(label: &str) -> &'static str {
    Condition::parse(label)
        .map(|c| c.color())
        .unwrap_or(UNKNOWN_CONDITION_COLOR)
}

/// フィルタの選択肢 (値, 表示)。先頭は「すべて」
pub fn filter_options() -> Vec<(String, String)> {
    let mut options = vec![(String::new(), "Все".to_string())];
    options.extend(
        Condition::ALL
            .iter()
            .map(|c| (c.label().to_string(), c.emoji_label().to_string())),
    );
    options
}
