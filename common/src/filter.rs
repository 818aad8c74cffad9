//! 地図のフィルタ状態
//!
//! セッション単位で保持し、変更のたびに全件へ適用し直す（差分適用はしない）。

use crate::category::Category;
use crate::condition::Condition;
use crate::normalize::NormalizedItem;
use serde::{Deserialize, Serialize};

/// フィルタ状態（`None` / 空文字はすべて一致）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub category: Option<Category>,
    pub condition: Option<Condition>,
    pub search: String,
}

impl FilterState {
    /// 画面入力の文字列から作る（空・不明な値は「すべて」）
    pub fn from_inputs(category: &str, condition: &str, search: &str) -> Self {
        Self {
            category: Category::from_key(category),
            condition: Condition::parse(condition),
            search: search.trim().to_string(),
        }
    }

    /// いずれかのフィルタが有効か
    pub fn is_active(&self) -> bool {
        self.category.is_some() || self.condition.is_some() || !self.search.is_empty()
    }

    /// 検索語（小文字化済み）。空なら `None`
    pub fn search_needle(&self) -> Option<String> {
        let needle = self.search.trim();
        (!needle.is_empty()).then(|| needle.to_lowercase())
    }

    /// 備品がフィルタに一致するか
    ///
    /// 判定順: カテゴリ → 状態 → 検索語（説明・部屋名・部屋コードの部分一致）
    pub fn matches(&self, item: &NormalizedItem, code: &str, room_name: &str) -> bool {
        self.matches_with(item, code, room_name, self.search_needle().as_deref())
    }

    pub(crate) fn matches_with(
        &self,
        item: &NormalizedItem,
        code: &str,
        room_name: &str,
        needle: Option<&str>,
    ) -> bool {
        if self.category.is_some_and(|c| c != item.category) {
            return false;
        }
        if self.condition.is_some() && self.condition != item.condition {
            return false;
        }
        match needle {
            None => true,
            Some(needle) => {
                item.description.to_lowercase().contains(needle)
                    || room_name.to_lowercase().contains(needle)
                    || code.to_lowercase().contains(needle)
            }
        }
    }
}
