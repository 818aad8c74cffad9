//! 建物（フロアタブ）レジストリ
//!
//! 同じ物理建物の複数フロアは `building_id` を共有する。
//! その場合、どのフロアの備品かは部屋コード（座標ファイルに存在するか）で判別する。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 既定のフロアプラン寸法
pub const DEFAULT_PLAN_WIDTH: u32 = 1545;
pub const DEFAULT_PLAN_HEIGHT: u32 = 763;

/// 建物（フロアタブ）の設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Building {
    /// タブのキー（例: "mc-1f"）。JSONではマップのキー側に置く
    #[serde(default, skip_serializing)]
    pub key: String,
    pub label: String,
    /// フロアプラン画像のパス
    pub floor_plan: String,
    /// 画像のネイティブ幅（px）
    pub width: u32,
    /// 画像のネイティブ高さ（px）
    pub height: u32,
    /// 座標ファイルのパス
    pub rooms_file: String,
    pub building_id: i64,
}

impl Building {
    pub fn new(key: &str, label: &str, building_id: i64) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            floor_plan: format!("assets/floor-plan-{}.png", key),
            width: DEFAULT_PLAN_WIDTH,
            height: DEFAULT_PLAN_HEIGHT,
            rooms_file: format!("data/rooms-{}.json", key),
            building_id,
        }
    }
}

/// 建物レジストリのJSON形式
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistryFile {
    default_building: String,
    buildings: BTreeMap<String, Building>,
}

/// 建物レジストリ
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingRegistry {
    /// 未登録キーの解決先
    default: Building,
    buildings: BTreeMap<String, Building>,
    /// タブの表示順
    order: Vec<String>,
}

impl Default for BuildingRegistry {
    fn default() -> Self {
        let buildings = vec![
            Building::new("mc-1f", "MC", 1),
            Building::new("mv-1f", "MV — Spa & Gym", 2),
            Building::new("mv-2f", "MV — Master Suite", 2),
            Building::new("sg-lower", "SG — Lower", 3),
            Building::new("sg-upper", "SG — Upper", 3),
            Building::new("ent", "Entertainment", 4),
        ];
        Self {
            default: buildings[0].clone(),
            order: buildings.iter().map(|b| b.key.clone()).collect(),
            buildings: buildings.into_iter().map(|b| (b.key.clone(), b)).collect(),
        }
    }
}

impl BuildingRegistry {
    /// 建物一覧から作成（既定キーが存在しなければエラー）
    pub fn from_buildings(default_key: &str, buildings: Vec<Building>) -> Result<Self> {
        let order: Vec<String> = buildings.iter().map(|b| b.key.clone()).collect();
        let buildings: BTreeMap<String, Building> =
            buildings.into_iter().map(|b| (b.key.clone(), b)).collect();
        Self::validated(default_key, buildings, order)
    }

    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let parsed: RegistryFile = serde_json::from_str(json)?;
        let buildings: BTreeMap<String, Building> = parsed
            .buildings
            .into_iter()
            .map(|(key, mut b)| {
                b.key = key.clone();
                (key, b)
            })
            .collect();
        let order = buildings.keys().cloned().collect();
        Self::validated(&parsed.default_building, buildings, order)
    }

    /// JSONファイルから読み込み（非WASM環境のみ）
    #[cfg(not(feature = "wasm"))]
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    fn validated(
        default_key: &str,
        buildings: BTreeMap<String, Building>,
        order: Vec<String>,
    ) -> Result<Self> {
        let default = buildings.get(default_key).cloned().ok_or_else(|| {
            Error::Config(format!("default building '{}' is not registered", default_key))
        })?;
        Ok(Self { default, buildings, order })
    }

    /// 既定の建物を差し替える（未登録キーはエラー）
    pub fn with_default(self, default_key: &str) -> Result<Self> {
        Self::validated(default_key, self.buildings, self.order)
    }

    pub fn default_key(&self) -> &str {
        &self.default.key
    }

    pub fn contains(&self, key: &str) -> bool {
        self.buildings.contains_key(key)
    }

    /// 建物を取得（未登録キーは既定の建物）
    pub fn get(&self, key: &str) -> &Building {
        self.buildings.get(key).unwrap_or(&self.default)
    }

    /// 表示順に列挙
    pub fn iter(&self) -> impl Iterator<Item = &Building> {
        self.order.iter().filter_map(|key| self.buildings.get(key))
    }

    /// 同じ建物IDを持つタブ数
    pub fn floors_sharing(&self, building_id: i64) -> usize {
        self.buildings
            .values()
            .filter(|b| b.building_id == building_id)
            .count()
    }

    /// 建物IDが複数タブで共有されているか
    pub fn is_shared(&self, building_id: i64) -> bool {
        self.floors_sharing(building_id) > 1
    }
}
