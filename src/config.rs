use crate::error::{InventoryError, Result};
use inventory_map_common::map::Calibration;
use inventory_map_common::BuildingRegistry;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// API URLを上書きする環境変数
pub const API_URL_ENV: &str = "INVENTORY_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// データゲートウェイのURL（未設定ならフィクスチャ）
    pub api_url: Option<String>,
    /// 座標ファイル・フロアプラン画像の置き場所
    pub site_root: PathBuf,
    pub default_building: Option<String>,
    /// 建物レジストリJSON（未指定なら組み込み）
    pub buildings_file: Option<PathBuf>,
    pub calibration: Calibration,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            site_root: PathBuf::from("."),
            default_building: None,
            buildings_file: None,
            calibration: Calibration::default(),
            timeout_seconds: 30,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 指定パスから読み込む（なければ既定値）
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| InventoryError::Config(format!("{}: {}", path.display(), e)))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| InventoryError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("inventory-map").join("config.json"))
    }

    /// 有効なAPI URL（環境変数を優先、空文字は未設定）
    pub fn api_url(&self) -> Option<String> {
        let from_env = std::env::var(API_URL_ENV).ok();
        Self::pick_api_url(from_env, self.api_url.clone())
    }

    fn pick_api_url(from_env: Option<String>, from_file: Option<String>) -> Option<String> {
        from_env
            .filter(|u| !u.trim().is_empty())
            .or_else(|| from_file.filter(|u| !u.trim().is_empty()))
    }

    pub fn set_api_url(&mut self, url: String) {
        self.api_url = Some(url.trim().to_string());
    }

    pub fn clear_api_url(&mut self) {
        self.api_url = None;
    }

    /// 建物レジストリを組み立てる
    pub fn registry(&self) -> Result<BuildingRegistry> {
        let registry = match &self.buildings_file {
            Some(path) => {
                if !path.exists() {
                    return Err(InventoryError::FileNotFound(path.display().to_string()));
                }
                BuildingRegistry::from_file(path)?
            }
            None => BuildingRegistry::default(),
        };
        match &self.default_building {
            Some(key) => Ok(registry.with_default(key)?),
            None => Ok(registry),
        }
    }

    /// サイトルートからの相対パスを解決する
    pub fn site_path(&self, relative: &str) -> PathBuf {
        let relative = relative.trim_start_matches('/');
        self.site_root.join(relative)
    }
}
