//! 建物データの読み込み
//!
//! API（またはエクスポートしたExcel）と座標ファイルからセッションを組み立てる。

use crate::config::Config;
use crate::error::Result;
use crate::http::SiteTransport;
use crate::spreadsheet::{read_workbook, SheetExport};
use indicatif::{ProgressBar, ProgressStyle};
use inventory_map_common::coords::load_building_coordinates;
use inventory_map_common::{load_building, Building, BuildingLoad, BuildingRegistry, Fetched, Gateway, Session};
use std::path::Path;
use std::time::Duration;

pub struct Loader {
    gateway: Gateway<SiteTransport>,
    workbook: Option<SheetExport>,
    progress: bool,
}

impl Loader {
    /// `workbook` があればAPIの代わりに使う（読めなければエラー）
    pub fn new(config: &Config, workbook: Option<&Path>) -> Result<Self> {
        let transport = SiteTransport::new(
            config.site_root.clone(),
            Duration::from_secs(config.timeout_seconds.max(1)),
        )?;
        let workbook = workbook.map(read_workbook).transpose()?;
        Ok(Self {
            gateway: Gateway::new(config.api_url(), transport),
            workbook,
            progress: false,
        })
    }

    /// 取得中にスピナーを表示する
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn transport(&self) -> &SiteTransport {
        self.gateway.transport()
    }

    fn spinner(&self, building: &Building) -> Option<ProgressBar> {
        if !self.progress {
            return None;
        }
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(format!("{} のデータを取得中...", building.label));
        spinner.enable_steady_tick(Duration::from_millis(100));
        Some(spinner)
    }

    /// 1建物分のデータを取得する
    pub async fn fetch(&self, building: &Building) -> BuildingLoad {
        let spinner = self.spinner(building);
        let load = match &self.workbook {
            Some(export) => BuildingLoad {
                coordinates: load_building_coordinates(self.gateway.transport(), building).await,
                rooms: Fetched::Live(export.rooms.clone()),
                items: Fetched::Live(export.items.clone()),
            },
            None => load_building(&self.gateway, building).await,
        };
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        load
    }

    /// 建物を読み込んだセッションを作る
    pub async fn open_session(&self, registry: BuildingRegistry, building_key: Option<&str>) -> Session {
        let mut session = Session::new(registry);
        let key = building_key
            .map(str::to_string)
            .unwrap_or_else(|| session.registry().default_key().to_string());
        let ticket = session.begin_load(&key);
        let load = self.fetch(session.active_building()).await;
        session.complete_load(&ticket, load);
        session
    }
}
