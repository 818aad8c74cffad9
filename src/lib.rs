//! Inventory Map
//!
//! 備品フロアマップのCLI側ライブラリ。共通ロジックは `inventory_map_common` にある。

pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod loader;
pub mod logging;
pub mod render;
pub mod report;
pub mod spreadsheet;
