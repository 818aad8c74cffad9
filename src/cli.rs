use clap::{Args, Parser, Subcommand};
use inventory_map_common::{Category, Condition, FilterState};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "inventory-map")]
#[command(about = "備品フロアマップ: 集計・部屋一覧・SVG描画ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 建物キー（未指定なら既定の建物）
    #[arg(short, long, global = true)]
    pub building: Option<String>,

    /// APIの代わりにエクスポートしたExcelを読む
    #[arg(long, global = true)]
    pub xlsx: Option<PathBuf>,

    /// 座標ファイル・フロアプランのルート（設定ファイルより優先）
    #[arg(long, global = true)]
    pub site_root: Option<PathBuf>,

    /// API URL（設定ファイル・環境変数より優先）
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 部屋ごとの集計を表示
    Summary {
        #[command(flatten)]
        filters: FilterArgs,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 部屋の全備品を表示（フィルタは適用しない）
    Room {
        /// 部屋コード（例: MC131）
        #[arg(required = true)]
        code: String,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// フロアマップをSVGで出力
    Render {
        #[command(flatten)]
        filters: FilterArgs,

        /// 出力ファイル（デフォルト: floor-<建物キー>.svg）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 選択状態にする部屋コード
        #[arg(long)]
        select: Option<String>,

        /// フロアプラン画像を埋め込まない
        #[arg(long)]
        no_embed: bool,

        /// マーカーに代表カテゴリ色のドットを重ねる
        #[arg(long)]
        category_dots: bool,
    },

    /// 建物一覧を表示
    Buildings,

    /// 設定の表示・変更
    Config {
        /// API URLを設定
        #[arg(long)]
        set_api_url: Option<String>,

        /// API URLを削除
        #[arg(long)]
        clear_api_url: bool,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// 地図のフィルタ
#[derive(Args, Clone, Debug, Default)]
pub struct FilterArgs {
    /// カテゴリ（light, furniture, art ...）
    #[arg(short, long)]
    pub category: Option<Category>,

    /// 状態（Отличное, Хорошее ...。絵文字付き・旧表記も可）
    #[arg(long)]
    pub condition: Option<Condition>,

    /// 説明・部屋名・部屋コードの部分一致
    #[arg(short, long, default_value = "")]
    pub search: String,
}

impl FilterArgs {
    pub fn to_filters(&self) -> FilterState {
        FilterState {
            category: self.category,
            condition: self.condition,
            search: self.search.trim().to_string(),
        }
    }
}
