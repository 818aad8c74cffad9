use thiserror::Error;

#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("スプレッドシート読み込みエラー: {0}")]
    Spreadsheet(String),

    #[error("HTTP通信エラー: {0}")]
    Http(String),

    #[error("描画エラー: {0}")]
    Render(String),

    #[error("部屋が見つかりません: {0}")]
    RoomNotFound(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] inventory_map_common::Error),
}

impl From<calamine::Error> for InventoryError {
    fn from(e: calamine::Error) -> Self {
        InventoryError::Spreadsheet(e.to_string())
    }
}

impl From<calamine::XlsxError> for InventoryError {
    fn from(e: calamine::XlsxError) -> Self {
        InventoryError::Spreadsheet(e.to_string())
    }
}

impl From<reqwest::Error> for InventoryError {
    fn from(e: reqwest::Error) -> Self {
        InventoryError::Http(e.to_string())
    }
}

impl From<image::ImageError> for InventoryError {
    fn from(e: image::ImageError) -> Self {
        InventoryError::Render(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, InventoryError>;
