//! エクスポートしたスプレッドシートの読み込み
//!
//! APIの代わりに、バックエンドと同じシート構成のExcelファイルから部屋と備品を作る。
//! 列の割り当てはバックエンドのスクリプトと同じ。
//!
//! - `Предметы`: A=ID, D=建物ID, E=ゾーンID, F=部屋ID, G=部屋コード, H=カテゴリ,
//!   K=説明, L=状態, M=数量, O〜S=写真
//! - `Комнаты`: A=ID, B=ゾーンID, C=名称, D=コード, G=有効フラグ

use crate::error::{InventoryError, Result};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use inventory_map_common::types::value_to_text;
use inventory_map_common::{RawItem, Room};
use serde_json::Value;
use std::path::Path;

pub const ITEMS_SHEET: &str = "Предметы";
pub const ROOMS_SHEET: &str = "Комнаты";

mod items_col {
    pub const ID: u32 = 0;
    pub const BUILDING_ID: u32 = 3;
    pub const ROOM_ID: u32 = 5;
    pub const ROOM_CODE: u32 = 6;
    pub const CATEGORY: u32 = 7;
    pub const DESCRIPTION: u32 = 10;
    pub const CONDITION: u32 = 11;
    pub const QUANTITY: u32 = 12;
    pub const PHOTOS: std::ops::RangeInclusive<u32> = 14..=18;
}

mod rooms_col {
    pub const ID: u32 = 0;
    pub const ZONE_ID: u32 = 1;
    pub const NAME: u32 = 2;
    pub const CODE: u32 = 3;
    pub const ACTIVE: u32 = 6;
}

/// ワークブックの内容
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetExport {
    pub rooms: Vec<Room>,
    pub items: Vec<RawItem>,
}

/// ワークブックを読み込む
pub fn read_workbook(path: &Path) -> Result<SheetExport> {
    if !path.exists() {
        return Err(InventoryError::FileNotFound(path.display().to_string()));
    }
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let items = read_sheet(&mut workbook, ITEMS_SHEET)?;
    let rooms = read_sheet(&mut workbook, ROOMS_SHEET)?;

    let export = SheetExport {
        rooms: rows(&rooms).filter_map(room_from_row).collect(),
        items: rows(&items).filter_map(item_from_row).collect(),
    };
    tracing::info!(
        path = %path.display(),
        rooms = export.rooms.len(),
        items = export.items.len(),
        "workbook loaded"
    );
    Ok(export)
}

fn read_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<Range<Data>> {
    if !workbook.sheet_names().iter().any(|s| s == name) {
        return Err(InventoryError::Spreadsheet(format!("シート「{}」がありません", name)));
    }
    Ok(workbook.worksheet_range(name)?)
}

/// ヘッダー行を除いたデータ行（列番号はシートの絶対位置で引く）
struct SheetRow<'a> {
    cells: &'a [Data],
    first_col: u32,
}

impl SheetRow<'_> {
    fn value(&self, col: u32) -> Value {
        let Some(index) = col.checked_sub(self.first_col) else {
            return Value::Null;
        };
        match self.cells.get(index as usize) {
            None | Some(Data::Empty) => Value::Null,
            Some(Data::String(s)) => Value::String(s.clone()),
            Some(Data::Int(i)) => Value::from(*i),
            Some(Data::Float(f)) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Some(Data::Bool(b)) => Value::Bool(*b),
            Some(other) => Value::String(other.to_string()),
        }
    }

    fn text(&self, col: u32) -> String {
        value_to_text(&self.value(col)).trim().to_string()
    }
}

fn rows(range: &Range<Data>) -> impl Iterator<Item = SheetRow<'_>> {
    let (first_row, first_col) = range.start().unwrap_or((0, 0));
    range
        .rows()
        .enumerate()
        .filter(move |(i, _)| first_row + *i as u32 > 0)
        .map(move |(_, cells)| SheetRow { cells, first_col })
}

/// 値が「空」か（空文字・0・false も空扱い）
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Bool(b) => !b,
        _ => false,
    }
}

fn item_from_row(row: SheetRow<'_>) -> Option<RawItem> {
    let id = row.value(items_col::ID);
    if is_blank(&id) {
        return None;
    }
    let quantity = row.value(items_col::QUANTITY);
    let photos = items_col::PHOTOS
        .map(|col| row.value(col))
        .filter(|v| !is_blank(v))
        .collect();

    Some(RawItem {
        id: value_to_text(&id),
        room_id: row.text(items_col::ROOM_ID),
        room_code: row.text(items_col::ROOM_CODE),
        building_id: row.value(items_col::BUILDING_ID),
        category: row.text(items_col::CATEGORY),
        description: value_to_text(&row.value(items_col::DESCRIPTION)),
        condition: row.value(items_col::CONDITION),
        quantity: if is_blank(&quantity) { Value::from(1) } else { quantity },
        photos,
    })
}

fn room_from_row(row: SheetRow<'_>) -> Option<Room> {
    if is_blank(&row.value(rooms_col::ID)) {
        return None;
    }
    let active = row.text(rooms_col::ACTIVE).to_uppercase();
    if active != "TRUE" && active != "1" {
        return None;
    }
    Some(Room {
        id: row.text(rooms_col::ID),
        zone_id: row.text(rooms_col::ZONE_ID),
        name: row.text(rooms_col::NAME),
        code: row.text(rooms_col::CODE),
    })
}
