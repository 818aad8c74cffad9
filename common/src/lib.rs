//! Inventory Map Common Library
//!
//! CLIとWeb(WASM)で共有される型・ビューモデル・マップ描画ロジック

pub mod building;
pub mod category;
pub mod condition;
pub mod coords;
pub mod error;
pub mod filter;
pub mod fixture;
pub mod gateway;
pub mod map;
pub mod normalize;
pub mod photo;
pub mod session;
pub mod svg;
pub mod types;
pub mod view_model;

pub use building::{Building, BuildingRegistry};
pub use category::{Category, DominantCategory};
pub use condition::Condition;
pub use error::{Error, Result};
pub use filter::FilterState;
pub use gateway::{FallbackReason, Fetched, Gateway, HttpResponse, Transport};
pub use map::{Calibration, FloorMap, MapStyle, MarkerSpec, Surface};
pub use normalize::{normalize_item, normalize_items, NormalizedItem};
pub use session::{load_building, BuildingLoad, LoadTicket, RoomDetail, Session};
pub use svg::SvgSurface;
pub use types::{CoordinateMap, RawItem, Room, RoomCoord};
pub use view_model::{build_view_model, RoomViewModel, ViewContext, ViewModel};
