//! UIコンポーネント

pub mod building_tabs;
pub mod filter_bar;
pub mod floor_map;
pub mod header;
pub mod legend;
pub mod photo_modal;
pub mod room_panel;
pub mod stats_bar;
