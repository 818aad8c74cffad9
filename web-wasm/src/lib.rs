//! Inventory Floor Map Dashboard (Leptos + WASM)

mod api;
mod app;
mod components;
mod logging;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    logging::init(api::page::PageParams::current().debug);
    leptos::mount::mount_to_body(app::App);
}
