//! ページ設定
//!
//! `window` のグローバル変数とURLパラメータから読む。
//!
//! - `window.INVENTORY_API_URL` : APIのベースURL（未設定ならフィクスチャ）
//! - `window.INVENTORY_CALIBRATION` : `{x_offset, y_offset, x_scale, y_scale}`
//! - `window.INVENTORY_BUILDINGS` : 建物レジストリ（JSONと同じ形のオブジェクト）
//! - `?debug=1` : 座標確認モード

use inventory_map_common::{BuildingRegistry, Calibration};
use wasm_bindgen::JsValue;

pub const API_URL_KEY: &str = "INVENTORY_API_URL";
pub const CALIBRATION_KEY: &str = "INVENTORY_CALIBRATION";
pub const BUILDINGS_KEY: &str = "INVENTORY_BUILDINGS";

fn global(key: &str) -> Option<JsValue> {
    let window = web_sys::window()?;
    let value = js_sys::Reflect::get(&window, &JsValue::from_str(key)).ok()?;
    if value.is_undefined() || value.is_null() {
        None
    } else {
        Some(value)
    }
}

/// APIのベースURL（空文字は未設定扱い）
pub fn api_url() -> Option<String> {
    let url = global(API_URL_KEY)?.as_string()?;
    let url = url.trim();
    if url.is_empty() {
        tracing::warn!("{} is empty, using fixture data", API_URL_KEY);
        return None;
    }
    Some(url.to_string())
}

/// 座標補正（不正な値は無視して恒等変換）
pub fn calibration() -> Calibration {
    let Some(value) = global(CALIBRATION_KEY) else {
        return Calibration::default();
    };
    serde_wasm_bindgen::from_value(value).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring malformed {}", CALIBRATION_KEY);
        Calibration::default()
    })
}

/// 建物レジストリ（未設定・不正なら組み込みの既定値）
pub fn registry() -> BuildingRegistry {
    let Some(value) = global(BUILDINGS_KEY) else {
        return BuildingRegistry::default();
    };
    let parsed = serde_wasm_bindgen::from_value::<serde_json::Value>(value)
        .map_err(|e| e.to_string())
        .and_then(|json| BuildingRegistry::from_json(&json.to_string()).map_err(|e| e.to_string()));
    match parsed {
        Ok(registry) => registry,
        Err(error) => {
            tracing::warn!(%error, "ignoring malformed {}", BUILDINGS_KEY);
            BuildingRegistry::default()
        }
    }
}

/// URLパラメータ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageParams {
    pub debug: bool,
}

impl PageParams {
    pub fn from_search(search: &str) -> Self {
        let debug = web_sys::UrlSearchParams::new_with_str(search)
            .ok()
            .and_then(|params| params.get("debug"))
            .is_some_and(|value| value == "1");
        Self { debug }
    }

    pub fn current() -> Self {
        web_sys::window()
            .and_then(|window| window.location().search().ok())
            .map(|search| Self::from_search(&search))
            .unwrap_or_default()
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    fn set_global(key: &str, value: &JsValue) {
        let window = web_sys::window().expect("windowがない");
        js_sys::Reflect::set(&window, &JsValue::from_str(key), value).expect("設定失敗");
    }

    #[wasm_bindgen_test]
    fn test_debug_param() {
        assert!(PageParams::from_search("?debug=1").debug);
        assert!(PageParams::from_search("?x=2&debug=1").debug);
        assert!(!PageParams::from_search("?debug=0").debug);
        assert!(!PageParams::from_search("").debug);
    }

    #[wasm_bindgen_test]
    fn test_api_url_blank_is_unset() {
        set_global(API_URL_KEY, &JsValue::from_str("  "));
        assert_eq!(api_url(), None);
        set_global(API_URL_KEY, &JsValue::from_str("https://api.example/exec"));
        assert_eq!(api_url().as_deref(), Some("https://api.example/exec"));
        set_global(API_URL_KEY, &JsValue::UNDEFINED);
        assert_eq!(api_url(), None);
    }

    #[wasm_bindgen_test]
    fn test_malformed_calibration_is_identity() {
        set_global(CALIBRATION_KEY, &JsValue::from_str("nope"));
        assert!(calibration().is_identity());
        set_global(CALIBRATION_KEY, &JsValue::UNDEFINED);
    }

    #[wasm_bindgen_test]
    fn test_default_registry_without_global() {
        set_global(BUILDINGS_KEY, &JsValue::UNDEFINED);
        assert_eq!(registry().default_key(), "mc-1f");
    }
}
