//! fetch API による通信層

use inventory_map_common::{Error, HttpResponse, Result, Transport};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// ブラウザの `fetch` で GET する [`Transport`]
///
/// 相対パス（座標ファイル）はページのURLを基準に解決される。
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

fn js_error(context: &str, value: JsValue) -> Error {
    Error::Transport(format!("{}: {:?}", context, value))
}

impl Transport for FetchTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_mode(RequestMode::Cors);

        let request =
            Request::new_with_str_and_init(url, &opts).map_err(|e| js_error("invalid request", e))?;

        let window = web_sys::window().ok_or_else(|| Error::Transport("no window".to_string()))?;
        let value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| js_error("fetch failed", e))?;
        let response: Response = value.dyn_into().map_err(|e| js_error("not a response", e))?;

        let body = response.text().map_err(|e| js_error("unreadable body", e))?;
        let body = JsFuture::from(body)
            .await
            .map_err(|e| js_error("unreadable body", e))?;

        Ok(HttpResponse::new(response.status(), body.as_string().unwrap_or_default()))
    }

    fn cache_token(&self) -> String {
        format!("{}", js_sys::Date::now() as i64)
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_cache_token_is_millis() {
        let token = FetchTransport.cache_token();
        let millis: i64 = token.parse().expect("数値でない");
        assert!(millis > 1_600_000_000_000);
    }

    #[wasm_bindgen_test]
    async fn test_invalid_url_is_transport_error() {
        let result = FetchTransport.get("http://[invalid").await;
        assert!(matches!(result, Err(Error::Transport(_))));
    }
}
