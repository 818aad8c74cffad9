//! データゲートウェイ
//!
//! スプレッドシート連携のAPIから部屋・備品を取得する。
//! 未設定・通信失敗・非2xx・`error` 付きレスポンスのときは組み込みフィクスチャを返し、
//! 呼び出し側へエラーは伝えない。代わりに `Fetched::Fallback` で理由を添える。
//!
//! 通信そのものは `Transport` に任せる（CLIは reqwest、ブラウザは fetch）。

use crate::error::Result;
use crate::fixture;
use crate::types::{value_to_text, RawItem, Room};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

/// HTTPレスポンス（本文はテキストのまま）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// GETだけを行う通信層
///
/// ブラウザ側の実装は `Send` にならないため、`Send` 制約は付けない。
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// URL（またはサイトルートからの相対パス）を取得する
    async fn get(&self, url: &str) -> Result<HttpResponse>;

    /// キャッシュ回避用のトークン（通常は現在時刻のミリ秒）
    fn cache_token(&self) -> String;
}

/// APIのアクション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    GetRooms,
    GetItems,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::GetRooms => "getRooms",
            Action::GetItems => "getItems",
        }
    }
}

/// フィクスチャに切り替えた理由
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// APIのURLが設定されていない
    NotConfigured,
    /// 通信エラー
    Transport(String),
    /// 非2xxステータス
    HttpStatus(u16),
    /// JSONとして読めない
    Malformed(String),
    /// レスポンスに `error` フィールドがある
    Api(String),
}

impl FallbackReason {
    /// 実際の障害か（未設定は意図的な構成なので除く）
    pub fn is_failure(&self) -> bool {
        !matches!(self, FallbackReason::NotConfigured)
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::NotConfigured => write!(f, "API URL not set"),
            FallbackReason::Transport(e) => write!(f, "request failed: {}", e),
            FallbackReason::HttpStatus(s) => write!(f, "HTTP {}", s),
            FallbackReason::Malformed(e) => write!(f, "malformed response: {}", e),
            FallbackReason::Api(e) => write!(f, "API returned error: {}", e),
        }
    }
}

/// 取得結果（ライブデータかフィクスチャか）
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Live(T),
    Fallback(T, FallbackReason),
}

impl<T> Fetched<T> {
    pub fn data(&self) -> &T {
        match self {
            Fetched::Live(data) | Fetched::Fallback(data, _) => data,
        }
    }

    pub fn into_data(self) -> T {
        match self {
            Fetched::Live(data) | Fetched::Fallback(data, _) => data,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Fetched::Live(_))
    }

    pub fn fallback_reason(&self) -> Option<&FallbackReason> {
        match self {
            Fetched::Live(_) => None,
            Fetched::Fallback(_, reason) => Some(reason),
        }
    }

    /// 障害によるフォールバックか
    pub fn is_failure(&self) -> bool {
        self.fallback_reason().is_some_and(FallbackReason::is_failure)
    }
}

/// キャッシュ回避パラメータ付きのURL
pub fn request_url(base: &str, action: Action, cache_token: &str) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!(
        "{}{}action={}&nocache={}",
        base,
        separator,
        action.as_str(),
        cache_token
    )
}

/// レスポンスの配列を1件ずつ読む（読めない要素は捨てる）
fn decode_list<T: DeserializeOwned>(body: &Value, field: &str) -> Vec<T> {
    let Some(entries) = body.get(field).and_then(Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry.clone()) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!(field, index, error = %e, "skipping undecodable entry");
                None
            }
        })
        .collect()
}

/// データゲートウェイ
#[derive(Debug, Clone)]
pub struct Gateway<T> {
    base_url: Option<String>,
    transport: T,
}

impl<T: Transport> Gateway<T> {
    /// 空文字のURLは未設定として扱う
    pub fn new(base_url: Option<String>, transport: T) -> Self {
        let base_url = base_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        Self { base_url, transport }
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn request(&self, action: Action) -> std::result::Result<Value, FallbackReason> {
        let base = self.base_url.as_deref().ok_or(FallbackReason::NotConfigured)?;
        let url = request_url(base, action, &self.transport.cache_token());

        let response = self
            .transport
            .get(&url)
            .await
            .map_err(|e| FallbackReason::Transport(e.to_string()))?;
        if !response.is_success() {
            return Err(FallbackReason::HttpStatus(response.status));
        }

        let body: Value = serde_json::from_str(&response.body)
            .map_err(|e| FallbackReason::Malformed(e.to_string()))?;
        match body.get("error") {
            Some(error) if !error.is_null() => Err(FallbackReason::Api(value_to_text(error))),
            _ => Ok(body),
        }
    }

    async fn fetch<D: DeserializeOwned>(
        &self,
        action: Action,
        field: &str,
        fixture: fn() -> Vec<D>,
    ) -> Fetched<Vec<D>> {
        match self.request(action).await {
            Ok(body) => Fetched::Live(decode_list(&body, field)),
            Err(reason) => {
                tracing::warn!(action = action.as_str(), %reason, "falling back to fixture data");
                Fetched::Fallback(fixture(), reason)
            }
        }
    }

    /// 部屋一覧を取得する
    pub async fn fetch_rooms(&self) -> Fetched<Vec<Room>> {
        self.fetch(Action::GetRooms, "rooms", fixture::rooms).await
    }

    /// 備品一覧を取得する
    pub async fn fetch_items(&self) -> Fetched<Vec<RawItem>> {
        self.fetch(Action::GetItems, "items", fixture::items).await
    }
}
