//! CLI用の通信層
//!
//! `http(s)://` はreqwestで取得し、それ以外はサイトルート配下のファイルとして読む。
//! ファイルが存在しなければ 404 として返す。

use crate::error::Result;
use inventory_map_common::error::Error as CommonError;
use inventory_map_common::{HttpResponse, Transport};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SiteTransport {
    client: reqwest::Client,
    site_root: PathBuf,
}

impl SiteTransport {
    pub fn new(site_root: impl Into<PathBuf>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, site_root: site_root.into() })
    }

    pub fn site_root(&self) -> &std::path::Path {
        &self.site_root
    }

    fn is_remote(url: &str) -> bool {
        url.starts_with("http://") || url.starts_with("https://")
    }

    async fn get_remote(&self, url: &str) -> inventory_map_common::Result<HttpResponse> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CommonError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| CommonError::Transport(e.to_string()))?;
        Ok(HttpResponse::new(status, body))
    }

    async fn get_local(&self, path: &str) -> inventory_map_common::Result<HttpResponse> {
        let path = path.split('?').next().unwrap_or(path);
        let full = self.site_root.join(path.trim_start_matches('/'));
        match tokio::fs::read_to_string(&full).await {
            Ok(body) => Ok(HttpResponse::new(200, body)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HttpResponse::new(404, "")),
            Err(e) => Err(e.into()),
        }
    }
}

impl Transport for SiteTransport {
    async fn get(&self, url: &str) -> inventory_map_common::Result<HttpResponse> {
        if Self::is_remote(url) {
            self.get_remote(url).await
        } else {
            self.get_local(url).await
        }
    }

    fn cache_token(&self) -> String {
        chrono::Utc::now().timestamp_millis().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_remote() {
        assert!(SiteTransport::is_remote("https://script.example/exec"));
        assert!(SiteTransport::is_remote("http://localhost:8080/x"));
        assert!(!SiteTransport::is_remote("data/rooms-mc-1f.json"));
    }

    #[tokio::test]
    async fn test_local_file_and_missing_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        std::fs::create_dir_all(dir.path().join("data")).expect("ディレクトリ作成失敗");
        std::fs::write(dir.path().join("data/rooms-ent.json"), "{}").expect("書き込み失敗");

        let transport = SiteTransport::new(dir.path(), Duration::from_secs(5)).expect("初期化失敗");
        let found = transport.get("data/rooms-ent.json").await.expect("読み込み失敗");
        assert_eq!(found, HttpResponse::new(200, "{}"));

        let missing = transport.get("/data/rooms-mc-1f.json").await.expect("読み込み失敗");
        assert_eq!(missing.status, 404);
    }
}
