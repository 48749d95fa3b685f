use anyhow::Result;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use std::time::Duration;

/// 诊断后端专用 HTTP client。
/// LLM 分析可能较慢，超时放宽到 120 秒。
pub fn build_api_client() -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let client = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(120))
        .gzip(true)
        .build()?;
    Ok(client)
}
