//! 页面抓取：URL 规范化、带超时的 GET 请求、状态码校验、Header 转换
use std::collections::HashMap;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::config::GlobalConfig;
use crate::error::{RsfError, RsfResult};
use crate::utils::HeaderConverter;

/// 抓取结果
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// 跟随重定向后的最终 URL
    pub url: String,
    pub status: u16,
    pub html: String,
    /// 单值、小写键
    pub headers: HashMap<String, String>,
    /// 响应体超过上限，只读取了前 max_body_len 字节
    pub truncated: bool,
}

/// 开头的 scheme（RFC 3986：字母开头，后接字母/数字/`+`/`-`/`.`）
static SCHEME_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://")
        .unwrap_or_else(|e| panic!("scheme prefix regex is invalid: {e}"))
});

/// 规范化 URL：无 scheme 时补 `https://`，只接受 http/https
pub fn normalize_url(raw: &str) -> RsfResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(RsfError::InvalidUrl(raw.to_string()));
    }

    let candidate = if SCHEME_PREFIX.is_match(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let parsed = Url::parse(&candidate).map_err(|_| RsfError::InvalidUrl(raw.to_string()))?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(candidate),
        _ => Err(RsfError::InvalidUrl(raw.to_string())),
    }
}

/// 页面抓取器
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    default_timeout_ms: u64,
    max_body_len: usize,
}

impl PageFetcher {
    pub fn new(config: &GlobalConfig) -> RsfResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            client,
            default_timeout_ms: config.fetch_timeout_ms,
            max_body_len: config.max_html_len,
        })
    }

    pub fn default_timeout_ms(&self) -> u64 {
        self.default_timeout_ms
    }

    /// 抓取页面；timeout 覆盖整个请求（发送 + 读取响应体）
    pub async fn fetch(&self, raw_url: &str, timeout_ms: Option<u64>) -> RsfResult<FetchedPage> {
        let url = normalize_url(raw_url)?;
        let timeout_ms = timeout_ms.unwrap_or(self.default_timeout_ms);

        debug!("Fetching {} (timeout {}ms)", url, timeout_ms);

        let request = async {
            let mut response = self.client.get(&url).send().await?;
            let status = response.status();
            let final_url = response.url().to_string();

            if !status.is_success() {
                return Err(RsfError::HttpStatus {
                    url: final_url,
                    code: status.as_u16(),
                    reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                });
            }

            let header_map = HeaderConverter::to_hashmap(response.headers());
            let headers = HeaderConverter::to_single_value(&header_map);

            // 分块读取，超过上限即停止，内存占用不超过上限 + 一个块
            let mut body: Vec<u8> = Vec::new();
            let mut truncated = false;
            while let Some(chunk) = response.chunk().await? {
                body.extend_from_slice(&chunk);
                if body.len() > self.max_body_len {
                    body.truncate(self.max_body_len);
                    truncated = true;
                    break;
                }
            }
            let html = String::from_utf8_lossy(&body).into_owned();

            Ok(FetchedPage {
                url: final_url,
                status: status.as_u16(),
                html,
                headers,
                truncated,
            })
        };

        match tokio::time::timeout(Duration::from_millis(timeout_ms), request).await {
            Ok(Ok(page)) => {
                debug!("Fetched {} ({} bytes, HTTP {})", page.url, page.html.len(), page.status);
                Ok(page)
            }
            Ok(Err(e)) => {
                warn!("Fetch failed for {}: {}", url, e);
                Err(e)
            }
            Err(_) => {
                warn!("Fetch timed out for {} after {}ms", url, timeout_ms);
                Err(RsfError::FetchTimeout { url, timeout_ms })
            }
        }
    }
}
