//! 全局配置管理,存储所有可配置项

use std::net::SocketAddr;
use std::path::PathBuf;

/// 默认抓取超时（毫秒）
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;
/// 默认 HTML 长度上限（2MB）
pub const DEFAULT_MAX_HTML_LEN: usize = 2 * 1024 * 1024;

/// 签名库来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOrigin {
    Embedded,           // 内置签名库（编译期固化）
    LocalFile(PathBuf), // 本地 JSON 签名库（运行时加载）
}

/// 全局配置
#[derive(Debug, Clone)]
pub struct GlobalConfig {
    // 签名库来源
    pub rule_origin: RuleOrigin,
    // 抓取超时（单位：毫秒）
    pub fetch_timeout_ms: u64,
    // 抓取时使用的 User-Agent
    pub user_agent: String,
    // HTML 长度上限（单位：字节），超出部分截断后再匹配
    pub max_html_len: usize,
    // HTTP 传输监听地址
    pub bind_addr: SocketAddr,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            rule_origin: RuleOrigin::Embedded,
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            user_agent: default_user_agent(),
            max_html_len: DEFAULT_MAX_HTML_LEN,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8787)),
        }
    }
}

/// 默认 User-Agent，带上版本号便于对端识别
pub fn default_user_agent() -> String {
    format!(
        "{}/{} (+web technology fingerprinting)",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    )
}

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 获取默认配置
    pub fn get_default() -> GlobalConfig {
        GlobalConfig::default()
    }

    /// 自定义配置
    pub fn custom() -> CustomConfigBuilder {
        CustomConfigBuilder::new()
    }
}

/// 配置构建器（便于自定义配置）
#[derive(Debug, Clone, Default)]
pub struct CustomConfigBuilder {
    config: GlobalConfig,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule_origin(mut self, origin: RuleOrigin) -> Self {
        self.config.rule_origin = origin;
        self
    }

    pub fn fetch_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.fetch_timeout_ms = timeout_ms;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn max_html_len(mut self, max_html_len: usize) -> Self {
        self.config.max_html_len = max_html_len;
        self
    }

    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.config.bind_addr = addr;
        self
    }

    pub fn build(self) -> GlobalConfig {
        self.config
    }
}
