//! 全局错误类型定义

use thiserror::Error;
use regex::Error as RegexError;
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;

#[derive(Error, Debug)]
pub enum RsfError {
    // 规则相关错误
    #[error("rule load failed: {0}")]
    RuleLoadError(String),
    #[error("rule parse failed: {0}")]
    RuleParseError(String),
    #[error("invalid signature `{name}`: {reason}")]
    InvalidSignature { name: String, reason: String },

    // 编译相关错误
    #[error("regex compile failed: {0}")]
    RegexCompileError(#[from] RegexError),

    // 抓取相关错误
    #[error("invalid URL `{0}`")]
    InvalidUrl(String),
    #[error("request timeout after {timeout_ms}ms while fetching {url}")]
    FetchTimeout { url: String, timeout_ms: u64 },
    #[error("HTTP {code} {reason} while fetching {url}")]
    HttpStatus { url: String, code: u16, reason: String },
    #[error("network request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    // 序列化/反序列化错误
    #[error("JSON parse failed: {0}")]
    JsonError(#[from] SerdeJsonError),

    // 基础错误
    #[error("IO failed: {0}")]
    IoError(#[from] IoError),
    #[error("detector not initialized")]
    DetectorNotInitialized,
}

// 全局Result类型
pub type RsfResult<T> = Result<T, RsfError>;
