//! 工具定义：名称、描述、入参 JSON Schema，以及调用与结果包装
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::protocol::RpcError;
use crate::envelope::Envelope;
use crate::service::FingerprintService;

pub const FINGERPRINT_URL: &str = "fingerprint_url";
pub const DETECT_FRAMEWORKS: &str = "detect_frameworks";
pub const DETECT_ANALYTICS: &str = "detect_analytics";

/// 工具描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintUrlArgs {
    pub url: String,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectFrameworksArgs {
    pub html: String,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectAnalyticsArgs {
    pub html: String,
}

/// 文本内容块
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

/// tools/call 结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallResult {
    pub content: Vec<TextContent>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl ToolCallResult {
    /// 将信封序列化为单个文本块
    pub fn from_envelope<T: Serialize>(envelope: &Envelope<T>) -> Result<Self, RpcError> {
        let text = serde_json::to_string(envelope).map_err(RpcError::internal)?;
        Ok(Self {
            content: vec![TextContent {
                kind: "text".to_string(),
                text,
            }],
            is_error: !envelope.ok,
        })
    }
}

/// 三个工具的描述
pub fn tool_descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor {
            name: FINGERPRINT_URL.to_string(),
            description: "Fetch a URL and report its frameworks, CMS, servers and analytics scripts".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "url": {"type": "string", "description": "Page URL; https:// is assumed when no scheme is given"},
                    "timeout_ms": {"type": "integer", "minimum": 1, "description": "Fetch timeout in milliseconds"}
                },
                "required": ["url"]
            }),
        },
        ToolDescriptor {
            name: DETECT_FRAMEWORKS.to_string(),
            description: "Detect frameworks, CMS and servers from supplied HTML and optional response headers".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "html": {"type": "string"},
                    "headers": {"type": "object", "additionalProperties": {"type": "string"}}
                },
                "required": ["html"]
            }),
        },
        ToolDescriptor {
            name: DETECT_ANALYTICS.to_string(),
            description: "Detect analytics, tracking and marketing scripts from supplied HTML".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "html": {"type": "string"}
                },
                "required": ["html"]
            }),
        },
    ]
}

fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T, RpcError> {
    serde_json::from_value(arguments).map_err(RpcError::invalid_params)
}

/// 按名称调用工具；未知工具与参数错误均为 invalid params
pub async fn call_tool(
    service: &FingerprintService,
    name: &str,
    arguments: Value,
) -> Result<ToolCallResult, RpcError> {
    match name {
        FINGERPRINT_URL => {
            let args: FingerprintUrlArgs = parse_args(arguments)?;
            let envelope = service.fingerprint_url(&args.url, args.timeout_ms).await;
            ToolCallResult::from_envelope(&envelope)
        }
        DETECT_FRAMEWORKS => {
            let args: DetectFrameworksArgs = parse_args(arguments)?;
            let envelope = service.detect_frameworks(&args.html, args.headers.as_ref());
            ToolCallResult::from_envelope(&envelope)
        }
        DETECT_ANALYTICS => {
            let args: DetectAnalyticsArgs = parse_args(arguments)?;
            let envelope = service.detect_analytics(&args.html);
            ToolCallResult::from_envelope(&envelope)
        }
        other => Err(RpcError::invalid_params(format!("unknown tool `{}`", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigManager;

    #[test]
    fn test_descriptors_require_arguments() {
        let descriptors = tool_descriptors();
        assert_eq!(descriptors.len(), 3);
        assert_eq!(descriptors[0].input_schema["required"], json!(["url"]));
        assert_eq!(descriptors[1].input_schema["required"], json!(["html"]));
    }

    #[tokio::test]
    async fn test_invalid_url_sets_is_error() {
        let service = FingerprintService::from_config(&ConfigManager::get_default()).await.unwrap();
        let result = call_tool(&service, FINGERPRINT_URL, json!({"url": "ftp://example.com/file"}))
            .await
            .unwrap();
        assert!(result.is_error);

        let envelope: Value = serde_json::from_str(&result.content[0].text).unwrap();
        assert_eq!(envelope["ok"], false);
        assert_eq!(envelope["meta"]["warnings"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_wrong_argument_type() {
        let service = FingerprintService::from_config(&ConfigManager::get_default()).await.unwrap();
        let err = call_tool(&service, DETECT_ANALYTICS, json!({"html": 42})).await.unwrap_err();
        assert_eq!(err.code, crate::server::protocol::INVALID_PARAMS);
    }
}
