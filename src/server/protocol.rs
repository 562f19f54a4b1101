//! JSON-RPC 2.0 协议层：请求/响应结构、错误码、方法分发
//! stdio 与 HTTP 两种传输共用同一个分发器
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::tools;
use crate::service::FingerprintService;

/// 协议版本（initialize 返回）
pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

/// JSON-RPC 请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    // 缺省表示通知，不回包
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// JSON-RPC 错误对象
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn parse_error(detail: impl std::fmt::Display) -> Self {
        Self::new(PARSE_ERROR, format!("Parse error: {}", detail))
    }

    pub fn invalid_request(detail: impl std::fmt::Display) -> Self {
        Self::new(INVALID_REQUEST, format!("Invalid request: {}", detail))
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }

    pub fn invalid_params(detail: impl std::fmt::Display) -> Self {
        Self::new(INVALID_PARAMS, format!("Invalid params: {}", detail))
    }

    pub fn internal(detail: impl std::fmt::Display) -> Self {
        Self::new(INTERNAL_ERROR, format!("Internal error: {}", detail))
    }
}

/// JSON-RPC 响应（result 与 error 二选一）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: Option<Value>,
}

/// 请求分发器
#[derive(Debug, Clone)]
pub struct RequestDispatcher {
    service: FingerprintService,
}

impl RequestDispatcher {
    pub fn new(service: FingerprintService) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &FingerprintService {
        &self.service
    }

    /// 处理一条原始文本消息；通知返回 None
    pub async fn handle_text(&self, text: &str) -> Option<JsonRpcResponse> {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => self.handle_value(value).await,
            Err(e) => Some(JsonRpcResponse::failure(Value::Null, RpcError::parse_error(e))),
        }
    }

    /// 处理一条已解析的 JSON 消息
    pub async fn handle_value(&self, value: Value) -> Option<JsonRpcResponse> {
        // 结构不合法时尽量带回原 id；`"id": null` 仍是请求，只有缺省 id 才是通知
        let fallback_id = value.get("id").cloned().unwrap_or(Value::Null);
        let has_id = value.get("id").is_some();
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Some(JsonRpcResponse::failure(fallback_id, RpcError::invalid_request(e)));
            }
        };

        if let Some(version) = request.jsonrpc.as_deref() {
            if version != "2.0" {
                return Some(JsonRpcResponse::failure(
                    fallback_id,
                    RpcError::invalid_request(format!("unsupported jsonrpc version `{}`", version)),
                ));
            }
        }

        if !has_id {
            debug!("Notification received: {}", request.method);
            return None;
        }
        let id = request.id.unwrap_or(Value::Null);

        let response = match self.dispatch(&request.method, request.params).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => {
                debug!("Request `{}` failed: {} {}", request.method, error.code, error.message);
                JsonRpcResponse::failure(id, error)
            }
        };
        Some(response)
    }

    async fn dispatch(&self, method: &str, params: Option<Value>) -> Result<Value, RpcError> {
        match method {
            "initialize" => Ok(Self::initialize_result()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": tools::tool_descriptors() })),
            "tools/call" => {
                let params = params.ok_or_else(|| RpcError::invalid_params("missing params"))?;
                let call: ToolCallParams =
                    serde_json::from_value(params).map_err(RpcError::invalid_params)?;
                let arguments = call.arguments.unwrap_or_else(|| json!({}));
                let result = tools::call_tool(&self.service, &call.name, arguments).await?;
                serde_json::to_value(result).map_err(RpcError::internal)
            }
            other => Err(RpcError::method_not_found(other)),
        }
    }

    fn initialize_result() -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            },
            "capabilities": {
                "tools": {}
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigManager;

    async fn dispatcher() -> RequestDispatcher {
        let service = FingerprintService::from_config(&ConfigManager::get_default()).await.unwrap();
        RequestDispatcher::new(service)
    }

    async fn call(text: &str) -> JsonRpcResponse {
        dispatcher().await.handle_text(text).await.unwrap()
    }

    #[tokio::test]
    async fn test_initialize() {
        let resp = call(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#).await;
        let result = resp.result.unwrap();
        assert_eq!(resp.id, json!(1));
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "rsfingerprint");
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_tools_list() {
        let resp = call(r#"{"jsonrpc":"2.0","id":"a","method":"tools/list"}"#).await;
        let tools = resp.result.unwrap()["tools"].as_array().unwrap().clone();
        let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["fingerprint_url", "detect_frameworks", "detect_analytics"]);
        assert!(tools.iter().all(|t| t["inputSchema"]["type"] == "object"));
    }

    #[tokio::test]
    async fn test_tools_call_detect_frameworks() {
        let resp = call(
            r#"{"jsonrpc":"2.0","id":7,"method":"tools/call","params":{"name":"detect_frameworks","arguments":{"html":"","headers":{"X-Powered-By":"Express"}}}}"#,
        )
        .await;
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], false);
        assert_eq!(result["content"][0]["type"], "text");

        let envelope: Value = serde_json::from_str(result["content"][0]["text"].as_str().unwrap()).unwrap();
        assert_eq!(envelope["ok"], true);
        assert_eq!(envelope["data"]["technologies"][0]["name"], "Express");
        assert_eq!(envelope["meta"]["warnings"][0], "Empty HTML content provided");
    }

    #[tokio::test]
    async fn test_unknown_method_and_tool() {
        let resp = call(r#"{"jsonrpc":"2.0","id":2,"method":"resources/list"}"#).await;
        assert_eq!(resp.error.unwrap().code, METHOD_NOT_FOUND);

        let resp = call(r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"nope","arguments":{}}}"#).await;
        assert_eq!(resp.error.unwrap().code, INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_missing_required_argument() {
        let resp = call(r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"detect_analytics","arguments":{}}}"#).await;
        let error = resp.error.unwrap();
        assert_eq!(error.code, INVALID_PARAMS);
        assert!(error.message.contains("html"));
    }

    #[tokio::test]
    async fn test_parse_error_and_invalid_request() {
        let resp = call("{not json").await;
        assert_eq!(resp.id, Value::Null);
        assert_eq!(resp.error.unwrap().code, PARSE_ERROR);

        let resp = call(r#"{"jsonrpc":"2.0","id":5}"#).await;
        assert_eq!(resp.id, json!(5));
        assert_eq!(resp.error.unwrap().code, INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_notification_has_no_response() {
        let d = dispatcher().await;
        assert!(d.handle_text(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).await.is_none());
        let ping = d.handle_text(r#"{"jsonrpc":"2.0","id":9,"method":"ping"}"#).await.unwrap();
        assert_eq!(ping.result, Some(json!({})));
    }

    #[tokio::test]
    async fn test_null_id_is_answered() {
        let resp = call(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#).await;
        assert_eq!(resp.id, Value::Null);
        assert_eq!(resp.result, Some(json!({})));
    }
}
