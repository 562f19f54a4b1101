//! HTTP 传输：JSON-RPC 端点 + REST 端点，共用同一个分发器
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::info;

use super::protocol::RequestDispatcher;
use super::tools::{DetectAnalyticsArgs, DetectFrameworksArgs, FingerprintUrlArgs};
use crate::envelope::Envelope;
use crate::error::RsfResult;

/// 请求体上限（HTML 上限之外留出 JSON 转义余量）
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

type SharedDispatcher = Arc<RequestDispatcher>;

/// 构建路由
pub fn build_router(dispatcher: RequestDispatcher) -> Router {
    Router::new()
        .route("/mcp", post(rpc_handler))
        .route("/api/fingerprint", post(fingerprint_handler))
        .route("/api/detect/frameworks", post(frameworks_handler))
        .route("/api/detect/analytics", post(analytics_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(Arc::new(dispatcher))
}

/// 监听地址并服务，Ctrl-C 时优雅退出
pub async fn serve(dispatcher: RequestDispatcher, addr: SocketAddr) -> RsfResult<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", listener.local_addr()?);
    axum::serve(listener, build_router(dispatcher))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;
    Ok(())
}

async fn rpc_handler(State(dispatcher): State<SharedDispatcher>, body: String) -> Response {
    match dispatcher.handle_text(&body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// 请求体无法解析时返回 400 + ok=false 信封
fn bad_request(rejection: JsonRejection) -> Response {
    let envelope = Envelope::failure(Value::Null, rejection.body_text());
    (StatusCode::BAD_REQUEST, Json(envelope)).into_response()
}

async fn fingerprint_handler(
    State(dispatcher): State<SharedDispatcher>,
    payload: Result<Json<FingerprintUrlArgs>, JsonRejection>,
) -> Response {
    let Json(args) = match payload {
        Ok(args) => args,
        Err(rejection) => return bad_request(rejection),
    };
    let envelope = dispatcher
        .service()
        .fingerprint_url(&args.url, args.timeout_ms)
        .await;
    Json(envelope).into_response()
}

async fn frameworks_handler(
    State(dispatcher): State<SharedDispatcher>,
    payload: Result<Json<DetectFrameworksArgs>, JsonRejection>,
) -> Response {
    let Json(args) = match payload {
        Ok(args) => args,
        Err(rejection) => return bad_request(rejection),
    };
    Json(dispatcher.service().detect_frameworks(&args.html, args.headers.as_ref())).into_response()
}

async fn analytics_handler(
    State(dispatcher): State<SharedDispatcher>,
    payload: Result<Json<DetectAnalyticsArgs>, JsonRejection>,
) -> Response {
    let Json(args) = match payload {
        Ok(args) => args,
        Err(rejection) => return bad_request(rejection),
    };
    Json(dispatcher.service().detect_analytics(&args.html)).into_response()
}

async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
