//! 服务模块：JSON-RPC 协议、工具定义与两种传输（stdio / HTTP）
pub mod protocol;
pub mod tools;
pub mod stdio;
pub mod http;

pub use self::protocol::{JsonRpcRequest, JsonRpcResponse, RequestDispatcher, RpcError};
pub use self::tools::{tool_descriptors, ToolCallResult, ToolDescriptor};
pub use self::stdio::{run_stdio, serve_lines};
pub use self::http::{build_router, serve};
