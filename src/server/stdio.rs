//! stdio 传输：按行读取 JSON-RPC 请求，每个响应单独一行
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use super::protocol::RequestDispatcher;
use crate::error::RsfResult;

/// 在任意行读取器/写入器上运行协议循环，直到输入结束
/// 单条请求的错误以错误响应返回，不中断循环
pub async fn serve_lines<R, W>(dispatcher: &RequestDispatcher, reader: R, mut writer: W) -> RsfResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some(response) = dispatcher.handle_text(line).await else {
            continue;
        };

        let mut payload = serde_json::to_vec(&response)?;
        payload.push(b'\n');
        writer.write_all(&payload).await?;
        writer.flush().await?;
    }

    debug!("stdio input closed");
    Ok(())
}

/// 在进程的 stdin/stdout 上运行
pub async fn run_stdio(dispatcher: RequestDispatcher) -> RsfResult<()> {
    info!("Serving JSON-RPC over stdio");
    let reader = BufReader::new(tokio::io::stdin());
    let writer = tokio::io::stdout();
    serve_lines(&dispatcher, reader, writer).await
}
