//! MCP over stdio
//!
//! Newline-delimited JSON-RPC: one message per input line, one response per
//! output line. Blank lines are skipped.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info};

use super::session::McpState;

/// Serves one session until EOF or `shutdown`.
pub async fn serve_lines<R, W>(state: Arc<McpState>, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut session = state.open_session();
    let mut lines = reader.lines();
    debug!("MCP stdio session {} started", session.client_id());

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(response) = session.handle_message(line).await {
            match serde_json::to_string(&response) {
                Ok(json) => {
                    writer.write_all(json.as_bytes()).await?;
                    writer.write_all(b"\n").await?;
                    writer.flush().await?;
                }
                Err(e) => {
                    error!("Failed to serialize MCP response: {}", e);
                }
            }
        }

        if session.is_closed() {
            info!("MCP client requested shutdown");
            break;
        }
    }

    debug!("MCP stdio session {} ended", session.client_id());
    Ok(())
}

/// Serves the process's stdin/stdout.
pub async fn serve_stdio(state: Arc<McpState>) -> std::io::Result<()> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    serve_lines(state, stdin, tokio::io::stdout()).await
}
