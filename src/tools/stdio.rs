use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use super::rpc::{parse_message, ToolServer};

/// Serves newline-delimited JSON-RPC until the input closes
///
/// Notifications (messages without an id) are handled but never answered.
/// Lines are read as raw bytes so invalid UTF-8 earns a parse error reply
/// instead of ending the transport.
pub async fn serve<R, W>(server: &ToolServer, mut input: R, mut output: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = Vec::new();

    loop {
        line.clear();
        if input.read_until(b'\n', &mut line).await? == 0 {
            break;
        }
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        let response = match parse_message(&line) {
            Ok(request) if request.is_notification() => {
                tracing::debug!(method = ?request.method, "Received notification");
                continue;
            }
            Ok(request) => server.handle(request).await,
            Err(response) => response,
        };

        let mut encoded = serde_json::to_vec(&response)?;
        encoded.push(b'\n');
        output.write_all(&encoded).await?;
        output.flush().await?;
    }

    tracing::info!("Input closed, stopping stdio transport");
    Ok(())
}
