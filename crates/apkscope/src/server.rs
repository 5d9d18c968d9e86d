//! JSON-lines method-call server.
//!
//! One request per input line, one response per output line. Every request
//! runs in its own task, so responses may come back out of order; callers
//! match them by `id`. A single writer task owns the output.

use std::io;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use crate::channel::{self, MethodCall, MethodResponse};
use crate::{Inspector, ServiceError};

/// Serve requests from `input` until it reaches end of file, then wait for
/// every in-flight request to be answered. Returns the output sink.
pub async fn serve<R, W>(inspector: Arc<Inspector>, input: R, output: W) -> io::Result<W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<MethodResponse>();

    let writer = tokio::spawn(async move {
        let mut output = output;
        while let Some(response) = rx.recv().await {
            let mut line = serde_json::to_vec(&response)?;
            line.push(b'\n');
            output.write_all(&line).await?;
            output.flush().await?;
        }
        Ok::<W, io::Error>(output)
    });

    let mut lines = input.lines();
    let mut received = 0u64;
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        received += 1;

        let call = match serde_json::from_str::<MethodCall>(&line) {
            Ok(call) => call,
            Err(e) => {
                tracing::warn!(error = %e, "malformed request");
                let response =
                    MethodResponse::failure(None, &ServiceError::InvalidArgument("request"));
                if tx.send(response).is_err() {
                    break;
                }
                continue;
            }
        };

        tracing::debug!(id = ?call.id, method = %call.method, "request received");
        let inspector = Arc::clone(&inspector);
        let tx = tx.clone();
        tokio::spawn(async move {
            let response = channel::handle(&inspector, &call).await;
            // the writer only stops early on an output error, reported below
            let _ = tx.send(response);
        });
    }

    drop(tx);
    let output = writer.await.map_err(io::Error::other)??;
    tracing::info!(requests = received, "input closed");
    Ok(output)
}
