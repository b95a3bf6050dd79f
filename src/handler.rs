//! Connection handler
//!
//! Drives one client connection through its whole life: name handshake,
//! message phase, and cleanup. Reads happen on this task; writes are
//! delegated to a dedicated writer task draining the session's bounded
//! outbound queue, so a stalled peer never holds up a broadcast.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::RelayError;
use crate::protocol;
use crate::server::RelayCommand;
use crate::types::SessionId;

/// Capacity of each session's outbound line queue
const OUTBOUND_QUEUE_SIZE: usize = 32;

/// Handle a new TCP connection
///
/// Performs the name handshake, registers the session with the relay,
/// forwards every chat line, and deregisters exactly once when the inbound
/// stream ends - whether by EOF or by read error.
pub async fn handle_connection(
    stream: TcpStream,
    cmd_tx: mpsc::Sender<RelayCommand>,
) -> Result<(), RelayError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    let session_id = SessionId::new();
    debug!("Session {} connected from {}", session_id, peer_addr);

    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    // Handshake: exactly one line carrying the display name. A trailing
    // '\r' is stripped for CRLF clients.
    let name = match lines.next_line().await {
        Ok(Some(line)) => line.trim_end_matches('\r').to_string(),
        Ok(None) | Err(_) => String::new(),
    };
    if name.is_empty() {
        info!("Session {} rejected: no display name", session_id);
        let _ = write_line(&mut write_half, protocol::REJECTION_LINE).await;
        let _ = write_half.shutdown().await;
        return Ok(());
    }

    // Outbound queue, drained by the writer task. The sender side is handed
    // to the relay and lives in the registry until deregistration.
    let (line_tx, mut line_rx) = mpsc::channel::<String>(OUTBOUND_QUEUE_SIZE);

    let write_task = tokio::spawn(async move {
        while let Some(line) = line_rx.recv().await {
            if let Err(e) = write_line(&mut write_half, &line).await {
                debug!("Write failed, ending writer task: {}", e);
                break;
            }
        }
        let _ = write_half.shutdown().await;
    });

    cmd_tx
        .send(RelayCommand::Join {
            id: session_id,
            name,
            sender: line_tx,
        })
        .await
        .map_err(|_| RelayError::ChannelSend)?;

    // Message phase: every non-empty line is one chat message body.
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let body = line.trim_end_matches('\r');
                if body.is_empty() {
                    continue;
                }
                let cmd = RelayCommand::Chat {
                    id: session_id,
                    body: body.to_string(),
                };
                if cmd_tx.send(cmd).await.is_err() {
                    debug!("Relay closed, ending read loop for {}", session_id);
                    break;
                }
            }
            Ok(None) => {
                debug!("Session {} reached end of stream", session_id);
                break;
            }
            Err(e) => {
                warn!("Read error for session {}: {}", session_id, e);
                break;
            }
        }
    }

    // Cleanup: one exit path for EOF and read errors alike. Deregistration
    // drops the registry's sender, which closes the queue and lets the
    // writer task flush and shut the socket down.
    let _ = cmd_tx.send(RelayCommand::Leave { id: session_id }).await;
    let _ = write_task.await;

    info!("Session {} disconnected", session_id);

    Ok(())
}

/// Write one newline-terminated line to the socket
async fn write_line(writer: &mut OwnedWriteHalf, line: &str) -> std::io::Result<()> {
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await
}
