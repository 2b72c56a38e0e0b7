use std::time::Duration;

use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{unix::OwnedWriteHalf, UnixListener, UnixStream},
    sync::{mpsc, oneshot},
};
use tracing::{debug, warn};

use aod_common::{ControllerStatus, ControlMessage};

use crate::service::DaemonEvent;

const MAX_CONTROL_LINE_BYTES: usize = 512;

// Bad input on a connection is logged and the line skipped, never fatal.
pub fn spawn_listener(listener: UnixListener, events: mpsc::Sender<DaemonEvent>) {
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    tokio::spawn(serve_connection(stream, events.clone()));
                }
                Err(err) => {
                    warn!("control accept error: {err}");
                    tokio::time::sleep(Duration::from_secs(2)).await;
                }
            }
        }
    });
}

async fn serve_connection(stream: UnixStream, events: mpsc::Sender<DaemonEvent>) {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                warn!("control read error: {err}");
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }
        if line.len() > MAX_CONTROL_LINE_BYTES {
            warn!("dropping oversized control line ({} bytes)", line.len());
            continue;
        }

        let message: ControlMessage = match serde_json::from_str(&line) {
            Ok(message) => message,
            Err(err) => {
                warn!("invalid control message: {err}");
                continue;
            }
        };
        debug!("control message: {message:?}");

        let event = match message {
            ControlMessage::ScreenOn => DaemonEvent::ScreenOn,
            ControlMessage::ScreenOff => DaemonEvent::ScreenOff,
            ControlMessage::DisplayState { state } => DaemonEvent::DisplayState(state),
            ControlMessage::AmbientLight { value } => DaemonEvent::AmbientLight(value),
            ControlMessage::Status => {
                let (reply_tx, reply_rx) = oneshot::channel();
                if events.send(DaemonEvent::Status(reply_tx)).await.is_err() {
                    break;
                }
                let status = match reply_rx.await {
                    Ok(status) => status,
                    Err(_) => break,
                };
                if let Err(err) = write_status(&mut writer, &status).await {
                    warn!("status reply failed: {err}");
                    break;
                }
                continue;
            }
        };

        if events.send(event).await.is_err() {
            break;
        }
    }
}

async fn write_status(
    writer: &mut OwnedWriteHalf,
    status: &ControllerStatus,
) -> anyhow::Result<()> {
    let mut payload = serde_json::to_vec(status)?;
    payload.push(b'\n');
    writer.write_all(&payload).await?;
    Ok(())
}
