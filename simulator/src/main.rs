use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{unix::OwnedWriteHalf, UnixStream},
};
use tracing::{info, warn};

use aod_common::{
    AMBIENT_EVENT_BRIGHT, AMBIENT_EVENT_DARK, AMBIENT_EVENT_DIM, ControlMessage,
    DisplayPowerState, ServiceConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let socket_path = std::env::var("AOD_SOCKET")
        .map(PathBuf::from)
        .unwrap_or_else(|_| ServiceConfig::default().control_socket);

    let stream = UnixStream::connect(&socket_path).await.with_context(|| {
        format!(
            "failed to connect to daemon socket at {}",
            socket_path.display()
        )
    })?;
    let (reader, mut writer) = stream.into_split();
    let mut replies = BufReader::new(reader).lines();

    info!("replaying doze session against {}", socket_path.display());

    // The 6 s pause waits out the settle window, so later sensor events land
    // while the daemon is dozing.
    let script: [(u64, ControlMessage); 8] = [
        (0, ControlMessage::ScreenOff),
        (
            400,
            ControlMessage::DisplayState {
                state: DisplayPowerState::Doze,
            },
        ),
        (
            800,
            ControlMessage::AmbientLight {
                value: AMBIENT_EVENT_BRIGHT,
            },
        ),
        (
            6_000,
            ControlMessage::AmbientLight {
                value: AMBIENT_EVENT_DIM,
            },
        ),
        (
            1_000,
            ControlMessage::DisplayState {
                state: DisplayPowerState::DozeSuspend,
            },
        ),
        (
            2_000,
            ControlMessage::AmbientLight {
                value: AMBIENT_EVENT_DARK,
            },
        ),
        (2_000, ControlMessage::ScreenOn),
        (
            300,
            ControlMessage::DisplayState {
                state: DisplayPowerState::On,
            },
        ),
    ];

    for (delay_ms, message) in script {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        send_line(&mut writer, &message).await?;
        info!("sent {message:?}");
    }

    send_line(&mut writer, &ControlMessage::Status).await?;
    match replies.next_line().await? {
        Some(line) => info!("daemon status: {line}"),
        None => warn!("daemon closed the connection before replying"),
    }

    Ok(())
}

async fn send_line(writer: &mut OwnedWriteHalf, message: &ControlMessage) -> anyhow::Result<()> {
    let mut payload = serde_json::to_vec(message)?;
    payload.push(b'\n');
    writer
        .write_all(&payload)
        .await
        .with_context(|| format!("failed to send {message:?}"))?;
    Ok(())
}
