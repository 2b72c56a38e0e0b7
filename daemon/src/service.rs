use std::{io::ErrorKind, path::PathBuf};

use anyhow::Context;
use tokio::{
    net::UnixListener,
    signal::unix::{signal, SignalKind},
    sync::{mpsc, oneshot},
};
use tracing::{debug, info, warn};

use aod_common::{
    ControllerStatus, DfParams, DisplayFeature, DisplayPowerState, DozeBrightnessEngine, DozeMode,
    EngineAction, ServiceConfig, SystemDisplaySettings,
};

use crate::{control, settings::SettingsStore, settle::SettleTimer, sysfs::SysfsDisplayFeature};

const MAILBOX_DEPTH: usize = 64;

// Everything funnels through one mailbox, so engine state never needs a lock.
#[derive(Debug)]
pub enum DaemonEvent {
    ScreenOn,
    ScreenOff,
    DisplayState(DisplayPowerState),
    AmbientLight(f32),
    // Stamped with the arming timer's generation; dispatch drops mismatches.
    SettleFired(u64),
    Status(oneshot::Sender<ControllerStatus>),
}

struct DozeService<P: DisplayFeature> {
    engine: DozeBrightnessEngine,
    port: P,
    settings: SettingsStore,
    settle: SettleTimer,
    events_tx: mpsc::Sender<DaemonEvent>,
    sensor_watched: bool,
    last_written: Option<DozeMode>,
}

impl<P: DisplayFeature> DozeService<P> {
    fn new(
        config: &ServiceConfig,
        port: P,
        settings: SettingsStore,
        events_tx: mpsc::Sender<DaemonEvent>,
    ) -> Self {
        Self {
            engine: DozeBrightnessEngine::new(config.doze.clone()),
            port,
            settings,
            settle: SettleTimer::new(),
            events_tx,
            sensor_watched: false,
            last_written: None,
        }
    }

    async fn handle_event(&mut self, event: DaemonEvent) {
        match event {
            DaemonEvent::ScreenOn => {
                let actions = self.engine.screen_on();
                self.execute(actions);
            }
            DaemonEvent::ScreenOff => {
                let settings = self.settings.load().await.unwrap_or_else(|err| {
                    warn!("failed to load display settings: {err:#}");
                    SystemDisplaySettings::default()
                });
                let actions = self
                    .engine
                    .screen_off(settings.always_on_enabled, settings.screen_brightness);
                self.execute(actions);
            }
            DaemonEvent::DisplayState(state) => {
                debug!("display state changed to {}", state.as_str());
                let actions = self.engine.display_state_changed(state);
                self.execute(actions);
            }
            DaemonEvent::AmbientLight(value) => {
                if !self.sensor_watched {
                    debug!("dropping ambient event {value}, sensor not watched");
                    return;
                }
                let actions = self.engine.ambient_event(value);
                self.execute(actions);
            }
            DaemonEvent::SettleFired(generation) => {
                if generation != self.settle.generation() {
                    // The fire was already queued when its timer was
                    // cancelled; a newer timer owns the session now.
                    debug!("dropping stale settle fire");
                    return;
                }
                // Reap the finished timer task so is_pending stays exact.
                self.settle.cancel();
                let actions = self.engine.settle_timer_fired();
                if actions.is_empty() {
                    return;
                }
                if self.engine.display_state().is_doze() {
                    debug!("dozing, committing doze brightness");
                } else {
                    debug!("panel not in doze, unregistering aod sensor");
                }
                self.execute(actions);
            }
            DaemonEvent::Status(reply) => {
                let status = self.engine.status(
                    self.sensor_watched,
                    self.settle.is_pending(),
                    self.last_written,
                );
                let _ = reply.send(status);
            }
        }
    }

    fn execute(&mut self, actions: Vec<EngineAction>) {
        for action in actions {
            match action {
                EngineAction::WriteMode(mode) => self.write_mode(mode),
                EngineAction::StartSettleTimer(delay) => {
                    self.settle.arm(delay, self.events_tx.clone());
                }
                EngineAction::CancelSettleTimer => self.settle.cancel(),
                EngineAction::WatchSensor => {
                    self.sensor_watched = true;
                    debug!("aod sensor watch enabled");
                }
                EngineAction::UnwatchSensor => {
                    self.sensor_watched = false;
                    debug!("aod sensor watch disabled");
                }
            }
        }
    }

    fn write_mode(&mut self, mode: DozeMode) {
        match self.port.set_feature(DfParams::doze_brightness(mode)) {
            Ok(()) => {
                debug!("doze brightness mode set to {}", mode.as_str());
                self.last_written = Some(mode);
            }
            // Non-fatal; the next display or sensor event retries naturally.
            Err(err) => warn!("doze brightness write failed: {err}"),
        }
    }

    // No hardware write is forced on shutdown.
    fn shutdown(&mut self) {
        self.settle.cancel();
        self.sensor_watched = false;
    }
}

pub async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut config = load_config().await.unwrap_or_else(|err| {
        warn!("failed to load service config: {err:#}");
        ServiceConfig::default()
    });
    config.sanitize();

    let socket_path = std::env::var("AOD_SOCKET")
        .map(PathBuf::from)
        .unwrap_or_else(|_| config.control_socket.clone());

    let (events_tx, mut events_rx) = mpsc::channel(MAILBOX_DEPTH);
    let mut service = DozeService::new(
        &config,
        SysfsDisplayFeature::new(config.disp_param_node.clone()),
        SettingsStore::new(config.settings_path.clone()),
        events_tx.clone(),
    );

    // A socket file left over from a previous run would make bind fail.
    if socket_path.exists() {
        std::fs::remove_file(&socket_path)
            .with_context(|| format!("failed to remove stale socket {}", socket_path.display()))?;
    }
    let listener = UnixListener::bind(&socket_path)
        .with_context(|| format!("failed to bind control socket at {}", socket_path.display()))?;
    control::spawn_listener(listener, events_tx);

    info!(
        "aod brightness service listening on {}",
        socket_path.display()
    );

    let mut sigterm = signal(SignalKind::terminate()).context("failed to set up SIGTERM handler")?;
    loop {
        tokio::select! {
            event = events_rx.recv() => match event {
                Some(event) => service.handle_event(event).await,
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received, shutting down");
                break;
            }
            _ = sigterm.recv() => {
                info!("terminate received, shutting down");
                break;
            }
        }
    }

    service.shutdown();
    let _ = std::fs::remove_file(&socket_path);
    Ok(())
}

async fn load_config() -> anyhow::Result<ServiceConfig> {
    let path = std::env::var("AOD_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/etc/aodbrightnessd/config.json"));

    match tokio::fs::read(&path).await {
        Ok(raw) => Ok(serde_json::from_slice::<ServiceConfig>(&raw)?),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(ServiceConfig::default()),
        Err(err) => Err(err.into()),
    }
}
