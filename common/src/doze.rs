use std::time::Duration;

use crate::{
    config::DozeConfig,
    types::{ControllerStatus, DisplayPowerState, DozeMode},
};

// Sentinel values reported by the aod sensor stream.
pub const AMBIENT_EVENT_BRIGHT: f32 = 4.0;
pub const AMBIENT_EVENT_DIM: f32 = 5.0;
pub const AMBIENT_EVENT_DARK: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DozePhase {
    Awake,
    // Settle timer pending; sensor-driven writes are suppressed.
    Settling,
    Dozing,
}

impl DozePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Awake => "AWAKE",
            Self::Settling => "SETTLING",
            Self::Dozing => "DOZING",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineAction {
    WriteMode(DozeMode),
    StartSettleTimer(Duration),
    CancelSettleTimer,
    WatchSensor,
    UnwatchSensor,
}

// I/O-free state machine. The caller serializes all events into it and
// executes the returned actions in order.
#[derive(Debug, Clone)]
pub struct DozeBrightnessEngine {
    config: DozeConfig,
    phase: DozePhase,
    display_state: DisplayPowerState,
    doze_hbm: bool,
}

impl DozeBrightnessEngine {
    pub fn new(mut config: DozeConfig) -> Self {
        config.sanitize();
        Self {
            config,
            phase: DozePhase::Awake,
            display_state: DisplayPowerState::On,
            doze_hbm: false,
        }
    }

    pub fn phase(&self) -> DozePhase {
        self.phase
    }

    pub fn display_state(&self) -> DisplayPowerState {
        self.display_state
    }

    pub fn is_doze_hbm(&self) -> bool {
        self.doze_hbm
    }

    pub fn target_mode(&self) -> DozeMode {
        let actively_dozing = self.phase != DozePhase::Awake && self.display_state.is_doze();
        if !actively_dozing {
            DozeMode::Off
        } else if self.doze_hbm {
            DozeMode::Hbm
        } else {
            DozeMode::Lbm
        }
    }

    pub fn screen_off(
        &mut self,
        always_on_enabled: bool,
        screen_brightness: u32,
    ) -> Vec<EngineAction> {
        if !always_on_enabled {
            return self.clear_session();
        }
        if self.phase != DozePhase::Awake {
            // Repeated screen-off mid-session; the first one won.
            return Vec::new();
        }

        self.phase = DozePhase::Settling;
        self.doze_hbm = screen_brightness > self.config.hbm_brightness_threshold;
        vec![
            EngineAction::WatchSensor,
            EngineAction::StartSettleTimer(Duration::from_millis(self.config.settle_ms)),
        ]
    }

    pub fn screen_on(&mut self) -> Vec<EngineAction> {
        match self.phase {
            DozePhase::Awake => Vec::new(),
            DozePhase::Settling => {
                self.phase = DozePhase::Awake;
                vec![
                    EngineAction::CancelSettleTimer,
                    EngineAction::WriteMode(self.target_mode()),
                    EngineAction::UnwatchSensor,
                ]
            }
            DozePhase::Dozing => {
                self.phase = DozePhase::Awake;
                vec![
                    EngineAction::WriteMode(self.target_mode()),
                    EngineAction::UnwatchSensor,
                ]
            }
        }
    }

    pub fn display_state_changed(&mut self, state: DisplayPowerState) -> Vec<EngineAction> {
        self.display_state = state;
        // The authoritative resync point: always recompute and write.
        vec![EngineAction::WriteMode(self.target_mode())]
    }

    pub fn ambient_event(&mut self, raw: f32) -> Vec<EngineAction> {
        if self.phase == DozePhase::Awake {
            // Stray event after unsubscribe; nothing to update.
            return Vec::new();
        }

        // Only the bright sentinel maps high; dim and dark both map low.
        self.doze_hbm = (raw - AMBIENT_EVENT_BRIGHT).abs() < f32::EPSILON;
        if self.phase == DozePhase::Settling {
            // The settle timer owns the first write of the session.
            return Vec::new();
        }
        vec![EngineAction::WriteMode(self.target_mode())]
    }

    pub fn settle_timer_fired(&mut self) -> Vec<EngineAction> {
        if self.phase != DozePhase::Settling {
            // The fired event was already queued when the session ended.
            return Vec::new();
        }

        self.phase = DozePhase::Dozing;
        if self.display_state.is_doze() {
            vec![EngineAction::WriteMode(self.target_mode())]
        } else {
            // Panel not in a doze state yet. The session survives so a late
            // display-state change still commits; only the watch ends.
            vec![EngineAction::UnwatchSensor]
        }
    }

    pub fn status(
        &self,
        sensor_watched: bool,
        settle_pending: bool,
        last_written_mode: Option<DozeMode>,
    ) -> ControllerStatus {
        ControllerStatus {
            phase: self.phase.as_str(),
            display_state: self.display_state.as_str(),
            doze_hbm: self.doze_hbm,
            sensor_watched,
            settle_pending,
            last_written_mode: last_written_mode.map(DozeMode::as_str),
        }
    }

    fn clear_session(&mut self) -> Vec<EngineAction> {
        match self.phase {
            DozePhase::Awake => Vec::new(),
            DozePhase::Settling => {
                self.phase = DozePhase::Awake;
                vec![EngineAction::CancelSettleTimer, EngineAction::UnwatchSensor]
            }
            DozePhase::Dozing => {
                self.phase = DozePhase::Awake;
                vec![EngineAction::UnwatchSensor]
            }
        }
    }
}
