use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisplayPowerState {
    On,
    Doze,
    DozeSuspend,
    Other,
}

impl DisplayPowerState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Doze => "DOZE",
            Self::DozeSuspend => "DOZE_SUSPEND",
            Self::Other => "OTHER",
        }
    }

    pub fn is_doze(self) -> bool {
        matches!(self, Self::Doze | Self::DozeSuspend)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DozeMode {
    Off,
    Hbm,
    Lbm,
}

impl DozeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Hbm => "HBM",
            Self::Lbm => "LBM",
        }
    }

    pub fn param_value(self) -> i32 {
        match self {
            Self::Off => 0,
            Self::Hbm => 1,
            Self::Lbm => 2,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ControllerStatus {
    pub phase: &'static str,
    #[serde(rename = "displayState")]
    pub display_state: &'static str,
    #[serde(rename = "dozeHbm")]
    pub doze_hbm: bool,
    #[serde(rename = "sensorWatched")]
    pub sensor_watched: bool,
    #[serde(rename = "settlePending")]
    pub settle_pending: bool,
    #[serde(rename = "lastWrittenMode")]
    pub last_written_mode: Option<&'static str>,
}
