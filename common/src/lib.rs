pub mod config;
pub mod doze;
pub mod port;
pub mod protocol;
pub mod types;

pub use config::{DozeConfig, ServiceConfig, SystemDisplaySettings};
pub use doze::{
    AMBIENT_EVENT_BRIGHT, AMBIENT_EVENT_DARK, AMBIENT_EVENT_DIM, DozeBrightnessEngine, DozePhase,
    EngineAction,
};
pub use port::{DfError, DfParams, DisplayFeature, MockDisplayFeature, PARAM_DOZE_BRIGHTNESS_STATE};
pub use protocol::ControlMessage;
pub use types::{ControllerStatus, DisplayPowerState, DozeMode};
