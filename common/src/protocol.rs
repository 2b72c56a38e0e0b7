use serde::{Deserialize, Serialize};

use crate::types::DisplayPowerState;

// One JSON message per line on the control socket. `status` is answered on
// the same connection with a ControllerStatus line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ControlMessage {
    ScreenOn,
    ScreenOff,
    DisplayState { state: DisplayPowerState },
    AmbientLight { value: f32 },
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn wire_format_round_trips() {
        let message: ControlMessage =
            serde_json::from_str(r#"{"type":"displayState","state":"DOZE_SUSPEND"}"#).unwrap();
        assert_eq!(
            message,
            ControlMessage::DisplayState {
                state: DisplayPowerState::DozeSuspend,
            }
        );

        let encoded = serde_json::to_string(&ControlMessage::ScreenOff).unwrap();
        assert_eq!(encoded, r#"{"type":"screenOff"}"#);
    }

    #[test]
    fn ambient_value_carries_float() {
        let message: ControlMessage =
            serde_json::from_str(r#"{"type":"ambientLight","value":4.0}"#).unwrap();
        assert_eq!(message, ControlMessage::AmbientLight { value: 4.0 });
    }

    #[test]
    fn other_state_is_an_explicit_tag() {
        let message: ControlMessage =
            serde_json::from_str(r#"{"type":"displayState","state":"OTHER"}"#).unwrap();
        assert_eq!(
            message,
            ControlMessage::DisplayState {
                state: DisplayPowerState::Other,
            }
        );
    }

    #[test]
    fn unknown_state_is_rejected() {
        let result =
            serde_json::from_str::<ControlMessage>(r#"{"type":"displayState","state":"VR"}"#);
        assert!(result.is_err());
    }
}
