use std::{fs, path::PathBuf};

use tracing::debug;

use aod_common::{DfError, DfParams, DisplayFeature, PARAM_DOZE_BRIGHTNESS_STATE};

// Command strings understood by the mi_display disp_param node.
const DISP_PARAM_DOZE_OFF: &str = "03 00";
const DISP_PARAM_DOZE_HBM: &str = "03 01";
const DISP_PARAM_DOZE_LBM: &str = "03 02";

#[derive(Debug)]
pub struct SysfsDisplayFeature {
    node: PathBuf,
}

impl SysfsDisplayFeature {
    pub fn new(node: PathBuf) -> Self {
        Self { node }
    }

    fn render(params: DfParams) -> Result<&'static str, DfError> {
        if params.param != PARAM_DOZE_BRIGHTNESS_STATE {
            return Err(DfError::UnsupportedParam(params.param));
        }
        match params.value {
            0 => Ok(DISP_PARAM_DOZE_OFF),
            1 => Ok(DISP_PARAM_DOZE_HBM),
            2 => Ok(DISP_PARAM_DOZE_LBM),
            value => Err(DfError::UnsupportedValue(value)),
        }
    }
}

impl DisplayFeature for SysfsDisplayFeature {
    fn set_feature(&self, params: DfParams) -> Result<(), DfError> {
        let command = Self::render(params)?;
        debug!("writing {command:?} to {}", self.node.display());
        fs::write(&self.node, command)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use aod_common::DozeMode;

    fn temp_node(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("aod-sysfs-{tag}-{}", std::process::id()))
    }

    #[test]
    fn writes_doze_mode_commands() {
        let node = temp_node("modes");
        let port = SysfsDisplayFeature::new(node.clone());

        port.set_feature(DfParams::doze_brightness(DozeMode::Hbm))
            .unwrap();
        assert_eq!(fs::read_to_string(&node).unwrap(), "03 01");

        port.set_feature(DfParams::doze_brightness(DozeMode::Lbm))
            .unwrap();
        assert_eq!(fs::read_to_string(&node).unwrap(), "03 02");

        port.set_feature(DfParams::doze_brightness(DozeMode::Off))
            .unwrap();
        assert_eq!(fs::read_to_string(&node).unwrap(), "03 00");

        let _ = fs::remove_file(&node);
    }

    #[test]
    fn rejects_unknown_parameter() {
        let port = SysfsDisplayFeature::new(temp_node("param"));

        let err = port
            .set_feature(DfParams {
                param: 17,
                value: 1,
                cookie: 0,
            })
            .unwrap_err();

        assert!(matches!(err, DfError::UnsupportedParam(17)));
    }

    #[test]
    fn rejects_unknown_value() {
        let port = SysfsDisplayFeature::new(temp_node("value"));

        let err = port
            .set_feature(DfParams {
                param: PARAM_DOZE_BRIGHTNESS_STATE,
                value: 9,
                cookie: 0,
            })
            .unwrap_err();

        assert!(matches!(err, DfError::UnsupportedValue(9)));
    }

    #[test]
    fn missing_node_surfaces_io_error() {
        let node = std::env::temp_dir()
            .join(format!("aod-sysfs-absent-{}", std::process::id()))
            .join("disp_param");
        let port = SysfsDisplayFeature::new(node);

        let err = port
            .set_feature(DfParams::doze_brightness(DozeMode::Off))
            .unwrap_err();

        assert!(matches!(err, DfError::Io(_)));
    }
}
