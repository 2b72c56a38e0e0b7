use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DozeConfig {
    pub settle_ms: u64,
    pub hbm_brightness_threshold: u32,
}

impl Default for DozeConfig {
    fn default() -> Self {
        Self {
            settle_ms: 5_000,
            hbm_brightness_threshold: 20,
        }
    }
}

impl DozeConfig {
    pub fn sanitize(&mut self) {
        if self.settle_ms == 0 {
            self.settle_ms = 5_000;
        }
        // Threshold compares against a 0-255 brightness scale.
        self.hbm_brightness_threshold = self.hbm_brightness_threshold.min(255);
    }
}

// Maintained by the host system; the daemon only reads it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemDisplaySettings {
    pub always_on_enabled: bool,
    pub screen_brightness: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub doze: DozeConfig,
    pub control_socket: PathBuf,
    pub settings_path: PathBuf,
    pub disp_param_node: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            doze: DozeConfig::default(),
            control_socket: PathBuf::from("/dev/socket/aodbrightnessd"),
            settings_path: PathBuf::from("/data/system/aod_settings.json"),
            disp_param_node: PathBuf::from(
                "/sys/devices/virtual/mi_display/disp_feature/disp-DSI-0/disp_param",
            ),
        }
    }
}

impl ServiceConfig {
    pub fn sanitize(&mut self) {
        self.doze.sanitize();
    }
}
