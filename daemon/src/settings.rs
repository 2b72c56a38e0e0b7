use std::{io::ErrorKind, path::PathBuf};

use aod_common::SystemDisplaySettings;

// Re-read on each screen-off so settings toggles take effect without a
// restart.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub async fn load(&self) -> anyhow::Result<SystemDisplaySettings> {
        match tokio::fs::read(&self.path).await {
            Ok(raw) => Ok(serde_json::from_slice::<SystemDisplaySettings>(&raw)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(SystemDisplaySettings::default()),
            Err(err) => Err(err.into()),
        }
    }
}
