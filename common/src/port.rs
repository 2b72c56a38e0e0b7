use std::sync::Mutex;

use thiserror::Error;

use crate::types::DozeMode;

pub const PARAM_DOZE_BRIGHTNESS_STATE: i32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DfParams {
    pub param: i32,
    pub value: i32,
    pub cookie: i32,
}

impl DfParams {
    pub fn doze_brightness(mode: DozeMode) -> Self {
        Self {
            param: PARAM_DOZE_BRIGHTNESS_STATE,
            value: mode.param_value(),
            cookie: 0,
        }
    }
}

#[derive(Debug, Error)]
pub enum DfError {
    #[error("unsupported display feature parameter {0}")]
    UnsupportedParam(i32),
    #[error("unsupported value {0} for the doze brightness parameter")]
    UnsupportedValue(i32),
    #[error("display feature write failed: {0}")]
    Io(#[from] std::io::Error),
}

// Write failures are non-fatal to callers; the next mode write retries.
pub trait DisplayFeature: Send + Sync {
    fn set_feature(&self, params: DfParams) -> Result<(), DfError>;
}

#[derive(Debug, Default)]
pub struct MockDisplayFeature {
    inner: Mutex<MockInner>,
}

#[derive(Debug, Default)]
struct MockInner {
    writes: Vec<DfParams>,
    fail_next: bool,
}

impl MockDisplayFeature {
    pub fn new() -> Self {
        Self::default()
    }

    // Failed writes are not recorded.
    pub fn writes(&self) -> Vec<DfParams> {
        self.inner.lock().unwrap().writes.clone()
    }

    pub fn fail_next_write(&self) {
        self.inner.lock().unwrap().fail_next = true;
    }
}

impl DisplayFeature for MockDisplayFeature {
    fn set_feature(&self, params: DfParams) -> Result<(), DfError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_next {
            inner.fail_next = false;
            return Err(DfError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "injected write failure",
            )));
        }
        inner.writes.push(params);
        Ok(())
    }
}
