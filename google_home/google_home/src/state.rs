use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub type StateError = Box<dyn std::error::Error + Send + Sync>;

/// The OnOff state of a single device, as reported in QUERY, EXECUTE and
/// report state payloads.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceState {
    pub on: bool,
}

impl DeviceState {
    pub fn new(on: bool) -> Self {
        Self { on }
    }
}

/// Backing storage for device state.
///
/// `state` must resolve devices that have never been written to a default
/// state and only return an error when the storage itself fails.
#[async_trait]
pub trait DeviceStates: Debug + Send + Sync {
    async fn state(&self, id: &str) -> Result<DeviceState, StateError>;
    async fn set_on(&self, id: &str, on: bool) -> Result<(), StateError>;
}
