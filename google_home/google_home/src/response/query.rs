use std::collections::HashMap;

use serde::Serialize;

use crate::state::DeviceState;

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    pub devices: HashMap<String, Device>,
}

impl Payload {
    pub fn new() -> Self {
        Self {
            devices: HashMap::new(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(flatten)]
    pub state: DeviceState,
}

impl Device {
    pub fn new(state: DeviceState) -> Self {
        Self { state }
    }
}
