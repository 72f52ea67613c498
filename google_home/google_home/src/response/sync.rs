use serde::Serialize;

use crate::device;
use crate::traits::Trait;
use crate::types::Type;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    agent_user_id: String,
    pub devices: Vec<Device>,
}

impl Payload {
    pub fn new(agent_user_id: &str) -> Self {
        Self {
            agent_user_id: agent_user_id.into(),
            devices: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    id: String,
    #[serde(rename = "type")]
    device_type: Type,
    pub traits: Vec<Trait>,
    pub name: device::Name,
    pub will_report_state: bool,
}

impl Device {
    pub fn new(id: &str, name: &str, device_type: Type) -> Self {
        Self {
            id: id.into(),
            device_type,
            traits: Vec::new(),
            name: device::Name::new(name),
            will_report_state: false,
        }
    }
}
