//! Request bodies for the HomeGraph API calls a fulfillment makes on its own
//! initiative (report state and request sync).

use std::collections::HashMap;

use serde::Serialize;

use crate::state::DeviceState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStateRequest {
    request_id: String,
    agent_user_id: String,
    payload: ReportStatePayload,
}

#[derive(Debug, Clone, Default, Serialize)]
struct ReportStatePayload {
    devices: ReportStateDevices,
}

#[derive(Debug, Clone, Default, Serialize)]
struct ReportStateDevices {
    states: HashMap<String, DeviceState>,
}

impl ReportStateRequest {
    pub fn new(request_id: &str, agent_user_id: &str) -> Self {
        Self {
            request_id: request_id.into(),
            agent_user_id: agent_user_id.into(),
            payload: Default::default(),
        }
    }

    pub fn add_state(&mut self, id: &str, state: DeviceState) {
        self.payload.devices.states.insert(id.into(), state);
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSyncRequest {
    agent_user_id: String,
}

impl RequestSyncRequest {
    pub fn new(agent_user_id: &str) -> Self {
        Self {
            agent_user_id: agent_user_id.into(),
        }
    }
}
