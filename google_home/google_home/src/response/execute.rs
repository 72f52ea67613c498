use serde::Serialize;

use crate::errors::ErrorCode;
use crate::state::DeviceState;

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    commands: Vec<Command>,
}

impl Payload {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn add_command(&mut self, command: Command) {
        if !command.is_empty() {
            self.commands.push(command);
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    ids: Vec<String>,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub states: Option<States>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
}

impl Command {
    pub fn new(status: Status) -> Self {
        Self {
            ids: Vec::new(),
            status,
            states: None,
            error_code: None,
        }
    }

    pub fn add_id(&mut self, id: &str) {
        self.ids.push(id.into());
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct States {
    pub online: bool,

    #[serde(flatten)]
    pub state: Option<DeviceState>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Success,
    Error,
}
