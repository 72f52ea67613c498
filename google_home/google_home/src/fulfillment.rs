use std::sync::Arc;

use futures::future::try_join_all;
use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::Device;
use crate::errors::DeviceError;
use crate::request::{self, Intent, Request};
use crate::response::{Response, ResponsePayload, disconnect, execute, query, sync};
use crate::state::{DeviceState, DeviceStates, StateError};
use crate::traits::{Command, Trait};

#[derive(Debug)]
pub struct GoogleHome {
    user_id: String,
    devices: IndexMap<String, Box<dyn Device>>,
    states: Arc<dyn DeviceStates>,
}

#[derive(Debug, Error)]
pub enum FulfillmentError {
    #[error("Expected at least one ResponsePayload")]
    ExpectedOnePayload,
    #[error("Failed to query state of device '{id}'")]
    QueryFailed {
        id: String,
        #[source]
        source: StateError,
    },
}

impl GoogleHome {
    pub fn new(user_id: &str, states: Arc<dyn DeviceStates>) -> Self {
        Self {
            user_id: user_id.into(),
            devices: IndexMap::new(),
            states,
        }
    }

    pub fn add_device(&mut self, device: Box<dyn Device>) {
        let id = device.get_id();

        debug!(id, "Adding device");

        self.devices.insert(id, device);
    }

    pub async fn handle_request(&self, request: Request) -> Result<Response, FulfillmentError> {
        let Request { request_id, inputs } = request;

        // The first input decides the intent, any further inputs for the same intent are merged
        // into it
        let mut inputs = inputs.into_iter();
        let intent = inputs.next().ok_or(FulfillmentError::ExpectedOnePayload)?;

        debug!(request_id, intent = intent.name(), "Handling intent");

        let payload = match intent {
            Intent::Sync => {
                inputs.for_each(|input| ignore_input(&input));
                ResponsePayload::Sync(self.sync())
            }
            Intent::Query(mut payload) => {
                for input in inputs {
                    match input {
                        Intent::Query(extra) => payload.devices.extend(extra.devices),
                        other => ignore_input(&other),
                    }
                }

                ResponsePayload::Query(self.query(payload).await?)
            }
            Intent::Execute(mut payload) => {
                for input in inputs {
                    match input {
                        Intent::Execute(extra) => payload.commands.extend(extra.commands),
                        other => ignore_input(&other),
                    }
                }

                ResponsePayload::Execute(self.execute(payload).await)
            }
            Intent::Disconnect => {
                inputs.for_each(|input| ignore_input(&input));
                debug!(user_id = self.user_id, "Account unlinked");
                ResponsePayload::Disconnect(disconnect::Payload::default())
            }
        };

        Ok(Response::new(&request_id, payload))
    }

    pub fn sync(&self) -> sync::Payload {
        let mut resp_payload = sync::Payload::new(&self.user_id);
        resp_payload.devices = self.devices.values().map(|device| device.sync()).collect();
        resp_payload
    }

    pub async fn query(
        &self,
        payload: request::query::Payload,
    ) -> Result<query::Payload, FulfillmentError> {
        let f = payload
            .devices
            .into_iter()
            .map(|device| device.id)
            .map(|id| async move {
                match self.states.state(&id).await {
                    Ok(state) => Ok((id, query::Device::new(state))),
                    Err(source) => Err(FulfillmentError::QueryFailed { id, source }),
                }
            });

        // Every read has to succeed, a partial payload is never returned
        let mut resp_payload = query::Payload::new();
        resp_payload.devices = try_join_all(f).await?.into_iter().collect();
        Ok(resp_payload)
    }

    pub async fn execute(&self, payload: request::execute::Payload) -> execute::Payload {
        let mut resp_payload = execute::Payload::new();

        for command in payload.commands {
            for device in &command.devices {
                let result = self.execute_device(&device.id, &command.execution).await;
                resp_payload.add_command(result);
            }
        }

        resp_payload
    }

    async fn execute_device(&self, id: &str, execution: &[Command]) -> execute::Command {
        let Some(device) = self.devices.get(id) else {
            warn!(id, "Received command for unknown device");
            return failed(id, DeviceError::DeviceNotFound);
        };

        let mut state = None;
        for cmd in execution {
            match cmd {
                Command::OnOff { on } if device.supports(Trait::OnOff) => {
                    if let Err(err) = self.states.set_on(id, *on).await {
                        error!(id, "Failed to store new state: {err}");
                        return failed(id, DeviceError::TransientError);
                    }

                    state = Some(DeviceState::new(*on));
                }
                _ => debug!(id, ?cmd, "Ignoring unsupported command"),
            }
        }

        let mut success = execute::Command::new(execute::Status::Success);
        success.states = Some(execute::States {
            online: true,
            state,
        });
        success.add_id(id);
        success
    }
}

fn failed(id: &str, error: DeviceError) -> execute::Command {
    let mut command = execute::Command::new(execute::Status::Error);
    command.error_code = Some(error.into());
    command.add_id(id);
    command
}

fn ignore_input(intent: &Intent) {
    warn!(
        intent = intent.name(),
        "Ignoring input with a different intent"
    );
}
