use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Hash, PartialEq, Eq, Copy, Clone, Serialize, Error)]
#[serde(rename_all = "camelCase")]
pub enum DeviceError {
    #[error("deviceNotFound")]
    DeviceNotFound,
    #[error("transientError")]
    TransientError,
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, Serialize, Error)]
#[serde(untagged)]
pub enum ErrorCode {
    #[error("{0}")]
    DeviceError(DeviceError),
}

impl From<DeviceError> for ErrorCode {
    fn from(value: DeviceError) -> Self {
        Self::DeviceError(value)
    }
}
