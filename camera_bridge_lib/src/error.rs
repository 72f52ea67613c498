use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid path '{0}'")]
    InvalidPath(String),
    #[error("Timed out after {timeout:?} while reading '{path}'")]
    ReadTimeout { path: String, timeout: Duration },
    #[error("Timed out after {timeout:?} while writing '{path}'")]
    WriteTimeout { path: String, timeout: Duration },
    #[error("Value at '{path}' is malformed")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Credential file '{0}' does not exist")]
    Missing(String),
    #[error("Failed to read credential file '{path}'")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "Credential file '{0}' is a standard service account key, only keys with a pre-minted `token` are supported"
    )]
    Unsupported(String),
    #[error("Failed to parse credential file '{path}'")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum HomeGraphError {
    #[error("Failed to create HTTP client")]
    Client(#[source] reqwest::Error),
    #[error("Request to '{url}' failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Received status {status} from '{url}': {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Failed to decode response from '{url}'")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum RequestSyncError {
    #[error("Service account key is not configured, request sync is unavailable")]
    Unavailable,
    #[error("Error requesting sync: {0}")]
    Upstream(#[from] HomeGraphError),
}
