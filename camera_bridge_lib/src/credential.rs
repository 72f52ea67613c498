use std::fmt;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::error::CredentialError;

/// Service account key used to authenticate against the HomeGraph API.
#[derive(Clone, Deserialize)]
pub struct Credential {
    pub client_email: String,
    token: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("client_email", &self.client_email)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl Credential {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CredentialError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                CredentialError::Missing(display.clone())
            } else {
                CredentialError::Read {
                    path: display.clone(),
                    source,
                }
            }
        })?;

        serde_json::from_str(&content).map_err(|source| {
            // Minting a token from the private key is not supported
            let is_service_account_key = serde_json::from_str::<serde_json::Value>(&content)
                .is_ok_and(|key| key.get("private_key").is_some());

            if is_service_account_key {
                CredentialError::Unsupported(display)
            } else {
                CredentialError::Parse {
                    path: display,
                    source,
                }
            }
        })
    }

    /// Load the credential if it is available.
    ///
    /// Features that depend on it are disabled when it is not, so problems are only logged.
    pub fn load_optional(path: impl AsRef<Path>) -> Option<Self> {
        match Self::load(path) {
            Ok(credential) => {
                info!(
                    client_email = credential.client_email,
                    "Loaded service account key"
                );
                Some(credential)
            }
            Err(CredentialError::Missing(path)) => {
                warn!("Service account key is not found at '{path}'");
                warn!("Report state will be unavailable");
                None
            }
            Err(err @ CredentialError::Unsupported(_)) => {
                warn!("{err}");
                warn!("Report state will be unavailable");
                None
            }
            Err(err) => {
                error!("Failed to load service account key: {err}");
                warn!("Report state will be unavailable");
                None
            }
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}
