use std::fmt::Debug;

use async_trait::async_trait;
use google_home::home_graph::{ReportStateRequest, RequestSyncRequest};
use serde::Serialize;
use serde_json::Value;
use tracing::trace;

use crate::config::HomeGraphConfig;
use crate::credential::Credential;
use crate::error::HomeGraphError;

/// The HomeGraph API calls the bridge makes on its own initiative.
#[async_trait]
pub trait HomeGraph: Debug + Send + Sync {
    async fn report_state(&self, request: &ReportStateRequest) -> Result<(), HomeGraphError>;
    async fn request_sync(&self, request: &RequestSyncRequest) -> Result<Value, HomeGraphError>;
}

#[derive(Debug, Clone)]
pub struct HomeGraphClient {
    client: reqwest::Client,
    url: String,
    credential: Credential,
}

impl HomeGraphClient {
    pub fn new(config: &HomeGraphConfig, credential: Credential) -> Result<Self, HomeGraphError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(HomeGraphError::Client)?;

        Ok(Self {
            client,
            url: config.url.trim_end_matches('/').to_owned(),
            credential,
        })
    }

    async fn post<T: Serialize + Sync>(&self, method: &str, body: &T) -> Result<Value, HomeGraphError> {
        let url = format!("{}/v1/devices:{method}", self.url);
        trace!(url, "Calling HomeGraph");

        let res = self
            .client
            .post(&url)
            .bearer_auth(self.credential.token())
            .json(body)
            .send()
            .await
            .map_err(|source| HomeGraphError::Request {
                url: url.clone(),
                source,
            })?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(HomeGraphError::Status { url, status, body });
        }

        let bytes = res.bytes().await.map_err(|source| HomeGraphError::Request {
            url: url.clone(),
            source,
        })?;

        // An empty body is a valid acknowledgement
        if bytes.is_empty() {
            return Ok(Value::Object(Default::default()));
        }

        serde_json::from_slice(&bytes).map_err(|source| HomeGraphError::Decode { url, source })
    }
}

#[async_trait]
impl HomeGraph for HomeGraphClient {
    async fn report_state(&self, request: &ReportStateRequest) -> Result<(), HomeGraphError> {
        self.post("reportStateAndNotification", request).await?;

        Ok(())
    }

    async fn request_sync(&self, request: &RequestSyncRequest) -> Result<Value, HomeGraphError> {
        self.post("requestSync", request).await
    }
}
