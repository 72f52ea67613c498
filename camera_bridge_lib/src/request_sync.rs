use std::sync::Arc;

use google_home::home_graph::RequestSyncRequest;
use serde_json::Value;
use tracing::{error, info};

use crate::error::RequestSyncError;
use crate::home_graph::HomeGraph;

/// Asks the HomeGraph to send a new SYNC intent for the agent user.
#[derive(Debug, Clone)]
pub struct SyncRequester {
    agent_user_id: String,
    home_graph: Option<Arc<dyn HomeGraph>>,
}

impl SyncRequester {
    pub fn new(agent_user_id: &str, home_graph: Option<Arc<dyn HomeGraph>>) -> Self {
        Self {
            agent_user_id: agent_user_id.into(),
            home_graph,
        }
    }

    pub async fn request_sync(&self) -> Result<Value, RequestSyncError> {
        info!("Request SYNC for user {}", self.agent_user_id);

        let home_graph = self
            .home_graph
            .as_ref()
            .ok_or(RequestSyncError::Unavailable)?;

        let ack = home_graph
            .request_sync(&RequestSyncRequest::new(&self.agent_user_id))
            .await
            .inspect_err(|err| error!("Request sync failed: {err}"))?;

        info!("Request sync completed");

        Ok(ack)
    }
}
