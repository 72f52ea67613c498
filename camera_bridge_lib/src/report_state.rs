use std::sync::Arc;

use async_trait::async_trait;
use google_home::DeviceState;
use google_home::home_graph::ReportStateRequest;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::event::OnStateChange;
use crate::home_graph::HomeGraph;

/// Reports every device state change to the HomeGraph.
///
/// Reporting is best effort: failures are logged and never retried.
#[derive(Debug, Clone)]
pub struct StateReporter {
    agent_user_id: String,
    home_graph: Option<Arc<dyn HomeGraph>>,
}

impl StateReporter {
    /// Without a HomeGraph client (no service account key) reporting is disabled.
    pub fn new(agent_user_id: &str, home_graph: Option<Arc<dyn HomeGraph>>) -> Self {
        Self {
            agent_user_id: agent_user_id.into(),
            home_graph,
        }
    }

    pub fn is_active(&self) -> bool {
        self.home_graph.is_some()
    }

    pub async fn report(&self, device_id: &str, state: DeviceState) {
        let Some(home_graph) = &self.home_graph else {
            warn!(device_id, "Service account key is not configured, report state is unavailable");
            return;
        };

        let request_id = Uuid::new_v4().to_string();
        let mut request = ReportStateRequest::new(&request_id, &self.agent_user_id);
        request.add_state(device_id, state);

        match home_graph.report_state(&request).await {
            Ok(()) => debug!(request_id, device_id, on = state.on, "Reported state"),
            Err(err) => error!(request_id, device_id, "Failed to report state: {err}"),
        }
    }
}

#[async_trait]
impl OnStateChange for StateReporter {
    async fn on_state_change(&self, device_id: &str, state: DeviceState) {
        self.report(device_id, state).await;
    }
}
