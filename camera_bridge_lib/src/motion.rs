//! Turns new motion log entries into push notifications.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::event::OnMotion;

pub const MOTION_LOGS: &str = "motion-logs";
pub const MOTION_LOG_PATTERN: &str = "motion-logs/{id}";
pub const MOTION_TOPIC: &str = "motions";

pub type PushError = Box<dyn std::error::Error + Send + Sync>;

/// Entry written by the camera whenever it detects motion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotionLog {
    pub image_ref: String,
    /// Milliseconds since the unix epoch
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MotionAlert {
    topic: String,
    title: String,
    body: String,
    image_ref: String,
    timestamp: String,
}

impl MotionAlert {
    pub fn new(log: &MotionLog) -> Self {
        Self {
            topic: MOTION_TOPIC.into(),
            title: "Motion Alert!".into(),
            body: "A motion has been detected".into(),
            image_ref: log.image_ref.clone(),
            timestamp: log.timestamp.to_string(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

/// Delivers push notifications.
#[async_trait]
pub trait PushSender: Debug + Send + Sync {
    async fn send(&self, alert: &MotionAlert) -> Result<(), PushError>;
}

/// [`PushSender`] that only logs the alert.
#[derive(Debug, Clone, Default)]
pub struct LogPushSender;

#[async_trait]
impl PushSender for LogPushSender {
    async fn send(&self, alert: &MotionAlert) -> Result<(), PushError> {
        info!(
            topic = alert.topic,
            title = alert.title,
            image_ref = alert.image_ref,
            timestamp = alert.timestamp,
            "{}",
            alert.body
        );

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct MotionNotifier {
    sender: Arc<dyn PushSender>,
}

impl MotionNotifier {
    pub fn new(sender: Arc<dyn PushSender>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl OnMotion for MotionNotifier {
    async fn on_motion(&self, id: &str, log: &MotionLog) {
        let alert = MotionAlert::new(log);

        match self.sender.send(&alert).await {
            Ok(()) => info!(id, topic = alert.topic(), "Successfully sent motion alert"),
            Err(err) => error!(id, "Error sending motion alert: {err}"),
        }
    }
}
