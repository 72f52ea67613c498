use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use google_home::{DeviceState, DeviceStates, StateError};
use tokio::time;
use tracing::trace;

use crate::error::StoreError;
use crate::store::StateStore;

pub const DEVICES: &str = "devices";
/// Pattern of the paths device states are stored at.
pub const DEVICE_PATTERN: &str = "devices/{deviceId}";
pub const DEVICE_ID_PARAM: &str = "deviceId";

pub fn device_path(id: &str) -> String {
    format!("{DEVICES}/{id}")
}

/// Exposes the device states kept in a [`StateStore`] to the fulfillment.
///
/// Every store operation is bounded by `timeout`.
#[derive(Debug, Clone)]
pub struct DeviceStateStore {
    store: Arc<dyn StateStore>,
    timeout: Duration,
}

impl DeviceStateStore {
    pub fn new(store: Arc<dyn StateStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }
}

#[async_trait]
impl DeviceStates for DeviceStateStore {
    async fn state(&self, id: &str) -> Result<DeviceState, StateError> {
        let path = device_path(id);

        let value = time::timeout(self.timeout, self.store.get(&path))
            .await
            .map_err(|_| StoreError::ReadTimeout {
                path: path.clone(),
                timeout: self.timeout,
            })??;

        let Some(value) = value else {
            trace!(id, "No state stored yet, using default");
            return Ok(DeviceState::default());
        };

        let state =
            serde_json::from_value(value).map_err(|source| StoreError::Malformed { path, source })?;

        Ok(state)
    }

    async fn set_on(&self, id: &str, on: bool) -> Result<(), StateError> {
        let path = device_path(id);
        let value = serde_json::to_value(DeviceState::new(on)).map_err(|source| {
            StoreError::Malformed {
                path: path.clone(),
                source,
            }
        })?;

        time::timeout(self.timeout, self.store.set(&path, value))
            .await
            .map_err(|_| StoreError::WriteTimeout {
                path,
                timeout: self.timeout,
            })??;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use tokio::sync::broadcast;

    use super::*;
    use crate::store::{Change, MemoryStore};

    fn states(store: &MemoryStore) -> DeviceStateStore {
        DeviceStateStore::new(Arc::new(store.clone()), Duration::from_secs(1))
    }

    #[tokio::test]
    async fn default_state() {
        let store = MemoryStore::new();

        assert_eq!(
            states(&store).state("1").await.unwrap(),
            DeviceState::new(false)
        );
    }

    #[tokio::test]
    async fn write_then_read() {
        let store = MemoryStore::new();
        let states = states(&store);

        states.set_on("1", true).await.unwrap();
        assert_eq!(states.state("1").await.unwrap(), DeviceState::new(true));
        assert_eq!(
            store.get("devices/1").await.unwrap(),
            Some(json!({ "on": true }))
        );

        states.set_on("1", false).await.unwrap();
        assert_eq!(states.state("1").await.unwrap(), DeviceState::new(false));
    }

    #[tokio::test]
    async fn malformed_state() {
        let store = MemoryStore::new();
        store.set("devices/1", json!("on")).await.unwrap();

        assert!(states(&store).state("1").await.is_err());
    }

    /// A store that never answers
    #[derive(Debug)]
    struct StuckStore(broadcast::Sender<Change>);

    #[async_trait]
    impl StateStore for StuckStore {
        async fn get(&self, _path: &str) -> Result<Option<Value>, StoreError> {
            std::future::pending().await
        }

        async fn set(&self, _path: &str, _value: Value) -> Result<(), StoreError> {
            std::future::pending().await
        }

        async fn children(&self, _parent: &str) -> Result<Vec<String>, StoreError> {
            std::future::pending().await
        }

        fn subscribe(&self) -> broadcast::Receiver<Change> {
            self.0.subscribe()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn timeout() {
        let (tx, _) = broadcast::channel(1);
        let states = DeviceStateStore::new(Arc::new(StuckStore(tx)), Duration::from_secs(5));

        let err = states.state("1").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Timed out after 5s while reading 'devices/1'"
        );

        let err = states.set_on("1", true).await.unwrap_err();
        assert_eq!(err.to_string(), "Timed out after 5s while writing 'devices/1'");
    }
}
