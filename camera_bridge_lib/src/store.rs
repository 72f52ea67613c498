//! Realtime key-value store holding JSON values at slash separated paths.
//!
//! Every write is broadcast as a [`Change`] so that other parts of the bridge
//! can react to it, no matter who did the write.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{trace, warn};
use uuid::Uuid;

use crate::error::StoreError;

const CHANNEL_CAPACITY: usize = 128;

/// Path parameters captured by a [`PathPattern`].
pub type Params = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub path: String,
    pub before: Option<Value>,
    pub after: Option<Value>,
}

#[async_trait]
pub trait StateStore: Debug + Send + Sync {
    /// Returns `None` if nothing has been written to `path` yet.
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError>;
    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError>;
    /// Names of the direct children of `parent`, sorted.
    async fn children(&self, parent: &str) -> Result<Vec<String>, StoreError>;
    fn subscribe(&self) -> broadcast::Receiver<Change>;

    /// Store `value` under a freshly generated child of `parent` and return the generated id.
    async fn push(&self, parent: &str, value: Value) -> Result<String, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        self.set(&format!("{parent}/{id}"), value).await?;

        Ok(id)
    }

    fn on_change(&self, pattern: &str) -> Subscription {
        Subscription::new(PathPattern::new(pattern), self.subscribe())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A path with `{name}` placeholders, e.g. `devices/{deviceId}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn new(pattern: &str) -> Self {
        let segments = split(pattern)
            .map(|segment| {
                match segment
                    .strip_prefix('{')
                    .and_then(|segment| segment.strip_suffix('}'))
                {
                    Some(name) => Segment::Param(name.into()),
                    None => Segment::Literal(segment.into()),
                }
            })
            .collect();

        Self { segments }
    }

    pub fn matches(&self, path: &str) -> Option<Params> {
        let parts: Vec<_> = split(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = Params::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), part.into());
                }
            }
        }

        Some(params)
    }
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

fn normalize(path: &str) -> Result<String, StoreError> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() || trimmed.split('/').any(str::is_empty) {
        return Err(StoreError::InvalidPath(path.into()));
    }

    Ok(trimmed.into())
}

#[derive(Debug, Clone, PartialEq)]
pub enum Received {
    Change(Change, Params),
    /// The subscriber fell behind and this many changes were dropped
    Lagged(u64),
}

/// Stream of changes whose path matches a [`PathPattern`].
#[derive(Debug)]
pub struct Subscription {
    pattern: PathPattern,
    receiver: broadcast::Receiver<Change>,
}

impl Subscription {
    pub fn new(pattern: PathPattern, receiver: broadcast::Receiver<Change>) -> Self {
        Self { pattern, receiver }
    }

    /// Wait for the next matching change or lag, returns `None` once the store is gone.
    pub async fn recv(&mut self) -> Option<Received> {
        loop {
            match self.receiver.recv().await {
                Ok(change) => {
                    if let Some(params) = self.pattern.matches(&change.path) {
                        return Some(Received::Change(change, params));
                    }
                }
                Err(RecvError::Lagged(skipped)) => return Some(Received::Lagged(skipped)),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Like [`Subscription::recv`], but dropped changes are only logged.
    pub async fn next(&mut self) -> Option<(Change, Params)> {
        loop {
            match self.recv().await? {
                Received::Change(change, params) => return Some((change, params)),
                Received::Lagged(skipped) => {
                    warn!(skipped, "Subscriber fell behind, changes were dropped");
                }
            }
        }
    }
}

/// In-process [`StateStore`], cloning it gives another handle to the same data.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    values: Arc<RwLock<HashMap<String, Value>>>,
    tx: broadcast::Sender<Change>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_capacity(CHANNEL_CAPACITY)
    }

    /// `capacity` is the number of changes a subscriber can fall behind before it lags.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);

        Self {
            values: Default::default(),
            tx,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let path = normalize(path)?;

        Ok(self.values.read().await.get(&path).cloned())
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        let path = normalize(path)?;

        // The change is sent while holding the lock so that subscribers see writes in order
        let mut values = self.values.write().await;
        let before = values.insert(path.clone(), value.clone());
        trace!(path, "Stored value");

        // Not having any subscribers is fine
        self.tx
            .send(Change {
                path,
                before,
                after: Some(value),
            })
            .ok();

        Ok(())
    }

    async fn children(&self, parent: &str) -> Result<Vec<String>, StoreError> {
        let prefix = format!("{}/", normalize(parent)?);

        let values = self.values.read().await;
        let mut children: Vec<String> = values
            .keys()
            .filter_map(|path| path.strip_prefix(&prefix))
            .filter_map(|rest| rest.split('/').next())
            .map(str::to_owned)
            .collect();
        children.sort();
        children.dedup();

        Ok(children)
    }

    fn subscribe(&self) -> broadcast::Receiver<Change> {
        self.tx.subscribe()
    }
}
