use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct HomeGraphConfig {
    #[serde(default = "default_home_graph_url")]
    pub url: String,
    #[serde(default = "default_credential")]
    pub credential: PathBuf,
    #[serde(default = "default_home_graph_timeout")]
    pub timeout_ms: u64,
}

impl HomeGraphConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for HomeGraphConfig {
    fn default() -> Self {
        Self {
            url: default_home_graph_url(),
            credential: default_credential(),
            timeout_ms: default_home_graph_timeout(),
        }
    }
}

fn default_home_graph_url() -> String {
    "https://homegraph.googleapis.com".into()
}

fn default_credential() -> PathBuf {
    "./key.json".into()
}

fn default_home_graph_timeout() -> u64 {
    10_000
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_timeout")]
    pub timeout_ms: u64,
}

impl StoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_store_timeout(),
        }
    }
}

fn default_store_timeout() -> u64 {
    5_000
}
