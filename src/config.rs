use std::net::{Ipv4Addr, SocketAddr};

use ::config::{ConfigError, Environment, File, FileFormat};
use camera_bridge_lib::config::{HomeGraphConfig, StoreConfig};
use serde::Deserialize;

use crate::secret::EnvironmentSecretFile;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fulfillment: FulfillmentConfig,
    /// Fixed upstream user all devices belong to
    #[serde(default = "default_agent_user_id")]
    pub agent_user_id: String,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub home_graph: HomeGraphConfig,
}

impl Config {
    /// Load the config from an optional toml file, overridden by the environment.
    pub fn build(file: &str) -> Result<Self, ConfigError> {
        ::config::Config::builder()
            .add_source(File::new(file, FileFormat::Toml).required(false))
            .add_source(
                Environment::default()
                    .prefix(std::env!("CARGO_PKG_NAME"))
                    .separator("__")
                    .try_parsing(true),
            )
            .add_source(EnvironmentSecretFile::default())
            .build()?
            .try_deserialize()
    }
}

fn default_agent_user_id() -> String {
    "123".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct FulfillmentConfig {
    #[serde(default = "default_fulfillment_ip")]
    pub ip: Ipv4Addr,
    #[serde(default = "default_fulfillment_port")]
    pub port: u16,
}

impl Default for FulfillmentConfig {
    fn default() -> Self {
        Self {
            ip: default_fulfillment_ip(),
            port: default_fulfillment_port(),
        }
    }
}

impl From<FulfillmentConfig> for SocketAddr {
    fn from(fulfillment: FulfillmentConfig) -> Self {
        (fulfillment.ip, fulfillment.port).into()
    }
}

fn default_fulfillment_ip() -> Ipv4Addr {
    [0, 0, 0, 0].into()
}

fn default_fulfillment_port() -> u16 {
    7878
}
