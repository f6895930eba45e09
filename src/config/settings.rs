use std::time::Duration;

use serde::Deserialize;

use crate::client::retry::RetryPolicy;

/// Top-level configuration settings for the application.
///
/// Includes settings for the client and for the reference broker.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub client: ClientSettings,
    pub broker: BrokerSettings,
}

/// Connection and pump-loop settings for a client.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Name of the client's queue on the broker.
    pub name: String,
    pub host: String,
    pub port: u16,
    /// Bound on connect, read and write calls made by the pump loops.
    pub io_timeout_ms: u64,
    /// Pause between polls that found the queue empty.
    pub poll_interval_ms: u64,
    pub retry_base_ms: u64,
    pub retry_max_ms: u64,
    /// Consecutive connect failures after which the puller reports an
    /// outage. Unset means never.
    pub retry_max_attempts: Option<u32>,
}

impl ClientSettings {
    /// Settings for `name` at `host:port`, everything else defaulted.
    pub fn new(name: &str, host: &str, port: u16) -> Self {
        Self {
            name: name.to_string(),
            host: host.to_string(),
            port,
            ..Self::default()
        }
    }

    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            base: Duration::from_millis(self.retry_base_ms),
            max: Duration::from_millis(self.retry_max_ms),
            max_attempts: self.retry_max_attempts,
        }
    }
}

/// Configuration settings for the reference broker.
///
/// Defines the host and port the broker will bind to.
#[derive(Debug, Deserialize, Clone)]
pub struct BrokerSettings {
    pub host: String,
    pub port: u16,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub client: Option<PartialClientSettings>,
    pub broker: Option<PartialBrokerSettings>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PartialClientSettings {
    pub name: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub io_timeout_ms: Option<u64>,
    pub poll_interval_ms: Option<u64>,
    pub retry_base_ms: Option<u64>,
    pub retry_max_ms: Option<u64>,
    pub retry_max_attempts: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PartialBrokerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl PartialSettings {
    /// Fills every missing value from `default`.
    pub fn merge(self, default: Settings) -> Settings {
        let client = self.client.unwrap_or_default();
        let broker = self.broker.unwrap_or_default();
        let dc = default.client;
        let db = default.broker;

        Settings {
            client: ClientSettings {
                name: client.name.unwrap_or(dc.name),
                host: client.host.unwrap_or(dc.host),
                port: client.port.unwrap_or(dc.port),
                io_timeout_ms: client.io_timeout_ms.unwrap_or(dc.io_timeout_ms),
                poll_interval_ms: client.poll_interval_ms.unwrap_or(dc.poll_interval_ms),
                retry_base_ms: client.retry_base_ms.unwrap_or(dc.retry_base_ms),
                retry_max_ms: client.retry_max_ms.unwrap_or(dc.retry_max_ms),
                retry_max_attempts: client.retry_max_attempts.or(dc.retry_max_attempts),
            },
            broker: BrokerSettings {
                host: broker.host.unwrap_or(db.host),
                port: broker.port.unwrap_or(db.port),
            },
        }
    }
}

/// The login name when one is set, otherwise a fresh `client-<uuid>`.
fn default_client_name() -> String {
    std::env::var("USER")
        .ok()
        .filter(|user| !user.is_empty())
        .unwrap_or_else(|| format!("client-{}", uuid::Uuid::new_v4()))
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            name: default_client_name(),
            host: "localhost".to_string(),
            port: 9620,
            io_timeout_ms: 5_000,
            poll_interval_ms: 50,
            retry_base_ms: 100,
            retry_max_ms: 5_000,
            retry_max_attempts: None,
        }
    }
}

/// Provides default values for `Settings`.
///
/// Ensures the application has sensible defaults if no configuration is provided.
impl Default for Settings {
    fn default() -> Self {
        Self {
            client: ClientSettings::default(),
            broker: BrokerSettings {
                host: "127.0.0.1".to_string(),
                port: 9620,
            },
        }
    }
}
