use std::{path::Path, time::Duration};

use godwoken_lib::types::Fee;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{PollConfig, SettlementPolicy, DEFAULT_REQUEST_TIMEOUT};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub rpc_url: Url,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub fee: FeeSettings,
    /// Account that collects transaction fees.
    #[serde(default)]
    pub block_producer_id: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PollingConfig {
    pub interval_secs: u64,
    pub timeout_secs: u64,
    pub settlement: SettlementPolicy,
}

impl Default for PollingConfig {
    fn default() -> Self {
        let defaults = PollConfig::default();
        Self {
            interval_secs: defaults.interval.as_secs(),
            timeout_secs: defaults.timeout.as_secs(),
            settlement: defaults.policy,
        }
    }
}

/// Fee paid for account creation, in the smallest unit of `sudt_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeeSettings {
    pub sudt_id: u32,
    pub amount: u128,
}

impl Default for FeeSettings {
    fn default() -> Self {
        Self {
            sudt_id: 1,
            amount: 2333,
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_secs()
}

impl ClientConfig {
    pub fn new(rpc_url: Url) -> Self {
        Self {
            rpc_url,
            request_timeout_secs: default_request_timeout_secs(),
            polling: PollingConfig::default(),
            fee: FeeSettings::default(),
            block_producer_id: 0,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            interval: Duration::from_secs(self.polling.interval_secs),
            timeout: Duration::from_secs(self.polling.timeout_secs),
            policy: self.polling.settlement,
        }
    }

    pub fn fee(&self) -> Fee {
        Fee::new(self.fee.sudt_id, self.fee.amount)
    }

    pub fn validate(&self) -> eyre::Result<()> {
        eyre::ensure!(
            self.polling.interval_secs > 0,
            "polling.interval_secs must be greater than zero"
        );
        Ok(())
    }
}

pub fn load_client_config(path: impl AsRef<Path>) -> eyre::Result<ClientConfig> {
    let contents = std::fs::read_to_string(path)?;
    let config: ClientConfig = toml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}
