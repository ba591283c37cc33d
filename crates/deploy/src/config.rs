//! Deployment configuration, loadable from `Flashkit.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use alloy_core::primitives::Address;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::contract::{ContractKind, DeployRequest};

/// The default name for the configuration file.
pub const CONFIG_FILENAME: &str = "Flashkit.toml";

/// `PoolAddressesProvider-Aave` of the Aave v3 testnet deployment.
///
/// Both flash-loan contracts take this address in their constructor; it is a
/// shared default that can be overridden per invocation.
/// <https://docs.aave.com/developers/deployed-contracts/v3-testnet-addresses>
pub const DEFAULT_POOL_ADDRESS_PROVIDER: &str = "0x0496275d34753A48320CA58103d5220d394FF77F";

fn default_artifacts_dir() -> PathBuf {
    PathBuf::from("artifacts")
}

fn default_outdata() -> PathBuf {
    PathBuf::from("data")
}

fn default_pool_provider() -> Address {
    DEFAULT_POOL_ADDRESS_PROVIDER
        .parse()
        .expect("default pool address provider should parse")
}

fn default_confirm_timeout() -> u64 {
    120
}

fn default_poll_interval() -> u64 {
    2
}

/// Configuration for one deployment run.
///
/// Serializes to/from TOML so a deployment setup can be captured in a
/// `Flashkit.toml` and replayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployConfig {
    /// JSON-RPC endpoint of the target network.
    pub rpc_url: String,
    /// Account the node signs deployment transactions with.
    pub sender: Address,
    /// Directory holding the compiled contract artifacts.
    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: PathBuf,
    /// Directory deployment records are written to.
    #[serde(default = "default_outdata")]
    pub outdata: PathBuf,
    /// Chain the node is expected to be on. Submission aborts on mismatch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_chain_id: Option<u64>,
    /// Aave `PoolAddressesProvider` passed to the flash-loan constructors.
    #[serde(default = "default_pool_provider")]
    pub pool_address_provider: Address,
    /// Fixed gas limit for the deployment transaction, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<u64>,
    /// Ceiling on the confirmation wait, in seconds.
    #[serde(default = "default_confirm_timeout")]
    pub confirm_timeout_secs: u64,
    /// Interval between receipt polls, in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

impl DeployConfig {
    /// Create a configuration with defaults for everything but the endpoint
    /// and sender.
    pub fn new(rpc_url: impl Into<String>, sender: Address) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            sender,
            artifacts_dir: default_artifacts_dir(),
            outdata: default_outdata(),
            expected_chain_id: None,
            pool_address_provider: default_pool_provider(),
            gas_limit: None,
            confirm_timeout_secs: default_confirm_timeout(),
            poll_interval_secs: default_poll_interval(),
        }
    }

    pub fn confirm_timeout(&self) -> Duration {
        Duration::from_secs(self.confirm_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Build the deployment request for a contract, wiring in the configured
    /// pool address provider where the constructor needs it.
    pub fn request_for(&self, contract: ContractKind) -> DeployRequest {
        match contract {
            ContractKind::Dex => DeployRequest::dex(),
            ContractKind::FlashLoan => DeployRequest::flash_loan(self.pool_address_provider),
            ContractKind::FlashLoanArbitrage => {
                DeployRequest::flash_loan_arbitrage(self.pool_address_provider)
            }
        }
    }

    /// Save the configuration to a TOML file.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).context("Failed to serialize deploy config to TOML")?;
        std::fs::write(path, content)
            .context(format!("Failed to write config to {}", path.display()))?;
        tracing::info!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    /// Load the configuration from a TOML file or a directory containing
    /// `Flashkit.toml`.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(anyhow::anyhow!(
                "Configuration file or directory not found: {}",
                path.display()
            ));
        }

        let config_path = if path.is_dir() {
            path.join(CONFIG_FILENAME)
        } else {
            path.to_path_buf()
        };

        let content = std::fs::read_to_string(&config_path)
            .context(format!("Failed to read config from {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).context("Failed to parse config file as TOML")?;
        tracing::info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }
}
