use anyhow::{Context, Result};
use clap::Parser;
use flashkit_deploy::{ContractKind, DEFAULT_POOL_ADDRESS_PROVIDER, DeployConfig};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "flashkit")]
#[command(
    author,
    version,
    about = "Deploy the flash-loan contract suite to an EVM network"
)]
pub struct Cli {
    /// The contract to deploy: dex, flash-loan, or flash-loan-arbitrage.
    pub contract: ContractKind,

    /// The verbosity level.
    #[arg(short, long, env = "FLASHKIT_VERBOSITY", default_value_t = LevelFilter::INFO)]
    pub verbosity: LevelFilter,

    /// The URL of the JSON-RPC endpoint deployments are sent to.
    #[arg(long, alias = "rpc", env = "FLASHKIT_RPC_URL", default_value = "http://localhost:8545")]
    pub rpc_url: String,

    /// The account the node signs the deployment transaction with.
    ///
    /// Required unless a configuration file is provided.
    #[arg(long, env = "FLASHKIT_SENDER")]
    pub sender: Option<String>,

    /// Directory holding the compiled contract artifacts.
    #[arg(long, env = "FLASHKIT_ARTIFACTS", default_value = "artifacts")]
    pub artifacts: String,

    /// The path to the output data directory for deployment records.
    #[arg(long, env = "FLASHKIT_OUTDATA", default_value = "data")]
    pub outdata: String,

    /// Address of the Aave pool address provider passed to the flash-loan
    /// constructors.
    #[arg(long, env = "FLASHKIT_POOL_PROVIDER", default_value = DEFAULT_POOL_ADDRESS_PROVIDER)]
    pub pool_provider: String,

    /// Chain ID the target node is expected to report.
    /// If not provided, the check is skipped.
    #[arg(long, env = "FLASHKIT_CHAIN_ID")]
    pub chain_id: Option<u64>,

    /// Fixed gas limit for the deployment transaction.
    /// If not provided, the node estimates gas.
    #[arg(long, env = "FLASHKIT_GAS_LIMIT")]
    pub gas_limit: Option<u64>,

    /// Maximum time to wait for the deployment to be mined, in seconds.
    #[arg(long, env = "FLASHKIT_CONFIRM_TIMEOUT", default_value_t = 120)]
    pub confirm_timeout: u64,

    /// Path to an existing Flashkit.toml configuration file to load.
    ///
    /// When provided, the deployment uses the configuration from this file
    /// instead of the CLI arguments above.
    #[arg(long, alias = "conf", env = "FLASHKIT_CONFIG")]
    pub config: Option<String>,
}

impl Cli {
    /// Build a deployment configuration from the CLI arguments.
    pub fn to_config(&self) -> Result<DeployConfig> {
        let sender = self
            .sender
            .as_deref()
            .context("--sender is required when no config file is provided")?
            .parse()
            .context("Invalid sender address")?;

        let mut config = DeployConfig::new(&self.rpc_url, sender);
        config.artifacts_dir = self.artifacts.clone().into();
        config.outdata = self.outdata.clone().into();
        config.pool_address_provider = self
            .pool_provider
            .parse()
            .context("Invalid pool address provider")?;
        config.expected_chain_id = self.chain_id;
        config.gas_limit = self.gas_limit;
        config.confirm_timeout_secs = self.confirm_timeout;

        Ok(config)
    }
}
