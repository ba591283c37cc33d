//! flashkit is a CLI tool that deploys the flash-loan contract suite to an
//! EVM network in one shot and prints the resulting address.

mod cli;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use cli::Cli;
use flashkit_deploy::{
    ArtifactStore, ConfirmationWaiter, DeployConfig, Deployer, DeploymentRecord, NetworkSubmitter,
    RpcClient,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize the logger.
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .init();

    // If a config file is provided, use it; otherwise build one from the CLI
    // arguments.
    let config = match &cli.config {
        Some(path) => DeployConfig::load_from_file(&PathBuf::from(path))?,
        None => cli.to_config()?,
    };

    let request = config.request_for(cli.contract);

    tracing::info!(
        contract = %cli.contract,
        rpc_url = %config.rpc_url,
        sender = %config.sender,
        "Starting deployment..."
    );

    let rpc = RpcClient::new(&config.rpc_url)?;

    let mut submitter = NetworkSubmitter::new(rpc.clone(), config.sender);
    if let Some(chain_id) = config.expected_chain_id {
        submitter = submitter.expected_chain_id(chain_id);
    }
    if let Some(gas_limit) = config.gas_limit {
        submitter = submitter.gas_limit(gas_limit);
    }

    let waiter = ConfirmationWaiter::new(rpc)
        .poll_interval(config.poll_interval())
        .timeout(config.confirm_timeout());

    let deployer = Deployer::new(
        ArtifactStore::new(&config.artifacts_dir),
        submitter,
        waiter,
    );

    let deployed = deployer.deploy(request).await?;

    // The contract is live even if the record write fails.
    let record = DeploymentRecord::new(&deployed, config.expected_chain_id);
    if let Err(e) = record.save(&config.outdata) {
        tracing::warn!(error = ?e, "Failed to write deployment record");
    }

    println!("{deployed}");

    Ok(())
}
