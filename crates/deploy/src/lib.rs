//! flashkit-deploy - Deployment library for the flash-loan contract suite.
//!
//! This crate implements the one-shot deployment pipeline: resolve a compiled
//! contract artifact, broadcast the deployment transaction, wait for it to be
//! mined, and surface the deployed address. Each run deploys exactly one
//! contract and shares no state with any other run.

mod artifacts;
mod config;
mod confirm;
mod contract;
mod deployer;
mod record;
mod rpc;
mod submit;

pub use artifacts::{ArtifactStore, DeployableContract, ResolveError};
pub use config::{CONFIG_FILENAME, DEFAULT_POOL_ADDRESS_PROVIDER, DeployConfig};
pub use confirm::{ConfirmError, ConfirmationWaiter, Deployed};
pub use contract::{ConstructorArgs, ContractKind, DeployRequest, SchemaError};
pub use deployer::{AwaitFinality, DeployError, Deployer, ResolveContract, SubmitDeployment};
pub use record::DeploymentRecord;
pub use rpc::{RpcClient, RpcError};
pub use submit::{NetworkSubmitter, PendingDeployment, SubmitError};
