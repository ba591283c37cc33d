//! Deployment orchestration: resolve, submit, confirm.

use std::future::Future;

use alloy_core::primitives::Bytes;

use crate::artifacts::{ArtifactStore, DeployableContract, ResolveError};
use crate::confirm::{ConfirmError, ConfirmationWaiter, Deployed};
use crate::contract::{ContractKind, DeployRequest};
use crate::submit::{NetworkSubmitter, PendingDeployment, SubmitError};

/// Resolves a contract to its deployable bytecode.
pub trait ResolveContract {
    fn resolve(&self, contract: ContractKind) -> Result<DeployableContract, ResolveError>;
}

/// Broadcasts a deployment transaction, returning a pending handle.
pub trait SubmitDeployment {
    fn submit(
        &self,
        contract: ContractKind,
        init_code: Bytes,
    ) -> impl Future<Output = Result<PendingDeployment, SubmitError>> + Send;
}

/// Blocks until a broadcast deployment is mined and final.
pub trait AwaitFinality {
    fn await_finality(
        &self,
        pending: PendingDeployment,
    ) -> impl Future<Output = Result<Deployed, ConfirmError>> + Send;
}

impl ResolveContract for ArtifactStore {
    fn resolve(&self, contract: ContractKind) -> Result<DeployableContract, ResolveError> {
        ArtifactStore::resolve(self, contract)
    }
}

impl SubmitDeployment for NetworkSubmitter {
    async fn submit(
        &self,
        contract: ContractKind,
        init_code: Bytes,
    ) -> Result<PendingDeployment, SubmitError> {
        NetworkSubmitter::submit(self, contract, init_code).await
    }
}

impl AwaitFinality for ConfirmationWaiter {
    async fn await_finality(&self, pending: PendingDeployment) -> Result<Deployed, ConfirmError> {
        ConfirmationWaiter::await_finality(self, pending).await
    }
}

/// A deployment failure, tagged with the step that produced it.
///
/// The step error propagates unchanged; this layer only attaches which
/// contract was being deployed.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("failed to resolve {contract}")]
    Resolution {
        contract: ContractKind,
        #[source]
        source: ResolveError,
    },
    #[error("failed to submit deployment of {contract}")]
    Submission {
        contract: ContractKind,
        #[source]
        source: SubmitError,
    },
    #[error("failed to confirm deployment of {contract}")]
    Confirmation {
        contract: ContractKind,
        #[source]
        source: ConfirmError,
    },
}

impl DeployError {
    /// The contract the failed invocation was deploying.
    pub fn contract(&self) -> ContractKind {
        match self {
            DeployError::Resolution { contract, .. }
            | DeployError::Submission { contract, .. }
            | DeployError::Confirmation { contract, .. } => *contract,
        }
    }
}

/// One-shot deployment orchestrator.
///
/// Composes the three collaborators and runs them strictly in order:
/// resolve, submit, confirm. The first failure aborts the remaining steps;
/// there is no retry path at this layer. Each invocation is independent and
/// owns its request for its whole lifetime.
#[derive(Debug, Clone)]
pub struct Deployer<R, S, W> {
    resolver: R,
    submitter: S,
    waiter: W,
}

impl<R, S, W> Deployer<R, S, W>
where
    R: ResolveContract,
    S: SubmitDeployment,
    W: AwaitFinality,
{
    pub fn new(resolver: R, submitter: S, waiter: W) -> Self {
        Self {
            resolver,
            submitter,
            waiter,
        }
    }

    /// Deploy one contract, returning the mined deployment or the error of
    /// the step that failed.
    pub async fn deploy(&self, request: DeployRequest) -> Result<Deployed, DeployError> {
        let contract = request.contract;

        tracing::info!(
            contract = %contract,
            artifact = contract.artifact_name(),
            "Resolving contract artifact..."
        );
        let deployable = self
            .resolver
            .resolve(contract)
            .map_err(|source| DeployError::Resolution { contract, source })?;

        let init_code = deployable.init_code(&request.args);
        let pending = self
            .submitter
            .submit(contract, init_code)
            .await
            .map_err(|source| DeployError::Submission { contract, source })?;

        let deployed = self
            .waiter
            .await_finality(pending)
            .await
            .map_err(|source| DeployError::Confirmation { contract, source })?;

        tracing::info!(
            contract = %contract,
            address = %deployed.address,
            tx_hash = %deployed.tx_hash,
            "Deployment confirmed"
        );

        Ok(deployed)
    }
}
