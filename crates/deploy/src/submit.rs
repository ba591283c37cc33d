//! Deployment transaction submission.

use alloy_core::primitives::{Address, B256, Bytes};
use serde_json::{Value, json};

use crate::contract::ContractKind;
use crate::rpc::{self, RpcClient, RpcError};

/// Failure to broadcast a deployment transaction.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The node reports a different chain than the one configured.
    #[error("node is on chain {actual}, expected chain {expected}")]
    ChainIdMismatch { expected: u64, actual: u64 },
    /// The node's chain id could not be read or parsed.
    #[error("could not read the node's chain id")]
    ChainIdUnreadable(#[source] RpcError),
    /// The node returned a chain id that is not a hex quantity.
    #[error("node returned an unparseable chain id: {0}")]
    BadChainId(String),
    /// Broadcast failed: signing, funding, gas estimation, or connectivity.
    #[error(transparent)]
    Rpc(#[from] RpcError),
}

/// A broadcast, not-yet-mined deployment transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDeployment {
    pub contract: ContractKind,
    pub tx_hash: B256,
}

/// Submits deployment transactions through a node-managed account.
///
/// Signing is delegated to the node: the transaction is sent with
/// `eth_sendTransaction` from `sender`, an account the node controls. Gas
/// estimation is left to the node unless a fixed limit is configured.
#[derive(Debug, Clone)]
pub struct NetworkSubmitter {
    rpc: RpcClient,
    sender: Address,
    expected_chain_id: Option<u64>,
    gas_limit: Option<u64>,
}

impl NetworkSubmitter {
    pub fn new(rpc: RpcClient, sender: Address) -> Self {
        Self {
            rpc,
            sender,
            expected_chain_id: None,
            gas_limit: None,
        }
    }

    /// Abort submission unless the node reports this chain id.
    pub fn expected_chain_id(mut self, chain_id: u64) -> Self {
        self.expected_chain_id = Some(chain_id);
        self
    }

    /// Use a fixed gas limit instead of the node's estimate.
    pub fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    /// The deployment transaction object: contract creation (no `to` field)
    /// carrying the init code as calldata.
    fn build_deploy_tx(&self, init_code: &Bytes) -> Value {
        let mut tx = json!({
            "from": self.sender,
            "data": init_code,
        });
        if let Some(gas_limit) = self.gas_limit {
            tx["gas"] = json!(format!("0x{gas_limit:x}"));
        }
        tx
    }

    /// Verify the node is on the expected chain, then broadcast the
    /// deployment transaction.
    pub async fn submit(
        &self,
        contract: ContractKind,
        init_code: Bytes,
    ) -> Result<PendingDeployment, SubmitError> {
        if let Some(expected) = self.expected_chain_id {
            let raw: String = self
                .rpc
                .call("eth_chainId", vec![])
                .await
                .map_err(SubmitError::ChainIdUnreadable)?;
            let actual = rpc::parse_hex_u64(&raw).ok_or_else(|| SubmitError::BadChainId(raw))?;
            if actual != expected {
                return Err(SubmitError::ChainIdMismatch { expected, actual });
            }
        }

        tracing::info!(
            contract = %contract,
            from = %self.sender,
            init_code_len = init_code.len(),
            "Broadcasting deployment transaction..."
        );

        let tx = self.build_deploy_tx(&init_code);
        let tx_hash: B256 = self.rpc.call("eth_sendTransaction", vec![tx]).await?;

        tracing::info!(contract = %contract, tx_hash = %tx_hash, "Deployment transaction sent");

        Ok(PendingDeployment { contract, tx_hash })
    }
}
