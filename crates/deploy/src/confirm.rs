//! Confirmation waiter: polls the node until a deployment is mined.

use std::fmt;
use std::time::{Duration, Instant};

use alloy_core::primitives::{Address, B256};
use serde::Deserialize;

use crate::contract::ContractKind;
use crate::rpc::{self, RpcClient, RpcError};
use crate::submit::PendingDeployment;

/// Default interval between receipt polls.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Default ceiling on the whole confirmation wait.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Failure while waiting for a deployment to be mined.
#[derive(Debug, thiserror::Error)]
pub enum ConfirmError {
    /// The transaction was mined but reverted.
    #[error("transaction {tx_hash} reverted on chain")]
    Reverted { tx_hash: B256 },
    /// No receipt appeared within the configured window.
    #[error("timed out after {elapsed_secs}s waiting for transaction {tx_hash} to be mined")]
    Timeout { tx_hash: B256, elapsed_secs: u64 },
    /// The receipt is mined but carries no contract address.
    #[error("receipt for {tx_hash} has no deployed contract address")]
    NoContractAddress { tx_hash: B256 },
    /// Receipt polling failed at the RPC layer.
    #[error(transparent)]
    Rpc(#[from] RpcError),
}

/// The fields of a transaction receipt this tool cares about.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Receipt {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    contract_address: Option<Address>,
    #[serde(default)]
    block_number: Option<String>,
}

/// A mined, finalized deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployed {
    pub contract: ContractKind,
    pub address: Address,
    pub tx_hash: B256,
    pub block_number: Option<u64>,
}

// The single operator-facing outcome line.
impl fmt::Display for Deployed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Contract deployed:  {}",
            self.contract.label(),
            self.address
        )
    }
}

/// Interpret a receipt for a pending deployment.
///
/// `None` means the transaction is not mined yet; keep polling.
fn interpret_receipt(
    pending: &PendingDeployment,
    receipt: Option<Receipt>,
) -> Result<Option<Deployed>, ConfirmError> {
    let Some(receipt) = receipt else {
        return Ok(None);
    };

    if receipt.status.as_deref() == Some("0x0") {
        return Err(ConfirmError::Reverted {
            tx_hash: pending.tx_hash,
        });
    }

    let address = receipt
        .contract_address
        .ok_or(ConfirmError::NoContractAddress {
            tx_hash: pending.tx_hash,
        })?;

    Ok(Some(Deployed {
        contract: pending.contract,
        address,
        tx_hash: pending.tx_hash,
        block_number: receipt.block_number.as_deref().and_then(rpc::parse_hex_u64),
    }))
}

/// Waits for a broadcast deployment to reach finality.
///
/// Polls `eth_getTransactionReceipt` on a fixed interval until the node
/// reports the transaction mined, the transaction reverts, or the timeout
/// elapses. The wait is cooperative; the task yields between polls.
#[derive(Debug, Clone)]
pub struct ConfirmationWaiter {
    rpc: RpcClient,
    poll_interval: Duration,
    timeout: Duration,
}

impl ConfirmationWaiter {
    pub fn new(rpc: RpcClient) -> Self {
        Self {
            rpc,
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the interval between receipt polls.
    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Set the ceiling on the whole confirmation wait.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Block until the pending deployment is mined and final.
    pub async fn await_finality(
        &self,
        pending: PendingDeployment,
    ) -> Result<Deployed, ConfirmError> {
        let started = Instant::now();

        tracing::info!(
            contract = %pending.contract,
            tx_hash = %pending.tx_hash,
            "Waiting for deployment to be mined..."
        );

        loop {
            let receipt: Option<Receipt> = self
                .rpc
                .call(
                    "eth_getTransactionReceipt",
                    vec![serde_json::json!(pending.tx_hash)],
                )
                .await?;

            if let Some(deployed) = interpret_receipt(&pending, receipt)? {
                tracing::info!(
                    contract = %deployed.contract,
                    address = %deployed.address,
                    block_number = deployed.block_number,
                    "Deployment mined"
                );
                return Ok(deployed);
            }

            if started.elapsed() >= self.timeout {
                return Err(ConfirmError::Timeout {
                    tx_hash: pending.tx_hash,
                    elapsed_secs: started.elapsed().as_secs(),
                });
            }

            tracing::trace!(tx_hash = %pending.tx_hash, "No receipt yet, retrying...");
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending() -> PendingDeployment {
        PendingDeployment {
            contract: ContractKind::Dex,
            tx_hash: B256::repeat_byte(0x11),
        }
    }

    fn receipt(body: serde_json::Value) -> Receipt {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_no_receipt_keeps_polling() {
        let result = interpret_receipt(&pending(), None).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_successful_receipt() {
        let receipt = receipt(serde_json::json!({
            "status": "0x1",
            "contractAddress": "0x0496275d34753a48320ca58103d5220d394ff77f",
            "blockNumber": "0x10",
            "transactionHash": "0x1111111111111111111111111111111111111111111111111111111111111111"
        }));

        let deployed = interpret_receipt(&pending(), Some(receipt)).unwrap().unwrap();
        assert_eq!(deployed.contract, ContractKind::Dex);
        assert_eq!(
            deployed.address,
            "0x0496275d34753A48320CA58103d5220d394FF77F"
                .parse::<Address>()
                .unwrap()
        );
        assert_eq!(deployed.block_number, Some(16));
    }

    #[test]
    fn test_reverted_receipt() {
        let receipt = receipt(serde_json::json!({
            "status": "0x0",
            "contractAddress": null
        }));

        let err = interpret_receipt(&pending(), Some(receipt)).unwrap_err();
        assert!(matches!(err, ConfirmError::Reverted { .. }));
    }

    #[test]
    fn test_mined_receipt_without_contract_address() {
        let receipt = receipt(serde_json::json!({
            "status": "0x1",
            "contractAddress": null
        }));

        let err = interpret_receipt(&pending(), Some(receipt)).unwrap_err();
        assert!(matches!(err, ConfirmError::NoContractAddress { .. }));
    }

    #[test]
    fn test_pre_byzantium_receipt_without_status() {
        // Old nodes omit `status`; a contract address alone counts as mined.
        let receipt = receipt(serde_json::json!({
            "contractAddress": "0x0496275d34753a48320ca58103d5220d394ff77f"
        }));

        let deployed = interpret_receipt(&pending(), Some(receipt)).unwrap().unwrap();
        assert!(deployed.block_number.is_none());
    }

    #[test]
    fn test_outcome_line_format() {
        let deployed = Deployed {
            contract: ContractKind::Dex,
            address: "0x0496275d34753A48320CA58103d5220d394FF77F"
                .parse()
                .unwrap(),
            tx_hash: B256::repeat_byte(0x22),
            block_number: Some(1),
        };

        assert_eq!(
            deployed.to_string(),
            "FakeDex Contract deployed:  0x0496275d34753A48320CA58103d5220d394FF77F"
        );
    }

    #[test]
    fn test_outcome_line_labels() {
        let mut deployed = Deployed {
            contract: ContractKind::FlashLoan,
            address: Address::ZERO,
            tx_hash: B256::ZERO,
            block_number: None,
        };
        assert!(deployed.to_string().starts_with("Flash Loan Contract deployed:"));

        deployed.contract = ContractKind::FlashLoanArbitrage;
        assert!(
            deployed
                .to_string()
                .starts_with("Flash Loan Arbitrage Contract deployed:")
        );
    }
}
