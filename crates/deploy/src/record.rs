//! Deployment records persisted after each successful run.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use alloy_core::primitives::{Address, B256};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::confirm::Deployed;
use crate::contract::ContractKind;

/// On-disk record of a confirmed deployment.
///
/// Written to `<outdata>/deployments/<ArtifactName>.json`. Re-deploying the
/// same contract overwrites the record, since every run creates a fresh
/// instance at a fresh address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub contract: ContractKind,
    pub address: Address,
    pub tx_hash: B256,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    /// Unix timestamp of the confirmation.
    pub deployed_at: u64,
    /// Flashkit version that performed the deployment.
    pub flashkit_version: String,
}

impl DeploymentRecord {
    /// Create a record for a mined deployment.
    pub fn new(deployed: &Deployed, chain_id: Option<u64>) -> Self {
        Self {
            contract: deployed.contract,
            address: deployed.address,
            tx_hash: deployed.tx_hash,
            block_number: deployed.block_number,
            chain_id,
            deployed_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("System time should be after Unix epoch")
                .as_secs(),
            flashkit_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Path of the record for a contract under `outdata`.
    pub fn path_for(outdata: &Path, contract: ContractKind) -> PathBuf {
        outdata
            .join("deployments")
            .join(format!("{}.json", contract.artifact_name()))
    }

    /// Save this record under `outdata`, creating the directory as needed.
    pub fn save(&self, outdata: &Path) -> Result<PathBuf> {
        let path = Self::path_for(outdata, self.contract);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context(format!(
                "Failed to create deployments directory {}",
                parent.display()
            ))?;
        }

        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize deployment record")?;
        std::fs::write(&path, json).context(format!(
            "Failed to write deployment record to {}",
            path.display()
        ))?;

        tracing::info!(path = %path.display(), "Deployment record saved");
        Ok(path)
    }

    /// Load a record from a file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).context(format!(
            "Failed to read deployment record from {}",
            path.display()
        ))?;
        let record: Self =
            serde_json::from_str(&content).context("Failed to parse deployment record JSON")?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    fn deployed() -> Deployed {
        Deployed {
            contract: ContractKind::FlashLoan,
            address: "0x0496275d34753A48320CA58103d5220d394FF77F"
                .parse()
                .unwrap(),
            tx_hash: B256::repeat_byte(0x33),
            block_number: Some(42),
        }
    }

    #[test]
    fn test_path_for() {
        let path = DeploymentRecord::path_for(Path::new("/tmp/data"), ContractKind::FlashLoan);
        assert_eq!(path, PathBuf::from("/tmp/data/deployments/FlashLoan.json"));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new("record-test").unwrap();
        let record = DeploymentRecord::new(&deployed(), Some(11155111));

        let path = record.save(dir.path()).unwrap();
        let loaded = DeploymentRecord::load_from_file(&path).unwrap();

        assert_eq!(loaded, record);
        assert_eq!(loaded.chain_id, Some(11155111));
        assert_eq!(loaded.block_number, Some(42));
        assert_eq!(loaded.flashkit_version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_redeploy_overwrites_record() {
        let dir = TempDir::new("record-test").unwrap();

        let first = DeploymentRecord::new(&deployed(), None);
        first.save(dir.path()).unwrap();

        let mut second_deployed = deployed();
        second_deployed.address = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
            .parse()
            .unwrap();
        let second = DeploymentRecord::new(&second_deployed, None);
        let path = second.save(dir.path()).unwrap();

        let loaded = DeploymentRecord::load_from_file(&path).unwrap();
        assert_eq!(loaded.address, second_deployed.address);
    }

    #[test]
    fn test_load_corrupted_record() {
        let dir = TempDir::new("record-test").unwrap();
        let path = dir.path().join("FlashLoan.json");
        std::fs::write(&path, "{ invalid json }").unwrap();

        assert!(DeploymentRecord::load_from_file(&path).is_err());
    }
}
