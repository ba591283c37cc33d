//! Compiled-artifact resolution: a contract kind becomes deployable bytecode.

use std::path::PathBuf;

use alloy_core::primitives::Bytes;
use serde::Deserialize;

use crate::contract::{ConstructorArgs, ContractKind};

/// Compiled contract artifact as emitted by the build tool.
///
/// Only the creation bytecode is needed here; the ABI and metadata fields are
/// ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Artifact {
    #[serde(default)]
    bytecode: Option<String>,
}

/// Failure to resolve a contract to deployable bytecode.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// No artifact file for the contract. Usually means it was never compiled.
    #[error("artifact for {contract} not found at {path} (is the contract compiled?)")]
    NotCompiled {
        contract: ContractKind,
        path: PathBuf,
    },
    /// The artifact file exists but could not be read.
    #[error("failed to read artifact {path}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The artifact file is not valid artifact JSON.
    #[error("artifact {path} is not valid artifact JSON")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The artifact carries no creation bytecode (interface or abstract contract).
    #[error("artifact for {contract} has no creation bytecode")]
    NoBytecode { contract: ContractKind },
    /// The bytecode field is not valid hex.
    #[error("artifact for {contract} has invalid bytecode hex")]
    BadBytecode {
        contract: ContractKind,
        #[source]
        source: hex::FromHexError,
    },
}

/// Resolves contract kinds against a directory of compiled artifacts.
///
/// The store expects one `<ArtifactName>.json` file per contract under its
/// root, the layout the build pipeline writes.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the artifact file for a contract.
    pub fn artifact_path(&self, contract: ContractKind) -> PathBuf {
        self.root.join(format!("{}.json", contract.artifact_name()))
    }

    /// Resolve a contract to its deployable bytecode.
    pub fn resolve(&self, contract: ContractKind) -> Result<DeployableContract, ResolveError> {
        let path = self.artifact_path(contract);
        if !path.exists() {
            return Err(ResolveError::NotCompiled { contract, path });
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ResolveError::Unreadable {
            path: path.clone(),
            source,
        })?;
        let artifact: Artifact =
            serde_json::from_str(&content).map_err(|source| ResolveError::Malformed {
                path: path.clone(),
                source,
            })?;

        let raw = artifact.bytecode.unwrap_or_default();
        let raw = raw.trim_start_matches("0x");
        if raw.is_empty() {
            return Err(ResolveError::NoBytecode { contract });
        }

        let bytecode =
            hex::decode(raw).map_err(|source| ResolveError::BadBytecode { contract, source })?;

        tracing::debug!(
            contract = %contract,
            path = %path.display(),
            bytecode_len = bytecode.len(),
            "Resolved contract artifact"
        );

        Ok(DeployableContract {
            contract,
            bytecode: Bytes::from(bytecode),
        })
    }
}

/// A deployable handle: creation bytecode bound to a contract kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployableContract {
    pub contract: ContractKind,
    pub bytecode: Bytes,
}

impl DeployableContract {
    /// Creation payload: bytecode followed by the ABI-encoded constructor
    /// arguments.
    pub fn init_code(&self, args: &ConstructorArgs) -> Bytes {
        let mut code = self.bytecode.to_vec();
        code.extend_from_slice(&args.abi_encode());
        Bytes::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_core::primitives::Address;
    use std::path::Path;
    use tempdir::TempDir;

    fn write_artifact(dir: &Path, name: &str, body: &serde_json::Value) {
        std::fs::write(
            dir.join(format!("{}.json", name)),
            serde_json::to_string_pretty(body).unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn test_resolve_success() {
        let dir = TempDir::new("artifacts-test").unwrap();
        write_artifact(
            dir.path(),
            "Dex",
            &serde_json::json!({
                "contractName": "Dex",
                "abi": [],
                "bytecode": "0x6080604052"
            }),
        );

        let store = ArtifactStore::new(dir.path());
        let deployable = store.resolve(ContractKind::Dex).unwrap();

        assert_eq!(deployable.contract, ContractKind::Dex);
        assert_eq!(
            deployable.bytecode.as_ref(),
            &[0x60, 0x80, 0x60, 0x40, 0x52]
        );
    }

    #[test]
    fn test_resolve_missing_artifact() {
        let dir = TempDir::new("artifacts-test").unwrap();
        let store = ArtifactStore::new(dir.path());

        let err = store.resolve(ContractKind::FlashLoan).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::NotCompiled {
                contract: ContractKind::FlashLoan,
                ..
            }
        ));
    }

    #[test]
    fn test_resolve_malformed_json() {
        let dir = TempDir::new("artifacts-test").unwrap();
        std::fs::write(dir.path().join("Dex.json"), "{ not json }").unwrap();

        let store = ArtifactStore::new(dir.path());
        let err = store.resolve(ContractKind::Dex).unwrap_err();
        assert!(matches!(err, ResolveError::Malformed { .. }));
    }

    #[test]
    fn test_resolve_missing_bytecode() {
        let dir = TempDir::new("artifacts-test").unwrap();
        write_artifact(
            dir.path(),
            "Dex",
            &serde_json::json!({ "contractName": "Dex", "abi": [] }),
        );

        let store = ArtifactStore::new(dir.path());
        let err = store.resolve(ContractKind::Dex).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::NoBytecode {
                contract: ContractKind::Dex
            }
        ));
    }

    #[test]
    fn test_resolve_empty_bytecode() {
        let dir = TempDir::new("artifacts-test").unwrap();
        write_artifact(
            dir.path(),
            "Dex",
            &serde_json::json!({ "contractName": "Dex", "abi": [], "bytecode": "0x" }),
        );

        let store = ArtifactStore::new(dir.path());
        let err = store.resolve(ContractKind::Dex).unwrap_err();
        assert!(matches!(err, ResolveError::NoBytecode { .. }));
    }

    #[test]
    fn test_resolve_bad_hex() {
        let dir = TempDir::new("artifacts-test").unwrap();
        write_artifact(
            dir.path(),
            "Dex",
            &serde_json::json!({ "contractName": "Dex", "abi": [], "bytecode": "0xzzzz" }),
        );

        let store = ArtifactStore::new(dir.path());
        let err = store.resolve(ContractKind::Dex).unwrap_err();
        assert!(matches!(err, ResolveError::BadBytecode { .. }));
    }

    #[test]
    fn test_init_code_appends_constructor_args() {
        let deployable = DeployableContract {
            contract: ContractKind::FlashLoan,
            bytecode: Bytes::from(vec![0x60, 0x80]),
        };

        let provider: Address = "0x0496275d34753A48320CA58103d5220d394FF77F"
            .parse()
            .unwrap();
        let init_code = deployable.init_code(&ConstructorArgs::PoolAddressProvider(provider));

        assert_eq!(init_code.len(), 2 + 32);
        assert_eq!(&init_code[..2], &[0x60, 0x80]);
        assert_eq!(&init_code[14..], provider.as_slice());
    }

    #[test]
    fn test_init_code_without_args() {
        let deployable = DeployableContract {
            contract: ContractKind::Dex,
            bytecode: Bytes::from(vec![0x60, 0x80]),
        };

        let init_code = deployable.init_code(&ConstructorArgs::Empty);
        assert_eq!(init_code, deployable.bytecode);
    }
}
