//! Typed catalog of deployable contracts and their constructor schemas.

use alloy_core::primitives::Address;
use serde::{Deserialize, Serialize};

/// The closed set of contracts this tool knows how to deploy.
///
/// Artifact lookup happens by variant, never by free-form string, so an
/// unknown contract name is rejected when arguments are parsed instead of
/// surfacing as a missing-artifact failure mid-deployment.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ContractKind {
    /// Token/DEX stand-in used to exercise the arbitrage path.
    Dex,
    /// Flash-loan executor borrowing from the Aave v3 pool.
    FlashLoan,
    /// Flash-loan arbitrage executor.
    FlashLoanArbitrage,
}

impl ContractKind {
    /// Name of the compiled artifact this contract resolves to.
    pub fn artifact_name(&self) -> &'static str {
        match self {
            ContractKind::Dex => "Dex",
            ContractKind::FlashLoan => "FlashLoan",
            ContractKind::FlashLoanArbitrage => "FlashLoanArbitrage",
        }
    }

    /// Operator-facing label used in the deployment outcome line.
    pub fn label(&self) -> &'static str {
        match self {
            ContractKind::Dex => "FakeDex",
            ContractKind::FlashLoan => "Flash Loan",
            ContractKind::FlashLoanArbitrage => "Flash Loan Arbitrage",
        }
    }

    /// Whether this contract's constructor takes the pool address provider.
    pub fn takes_pool_provider(&self) -> bool {
        matches!(
            self,
            ContractKind::FlashLoan | ContractKind::FlashLoanArbitrage
        )
    }
}

/// Constructor arguments for a deployment.
///
/// Each contract accepts exactly one of these shapes; [`DeployRequest::new`]
/// rejects a mismatch before anything touches the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructorArgs {
    /// No constructor arguments.
    Empty,
    /// A single `address` argument: the Aave `PoolAddressesProvider`.
    PoolAddressProvider(Address),
}

impl ConstructorArgs {
    /// ABI-encode the arguments as the tail appended to creation bytecode.
    ///
    /// An `address` encodes as one 32-byte word, left-padded with zeros.
    pub fn abi_encode(&self) -> Vec<u8> {
        match self {
            ConstructorArgs::Empty => Vec::new(),
            ConstructorArgs::PoolAddressProvider(provider) => {
                let mut word = [0u8; 32];
                word[12..].copy_from_slice(provider.as_slice());
                word.to_vec()
            }
        }
    }
}

/// Constructor-argument mismatch for a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// The contract's constructor takes no arguments.
    #[error("{contract} takes no constructor arguments")]
    UnexpectedArgs { contract: ContractKind },
    /// The contract's constructor requires the pool address provider.
    #[error("{contract} requires the pool address provider argument")]
    MissingPoolProvider { contract: ContractKind },
}

/// A single deployment request: one contract and its constructor arguments.
///
/// Immutable once created; lives for exactly one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployRequest {
    pub contract: ContractKind,
    pub args: ConstructorArgs,
}

impl DeployRequest {
    /// Request deployment of the DEX stand-in (no constructor arguments).
    pub fn dex() -> Self {
        Self {
            contract: ContractKind::Dex,
            args: ConstructorArgs::Empty,
        }
    }

    /// Request deployment of the flash-loan executor.
    pub fn flash_loan(pool_provider: Address) -> Self {
        Self {
            contract: ContractKind::FlashLoan,
            args: ConstructorArgs::PoolAddressProvider(pool_provider),
        }
    }

    /// Request deployment of the flash-loan arbitrage executor.
    pub fn flash_loan_arbitrage(pool_provider: Address) -> Self {
        Self {
            contract: ContractKind::FlashLoanArbitrage,
            args: ConstructorArgs::PoolAddressProvider(pool_provider),
        }
    }

    /// Build a request from a contract kind and arguments, checking that the
    /// arguments match the contract's constructor schema.
    pub fn new(contract: ContractKind, args: ConstructorArgs) -> Result<Self, SchemaError> {
        match (contract.takes_pool_provider(), &args) {
            (false, ConstructorArgs::Empty) | (true, ConstructorArgs::PoolAddressProvider(_)) => {
                Ok(Self { contract, args })
            }
            (false, _) => Err(SchemaError::UnexpectedArgs { contract }),
            (true, _) => Err(SchemaError::MissingPoolProvider { contract }),
        }
    }
}
