//! Deployment configuration for the ledger and the credential registry

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::types::*;
use crate::units::parse_ether;
use crate::utils::validation::*;

/// Parameters for a full deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    pub ledger: LedgerConfig,
    /// Registry is optional: a ledger can be deployed on its own
    #[serde(default)]
    pub registry: Option<RegistryConfig>,
}

/// Ledger constructor parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub approvers: Vec<Address>,
}

/// Registry constructor parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub address: Address,
    pub owner: Address,
    pub ledger_address: Address,
    /// Verification fee in whole tokens, as a decimal string (e.g. `"1"`)
    pub fee: String,
}

impl RegistryConfig {
    /// Fee converted to base units
    pub fn fee_amount(&self) -> LedgerResult<Amount> {
        parse_ether(&self.fee)
    }
}

impl DeploymentConfig {
    /// Parse and validate a JSON configuration document
    pub fn from_json_str(json: &str) -> LedgerResult<Self> {
        let config: DeploymentConfig = serde_json::from_str(json)
            .map_err(|e| LedgerError::Config(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> LedgerResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            LedgerError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_json_str(&contents)?;
        info!(path = %path.display(), "Deployment configuration loaded");
        Ok(config)
    }

    /// Check constructor parameters before anything is deployed
    pub fn validate(&self) -> LedgerResult<()> {
        validate_token_name(&self.ledger.name)?;
        validate_token_symbol(&self.ledger.symbol)?;
        validate_approvers(&self.ledger.approvers)?;

        if let Some(registry) = &self.registry {
            validate_positive_amount(registry.fee_amount()?, "Verification fee")?;

            if registry.ledger_address != self.ledger.address {
                return Err(LedgerError::Config(format!(
                    "Registry points at ledger {} but the ledger is deployed at {}",
                    registry.ledger_address, self.ledger.address
                )));
            }
        }

        Ok(())
    }

    pub fn to_json_pretty(&self) -> LedgerResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| LedgerError::Config(e.to_string()))
    }
}
