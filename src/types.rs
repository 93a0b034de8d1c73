//! Core value types, unit constants and the crate-wide error type

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Token amount in base units (18 fractional decimal places)
pub type Amount = u128;

/// Number of fractional decimal places of a ledger unit
pub const DECIMALS: u32 = 18;

/// One whole token expressed in base units
pub const ONE_TOKEN: Amount = 1_000_000_000_000_000_000;

/// Fixed purchase rate: one native unit buys this many tokens
pub const TOKENS_PER_NATIVE: Amount = 1000;

/// Amount minted to the approver that completes a mint round
pub const MINT_REWARD: Amount = 1000 * ONE_TOKEN;

/// Size of the approver committee
pub const APPROVER_COUNT: usize = 3;

/// Account identifier (20 bytes, rendered as `0x`-prefixed hex)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; 20]);

impl Address {
    /// The all-zero address
    pub const ZERO: Address = Address([0u8; 20]);

    /// Create an address from raw bytes
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Derive a stable address from a human label (first 20 bytes of its SHA-256)
    pub fn from_label(label: &str) -> Self {
        let digest = Sha256::digest(label.as_bytes());
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest[..20]);
        Self(bytes)
    }

    /// Raw bytes of the address
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let raw = hex::decode(digits)
            .map_err(|e| LedgerError::Validation(format!("Invalid address '{}': {}", s, e)))?;
        let bytes: [u8; 20] = raw.try_into().map_err(|_| {
            LedgerError::Validation(format!("Address '{}' must be exactly 20 bytes", s))
        })?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

/// Fixed-size content hash identifying a credential
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CredentialHash([u8; 32]);

impl CredentialHash {
    /// Wrap an existing 32-byte hash
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Hash a document with SHA-256
    pub fn digest(document: impl AsRef<[u8]>) -> Self {
        Self(Sha256::digest(document.as_ref()).into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CredentialHash({})", self)
    }
}

impl FromStr for CredentialHash {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let raw = hex::decode(digits)
            .map_err(|e| LedgerError::Validation(format!("Invalid hash '{}': {}", s, e)))?;
        let bytes: [u8; 32] = raw.try_into().map_err(|_| {
            LedgerError::Validation(format!("Hash '{}' must be exactly 32 bytes", s))
        })?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for CredentialHash {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CredentialHash> for String {
    fn from(hash: CredentialHash) -> Self {
        hash.to_string()
    }
}

/// Descriptive token metadata fixed at construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Human-readable token name
    pub name: String,
    /// Ticker symbol
    pub symbol: String,
    /// Fractional decimal places
    pub decimals: u32,
}

impl TokenMetadata {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals: DECIMALS,
        }
    }
}

/// Errors that can occur in the ledger and the credential registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("Not authorized: {0} is not an approver")]
    Unauthorized(Address),
    #[error("Not contract owner: {0}")]
    NotOwner(Address),
    #[error("Insufficient balance for {account}: available {available}, required {required}")]
    InsufficientBalance {
        account: Address,
        available: Amount,
        required: Amount,
    },
    #[error(
        "Insufficient allowance for {spender} on {owner}: available {available}, required {required}"
    )]
    InsufficientAllowance {
        owner: Address,
        spender: Address,
        available: Amount,
        required: Amount,
    },
    #[error("Credential already stored: {0}")]
    AlreadyStored(CredentialHash),
    #[error("Credential not stored: {0}")]
    NotStored(CredentialHash),
    #[error("Credential already verified: {0}")]
    AlreadyVerified(CredentialHash),
    #[error("Invalid construction: {0}")]
    InvalidConstruction(String),
    #[error("Deposit must carry a non-zero value")]
    ZeroDeposit,
    #[error("Unsupported call: message with non-empty payload")]
    UnsupportedCall,
    #[error("Ledger mismatch: expected {expected}, got {actual}")]
    LedgerMismatch { expected: Address, actual: Address },
    #[error("Arithmetic overflow")]
    Overflow,
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for ledger and registry operations
pub type LedgerResult<T> = Result<T, LedgerError>;
