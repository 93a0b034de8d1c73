//! Credential registry: owner-stored content hashes, fee-gated verification
//!
//! Each hash moves `Unknown -> Stored -> Verified` and never back. Fees are
//! pulled through the ledger's allowance contract into the registry's own
//! ledger account, from which only the owner can withdraw.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

use crate::config::RegistryConfig;
use crate::events::{EventLog, RegistryEvent};
use crate::traits::TokenLedger;
use crate::types::*;
use crate::utils::validation::validate_positive_amount;

/// Verification status of a stored credential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CredentialStatus {
    Stored,
    Verified,
}

/// A stored credential hash and who moved it through its states
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub hash: CredentialHash,
    pub status: CredentialStatus,
    pub stored_by: Address,
    pub verified_by: Option<Address>,
}

impl CredentialRecord {
    pub fn is_verified(&self) -> bool {
        self.status == CredentialStatus::Verified
    }
}

/// Registry of credential hashes bound to one ledger
pub struct CredentialRegistry {
    address: Address,
    owner: Address,
    ledger_address: Address,
    fee: Amount,
    records: HashMap<CredentialHash, CredentialRecord>,
    events: EventLog<RegistryEvent>,
}

impl CredentialRegistry {
    /// Create a registry at `address`, administered by `owner`
    pub fn new(
        address: Address,
        owner: Address,
        ledger_address: Address,
        fee: Amount,
    ) -> LedgerResult<Self> {
        validate_positive_amount(fee, "Verification fee")?;

        info!(registry = %address, owner = %owner, ledger = %ledger_address, fee, "Registry created");

        Ok(Self {
            address,
            owner,
            ledger_address,
            fee,
            records: HashMap::new(),
            events: EventLog::new(),
        })
    }

    /// Create a registry from deployment configuration
    pub fn from_config(config: &RegistryConfig) -> LedgerResult<Self> {
        Self::new(
            config.address,
            config.owner,
            config.ledger_address,
            config.fee_amount()?,
        )
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn ledger_address(&self) -> Address {
        self.ledger_address
    }

    pub fn fee(&self) -> Amount {
        self.fee
    }

    /// Notifications emitted so far, in call order
    pub fn events(&self) -> &EventLog<RegistryEvent> {
        &self.events
    }

    /// Record a credential hash (owner only)
    pub fn store_credential(&mut self, caller: &Address, hash: CredentialHash) -> LedgerResult<()> {
        self.ensure_owner(caller)?;

        if self.records.contains_key(&hash) {
            return Err(LedgerError::AlreadyStored(hash));
        }

        self.records.insert(
            hash,
            CredentialRecord {
                hash,
                status: CredentialStatus::Stored,
                stored_by: *caller,
                verified_by: None,
            },
        );
        self.events
            .emit(RegistryEvent::CredentialStored { hash, by: *caller });

        info!(hash = %hash, by = %caller, "Credential stored");
        Ok(())
    }

    /// Mark a stored credential verified, charging `caller` the fee
    ///
    /// `caller` must have granted the registry an allowance of at least the
    /// fee on the ledger. Ledger failures are returned unchanged.
    pub async fn verify_credential<L>(
        &mut self,
        ledger: &mut L,
        caller: &Address,
        hash: CredentialHash,
    ) -> LedgerResult<()>
    where
        L: TokenLedger + ?Sized,
    {
        self.ensure_ledger(ledger)?;

        match self.records.get(&hash) {
            None => return Err(LedgerError::NotStored(hash)),
            Some(record) if record.is_verified() => {
                return Err(LedgerError::AlreadyVerified(hash))
            }
            Some(_) => {}
        }

        ledger
            .transfer_from(&self.address, caller, &self.address, self.fee)
            .await?;

        if let Some(record) = self.records.get_mut(&hash) {
            record.status = CredentialStatus::Verified;
            record.verified_by = Some(*caller);
        }
        self.events
            .emit(RegistryEvent::CredentialVerified { hash, by: *caller });

        info!(hash = %hash, by = %caller, fee = self.fee, "Credential verified");
        Ok(())
    }

    /// Send `amount` of collected fees to the owner (owner only)
    pub async fn withdraw_tokens<L>(
        &mut self,
        ledger: &mut L,
        caller: &Address,
        amount: Amount,
    ) -> LedgerResult<()>
    where
        L: TokenLedger + ?Sized,
    {
        self.ensure_owner(caller)?;
        self.ensure_ledger(ledger)?;

        let available = ledger.balance_of(&self.address).await?;
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                account: self.address,
                available,
                required: amount,
            });
        }

        ledger.transfer(&self.address, &self.owner, amount).await?;
        self.events.emit(RegistryEvent::TokensWithdrawn {
            to: self.owner,
            amount,
        });

        info!(to = %self.owner, amount, "Fees withdrawn");
        Ok(())
    }

    /// Whether `hash` has been stored (verified or not)
    pub fn stored_credentials(&self, hash: &CredentialHash) -> bool {
        self.records.contains_key(hash)
    }

    pub fn is_verified(&self, hash: &CredentialHash) -> bool {
        self.records.get(hash).is_some_and(|r| r.is_verified())
    }

    pub fn credential(&self, hash: &CredentialHash) -> Option<&CredentialRecord> {
        self.records.get(hash)
    }

    /// Fees currently held by the registry on `ledger`
    pub async fn token_balance<L>(&self, ledger: &L) -> LedgerResult<Amount>
    where
        L: TokenLedger + ?Sized,
    {
        self.ensure_ledger(ledger)?;
        ledger.balance_of(&self.address).await
    }

    fn ensure_owner(&self, caller: &Address) -> LedgerResult<()> {
        if *caller != self.owner {
            warn!(caller = %caller, "Rejected owner-only registry call");
            return Err(LedgerError::NotOwner(*caller));
        }
        Ok(())
    }

    fn ensure_ledger<L>(&self, ledger: &L) -> LedgerResult<()>
    where
        L: TokenLedger + ?Sized,
    {
        let actual = ledger.address();
        if actual != self.ledger_address {
            return Err(LedgerError::LedgerMismatch {
                expected: self.ledger_address,
                actual,
            });
        }
        Ok(())
    }
}
