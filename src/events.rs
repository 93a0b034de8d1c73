//! Append-only, call-ordered notification logs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Notifications emitted by the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// Balance movement; `from == None` marks newly minted units
    Transfer {
        from: Option<Address>,
        to: Address,
        amount: Amount,
    },
    /// Allowance set by `owner` for `spender`
    Approval {
        owner: Address,
        spender: Address,
        amount: Amount,
    },
    /// Native value received and converted at the fixed rate
    Deposit {
        from: Address,
        native_amount: Amount,
        tokens: Amount,
    },
    /// An approver joined the current mint round
    MintApproval { approver: Address, approvals: usize },
    /// An approver joined the current withdraw round
    WithdrawApproval { approver: Address, approvals: usize },
    /// Native value released from the reserve when a withdraw round completed
    NativeReleased { to: Address, amount: Amount },
}

/// Notifications emitted by the credential registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    CredentialStored { hash: CredentialHash, by: Address },
    CredentialVerified { hash: CredentialHash, by: Address },
    TokensWithdrawn { to: Address, amount: Amount },
}

/// A single log entry with its position in call order
///
/// Equality ignores `recorded_at`: replaying the same calls yields equal logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord<E> {
    /// Zero-based position in the log
    pub sequence: u64,
    /// Wall-clock time the entry was appended (informational only)
    pub recorded_at: NaiveDateTime,
    pub event: E,
}

impl<E: PartialEq> PartialEq for EventRecord<E> {
    fn eq(&self, other: &Self) -> bool {
        self.sequence == other.sequence && self.event == other.event
    }
}

impl<E: Eq> Eq for EventRecord<E> {}

/// Ordered log of events; entries are never removed or reordered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLog<E> {
    records: Vec<EventRecord<E>>,
}

impl<E> EventLog<E> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append an event and return its sequence number
    pub fn emit(&mut self, event: E) -> u64 {
        let sequence = self.records.len() as u64;
        self.records.push(EventRecord {
            sequence,
            recorded_at: chrono::Utc::now().naive_utc(),
            event,
        });
        sequence
    }

    /// All records in emission order
    pub fn records(&self) -> &[EventRecord<E>] {
        &self.records
    }

    /// Iterate event payloads in emission order
    pub fn events(&self) -> impl Iterator<Item = &E> {
        self.records.iter().map(|r| &r.event)
    }

    pub fn last(&self) -> Option<&E> {
        self.records.last().map(|r| &r.event)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<E> Default for EventLog<E> {
    fn default() -> Self {
        Self::new()
    }
}
