//! Traits for storage abstraction and extensibility

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::types::*;

/// Complete set of writes produced by one ledger operation
///
/// Values are absolute (the new balance, the new allowance), never deltas,
/// so a backend only has to overwrite entries to apply them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateChanges {
    pub balances: BTreeMap<Address, Amount>,
    pub allowances: BTreeMap<(Address, Address), Amount>,
    pub total_supply: Option<Amount>,
    pub native_reserve: Option<Amount>,
}

impl StateChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_balance(&mut self, account: Address, balance: Amount) -> &mut Self {
        self.balances.insert(account, balance);
        self
    }

    pub fn set_allowance(&mut self, owner: Address, spender: Address, amount: Amount) -> &mut Self {
        self.allowances.insert((owner, spender), amount);
        self
    }

    pub fn set_total_supply(&mut self, supply: Amount) -> &mut Self {
        self.total_supply = Some(supply);
        self
    }

    pub fn set_native_reserve(&mut self, reserve: Amount) -> &mut Self {
        self.native_reserve = Some(reserve);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
            && self.allowances.is_empty()
            && self.total_supply.is_none()
            && self.native_reserve.is_none()
    }
}

/// Storage abstraction for ledger state
///
/// Reads may be served from any backend. `apply` must be all-or-nothing:
/// either every write in the change set lands, or none does.
#[async_trait]
pub trait LedgerStorage: Send + Sync {
    /// Balance of an account (zero if never credited)
    async fn get_balance(&self, account: &Address) -> LedgerResult<Amount>;

    /// Remaining allowance granted by `owner` to `spender`
    async fn get_allowance(&self, owner: &Address, spender: &Address) -> LedgerResult<Amount>;

    async fn get_total_supply(&self) -> LedgerResult<Amount>;

    /// Native value received through deposits and not yet released
    async fn get_native_reserve(&self) -> LedgerResult<Amount>;

    /// All accounts with a recorded balance
    async fn list_balances(&self) -> LedgerResult<Vec<(Address, Amount)>>;

    /// Atomically commit a change set
    async fn apply(&mut self, changes: StateChanges) -> LedgerResult<()>;
}

/// Public fungible-token contract consumed by other components
#[async_trait]
pub trait TokenLedger: Send + Sync {
    /// Address the ledger is deployed at
    fn address(&self) -> Address;

    async fn balance_of(&self, account: &Address) -> LedgerResult<Amount>;

    async fn allowance(&self, owner: &Address, spender: &Address) -> LedgerResult<Amount>;

    /// Move `amount` from `caller` to `to`
    async fn transfer(&mut self, caller: &Address, to: &Address, amount: Amount)
        -> LedgerResult<()>;

    /// Move `amount` from `owner` to `to`, spending `spender`'s allowance
    async fn transfer_from(
        &mut self,
        spender: &Address,
        owner: &Address,
        to: &Address,
        amount: Amount,
    ) -> LedgerResult<()>;
}

/// Effect applied when a withdraw approval round completes
pub trait WithdrawPolicy: Send + Sync {
    /// Native amount to release to `completer`, at most `native_reserve`
    fn release_amount(&self, completer: &Address, native_reserve: Amount) -> LedgerResult<Amount>;
}

/// Default withdraw policy: the completing approver receives the whole native reserve
pub struct ReleaseReserve;

impl WithdrawPolicy for ReleaseReserve {
    fn release_amount(&self, _completer: &Address, native_reserve: Amount) -> LedgerResult<Amount> {
        Ok(native_reserve)
    }
}

/// Withdraw policy that only cycles the approval round and moves nothing
pub struct RetainReserve;

impl WithdrawPolicy for RetainReserve {
    fn release_amount(&self, _completer: &Address, _native_reserve: Amount) -> LedgerResult<Amount> {
        Ok(0)
    }
}
