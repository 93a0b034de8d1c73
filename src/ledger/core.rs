//! Main ledger orchestrator: balances, allowances and committee-gated minting

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::LedgerConfig;
use crate::events::{EventLog, LedgerEvent};
use crate::ledger::approval::{ApprovalTally, ApproverSet, RoundOutcome};
use crate::traits::*;
use crate::types::*;
use crate::units::native_to_tokens;

/// Fungible-balance ledger with a three-member approval committee
///
/// Every state-changing call validates all of its preconditions against
/// current state, then commits one `StateChanges` set. A failed call
/// leaves storage, tallies and the event log untouched.
pub struct Ledger<S: LedgerStorage> {
    storage: S,
    address: Address,
    metadata: TokenMetadata,
    approvers: ApproverSet,
    mint_tally: ApprovalTally,
    withdraw_tally: ApprovalTally,
    withdraw_policy: Box<dyn WithdrawPolicy>,
    events: EventLog<LedgerEvent>,
}

impl<S: LedgerStorage> Ledger<S> {
    /// Create a new ledger deployed at `address`
    pub fn new(
        storage: S,
        address: Address,
        name: impl Into<String>,
        symbol: impl Into<String>,
        approvers: Vec<Address>,
    ) -> LedgerResult<Self> {
        Self::with_withdraw_policy(
            storage,
            address,
            name,
            symbol,
            approvers,
            Box::new(ReleaseReserve),
        )
    }

    /// Create a new ledger with a custom withdraw effect
    pub fn with_withdraw_policy(
        storage: S,
        address: Address,
        name: impl Into<String>,
        symbol: impl Into<String>,
        approvers: Vec<Address>,
        withdraw_policy: Box<dyn WithdrawPolicy>,
    ) -> LedgerResult<Self> {
        let metadata = TokenMetadata::new(name, symbol);
        let approvers = ApproverSet::new(approvers)?;

        info!(
            ledger = %address,
            symbol = %metadata.symbol,
            "Ledger created"
        );

        Ok(Self {
            storage,
            address,
            metadata,
            approvers,
            mint_tally: ApprovalTally::new(),
            withdraw_tally: ApprovalTally::new(),
            withdraw_policy,
            events: EventLog::new(),
        })
    }

    /// Create a ledger from deployment configuration
    pub fn from_config(storage: S, config: &LedgerConfig) -> LedgerResult<Self> {
        Self::new(
            storage,
            config.address,
            config.name.clone(),
            config.symbol.clone(),
            config.approvers.clone(),
        )
    }

    // Metadata
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    pub fn decimals(&self) -> u32 {
        self.metadata.decimals
    }

    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    pub fn approvers(&self) -> &ApproverSet {
        &self.approvers
    }

    /// Notifications emitted so far, in call order
    pub fn events(&self) -> &EventLog<LedgerEvent> {
        &self.events
    }

    // Native-currency path
    /// Handle a value-bearing message addressed to the ledger
    ///
    /// Only an empty payload is understood; it is treated as a deposit.
    pub async fn receive(
        &mut self,
        from: &Address,
        value: Amount,
        payload: &[u8],
    ) -> LedgerResult<Amount> {
        if !payload.is_empty() {
            warn!(from = %from, payload_len = payload.len(), "Rejected message with payload");
            return Err(LedgerError::UnsupportedCall);
        }
        self.receive_deposit(from, value).await
    }

    /// Convert a native deposit into tokens at the fixed rate and credit `from`
    ///
    /// Returns the number of base units minted.
    pub async fn receive_deposit(&mut self, from: &Address, native_amount: Amount) -> LedgerResult<Amount> {
        if native_amount == 0 {
            return Err(LedgerError::ZeroDeposit);
        }

        let tokens = native_to_tokens(native_amount)?;
        let reserve = self.storage.get_native_reserve().await?;

        let mut changes = StateChanges::new();
        self.plan_mint(from, tokens, &mut changes).await?;
        changes.set_native_reserve(reserve.checked_add(native_amount).ok_or(LedgerError::Overflow)?);
        self.storage.apply(changes).await?;

        self.events.emit(LedgerEvent::Deposit {
            from: *from,
            native_amount,
            tokens,
        });
        self.events.emit(LedgerEvent::Transfer {
            from: None,
            to: *from,
            amount: tokens,
        });

        info!(from = %from, native_amount, tokens, "Deposit converted");
        Ok(tokens)
    }

    // Committee rounds
    /// Register `caller`'s approval in the mint round
    ///
    /// The approval that fills the round mints `MINT_REWARD` to `caller`
    /// and starts a fresh, empty round.
    pub async fn approve_mint(&mut self, caller: &Address) -> LedgerResult<RoundOutcome> {
        let (next, outcome) = self.record_approval("mint", &self.mint_tally, caller)?;

        match outcome {
            RoundOutcome::Completed => {
                let mut changes = StateChanges::new();
                self.plan_mint(caller, MINT_REWARD, &mut changes).await?;
                self.storage.apply(changes).await?;
                self.mint_tally = next;

                self.events.emit(LedgerEvent::MintApproval {
                    approver: *caller,
                    approvals: APPROVER_COUNT,
                });
                self.events.emit(LedgerEvent::Transfer {
                    from: None,
                    to: *caller,
                    amount: MINT_REWARD,
                });
                info!(recipient = %caller, amount = MINT_REWARD, "Mint round completed");
            }
            RoundOutcome::Pending { approvals } => {
                self.mint_tally = next;
                self.events.emit(LedgerEvent::MintApproval {
                    approver: *caller,
                    approvals,
                });
                debug!(approver = %caller, approvals, "Mint approval recorded");
            }
            RoundOutcome::AlreadyApproved { approvals } => {
                debug!(approver = %caller, approvals, "Mint approval already recorded");
            }
        }

        Ok(outcome)
    }

    /// Register `caller`'s approval in the withdraw round
    ///
    /// The approval that fills the round applies the withdraw policy,
    /// releasing native reserve to `caller`, and starts a fresh round.
    pub async fn approve_withdraw(&mut self, caller: &Address) -> LedgerResult<RoundOutcome> {
        let (next, outcome) = self.record_approval("withdraw", &self.withdraw_tally, caller)?;

        match outcome {
            RoundOutcome::Completed => {
                let reserve = self.storage.get_native_reserve().await?;
                let release = self.withdraw_policy.release_amount(caller, reserve)?;
                if release > reserve {
                    return Err(LedgerError::Validation(format!(
                        "Withdraw policy released {} but the reserve holds {}",
                        release, reserve
                    )));
                }

                if release > 0 {
                    let mut changes = StateChanges::new();
                    changes.set_native_reserve(reserve - release);
                    self.storage.apply(changes).await?;
                }
                self.withdraw_tally = next;

                self.events.emit(LedgerEvent::WithdrawApproval {
                    approver: *caller,
                    approvals: APPROVER_COUNT,
                });
                if release > 0 {
                    self.events.emit(LedgerEvent::NativeReleased {
                        to: *caller,
                        amount: release,
                    });
                }
                info!(recipient = %caller, released = release, "Withdraw round completed");
            }
            RoundOutcome::Pending { approvals } => {
                self.withdraw_tally = next;
                self.events.emit(LedgerEvent::WithdrawApproval {
                    approver: *caller,
                    approvals,
                });
                debug!(approver = %caller, approvals, "Withdraw approval recorded");
            }
            RoundOutcome::AlreadyApproved { approvals } => {
                debug!(approver = %caller, approvals, "Withdraw approval already recorded");
            }
        }

        Ok(outcome)
    }

    /// Approvals recorded in the current mint round
    pub fn mint_approvals(&self) -> usize {
        self.mint_tally.count()
    }

    /// Approvals recorded in the current withdraw round
    pub fn withdraw_approvals(&self) -> usize {
        self.withdraw_tally.count()
    }

    pub fn has_approved_mint(&self, account: &Address) -> bool {
        self.mint_tally.has_approved(&self.approvers, account)
    }

    pub fn has_approved_withdraw(&self, account: &Address) -> bool {
        self.withdraw_tally.has_approved(&self.approvers, account)
    }

    // Balances and allowances
    /// Move `amount` from `caller` to `to`
    pub async fn transfer(&mut self, caller: &Address, to: &Address, amount: Amount) -> LedgerResult<()> {
        let mut changes = StateChanges::new();
        self.plan_transfer(caller, to, amount, &mut changes).await?;
        self.storage.apply(changes).await?;

        self.events.emit(LedgerEvent::Transfer {
            from: Some(*caller),
            to: *to,
            amount,
        });
        debug!(from = %caller, to = %to, amount, "Transfer completed");
        Ok(())
    }

    /// Set the allowance `caller` grants `spender`, replacing any previous value
    pub async fn approve(&mut self, caller: &Address, spender: &Address, amount: Amount) -> LedgerResult<()> {
        let mut changes = StateChanges::new();
        changes.set_allowance(*caller, *spender, amount);
        self.storage.apply(changes).await?;

        self.events.emit(LedgerEvent::Approval {
            owner: *caller,
            spender: *spender,
            amount,
        });
        debug!(owner = %caller, spender = %spender, amount, "Allowance set");
        Ok(())
    }

    /// Move `amount` from `owner` to `to` on behalf of `spender`
    pub async fn transfer_from(
        &mut self,
        spender: &Address,
        owner: &Address,
        to: &Address,
        amount: Amount,
    ) -> LedgerResult<()> {
        let allowance = self.storage.get_allowance(owner, spender).await?;
        if allowance < amount {
            return Err(LedgerError::InsufficientAllowance {
                owner: *owner,
                spender: *spender,
                available: allowance,
                required: amount,
            });
        }

        let mut changes = StateChanges::new();
        self.plan_transfer(owner, to, amount, &mut changes).await?;
        changes.set_allowance(*owner, *spender, allowance - amount);
        self.storage.apply(changes).await?;

        self.events.emit(LedgerEvent::Transfer {
            from: Some(*owner),
            to: *to,
            amount,
        });
        debug!(
            spender = %spender,
            from = %owner,
            to = %to,
            amount,
            "Delegated transfer completed"
        );
        Ok(())
    }

    // Queries
    pub async fn balance_of(&self, account: &Address) -> LedgerResult<Amount> {
        self.storage.get_balance(account).await
    }

    pub async fn total_supply(&self) -> LedgerResult<Amount> {
        self.storage.get_total_supply().await
    }

    pub async fn allowance(&self, owner: &Address, spender: &Address) -> LedgerResult<Amount> {
        self.storage.get_allowance(owner, spender).await
    }

    /// Native value held by the ledger
    pub async fn native_reserve(&self) -> LedgerResult<Amount> {
        self.storage.get_native_reserve().await
    }

    /// Compare total supply with the sum of all balances
    pub async fn audit_supply(&self) -> LedgerResult<SupplyReport> {
        let total_supply = self.storage.get_total_supply().await?;
        let balances = self.storage.list_balances().await?;

        let sum_of_balances = balances
            .iter()
            .try_fold(0u128, |sum, (_, balance)| sum.checked_add(*balance))
            .ok_or(LedgerError::Overflow)?;

        Ok(SupplyReport {
            total_supply,
            sum_of_balances,
            accounts: balances.len(),
            is_consistent: total_supply == sum_of_balances,
        })
    }

    // Planning helpers: read state, check preconditions, stage writes
    fn record_approval(
        &self,
        round: &str,
        tally: &ApprovalTally,
        caller: &Address,
    ) -> LedgerResult<(ApprovalTally, RoundOutcome)> {
        tally.record(&self.approvers, caller).inspect_err(|_| {
            warn!(round, caller = %caller, "Approval rejected: caller is not an approver");
        })
    }

    async fn plan_mint(&self, to: &Address, amount: Amount, changes: &mut StateChanges) -> LedgerResult<()> {
        let balance = self.storage.get_balance(to).await?;
        let supply = self.storage.get_total_supply().await?;

        changes.set_balance(*to, balance.checked_add(amount).ok_or(LedgerError::Overflow)?);
        changes.set_total_supply(supply.checked_add(amount).ok_or(LedgerError::Overflow)?);
        Ok(())
    }

    async fn plan_transfer(
        &self,
        from: &Address,
        to: &Address,
        amount: Amount,
        changes: &mut StateChanges,
    ) -> LedgerResult<()> {
        let from_balance = self.storage.get_balance(from).await?;
        if from_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                account: *from,
                available: from_balance,
                required: amount,
            });
        }

        let debited = from_balance - amount;
        let to_balance = if from == to {
            debited
        } else {
            self.storage.get_balance(to).await?
        };
        let credited = to_balance.checked_add(amount).ok_or(LedgerError::Overflow)?;

        changes.set_balance(*from, debited);
        changes.set_balance(*to, credited);
        Ok(())
    }
}

#[async_trait]
impl<S: LedgerStorage> TokenLedger for Ledger<S> {
    fn address(&self) -> Address {
        self.address
    }

    async fn balance_of(&self, account: &Address) -> LedgerResult<Amount> {
        Ledger::balance_of(self, account).await
    }

    async fn allowance(&self, owner: &Address, spender: &Address) -> LedgerResult<Amount> {
        Ledger::allowance(self, owner, spender).await
    }

    async fn transfer(&mut self, caller: &Address, to: &Address, amount: Amount) -> LedgerResult<()> {
        Ledger::transfer(self, caller, to, amount).await
    }

    async fn transfer_from(
        &mut self,
        spender: &Address,
        owner: &Address,
        to: &Address,
        amount: Amount,
    ) -> LedgerResult<()> {
        Ledger::transfer_from(self, spender, owner, to, amount).await
    }
}

/// Result of comparing total supply with the sum of balances
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyReport {
    pub total_supply: Amount,
    pub sum_of_balances: Amount,
    pub accounts: usize,
    pub is_consistent: bool,
}
