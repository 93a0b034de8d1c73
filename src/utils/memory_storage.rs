//! In-memory storage implementation for testing

use async_trait::async_trait;
use std::collections::HashMap;

use crate::traits::*;
use crate::types::*;

#[derive(Debug, Clone, Default)]
struct LedgerState {
    balances: HashMap<Address, Amount>,
    allowances: HashMap<(Address, Address), Amount>,
    total_supply: Amount,
    native_reserve: Amount,
}

/// In-memory storage implementation for testing and development
///
/// Owned by exactly one ledger. A clone is an independent snapshot:
/// writes through it never reach the original.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    state: LedgerState,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all data (useful for testing)
    pub fn clear(&mut self) {
        self.state = LedgerState::default();
    }
}

#[async_trait]
impl LedgerStorage for MemoryStorage {
    async fn get_balance(&self, account: &Address) -> LedgerResult<Amount> {
        Ok(self.state.balances.get(account).copied().unwrap_or(0))
    }

    async fn get_allowance(&self, owner: &Address, spender: &Address) -> LedgerResult<Amount> {
        Ok(self
            .state
            .allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0))
    }

    async fn get_total_supply(&self) -> LedgerResult<Amount> {
        Ok(self.state.total_supply)
    }

    async fn get_native_reserve(&self) -> LedgerResult<Amount> {
        Ok(self.state.native_reserve)
    }

    async fn list_balances(&self) -> LedgerResult<Vec<(Address, Amount)>> {
        let mut balances: Vec<(Address, Amount)> = self
            .state
            .balances
            .iter()
            .map(|(account, balance)| (*account, *balance))
            .collect();
        balances.sort();
        Ok(balances)
    }

    async fn apply(&mut self, changes: StateChanges) -> LedgerResult<()> {
        let state = &mut self.state;

        for (account, balance) in changes.balances {
            state.balances.insert(account, balance);
        }
        for (key, amount) in changes.allowances {
            state.allowances.insert(key, amount);
        }
        if let Some(supply) = changes.total_supply {
            state.total_supply = supply;
        }
        if let Some(reserve) = changes.native_reserve {
            state.native_reserve = reserve;
        }

        Ok(())
    }
}
