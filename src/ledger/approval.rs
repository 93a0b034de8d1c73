//! Approver committee and round-based approval tallies

use serde::{Deserialize, Serialize};

use crate::types::*;
use crate::utils::validation::validate_approvers;

/// Fixed committee of three distinct approvers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproverSet {
    members: [Address; APPROVER_COUNT],
}

impl ApproverSet {
    /// Build the committee, rejecting wrong cardinality or duplicates
    pub fn new(approvers: Vec<Address>) -> LedgerResult<Self> {
        validate_approvers(&approvers)?;
        let members: [Address; APPROVER_COUNT] = approvers.try_into().map_err(|_| {
            LedgerError::InvalidConstruction("Approver set has the wrong size".to_string())
        })?;
        Ok(Self { members })
    }

    pub fn members(&self) -> &[Address] {
        &self.members
    }

    pub fn contains(&self, account: &Address) -> bool {
        self.members.contains(account)
    }

    fn slot(&self, account: &Address) -> Option<usize> {
        self.members.iter().position(|member| member == account)
    }
}

/// What recording an approval did to the round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Approval counted; round still open
    Pending { approvals: usize },
    /// Caller had already approved this round; nothing changed
    AlreadyApproved { approvals: usize },
    /// This approval filled the round; the tally is now empty again
    Completed,
}

/// Per-round approval flags plus their count
///
/// `count` always equals the number of set flags. A tally never holds
/// three approvals: the filling approval resets it to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalTally {
    approved: [bool; APPROVER_COUNT],
    count: usize,
}

impl ApprovalTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Approvals recorded in the current round
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn has_approved(&self, approvers: &ApproverSet, account: &Address) -> bool {
        approvers
            .slot(account)
            .is_some_and(|slot| self.approved[slot])
    }

    /// Compute the tally after `caller` approves, without touching `self`
    pub fn record(
        &self,
        approvers: &ApproverSet,
        caller: &Address,
    ) -> LedgerResult<(ApprovalTally, RoundOutcome)> {
        let slot = approvers
            .slot(caller)
            .ok_or(LedgerError::Unauthorized(*caller))?;

        if self.approved[slot] {
            return Ok((
                self.clone(),
                RoundOutcome::AlreadyApproved {
                    approvals: self.count,
                },
            ));
        }

        let mut next = self.clone();
        next.approved[slot] = true;
        next.count += 1;

        if next.count == APPROVER_COUNT {
            Ok((ApprovalTally::new(), RoundOutcome::Completed))
        } else {
            let approvals = next.count;
            Ok((next, RoundOutcome::Pending { approvals }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn committee() -> (ApproverSet, [Address; 3]) {
        let members = [
            Address::from_label("approver-1"),
            Address::from_label("approver-2"),
            Address::from_label("approver-3"),
        ];
        (ApproverSet::new(members.to_vec()).unwrap(), members)
    }

    #[test]
    fn test_round_fills_and_resets() {
        let (set, [a, b, c]) = committee();
        let tally = ApprovalTally::new();

        let (tally, outcome) = tally.record(&set, &a).unwrap();
        assert_eq!(outcome, RoundOutcome::Pending { approvals: 1 });
        let (tally, outcome) = tally.record(&set, &b).unwrap();
        assert_eq!(outcome, RoundOutcome::Pending { approvals: 2 });
        let (tally, outcome) = tally.record(&set, &c).unwrap();
        assert_eq!(outcome, RoundOutcome::Completed);

        assert_eq!(tally, ApprovalTally::new());
        assert!(!tally.has_approved(&set, &a));
    }

    #[test]
    fn test_repeat_approval_is_idempotent() {
        let (set, [a, _, _]) = committee();
        let (tally, _) = ApprovalTally::new().record(&set, &a).unwrap();
        let (again, outcome) = tally.record(&set, &a).unwrap();

        assert_eq!(outcome, RoundOutcome::AlreadyApproved { approvals: 1 });
        assert_eq!(again, tally);
        assert_eq!(again.count(), 1);
    }

    #[test]
    fn test_order_does_not_matter() {
        let (set, [a, b, c]) = committee();
        let (tally, _) = ApprovalTally::new().record(&set, &c).unwrap();
        let (tally, _) = tally.record(&set, &a).unwrap();
        let (_, outcome) = tally.record(&set, &b).unwrap();
        assert_eq!(outcome, RoundOutcome::Completed);
    }

    #[test]
    fn test_outsider_is_unauthorized() {
        let (set, _) = committee();
        let outsider = Address::from_label("outsider");
        let result = ApprovalTally::new().record(&set, &outsider);
        assert_eq!(result, Err(LedgerError::Unauthorized(outsider)));
    }
}
