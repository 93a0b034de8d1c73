//! Validation utilities

use std::collections::HashSet;

use crate::types::*;

/// Validate that a constructor amount (e.g. a fee) is positive
pub fn validate_positive_amount(amount: Amount, what: &str) -> LedgerResult<()> {
    if amount == 0 {
        Err(LedgerError::InvalidConstruction(format!(
            "{} must be positive",
            what
        )))
    } else {
        Ok(())
    }
}

/// Validate a token name
pub fn validate_token_name(name: &str) -> LedgerResult<()> {
    if name.trim().is_empty() {
        return Err(LedgerError::Validation(
            "Token name cannot be empty".to_string(),
        ));
    }

    if name.len() > 100 {
        return Err(LedgerError::Validation(
            "Token name cannot exceed 100 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate a ticker symbol (1-11 alphanumeric characters)
pub fn validate_token_symbol(symbol: &str) -> LedgerResult<()> {
    if symbol.is_empty() || symbol.len() > 11 {
        return Err(LedgerError::Validation(format!(
            "Token symbol '{}' must be 1 to 11 characters",
            symbol
        )));
    }

    if !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(LedgerError::Validation(format!(
            "Token symbol '{}' can only contain alphanumeric characters",
            symbol
        )));
    }

    Ok(())
}

/// Validate the approver committee: exactly three distinct identities
pub fn validate_approvers(approvers: &[Address]) -> LedgerResult<()> {
    if approvers.len() != APPROVER_COUNT {
        return Err(LedgerError::InvalidConstruction(format!(
            "Expected {} approvers, got {}",
            APPROVER_COUNT,
            approvers.len()
        )));
    }

    let mut seen = HashSet::new();
    for approver in approvers {
        if !seen.insert(approver) {
            return Err(LedgerError::InvalidConstruction(format!(
                "Approver {} appears more than once",
                approver
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(label: &str) -> Address {
        Address::from_label(label)
    }

    #[test]
    fn test_validate_approvers() {
        assert!(validate_approvers(&[addr("a"), addr("b"), addr("c")]).is_ok());

        let too_few = validate_approvers(&[addr("a"), addr("b")]);
        assert!(matches!(too_few, Err(LedgerError::InvalidConstruction(_))));

        let too_many = validate_approvers(&[addr("a"), addr("b"), addr("c"), addr("d")]);
        assert!(matches!(too_many, Err(LedgerError::InvalidConstruction(_))));

        let duplicate = validate_approvers(&[addr("a"), addr("b"), addr("a")]);
        assert!(matches!(duplicate, Err(LedgerError::InvalidConstruction(_))));
    }

    #[test]
    fn test_validate_token_metadata() {
        assert!(validate_token_name("Group 8 Token").is_ok());
        assert!(validate_token_name("   ").is_err());
        assert!(validate_token_symbol("G8TK").is_ok());
        assert!(validate_token_symbol("").is_err());
        assert!(validate_token_symbol("G8-TK").is_err());
    }

    #[test]
    fn test_validate_positive_amount() {
        assert!(validate_positive_amount(1, "Fee").is_ok());
        assert!(matches!(
            validate_positive_amount(0, "Fee"),
            Err(LedgerError::InvalidConstruction(_))
        ));
    }
}
