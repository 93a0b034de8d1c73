//! Conversion between human decimal amounts and base units

use bigdecimal::BigDecimal;
use std::str::FromStr;

use crate::types::*;

/// Parse a decimal string (e.g. `"0.01"`) into base units with `decimals` fractional places
pub fn parse_units(value: &str, decimals: u32) -> LedgerResult<Amount> {
    let parsed = BigDecimal::from_str(value.trim())
        .map_err(|e| LedgerError::Validation(format!("Invalid amount '{}': {}", value, e)))?;

    if parsed < BigDecimal::from(0) {
        return Err(LedgerError::Validation(format!(
            "Amount cannot be negative: {}",
            value
        )));
    }

    let multiplier = BigDecimal::from_str(&format!("1e{}", decimals))
        .map_err(|e| LedgerError::Validation(e.to_string()))?;
    let scaled = parsed * multiplier;
    let integral = scaled.with_scale(0);

    if integral != scaled {
        return Err(LedgerError::Validation(format!(
            "Amount '{}' has more than {} fractional digits",
            value, decimals
        )));
    }

    let (digits, _) = integral.into_bigint_and_exponent();
    digits
        .to_string()
        .parse::<Amount>()
        .map_err(|_| LedgerError::Overflow)
}

/// Parse a whole-token decimal string using the ledger's 18 decimals
pub fn parse_ether(value: &str) -> LedgerResult<Amount> {
    parse_units(value, DECIMALS)
}

/// Render base units as a decimal string, trimming trailing zeros
pub fn format_units(amount: Amount, decimals: u32) -> String {
    let Some(unit) = 10u128.checked_pow(decimals) else {
        return amount.to_string();
    };

    let whole = amount / unit;
    let fraction = amount % unit;
    if fraction == 0 {
        return whole.to_string();
    }

    let padded = format!("{:0width$}", fraction, width = decimals as usize);
    format!("{}.{}", whole, padded.trim_end_matches('0'))
}

/// Convert a native-currency amount into tokens at the fixed purchase rate
pub fn native_to_tokens(native_amount: Amount) -> LedgerResult<Amount> {
    native_amount
        .checked_mul(TOKENS_PER_NATIVE)
        .ok_or(LedgerError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_ether("1").unwrap(), ONE_TOKEN);
        assert_eq!(parse_ether("0.01").unwrap(), 10_000_000_000_000_000);
        assert_eq!(parse_units("2.5", 2).unwrap(), 250);
        assert_eq!(parse_units("0", 18).unwrap(), 0);
    }

    #[test]
    fn test_parse_units_rejects_bad_input() {
        assert!(parse_units("-1", 18).is_err());
        assert!(parse_units("abc", 18).is_err());
        assert!(parse_units("0.001", 2).is_err());
        assert_eq!(
            parse_units("1000000000000000000000", 18),
            Err(LedgerError::Overflow)
        );
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(MINT_REWARD, DECIMALS), "1000");
        assert_eq!(format_units(10_000_000_000_000_000, DECIMALS), "0.01");
        assert_eq!(format_units(1_500, 3), "1.5");
        assert_eq!(format_units(0, DECIMALS), "0");
    }

    #[test]
    fn test_native_conversion_rate() {
        let deposit = parse_ether("0.01").unwrap();
        assert_eq!(native_to_tokens(deposit).unwrap(), 10 * ONE_TOKEN);
        assert_eq!(native_to_tokens(Amount::MAX), Err(LedgerError::Overflow));
    }
}
