//! Ether amount conversion
//!
//! Amounts travel as decimal ETH strings in the UI and as 256-bit wei on
//! the wire. The arithmetic is alloy's; this module adds the strict input
//! syntax the amount field accepts and the trimmed display form.

use alloy::primitives::{utils, U256};

use crate::error::VaultError;
use crate::Result;

/// Decimals between ether and wei
pub const ETHER_DECIMALS: usize = 18;

/// Parse a decimal ETH string into wei
///
/// Accepts `"1"`, `"1.5"`, `"1."` and `".5"`. Fractional digits beyond the
/// 18th must be zeros.
pub fn parse_ether(input: &str) -> Result<U256> {
    if input.is_empty() {
        return Err(VaultError::invalid_amount("amount is empty"));
    }
    if !input.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(VaultError::invalid_amount(format!(
            "'{}' is not a decimal number",
            input
        )));
    }

    let mut parts = input.split('.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next().unwrap_or_default();
    if parts.next().is_some() {
        return Err(VaultError::invalid_amount(format!(
            "'{}' has more than one decimal point",
            input
        )));
    }
    if whole.is_empty() && fraction.is_empty() {
        return Err(VaultError::invalid_amount(format!("'{}' has no digits", input)));
    }

    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > ETHER_DECIMALS {
        return Err(VaultError::invalid_amount(format!(
            "'{}' has more than {} decimal places",
            input, ETHER_DECIMALS
        )));
    }

    let canonical = canonical_form(whole, fraction);
    let too_large = || VaultError::invalid_amount(format!("'{}' is too large", input));

    let wei = utils::parse_ether(&canonical).map_err(|_| too_large())?;
    // anything past 256 bits fails to survive the round trip
    if format_ether(wei) != canonical {
        return Err(too_large());
    }
    Ok(wei)
}

/// `whole.fraction` without leading or trailing zeros, keeping one digit each side
fn canonical_form(whole: &str, fraction: &str) -> String {
    let whole = whole.trim_start_matches('0');
    let whole = if whole.is_empty() { "0" } else { whole };
    let fraction = if fraction.is_empty() { "0" } else { fraction };
    format!("{}.{}", whole, fraction)
}

/// Format wei as a decimal ETH string
///
/// Trailing fractional zeros are dropped but one fractional digit is kept,
/// so one ether renders as `"1.0"`.
pub fn format_ether(wei: U256) -> String {
    let text = utils::format_ether(wei);
    match text.split_once('.') {
        Some((whole, fraction)) => canonical_form(whole, fraction.trim_end_matches('0')),
        None => canonical_form(&text, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ether(n: u64) -> U256 {
        U256::from(n) * U256::from(10u64).pow(U256::from(ETHER_DECIMALS))
    }

    #[test]
    fn test_parse_whole_and_fractional() {
        assert_eq!(parse_ether("1").unwrap(), ether(1));
        assert_eq!(parse_ether("2.5").unwrap(), U256::from(2_500_000_000_000_000_000u128));
        assert_eq!(parse_ether("0.000000000000000001").unwrap(), U256::from(1));
        assert_eq!(parse_ether(".5").unwrap(), U256::from(500_000_000_000_000_000u128));
        assert_eq!(parse_ether("3.").unwrap(), ether(3));
        assert_eq!(parse_ether("0").unwrap(), U256::ZERO);
        assert_eq!(parse_ether("007.50").unwrap(), U256::from(7_500_000_000_000_000_000u128));
    }

    #[test]
    fn test_parse_keeps_full_precision() {
        assert_eq!(
            parse_ether("123456789.123456789123456789").unwrap(),
            U256::from(123_456_789_123_456_789_123_456_789u128)
        );
        // zeros past the 18th place carry no value
        assert_eq!(parse_ether("1.0000000000000000000000").unwrap(), ether(1));
    }

    #[test]
    fn test_parse_beyond_128_bits() {
        let wei = parse_ether("400000000000000000000").unwrap();
        assert_eq!(wei, ether(400_000_000_000_000_000) * U256::from(1000));
        assert!(wei > U256::from(u128::MAX));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "abc", "1.2.3", ".", "-1", " 1", "1e18", "0x10", "1,5"] {
            let err = parse_ether(bad).unwrap_err();
            assert!(matches!(err, VaultError::InvalidAmount(_)), "{:?} accepted", bad);
        }
    }

    #[test]
    fn test_parse_rejects_excess_precision() {
        assert!(parse_ether("0.0000000000000000001").is_err());
    }

    #[test]
    fn test_parse_rejects_overflow() {
        let too_many_digits = format!("1{}", "0".repeat(80));
        assert!(matches!(
            parse_ether(&too_many_digits),
            Err(VaultError::InvalidAmount(_))
        ));

        // fits in 256 bits as ether but not once scaled to wei
        let just_over = format!("1{}", "0".repeat(60));
        assert!(parse_ether(&just_over).is_err());
    }

    #[test]
    fn test_format_ether() {
        assert_eq!(format_ether(U256::ZERO), "0.0");
        assert_eq!(format_ether(ether(1)), "1.0");
        assert_eq!(format_ether(U256::from(2_500_000_000_000_000_000u128)), "2.5");
        assert_eq!(format_ether(U256::from(1)), "0.000000000000000001");
    }

    #[test]
    fn test_format_then_parse_is_identity() {
        for wei in [
            U256::ZERO,
            U256::from(1),
            U256::from(7),
            ether(1),
            U256::from(u128::MAX),
            U256::MAX,
        ] {
            assert_eq!(parse_ether(&format_ether(wei)).unwrap(), wei);
        }
    }
}
