//! Decimal scaling helpers for token amounts.

use alloy_primitives::U256;

/// Scales `n` whole units into the 18-decimal smallest-unit representation.
pub fn expand_to_18_decimals(n: u64) -> U256 {
    expand_to_decimals(n, 18)
}

/// Scales `n` by `10^decimals`.
pub fn expand_to_decimals(n: u64, decimals: u8) -> U256 {
    U256::from(n) * U256::from(10u8).pow(U256::from(decimals))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_whole_units() {
        assert_eq!(expand_to_18_decimals(0), U256::ZERO);
        assert_eq!(expand_to_18_decimals(1), U256::from(10).pow(U256::from(18)));
        assert_eq!(
            expand_to_18_decimals(100),
            U256::from(10).pow(U256::from(20))
        );
    }

    #[test]
    fn expands_arbitrary_decimals() {
        assert_eq!(expand_to_decimals(5, 0), U256::from(5));
        assert_eq!(expand_to_decimals(5, 9), U256::from(5_000_000_000u64));
    }
}
