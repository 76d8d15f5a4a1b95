//! U256 arithmetic used by the pair model.

use alloy_primitives::U256;

const ONE: U256 = U256::from_limbs([1, 0, 0, 0]);
const TWO: U256 = U256::from_limbs([2, 0, 0, 0]);
const THREE: U256 = U256::from_limbs([3, 0, 0, 0]);

/// Integer square root, rounding down (Babylonian method).
pub fn sqrt(y: U256) -> U256 {
    if y > THREE {
        let mut z = y;
        let mut x = y / TWO + ONE;
        while x < z {
            z = x;
            x = (y / x + x) / TWO;
        }
        z
    } else if y != U256::ZERO {
        ONE
    } else {
        U256::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::expand_to_18_decimals;

    #[test]
    fn small_values() {
        assert_eq!(sqrt(U256::ZERO), U256::ZERO);
        assert_eq!(sqrt(ONE), ONE);
        assert_eq!(sqrt(THREE), ONE);
        assert_eq!(sqrt(U256::from(4)), TWO);
        assert_eq!(sqrt(U256::from(8)), TWO);
        assert_eq!(sqrt(U256::from(9)), THREE);
    }

    #[test]
    fn perfect_square_of_pool_deposit() {
        // sqrt(100e18 * 100e18) is the first-mint liquidity before the
        // minimum-liquidity lock.
        let deposit = expand_to_18_decimals(100);
        assert_eq!(sqrt(deposit * deposit), deposit);
    }

    #[test]
    fn rounds_down() {
        let deposit = expand_to_18_decimals(100);
        assert_eq!(sqrt(deposit * deposit + ONE), deposit);
        assert_eq!(sqrt(deposit * deposit - ONE), deposit - ONE);
    }
}
