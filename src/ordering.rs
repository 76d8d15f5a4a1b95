//! Canonical token-pair ordering.
//!
//! The factory indexes every pair under the address-sorted
//! (token0, token1) key. Fixture code and the factory model share this one
//! function, so the two orderings cannot drift apart.

use alloy_primitives::Address;

/// Returns the canonical (token0, token1) ordering, lower address first.
pub fn sort_tokens(a: Address, b: Address) -> (Address, Address) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}
