//! Selector and calldata helpers.
//!
//! Calldata follows the standard Solidity ABI: a 4-byte keccak selector
//! followed by the ABI-encoded arguments. Query outputs and log data fields
//! decode through the same encoding.

use alloy_primitives::{keccak256, Address, U256};
use alloy_sol_types::SolValue;

use crate::error::Result;

/// First four bytes of `keccak256(sig)`.
pub fn get_selector_from_sig(sig: &str) -> [u8; 4] {
    let hash = keccak256(sig.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Prepends the selector to ABI-encoded arguments.
pub fn get_calldata(selector: [u8; 4], mut args: Vec<u8>) -> Vec<u8> {
    let mut calldata = selector.to_vec();
    calldata.append(&mut args);
    calldata
}

/// Decodes a single ABI-encoded address word, e.g. a factory query output
/// or the data field of the deployer's log.
pub fn decode_address(data: &[u8]) -> Result<Address> {
    Ok(Address::abi_decode(data, true)?)
}

/// Decodes a single ABI-encoded uint256 word.
pub fn decode_u256(data: &[u8]) -> Result<U256> {
    Ok(U256::abi_decode(data, true)?)
}
