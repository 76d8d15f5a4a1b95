//! Fixture construction errors.

use alloy_primitives::Address;

pub type Result<T> = core::result::Result<T, FixtureError>;

/// Error raised while assembling a test environment.
///
/// Fixture construction is all-or-nothing: every variant aborts the
/// bootstrap and propagates to the caller. Nothing is retried; a failed
/// setup is an environment defect, not a recoverable condition.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// A contract constructor rejected its arguments.
    #[error("deployment of {artifact} failed: {reason}")]
    Deployment {
        artifact: &'static str,
        reason: String,
    },
    /// A committed transaction reverted.
    #[error("transaction to {to} reverted: {reason}")]
    Revert { to: Address, reason: String },
    /// A call targeted an address with no contract behind it.
    #[error("no contract deployed at {0}")]
    UnknownContract(Address),
    /// The contract does not implement the requested selector.
    #[error("unknown selector {selector:02x?} on contract at {to}")]
    UnknownSelector { to: Address, selector: [u8; 4] },
    /// The deployer's trigger receipt carried no logs, so the factory
    /// address cannot be recovered.
    #[error("deploy receipt contains no logs; factory address unresolvable")]
    MissingLogs,
    /// A registry query resolved to the zero address.
    #[error("{lookup} resolved to the zero address")]
    ZeroAddress { lookup: String },
    /// The deployer's parallel pair-registration lists disagree in length.
    #[error(
        "pair registration lists must match: {token0s} token0s, {token1s} token1s, {fees} fees"
    )]
    PairListMismatch {
        token0s: usize,
        token1s: usize,
        fees: usize,
    },
    /// ABI decoding of calldata, constructor arguments, or log data failed.
    #[error(transparent)]
    Abi(#[from] alloy_sol_types::Error),
}
