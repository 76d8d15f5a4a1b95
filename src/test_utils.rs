//! Shared helpers for fixture tests.

use std::sync::Once;

use alloy_primitives::{address, Address};
use tracing_subscriber::EnvFilter;

use crate::chain::Chain;
use crate::units::expand_to_18_decimals;

/// Administrator wallet: deploys and owns the infrastructure.
pub const ALICE: Address = address!("000000000000000000000000000000000000000A");
/// Liquidity-provider wallet: receives minted liquidity tokens.
pub const BOB: Address = address!("000000000000000000000000000000000000000B");
/// Fee-recipient wallet: destination for protocol fees.
pub const CAROL: Address = address!("000000000000000000000000000000000000000C");

static INIT: Once = Once::new();

/// Installs the tracing subscriber once per process.
pub fn initialize_logger() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

/// Funds the three test wallets with plenty of native currency.
pub fn fund_test_wallets(chain: &mut Chain) {
    for wallet in [ALICE, BOB, CAROL] {
        chain.fund(wallet, expand_to_18_decimals(10_000));
    }
}
