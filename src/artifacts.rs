//! Modeled contract artifacts.
//!
//! The real contract suite ships as pre-compiled artifacts that the
//! bootstrap treats as black boxes with a known interface. The test chain
//! models those interfaces as deterministic state machines dispatched by
//! their Solidity selectors, so the fixtures exercise the exact wire-level
//! ABI (calldata, query outputs, log data) a live chain would.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};

use crate::config::DeployerConfig;

/// Liquidity permanently locked to the zero address on a pool's first mint.
pub const MINIMUM_LIQUIDITY: U256 = U256::from_limbs([1000, 0, 0, 0]);

/// Artifact kinds an external signer can deploy directly.
///
/// The factory, fee-control, and pair contracts are never deployed
/// directly: the one-shot deployer creates them as an atomic batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Artifact {
    Erc20,
    Wnative,
    Deployer,
}

/// Balance ledger shared by ERC20 tokens, the wrapped-native token, and
/// pair liquidity tokens.
#[derive(Clone, Debug, Default)]
pub(crate) struct TokenState {
    balances: HashMap<Address, U256>,
    total_supply: U256,
}

impl TokenState {
    pub fn with_supply(owner: Address, supply: U256) -> Self {
        let mut state = Self::default();
        state.mint(owner, supply);
        state
    }

    pub fn mint(&mut self, to: Address, amount: U256) {
        let balance = self.balances.entry(to).or_default();
        *balance += amount;
        self.total_supply += amount;
    }

    /// Moves `amount` between holders; `false` when `from` cannot cover it.
    pub fn transfer(&mut self, from: Address, to: Address, amount: U256) -> bool {
        let Some(from_balance) = self.balances.get_mut(&from) else {
            return amount.is_zero();
        };
        if *from_balance < amount {
            return false;
        }
        *from_balance -= amount;
        *self.balances.entry(to).or_default() += amount;
        true
    }

    pub fn balance_of(&self, owner: Address) -> U256 {
        self.balances.get(&owner).copied().unwrap_or(U256::ZERO)
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }
}

#[derive(Clone, Debug)]
pub(crate) struct DeployerState {
    pub config: DeployerConfig,
    /// One-shot: set after the first successful `deploy()`.
    pub spent: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct FactoryState {
    pub fee_to: Address,
    pub fee_to_setter: Address,
    pub protocol_fee_denominator: U256,
    /// Canonically ordered (token0, token1) -> pair address.
    pub pairs: HashMap<(Address, Address), Address>,
}

#[derive(Clone, Debug)]
pub(crate) struct PairState {
    pub token0: Address,
    pub token1: Address,
    pub swap_fee: u32,
    pub reserve0: U256,
    pub reserve1: U256,
    /// Liquidity-token ledger.
    pub lp: TokenState,
}

#[derive(Clone, Debug)]
pub(crate) struct FeeSetterState {
    pub owner: Address,
}

#[derive(Clone, Debug)]
pub(crate) struct FeeReceiverState {
    pub admin: Address,
    pub native_recipient: Address,
}

#[derive(Clone, Debug)]
pub(crate) enum ContractState {
    Token(TokenState),
    Wnative(TokenState),
    Deployer(DeployerState),
    Factory(FactoryState),
    FeeSetter(FeeSetterState),
    FeeReceiver(FeeReceiverState),
    Pair(PairState),
}
