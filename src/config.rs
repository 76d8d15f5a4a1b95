//! Named deployment configuration.
//!
//! Every constant the bootstrap bakes into the chain (supplies, fee tiers,
//! funding amounts) lives here as named configuration rather than inline
//! magic numbers, so tests can vary them without touching the pipeline.

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolValue;

use crate::error::{FixtureError, Result};
use crate::units::{expand_to_18_decimals, expand_to_decimals};

/// Uniform swap fee registered for every bootstrap pair, in basis points.
pub const DEFAULT_SWAP_FEE: u32 = 15;

/// Native value the one-shot deployer must hold before `deploy()` runs.
/// Fixed protocol requirement, not a tunable.
pub const DEPLOYER_FUNDING: U256 = U256::from_limbs([1, 0, 0, 0]);

/// Tunable amounts consumed by the bootstrap procedures.
#[derive(Clone, Debug)]
pub struct BootstrapConfig {
    /// Initial supply of each protocol token in the factory bootstrap.
    pub protocol_token_supply: U256,
    /// Initial supply of every token deployed by the pair bootstrap.
    pub trading_token_supply: U256,
    /// Native amount the liquidity provider wraps during the pair bootstrap.
    pub wnative_deposit: U256,
    /// Per-side deposit seeded into each protocol-token pool before `mint`.
    pub seed_amount: U256,
    /// Swap fee registered for every pre-created pair.
    pub swap_fee: u32,
    /// Protocol fee denominator forwarded to the deployer.
    pub protocol_fee_denominator: U256,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            protocol_token_supply: expand_to_18_decimals(1000),
            trading_token_supply: expand_to_18_decimals(10_000),
            wnative_deposit: expand_to_18_decimals(1000),
            seed_amount: expand_to_18_decimals(100),
            swap_fee: DEFAULT_SWAP_FEE,
            protocol_fee_denominator: expand_to_decimals(5, 9),
        }
    }
}

/// Constructor input of the one-shot deployer, consumed exactly once.
///
/// The three parallel lists describe the pairs created during the deploy
/// step: row `i` registers `(token0s[i], token1s[i])` at `swap_fees[i]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployerConfig {
    pub admin: Address,
    pub wnative: Address,
    pub token0s: Vec<Address>,
    pub token1s: Vec<Address>,
    pub swap_fees: Vec<u32>,
    pub protocol_token_a: Address,
    pub protocol_token_b: Address,
    pub fee_recipient: Address,
    pub fee_setter_recipient: Address,
    pub protocol_fee_denominator: U256,
}

type DeployerConfigTuple = (
    Address,
    Address,
    Vec<Address>,
    Vec<Address>,
    Vec<u32>,
    Address,
    Address,
    Address,
    Address,
    U256,
);

impl DeployerConfig {
    /// The parallel registration lists must describe the same rows.
    pub fn validate(&self) -> Result<()> {
        if self.token0s.len() != self.token1s.len() || self.token0s.len() != self.swap_fees.len() {
            return Err(FixtureError::PairListMismatch {
                token0s: self.token0s.len(),
                token1s: self.token1s.len(),
                fees: self.swap_fees.len(),
            });
        }
        Ok(())
    }

    /// Registered `(token0, token1, fee)` rows in declaration order.
    pub fn pairs(&self) -> impl Iterator<Item = (Address, Address, u32)> + '_ {
        self.token0s
            .iter()
            .zip(&self.token1s)
            .zip(&self.swap_fees)
            .map(|((a, b), fee)| (*a, *b, *fee))
    }

    /// Standard ABI encoding of the constructor tuple.
    pub fn abi_encode(&self) -> Vec<u8> {
        (
            self.admin,
            self.wnative,
            self.token0s.clone(),
            self.token1s.clone(),
            self.swap_fees.clone(),
            self.protocol_token_a,
            self.protocol_token_b,
            self.fee_recipient,
            self.fee_setter_recipient,
            self.protocol_fee_denominator,
        )
            .abi_encode()
    }

    pub fn abi_decode(data: &[u8]) -> Result<Self> {
        let (
            admin,
            wnative,
            token0s,
            token1s,
            swap_fees,
            protocol_token_a,
            protocol_token_b,
            fee_recipient,
            fee_setter_recipient,
            protocol_fee_denominator,
        ) = <DeployerConfigTuple>::abi_decode(data, true)?;
        Ok(Self {
            admin,
            wnative,
            token0s,
            token1s,
            swap_fees,
            protocol_token_a,
            protocol_token_b,
            fee_recipient,
            fee_setter_recipient,
            protocol_fee_denominator,
        })
    }
}
