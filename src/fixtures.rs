//! The two composed bootstrap procedures.
//!
//! Both run the same linear pipeline: deploy leaf tokens, deploy and fund
//! the one-shot deployer, trigger it, recover the factory address from the
//! trigger receipt's first log, then resolve everything behind the factory
//! through its own query interface. The pair variant additionally
//! pre-registers five pairs and seeds the two protocol-token pools with
//! matched deposits.

use alloy_primitives::Address;
use tracing::info;

use crate::abi::decode_address;
use crate::chain::{Chain, TxReceipt};
use crate::config::{BootstrapConfig, DeployerConfig, DEPLOYER_FUNDING};
use crate::error::{FixtureError, Result};
use crate::handles::{Deployer, Erc20, Factory, FeeReceiver, FeeSetter, Pair, Wnative};
use crate::ordering::sort_tokens;

/// Object graph produced by the factory bootstrap.
pub struct FactoryFixture {
    pub factory: Factory,
    pub fee_setter: FeeSetter,
    pub fee_receiver: FeeReceiver,
    pub wnative: Wnative,
    pub protocol_token_a: Erc20,
    pub protocol_token_b: Erc20,
}

/// Object graph produced by the pair bootstrap: the factory graph plus
/// trading tokens and the five pre-registered pools, with the two
/// protocol-token pools seeded.
pub struct PairFixture {
    pub factory: Factory,
    pub fee_setter: FeeSetter,
    pub fee_receiver: FeeReceiver,
    pub wnative: Wnative,
    pub protocol_token_a: Erc20,
    pub protocol_token_b: Erc20,
    pub token0: Erc20,
    pub token1: Erc20,
    /// Canonical (token0, token1) pool.
    pub pair: Pair,
    /// (token1, wnative) pool.
    pub wnative_pair: Pair,
    /// (token0, wnative) pool.
    pub wnative_pair_token0: Pair,
    /// Seeded (protocol token A, wnative) pool.
    pub protocol_a_pair: Pair,
    /// Seeded (protocol token B, wnative) pool.
    pub protocol_b_pair: Pair,
}

/// Provisions the factory and its fee-control contracts.
pub fn factory_fixture(
    chain: &mut Chain,
    admin: Address,
    fee_target: Address,
) -> Result<FactoryFixture> {
    factory_fixture_with(chain, &BootstrapConfig::default(), admin, fee_target)
}

pub fn factory_fixture_with(
    chain: &mut Chain,
    config: &BootstrapConfig,
    admin: Address,
    fee_target: Address,
) -> Result<FactoryFixture> {
    let wnative = Wnative::deploy(chain, admin)?;
    let protocol_token_a = Erc20::deploy(chain, admin, config.protocol_token_supply)?;
    let protocol_token_b = Erc20::deploy(chain, admin, config.protocol_token_supply)?;

    let deployer = Deployer::deploy(
        chain,
        admin,
        &DeployerConfig {
            admin,
            wnative: wnative.address,
            token0s: Vec::new(),
            token1s: Vec::new(),
            swap_fees: Vec::new(),
            protocol_token_a: protocol_token_a.address,
            protocol_token_b: protocol_token_b.address,
            fee_recipient: fee_target,
            fee_setter_recipient: fee_target,
            protocol_fee_denominator: config.protocol_fee_denominator,
        },
    )?;
    chain.transfer(admin, deployer.address, DEPLOYER_FUNDING)?;
    let receipt = deployer.trigger(chain)?;

    let factory = Factory::bind(factory_address_from_logs(&receipt)?, admin);
    let fee_setter = FeeSetter::bind(resolved(factory.fee_to_setter(chain)?, "feeToSetter()")?, admin);
    let fee_receiver = FeeReceiver::bind(resolved(factory.fee_to(chain)?, "feeTo()")?, admin);
    info!(factory = %factory.address, "factory bootstrap complete");

    Ok(FactoryFixture {
        factory,
        fee_setter,
        fee_receiver,
        wnative,
        protocol_token_a,
        protocol_token_b,
    })
}

/// Provisions the factory graph plus five pre-registered pairs, and seeds
/// the two protocol-token pools.
pub fn pair_fixture(
    chain: &mut Chain,
    admin: Address,
    provider: Address,
    fee_target: Address,
) -> Result<PairFixture> {
    pair_fixture_with(chain, &BootstrapConfig::default(), admin, provider, fee_target)
}

pub fn pair_fixture_with(
    chain: &mut Chain,
    config: &BootstrapConfig,
    admin: Address,
    provider: Address,
    fee_target: Address,
) -> Result<PairFixture> {
    let token_a = Erc20::deploy(chain, provider, config.trading_token_supply)?;
    let token_b = Erc20::deploy(chain, provider, config.trading_token_supply)?;
    let wnative = Wnative::deploy(chain, provider)?;
    wnative.deposit(chain, config.wnative_deposit)?;
    let protocol_token_a = Erc20::deploy(chain, admin, config.trading_token_supply)?;
    let protocol_token_b = Erc20::deploy(chain, admin, config.trading_token_supply)?;

    let (token0, token1) = if sort_tokens(token_a.address, token_b.address).0 == token_a.address {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    };

    let deployer = Deployer::deploy(
        chain,
        admin,
        &DeployerConfig {
            admin,
            wnative: wnative.address,
            token0s: vec![
                token0.address,
                token1.address,
                token0.address,
                protocol_token_a.address,
                protocol_token_b.address,
            ],
            token1s: vec![
                token1.address,
                wnative.address,
                wnative.address,
                wnative.address,
                wnative.address,
            ],
            swap_fees: vec![config.swap_fee; 5],
            protocol_token_a: protocol_token_a.address,
            protocol_token_b: protocol_token_b.address,
            fee_recipient: fee_target,
            fee_setter_recipient: fee_target,
            protocol_fee_denominator: config.protocol_fee_denominator,
        },
    )?;
    chain.transfer(admin, deployer.address, DEPLOYER_FUNDING)?;
    let receipt = deployer.trigger(chain)?;

    let factory = Factory::bind(factory_address_from_logs(&receipt)?, admin);
    let fee_setter = FeeSetter::bind(resolved(factory.fee_to_setter(chain)?, "feeToSetter()")?, admin);
    let fee_receiver = FeeReceiver::bind(resolved(factory.fee_to(chain)?, "feeTo()")?, admin);

    // The deployer created the pairs as a batch, so their addresses are
    // resolvable only through the factory registry.
    let pair = lookup_pair(chain, &factory, token0.address, token1.address)?;
    let wnative_pair = lookup_pair(chain, &factory, token1.address, wnative.address)?;
    let wnative_pair_token0 = lookup_pair(chain, &factory, token0.address, wnative.address)?;
    let protocol_a_pair = lookup_pair(chain, &factory, protocol_token_a.address, wnative.address)?;
    let protocol_b_pair = lookup_pair(chain, &factory, protocol_token_b.address, wnative.address)?;

    seed_pool(chain, config, &protocol_token_a, &wnative, &protocol_a_pair, provider)?;
    seed_pool(chain, config, &protocol_token_b, &wnative, &protocol_b_pair, provider)?;
    info!(factory = %factory.address, "pair bootstrap complete");

    Ok(PairFixture {
        factory,
        fee_setter,
        fee_receiver,
        wnative,
        protocol_token_a,
        protocol_token_b,
        token0,
        token1,
        pair,
        wnative_pair,
        wnative_pair_token0,
        protocol_a_pair,
        protocol_b_pair,
    })
}

/// Recovers the factory address from the trigger receipt.
///
/// The deployer surfaces the new factory only through log index 0, whose
/// data field is a single ABI-encoded address; there is no query fallback
/// before the factory handle exists. An empty log list is fatal.
fn factory_address_from_logs(receipt: &TxReceipt) -> Result<Address> {
    let log = receipt.logs.first().ok_or(FixtureError::MissingLogs)?;
    decode_address(&log.data)
}

fn resolved(address: Address, lookup: &str) -> Result<Address> {
    if address.is_zero() {
        return Err(FixtureError::ZeroAddress {
            lookup: lookup.to_string(),
        });
    }
    Ok(address)
}

fn lookup_pair(chain: &mut Chain, factory: &Factory, a: Address, b: Address) -> Result<Pair> {
    let address = factory.get_pair(chain, a, b)?;
    if address.is_zero() {
        return Err(FixtureError::ZeroAddress {
            lookup: format!("getPair({a}, {b})"),
        });
    }
    Ok(Pair::bind(address, factory.signer))
}

/// Low-level liquidity provision: move both sides straight into the pool,
/// then mint against the pool's own balance accounting. No router-style
/// entry point exists at this layer.
fn seed_pool(
    chain: &mut Chain,
    config: &BootstrapConfig,
    token: &Erc20,
    wnative: &Wnative,
    pool: &Pair,
    provider: Address,
) -> Result<()> {
    token.transfer(chain, pool.address, config.seed_amount)?;
    wnative.transfer(chain, pool.address, config.seed_amount)?;
    pool.mint(chain, provider)?;
    Ok(())
}
