use alloy_primitives::U256;
use dex_fixtures::abi::decode_address;
use dex_fixtures::chain::Chain;
use dex_fixtures::config::{BootstrapConfig, DeployerConfig, DEPLOYER_FUNDING};
use dex_fixtures::handles::{Deployer, Factory};
use dex_fixtures::test_utils::{fund_test_wallets, initialize_logger, ALICE, BOB, CAROL};
use dex_fixtures::units::expand_to_18_decimals;
use dex_fixtures::{factory_fixture, FactoryFixture, FixtureError};

fn setup() -> eyre::Result<(Chain, FactoryFixture)> {
    initialize_logger();
    let mut chain = Chain::new();
    fund_test_wallets(&mut chain);
    let fixture = factory_fixture(&mut chain, ALICE, CAROL)?;
    Ok((chain, fixture))
}

// Deploys a deployer with no pair rows, bound to the bootstrap's own
// token addresses, without running it.
fn bare_deployer(chain: &mut Chain, fixture: &FactoryFixture) -> eyre::Result<Deployer> {
    let deployer = Deployer::deploy(
        chain,
        ALICE,
        &DeployerConfig {
            admin: ALICE,
            wnative: fixture.wnative.address,
            token0s: Vec::new(),
            token1s: Vec::new(),
            swap_fees: Vec::new(),
            protocol_token_a: fixture.protocol_token_a.address,
            protocol_token_b: fixture.protocol_token_b.address,
            fee_recipient: CAROL,
            fee_setter_recipient: CAROL,
            protocol_fee_denominator: BootstrapConfig::default().protocol_fee_denominator,
        },
    )?;
    Ok(deployer)
}

#[test]
fn resolves_fee_controllers_from_factory() -> eyre::Result<()> {
    let (mut chain, fixture) = setup()?;
    let FactoryFixture {
        factory,
        fee_setter,
        fee_receiver,
        ..
    } = fixture;

    assert_eq!(
        factory.fee_to_setter(&mut chain)?,
        fee_setter.address,
        "feeToSetter query should match the bound handle"
    );
    assert_eq!(
        factory.fee_to(&mut chain)?,
        fee_receiver.address,
        "feeTo query should match the bound handle"
    );
    // Queries are pure reads; asking again returns the same addresses.
    assert_eq!(factory.fee_to_setter(&mut chain)?, fee_setter.address);
    assert_eq!(factory.fee_to(&mut chain)?, fee_receiver.address);

    assert_eq!(fee_setter.owner(&mut chain)?, CAROL);
    assert_eq!(fee_receiver.native_recipient(&mut chain)?, CAROL);
    Ok(())
}

#[test]
fn produces_distinct_nonzero_components() -> eyre::Result<()> {
    let (_, fixture) = setup()?;
    let addresses = [
        fixture.factory.address,
        fixture.fee_setter.address,
        fixture.fee_receiver.address,
        fixture.wnative.address,
        fixture.protocol_token_a.address,
        fixture.protocol_token_b.address,
    ];
    for (i, a) in addresses.iter().enumerate() {
        assert!(!a.is_zero(), "component {i} resolved to the zero address");
        for b in &addresses[i + 1..] {
            assert_ne!(a, b, "two components share an address");
        }
    }
    Ok(())
}

#[test]
fn protocol_tokens_hold_initial_supply() -> eyre::Result<()> {
    let (mut chain, fixture) = setup()?;
    let supply = expand_to_18_decimals(1000);

    for token in [&fixture.protocol_token_a, &fixture.protocol_token_b] {
        assert_eq!(token.total_supply(&mut chain)?, supply);
        assert_eq!(token.balance_of(&mut chain, ALICE)?, supply);
        assert_eq!(token.balance_of(&mut chain, BOB)?, U256::ZERO);
    }
    Ok(())
}

#[test]
fn unfunded_deployer_reverts() -> eyre::Result<()> {
    let (mut chain, fixture) = setup()?;
    let deployer = bare_deployer(&mut chain, &fixture)?;

    let err = deployer
        .trigger(&mut chain)
        .expect_err("deploy() without native funding must revert");
    assert!(matches!(err, FixtureError::Revert { .. }));
    Ok(())
}

#[test]
fn deployer_is_single_shot() -> eyre::Result<()> {
    let (mut chain, fixture) = setup()?;
    let deployer = bare_deployer(&mut chain, &fixture)?;
    chain.transfer(ALICE, deployer.address, DEPLOYER_FUNDING)?;

    deployer.trigger(&mut chain)?;
    let err = deployer
        .trigger(&mut chain)
        .expect_err("second deploy() must revert");
    assert!(matches!(err, FixtureError::Revert { .. }));
    Ok(())
}

#[test]
fn factory_address_recovered_from_first_log() -> eyre::Result<()> {
    let (mut chain, fixture) = setup()?;
    let deployer = bare_deployer(&mut chain, &fixture)?;
    chain.transfer(ALICE, deployer.address, DEPLOYER_FUNDING)?;

    let receipt = deployer.trigger(&mut chain)?;
    assert!(receipt.status);
    assert!(!receipt.logs.is_empty(), "deploy() must emit the factory log");

    let factory = Factory::bind(decode_address(&receipt.logs[0].data)?, ALICE);
    assert!(!factory.address.is_zero());
    // The decoded address answers factory queries, so the log and the
    // registry agree on which contract was created.
    assert!(!factory.fee_to(&mut chain)?.is_zero());
    assert!(!factory.fee_to_setter(&mut chain)?.is_zero());
    Ok(())
}
