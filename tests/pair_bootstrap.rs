use alloy_primitives::{Address, U256};
use dex_fixtures::artifacts::MINIMUM_LIQUIDITY;
use dex_fixtures::chain::Chain;
use dex_fixtures::config::DEFAULT_SWAP_FEE;
use dex_fixtures::ordering::sort_tokens;
use dex_fixtures::test_utils::{fund_test_wallets, initialize_logger, ALICE, BOB, CAROL};
use dex_fixtures::units::expand_to_18_decimals;
use dex_fixtures::{pair_fixture, PairFixture};

fn setup() -> eyre::Result<(Chain, PairFixture)> {
    initialize_logger();
    let mut chain = Chain::new();
    fund_test_wallets(&mut chain);
    let fixture = pair_fixture(&mut chain, ALICE, BOB, CAROL)?;
    Ok((chain, fixture))
}

#[test]
fn registers_five_pairs_resolvable_by_query() -> eyre::Result<()> {
    let (mut chain, fixture) = setup()?;
    let PairFixture {
        factory,
        wnative,
        token0,
        token1,
        protocol_token_a,
        protocol_token_b,
        pair,
        wnative_pair,
        wnative_pair_token0,
        protocol_a_pair,
        protocol_b_pair,
        ..
    } = fixture;

    let expected = [
        (token0.address, token1.address, pair.address),
        (token1.address, wnative.address, wnative_pair.address),
        (token0.address, wnative.address, wnative_pair_token0.address),
        (protocol_token_a.address, wnative.address, protocol_a_pair.address),
        (protocol_token_b.address, wnative.address, protocol_b_pair.address),
    ];
    for (a, b, pool) in expected {
        assert!(!pool.is_zero());
        // Lookup is order-insensitive.
        assert_eq!(factory.get_pair(&mut chain, a, b)?, pool);
        assert_eq!(factory.get_pair(&mut chain, b, a)?, pool);
    }

    // All five pools are distinct contracts.
    let pools = [
        pair.address,
        wnative_pair.address,
        wnative_pair_token0.address,
        protocol_a_pair.address,
        protocol_b_pair.address,
    ];
    for (i, a) in pools.iter().enumerate() {
        for b in &pools[i + 1..] {
            assert_ne!(a, b);
        }
    }

    // An unregistered combination stays at the zero address.
    assert_eq!(
        factory.get_pair(&mut chain, protocol_token_a.address, protocol_token_b.address)?,
        Address::ZERO
    );
    Ok(())
}

#[test]
fn canonical_ordering_matches_factory() -> eyre::Result<()> {
    let (mut chain, fixture) = setup()?;

    assert!(
        fixture.token0.address < fixture.token1.address,
        "fixture tokens must come out canonically ordered"
    );
    assert_eq!(fixture.pair.token0(&mut chain)?, fixture.token0.address);
    assert_eq!(fixture.pair.token1(&mut chain)?, fixture.token1.address);

    // Pools against the wrapped token order themselves the same way the
    // free function does, regardless of registration order.
    for (token, pool) in [
        (fixture.token1.address, &fixture.wnative_pair),
        (fixture.token0.address, &fixture.wnative_pair_token0),
        (fixture.protocol_token_a.address, &fixture.protocol_a_pair),
        (fixture.protocol_token_b.address, &fixture.protocol_b_pair),
    ] {
        let (expected0, expected1) = sort_tokens(token, fixture.wnative.address);
        assert_eq!(pool.token0(&mut chain)?, expected0);
        assert_eq!(pool.token1(&mut chain)?, expected1);
    }
    Ok(())
}

#[test]
fn seeds_protocol_pools_with_deterministic_liquidity() -> eyre::Result<()> {
    let (mut chain, fixture) = setup()?;
    let seed = expand_to_18_decimals(100);

    for pool in [&fixture.protocol_a_pair, &fixture.protocol_b_pair] {
        // sqrt(seed * seed) == seed, minus the locked minimum.
        assert_eq!(
            pool.balance_of(&mut chain, BOB)?,
            seed - MINIMUM_LIQUIDITY,
            "provider liquidity should be the full root minus the lock"
        );
        assert_eq!(pool.balance_of(&mut chain, Address::ZERO)?, MINIMUM_LIQUIDITY);
        assert_eq!(pool.total_supply(&mut chain)?, seed);
        assert_eq!(pool.get_reserves(&mut chain)?, (seed, seed));
    }
    Ok(())
}

#[test]
fn unseeded_pairs_remain_empty() -> eyre::Result<()> {
    let (mut chain, fixture) = setup()?;

    for pool in [
        &fixture.pair,
        &fixture.wnative_pair,
        &fixture.wnative_pair_token0,
    ] {
        assert_eq!(pool.total_supply(&mut chain)?, U256::ZERO);
        assert_eq!(pool.get_reserves(&mut chain)?, (U256::ZERO, U256::ZERO));
        assert_eq!(pool.balance_of(&mut chain, BOB)?, U256::ZERO);
    }
    Ok(())
}

#[test]
fn wrapped_native_deposit_backs_seeded_liquidity() -> eyre::Result<()> {
    let (mut chain, fixture) = setup()?;
    let seed = expand_to_18_decimals(100);

    // 1000 deposited, 100 moved into each of the two seeded pools.
    assert_eq!(
        fixture.wnative.balance_of(&mut chain, BOB)?,
        expand_to_18_decimals(800)
    );
    assert_eq!(
        fixture
            .wnative
            .balance_of(&mut chain, fixture.protocol_a_pair.address)?,
        seed
    );
    assert_eq!(
        fixture
            .wnative
            .balance_of(&mut chain, fixture.protocol_b_pair.address)?,
        seed
    );
    Ok(())
}

#[test]
fn second_mint_grows_liquidity_proportionally() -> eyre::Result<()> {
    let (mut chain, fixture) = setup()?;
    let seed = expand_to_18_decimals(100);
    let pool = &fixture.protocol_a_pair;

    fixture
        .protocol_token_a
        .transfer(&mut chain, pool.address, seed)?;
    fixture.wnative.transfer(&mut chain, pool.address, seed)?;
    let minted = pool.mint(&mut chain, BOB)?;

    // Matched amounts at equal reserves mint exactly the current supply.
    assert_eq!(minted, seed);
    assert_eq!(
        pool.balance_of(&mut chain, BOB)?,
        seed + seed - MINIMUM_LIQUIDITY
    );
    assert_eq!(pool.total_supply(&mut chain)?, seed + seed);
    assert_eq!(pool.get_reserves(&mut chain)?, (seed + seed, seed + seed));
    Ok(())
}

#[test]
fn pairs_carry_the_registered_swap_fee() -> eyre::Result<()> {
    let (mut chain, fixture) = setup()?;
    for pool in [
        &fixture.pair,
        &fixture.wnative_pair,
        &fixture.wnative_pair_token0,
        &fixture.protocol_a_pair,
        &fixture.protocol_b_pair,
    ] {
        assert_eq!(pool.swap_fee(&mut chain)?, DEFAULT_SWAP_FEE);
    }
    Ok(())
}
