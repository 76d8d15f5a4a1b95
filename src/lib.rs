//! Deterministic test-environment bootstrap for a DEX contract suite.
//!
//! This crate provisions a pair factory, its fee-control contracts, and a
//! set of liquidity-bearing trading pairs on an in-memory chain, producing
//! the object graph that downstream AMM tests exercise. The two entry
//! points are [`factory_fixture`] and [`pair_fixture`]; both run a strictly
//! sequential deployment pipeline in which every step consumes addresses
//! produced by earlier ones (log-decoded for the factory itself, resolved
//! through factory queries for everything behind it).

pub mod abi;
pub mod artifacts;
pub mod chain;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod handles;
pub mod math;
pub mod ordering;
pub mod test_utils;
pub mod units;

pub use error::{FixtureError, Result};
pub use fixtures::{factory_fixture, pair_fixture, FactoryFixture, PairFixture};
