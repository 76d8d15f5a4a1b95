//! Typed handles over deployed contracts.
//!
//! A handle is an (address, bound signer) view of a live contract,
//! constructed once the address is known: returned from a deployment,
//! decoded from a log, or resolved through a factory query. Handles are
//! immutable; [`Erc20::connect`] and friends return a rebound copy.

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolValue;

use crate::abi::{decode_address, decode_u256, get_calldata, get_selector_from_sig};
use crate::artifacts::Artifact;
use crate::chain::{Chain, TxReceipt};
use crate::config::DeployerConfig;
use crate::error::Result;

/// Generic token handle; also used for the protocol and trading tokens.
#[derive(Clone, Copy, Debug)]
pub struct Erc20 {
    pub address: Address,
    pub signer: Address,
}

impl Erc20 {
    pub fn deploy(chain: &mut Chain, signer: Address, initial_supply: U256) -> Result<Self> {
        let address = chain.deploy(signer, Artifact::Erc20, Some(initial_supply.abi_encode()))?;
        Ok(Self { address, signer })
    }

    pub fn bind(address: Address, signer: Address) -> Self {
        Self { address, signer }
    }

    pub fn connect(&self, signer: Address) -> Self {
        Self {
            address: self.address,
            signer,
        }
    }

    pub fn transfer(&self, chain: &mut Chain, to: Address, amount: U256) -> Result<()> {
        let calldata = get_calldata(
            get_selector_from_sig("transfer(address,uint256)"),
            (to, amount).abi_encode(),
        );
        chain.run_tx(self.signer, self.address, U256::ZERO, calldata)?;
        Ok(())
    }

    pub fn balance_of(&self, chain: &mut Chain, owner: Address) -> Result<U256> {
        let calldata = get_calldata(
            get_selector_from_sig("balanceOf(address)"),
            owner.abi_encode(),
        );
        let receipt = chain.run_tx(self.signer, self.address, U256::ZERO, calldata)?;
        decode_u256(&receipt.output)
    }

    pub fn total_supply(&self, chain: &mut Chain) -> Result<U256> {
        let calldata = get_calldata(get_selector_from_sig("totalSupply()"), Vec::new());
        let receipt = chain.run_tx(self.signer, self.address, U256::ZERO, calldata)?;
        decode_u256(&receipt.output)
    }
}

/// Wrapped-native-token handle.
#[derive(Clone, Copy, Debug)]
pub struct Wnative {
    pub address: Address,
    pub signer: Address,
}

impl Wnative {
    pub fn deploy(chain: &mut Chain, signer: Address) -> Result<Self> {
        let address = chain.deploy(signer, Artifact::Wnative, None)?;
        Ok(Self { address, signer })
    }

    /// Wraps `value` native currency into a wrapped balance for the signer.
    pub fn deposit(&self, chain: &mut Chain, value: U256) -> Result<()> {
        let calldata = get_calldata(get_selector_from_sig("deposit()"), Vec::new());
        chain.run_tx(self.signer, self.address, value, calldata)?;
        Ok(())
    }

    /// The wrapped token's ERC20 surface.
    pub fn as_erc20(&self) -> Erc20 {
        Erc20 {
            address: self.address,
            signer: self.signer,
        }
    }

    pub fn transfer(&self, chain: &mut Chain, to: Address, amount: U256) -> Result<()> {
        self.as_erc20().transfer(chain, to, amount)
    }

    pub fn balance_of(&self, chain: &mut Chain, owner: Address) -> Result<U256> {
        self.as_erc20().balance_of(chain, owner)
    }
}

/// One-shot deployer handle.
#[derive(Clone, Copy, Debug)]
pub struct Deployer {
    pub address: Address,
    pub signer: Address,
}

impl Deployer {
    pub fn deploy(chain: &mut Chain, signer: Address, config: &DeployerConfig) -> Result<Self> {
        let address = chain.deploy(signer, Artifact::Deployer, Some(config.abi_encode()))?;
        Ok(Self { address, signer })
    }

    /// Fires the one-shot `deploy()` batch and returns its receipt; the
    /// first log's data field carries the new factory address.
    pub fn trigger(&self, chain: &mut Chain) -> Result<TxReceipt> {
        let calldata = get_calldata(get_selector_from_sig("deploy()"), Vec::new());
        chain.run_tx(self.signer, self.address, U256::ZERO, calldata)
    }
}

/// Factory handle; the authoritative registry for pair lookups.
#[derive(Clone, Copy, Debug)]
pub struct Factory {
    pub address: Address,
    pub signer: Address,
}

impl Factory {
    pub fn bind(address: Address, signer: Address) -> Self {
        Self { address, signer }
    }

    fn query(&self, chain: &mut Chain, sig: &str, args: Vec<u8>) -> Result<TxReceipt> {
        let calldata = get_calldata(get_selector_from_sig(sig), args);
        chain.run_tx(self.signer, self.address, U256::ZERO, calldata)
    }

    pub fn fee_to(&self, chain: &mut Chain) -> Result<Address> {
        decode_address(&self.query(chain, "feeTo()", Vec::new())?.output)
    }

    pub fn fee_to_setter(&self, chain: &mut Chain) -> Result<Address> {
        decode_address(&self.query(chain, "feeToSetter()", Vec::new())?.output)
    }

    /// Order-insensitive pair lookup; the zero address means "absent".
    pub fn get_pair(&self, chain: &mut Chain, a: Address, b: Address) -> Result<Address> {
        let receipt = self.query(chain, "getPair(address,address)", (a, b).abi_encode())?;
        decode_address(&receipt.output)
    }
}

/// Fee-setter handle, wired by the deployer.
#[derive(Clone, Copy, Debug)]
pub struct FeeSetter {
    pub address: Address,
    pub signer: Address,
}

impl FeeSetter {
    pub fn bind(address: Address, signer: Address) -> Self {
        Self { address, signer }
    }

    pub fn owner(&self, chain: &mut Chain) -> Result<Address> {
        let calldata = get_calldata(get_selector_from_sig("owner()"), Vec::new());
        let receipt = chain.run_tx(self.signer, self.address, U256::ZERO, calldata)?;
        decode_address(&receipt.output)
    }
}

/// Fee-receiver handle, wired by the deployer.
#[derive(Clone, Copy, Debug)]
pub struct FeeReceiver {
    pub address: Address,
    pub signer: Address,
}

impl FeeReceiver {
    pub fn bind(address: Address, signer: Address) -> Self {
        Self { address, signer }
    }

    pub fn native_recipient(&self, chain: &mut Chain) -> Result<Address> {
        let calldata = get_calldata(get_selector_from_sig("ethReceiver()"), Vec::new());
        let receipt = chain.run_tx(self.signer, self.address, U256::ZERO, calldata)?;
        decode_address(&receipt.output)
    }
}

/// Pool handle; the LP token surface shares the ERC20 methods.
#[derive(Clone, Copy, Debug)]
pub struct Pair {
    pub address: Address,
    pub signer: Address,
}

impl Pair {
    pub fn bind(address: Address, signer: Address) -> Self {
        Self { address, signer }
    }

    pub fn connect(&self, signer: Address) -> Self {
        Self {
            address: self.address,
            signer,
        }
    }

    fn query(&self, chain: &mut Chain, sig: &str, args: Vec<u8>) -> Result<TxReceipt> {
        let calldata = get_calldata(get_selector_from_sig(sig), args);
        chain.run_tx(self.signer, self.address, U256::ZERO, calldata)
    }

    /// Mints liquidity against tokens already transferred into the pool,
    /// crediting `to`. Returns the minted liquidity amount.
    pub fn mint(&self, chain: &mut Chain, to: Address) -> Result<U256> {
        let receipt = self.query(chain, "mint(address)", to.abi_encode())?;
        decode_u256(&receipt.output)
    }

    pub fn token0(&self, chain: &mut Chain) -> Result<Address> {
        decode_address(&self.query(chain, "token0()", Vec::new())?.output)
    }

    pub fn token1(&self, chain: &mut Chain) -> Result<Address> {
        decode_address(&self.query(chain, "token1()", Vec::new())?.output)
    }

    pub fn swap_fee(&self, chain: &mut Chain) -> Result<u32> {
        let receipt = self.query(chain, "swapFee()", Vec::new())?;
        Ok(u32::abi_decode(&receipt.output, true)?)
    }

    pub fn get_reserves(&self, chain: &mut Chain) -> Result<(U256, U256)> {
        let receipt = self.query(chain, "getReserves()", Vec::new())?;
        let (reserve0, reserve1, _) = <(U256, U256, U256)>::abi_decode(&receipt.output, true)?;
        Ok((reserve0, reserve1))
    }

    pub fn balance_of(&self, chain: &mut Chain, owner: Address) -> Result<U256> {
        let calldata = get_calldata(
            get_selector_from_sig("balanceOf(address)"),
            owner.abi_encode(),
        );
        let receipt = chain.run_tx(self.signer, self.address, U256::ZERO, calldata)?;
        decode_u256(&receipt.output)
    }

    pub fn total_supply(&self, chain: &mut Chain) -> Result<U256> {
        let calldata = get_calldata(get_selector_from_sig("totalSupply()"), Vec::new());
        let receipt = chain.run_tx(self.signer, self.address, U256::ZERO, calldata)?;
        decode_u256(&receipt.output)
    }
}
