//! In-memory chain harness.
//!
//! A strictly sequential transaction pipeline backed by a revm account
//! store: every deployment or transaction commits before the next step
//! runs, which the bootstrap relies on because later steps consume
//! addresses and state produced by earlier ones. Contract behavior is
//! dispatched by Solidity selector against the modeled artifacts, and
//! CREATE addresses derive from the creator's account nonce, so two runs
//! with the same inputs produce the same object graph.

use std::collections::{HashMap, HashSet};

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_sol_types::SolValue;
use revm::InMemoryDB;
use tracing::{debug, info};

use crate::abi::get_selector_from_sig;
use crate::artifacts::{
    Artifact, ContractState, DeployerState, FactoryState, FeeReceiverState, FeeSetterState,
    PairState, TokenState, MINIMUM_LIQUIDITY,
};
use crate::config::DeployerConfig;
use crate::error::{FixtureError, Result};
use crate::math::sqrt;
use crate::ordering::sort_tokens;

/// A single emitted event.
#[derive(Clone, Debug)]
pub struct LogEntry {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

/// Committed transaction outcome; doubles as the receipt the fixtures
/// fetch for log decoding.
#[derive(Clone, Debug)]
pub struct TxReceipt {
    pub status: bool,
    pub output: Bytes,
    pub logs: Vec<LogEntry>,
}

enum Kind {
    Token,
    Wnative,
    Deployer,
    Factory,
    FeeSetter,
    FeeReceiver,
    Pair,
}

/// The in-process chain client the fixtures are built against.
pub struct Chain {
    db: InMemoryDB,
    contracts: HashMap<Address, ContractState>,
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl Chain {
    pub fn new() -> Self {
        Self {
            db: InMemoryDB::default(),
            contracts: HashMap::new(),
        }
    }

    /// Credits `amount` of native currency to `address`.
    pub fn fund(&mut self, address: Address, amount: U256) {
        let info = self.account(address);
        info.balance = info.balance.saturating_add(amount);
    }

    /// Native-currency balance of `address`.
    pub fn balance(&mut self, address: Address) -> U256 {
        self.account(address).balance
    }

    /// Plain native-currency send, e.g. funding the one-shot deployer.
    pub fn transfer(&mut self, from: Address, to: Address, value: U256) -> Result<()> {
        self.move_native(from, to, value)?;
        debug!(%from, %to, %value, "native transfer");
        Ok(())
    }

    /// Deploys an artifact under `signer` and returns the new address.
    ///
    /// Constructor arguments travel as ABI-encoded bytes, exactly as they
    /// would alongside real deployment bytecode.
    pub fn deploy(
        &mut self,
        signer: Address,
        artifact: Artifact,
        constructor: Option<Vec<u8>>,
    ) -> Result<Address> {
        let state = match artifact {
            Artifact::Erc20 => {
                let Some(data) = constructor else {
                    return Err(FixtureError::Deployment {
                        artifact: "ERC20",
                        reason: "missing initial supply".into(),
                    });
                };
                let supply = U256::abi_decode(&data, true)?;
                ContractState::Token(TokenState::with_supply(signer, supply))
            }
            Artifact::Wnative => ContractState::Wnative(TokenState::default()),
            Artifact::Deployer => {
                let Some(data) = constructor else {
                    return Err(FixtureError::Deployment {
                        artifact: "deployer",
                        reason: "missing configuration".into(),
                    });
                };
                let config = DeployerConfig::abi_decode(&data)?;
                config.validate()?;
                ContractState::Deployer(DeployerState {
                    config,
                    spent: false,
                })
            }
        };
        let address = self.register(signer, state);
        info!(?artifact, %address, "deployed contract");
        Ok(address)
    }

    /// Submits a transaction and commits its effects.
    ///
    /// Reverts surface as [`FixtureError::Revert`]; nothing partial is
    /// committed past the native value transfer of a reverted call, which
    /// no fixture path relies on.
    pub fn run_tx(
        &mut self,
        caller: Address,
        to: Address,
        value: U256,
        calldata: Vec<u8>,
    ) -> Result<TxReceipt> {
        if calldata.len() < 4 {
            return Err(FixtureError::Revert {
                to,
                reason: "calldata shorter than a selector".into(),
            });
        }
        let selector = [calldata[0], calldata[1], calldata[2], calldata[3]];
        let params = &calldata[4..];

        let kind = match self.contracts.get(&to) {
            Some(ContractState::Token(_)) => Kind::Token,
            Some(ContractState::Wnative(_)) => Kind::Wnative,
            Some(ContractState::Deployer(_)) => Kind::Deployer,
            Some(ContractState::Factory(_)) => Kind::Factory,
            Some(ContractState::FeeSetter(_)) => Kind::FeeSetter,
            Some(ContractState::FeeReceiver(_)) => Kind::FeeReceiver,
            Some(ContractState::Pair(_)) => Kind::Pair,
            None => return Err(FixtureError::UnknownContract(to)),
        };
        self.move_native(caller, to, value)?;

        let (output, logs) = match kind {
            Kind::Token => self
                .exec_erc20_surface(to, caller, selector, params)?
                .ok_or(FixtureError::UnknownSelector { to, selector })?,
            Kind::Wnative => self.exec_wnative(to, caller, value, selector, params)?,
            Kind::Deployer => self.exec_deployer(to, selector)?,
            Kind::Factory => self.exec_factory(to, selector, params)?,
            Kind::FeeSetter => self.exec_fee_setter(to, selector)?,
            Kind::FeeReceiver => self.exec_fee_receiver(to, selector)?,
            Kind::Pair => self.exec_pair(to, caller, selector, params)?,
        };
        Ok(TxReceipt {
            status: true,
            output,
            logs,
        })
    }

    // --- account store ---------------------------------------------------

    fn account(&mut self, address: Address) -> &mut revm::primitives::AccountInfo {
        let account = self
            .db
            .load_account(address)
            .expect("in-memory account store is infallible");
        &mut account.info
    }

    fn move_native(&mut self, from: Address, to: Address, value: U256) -> Result<()> {
        if value.is_zero() {
            return Ok(());
        }
        let sender = self.account(from);
        if sender.balance < value {
            return Err(FixtureError::Revert {
                to,
                reason: format!(
                    "insufficient native balance: have {}, need {}",
                    sender.balance, value
                ),
            });
        }
        sender.balance -= value;
        self.account(to).balance += value;
        Ok(())
    }

    /// CREATE-style address derivation: `creator.create(nonce)`, with the
    /// nonce bumped in the creator's account.
    fn next_create_address(&mut self, creator: Address) -> Address {
        let info = self.account(creator);
        let nonce = info.nonce;
        info.nonce += 1;
        creator.create(nonce)
    }

    fn register(&mut self, creator: Address, state: ContractState) -> Address {
        let address = self.next_create_address(creator);
        // Contract accounts start at nonce 1 so their own creations derive
        // EIP-161-consistent addresses.
        let info = self.account(address);
        if info.nonce == 0 {
            info.nonce = 1;
        }
        self.contracts.insert(address, state);
        address
    }

    // --- token ledgers ---------------------------------------------------

    fn ledger(&self, token: Address) -> Result<&TokenState> {
        match self.contracts.get(&token) {
            Some(ContractState::Token(state)) | Some(ContractState::Wnative(state)) => Ok(state),
            Some(ContractState::Pair(pair)) => Ok(&pair.lp),
            _ => Err(FixtureError::UnknownContract(token)),
        }
    }

    fn ledger_mut(&mut self, token: Address) -> Result<&mut TokenState> {
        match self.contracts.get_mut(&token) {
            Some(ContractState::Token(state)) | Some(ContractState::Wnative(state)) => Ok(state),
            Some(ContractState::Pair(pair)) => Ok(&mut pair.lp),
            _ => Err(FixtureError::UnknownContract(token)),
        }
    }

    fn token_balance(&self, token: Address, owner: Address) -> Result<U256> {
        Ok(self.ledger(token)?.balance_of(owner))
    }

    fn token_transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<()> {
        if !self.ledger_mut(token)?.transfer(from, to, amount) {
            return Err(FixtureError::Revert {
                to: token,
                reason: "transfer amount exceeds balance".into(),
            });
        }
        Ok(())
    }

    // --- contract dispatch -----------------------------------------------

    /// ERC20 surface shared by tokens, the wrapped-native token, and pair
    /// liquidity tokens. Returns `None` for selectors outside it.
    fn exec_erc20_surface(
        &mut self,
        token: Address,
        caller: Address,
        selector: [u8; 4],
        params: &[u8],
    ) -> Result<Option<(Bytes, Vec<LogEntry>)>> {
        if selector == get_selector_from_sig("transfer(address,uint256)") {
            let (to, amount) = <(Address, U256)>::abi_decode(params, true)?;
            self.token_transfer(token, caller, to, amount)?;
            let log = transfer_log(token, caller, to, amount);
            Ok(Some((true.abi_encode().into(), vec![log])))
        } else if selector == get_selector_from_sig("balanceOf(address)") {
            let owner = Address::abi_decode(params, true)?;
            let balance = self.token_balance(token, owner)?;
            Ok(Some((balance.abi_encode().into(), Vec::new())))
        } else if selector == get_selector_from_sig("totalSupply()") {
            let supply = self.ledger(token)?.total_supply();
            Ok(Some((supply.abi_encode().into(), Vec::new())))
        } else {
            Ok(None)
        }
    }

    fn exec_wnative(
        &mut self,
        token: Address,
        caller: Address,
        value: U256,
        selector: [u8; 4],
        params: &[u8],
    ) -> Result<(Bytes, Vec<LogEntry>)> {
        if selector == get_selector_from_sig("deposit()") {
            // The native value already moved into the contract account;
            // mirror it in the wrapped ledger.
            self.ledger_mut(token)?.mint(caller, value);
            debug!(%token, %caller, %value, "wrapped native deposit");
            let log = LogEntry {
                address: token,
                topics: vec![
                    keccak256("Deposit(address,uint256)"),
                    caller.into_word(),
                ],
                data: value.abi_encode().into(),
            };
            return Ok((Bytes::new(), vec![log]));
        }
        self.exec_erc20_surface(token, caller, selector, params)?
            .ok_or(FixtureError::UnknownSelector {
                to: token,
                selector,
            })
    }

    fn exec_deployer(&mut self, deployer: Address, selector: [u8; 4]) -> Result<(Bytes, Vec<LogEntry>)> {
        if selector != get_selector_from_sig("deploy()") {
            return Err(FixtureError::UnknownSelector {
                to: deployer,
                selector,
            });
        }
        let (config, spent) = match self.contracts.get(&deployer) {
            Some(ContractState::Deployer(state)) => (state.config.clone(), state.spent),
            _ => return Err(FixtureError::UnknownContract(deployer)),
        };
        if spent {
            return Err(FixtureError::Revert {
                to: deployer,
                reason: "one-shot deployer already consumed".into(),
            });
        }
        if self.balance(deployer).is_zero() {
            return Err(FixtureError::Revert {
                to: deployer,
                reason: "deployer holds no native balance".into(),
            });
        }

        // Reject bad registration rows before creating anything, so a
        // failed deploy never leaves a partial object graph behind.
        let mut seen = HashSet::new();
        for (a, b, _) in config.pairs() {
            if a == b {
                return Err(FixtureError::Revert {
                    to: deployer,
                    reason: format!("pair registers identical tokens: {a}"),
                });
            }
            if a.is_zero() || b.is_zero() {
                return Err(FixtureError::Revert {
                    to: deployer,
                    reason: "pair registers the zero address".into(),
                });
            }
            if !seen.insert(sort_tokens(a, b)) {
                return Err(FixtureError::Revert {
                    to: deployer,
                    reason: format!("pair ({a}, {b}) registered twice"),
                });
            }
        }

        let factory = self.register(
            deployer,
            ContractState::Factory(FactoryState {
                fee_to: Address::ZERO,
                fee_to_setter: Address::ZERO,
                protocol_fee_denominator: config.protocol_fee_denominator,
                pairs: HashMap::new(),
            }),
        );
        let fee_receiver = self.register(
            deployer,
            ContractState::FeeReceiver(FeeReceiverState {
                admin: config.admin,
                native_recipient: config.fee_recipient,
            }),
        );
        let fee_setter = self.register(
            deployer,
            ContractState::FeeSetter(FeeSetterState {
                owner: config.fee_setter_recipient,
            }),
        );
        if let Some(ContractState::Factory(state)) = self.contracts.get_mut(&factory) {
            state.fee_to = fee_receiver;
            state.fee_to_setter = fee_setter;
        }
        for (a, b, fee) in config.pairs().collect::<Vec<_>>() {
            self.create_pair(factory, a, b, fee)?;
        }
        if let Some(ContractState::Deployer(state)) = self.contracts.get_mut(&deployer) {
            state.spent = true;
        }
        info!(
            %factory, %fee_setter, %fee_receiver,
            pairs = config.token0s.len(),
            "one-shot deploy complete"
        );

        // Log index 0 carries the factory address as a single ABI-encoded
        // address word; the caller has no other way to learn it.
        let log = LogEntry {
            address: deployer,
            topics: vec![keccak256("FactoryDeployed(address)")],
            data: factory.abi_encode().into(),
        };
        Ok((Bytes::new(), vec![log]))
    }

    fn create_pair(
        &mut self,
        factory: Address,
        token_a: Address,
        token_b: Address,
        swap_fee: u32,
    ) -> Result<Address> {
        let (token0, token1) = sort_tokens(token_a, token_b);
        let exists = match self.contracts.get(&factory) {
            Some(ContractState::Factory(state)) => state.pairs.contains_key(&(token0, token1)),
            _ => return Err(FixtureError::UnknownContract(factory)),
        };
        if exists {
            return Err(FixtureError::Revert {
                to: factory,
                reason: format!("pair ({token0}, {token1}) already exists"),
            });
        }
        let pair = self.register(
            factory,
            ContractState::Pair(PairState {
                token0,
                token1,
                swap_fee,
                reserve0: U256::ZERO,
                reserve1: U256::ZERO,
                lp: TokenState::default(),
            }),
        );
        if let Some(ContractState::Factory(state)) = self.contracts.get_mut(&factory) {
            state.pairs.insert((token0, token1), pair);
        }
        debug!(%factory, %pair, %token0, %token1, swap_fee, "pair created");
        Ok(pair)
    }

    fn exec_factory(
        &mut self,
        factory: Address,
        selector: [u8; 4],
        params: &[u8],
    ) -> Result<(Bytes, Vec<LogEntry>)> {
        let Some(ContractState::Factory(state)) = self.contracts.get(&factory) else {
            return Err(FixtureError::UnknownContract(factory));
        };
        if selector == get_selector_from_sig("getPair(address,address)") {
            let (a, b) = <(Address, Address)>::abi_decode(params, true)?;
            let pair = state
                .pairs
                .get(&sort_tokens(a, b))
                .copied()
                .unwrap_or(Address::ZERO);
            Ok((pair.abi_encode().into(), Vec::new()))
        } else if selector == get_selector_from_sig("feeTo()") {
            Ok((state.fee_to.abi_encode().into(), Vec::new()))
        } else if selector == get_selector_from_sig("feeToSetter()") {
            Ok((state.fee_to_setter.abi_encode().into(), Vec::new()))
        } else if selector == get_selector_from_sig("protocolFeeDenominator()") {
            Ok((state.protocol_fee_denominator.abi_encode().into(), Vec::new()))
        } else {
            Err(FixtureError::UnknownSelector {
                to: factory,
                selector,
            })
        }
    }

    fn exec_fee_setter(&mut self, address: Address, selector: [u8; 4]) -> Result<(Bytes, Vec<LogEntry>)> {
        let Some(ContractState::FeeSetter(state)) = self.contracts.get(&address) else {
            return Err(FixtureError::UnknownContract(address));
        };
        if selector == get_selector_from_sig("owner()") {
            Ok((state.owner.abi_encode().into(), Vec::new()))
        } else {
            Err(FixtureError::UnknownSelector { to: address, selector })
        }
    }

    fn exec_fee_receiver(&mut self, address: Address, selector: [u8; 4]) -> Result<(Bytes, Vec<LogEntry>)> {
        let Some(ContractState::FeeReceiver(state)) = self.contracts.get(&address) else {
            return Err(FixtureError::UnknownContract(address));
        };
        if selector == get_selector_from_sig("owner()") {
            Ok((state.admin.abi_encode().into(), Vec::new()))
        } else if selector == get_selector_from_sig("ethReceiver()") {
            Ok((state.native_recipient.abi_encode().into(), Vec::new()))
        } else {
            Err(FixtureError::UnknownSelector { to: address, selector })
        }
    }

    fn exec_pair(
        &mut self,
        pair: Address,
        caller: Address,
        selector: [u8; 4],
        params: &[u8],
    ) -> Result<(Bytes, Vec<LogEntry>)> {
        if selector == get_selector_from_sig("mint(address)") {
            let to = Address::abi_decode(params, true)?;
            return self.pair_mint(pair, caller, to);
        }

        if let Some(result) = self.exec_erc20_surface(pair, caller, selector, params)? {
            return Ok(result);
        }

        let Some(ContractState::Pair(state)) = self.contracts.get(&pair) else {
            return Err(FixtureError::UnknownContract(pair));
        };
        if selector == get_selector_from_sig("getReserves()") {
            // Reserve timestamp is not modeled; callers only consume the
            // two reserve words.
            let output = (state.reserve0, state.reserve1, U256::ZERO).abi_encode();
            Ok((output.into(), Vec::new()))
        } else if selector == get_selector_from_sig("token0()") {
            Ok((state.token0.abi_encode().into(), Vec::new()))
        } else if selector == get_selector_from_sig("token1()") {
            Ok((state.token1.abi_encode().into(), Vec::new()))
        } else if selector == get_selector_from_sig("swapFee()") {
            Ok((state.swap_fee.abi_encode().into(), Vec::new()))
        } else {
            Err(FixtureError::UnknownSelector { to: pair, selector })
        }
    }

    /// Constant-product mint against the pool's own balance accounting:
    /// liquidity derives from tokens transferred in since the last reserve
    /// update, which is why the fixtures seed pools with a direct transfer
    /// followed by `mint`.
    fn pair_mint(
        &mut self,
        pair: Address,
        caller: Address,
        to: Address,
    ) -> Result<(Bytes, Vec<LogEntry>)> {
        let (token0, token1, reserve0, reserve1, total_supply) = match self.contracts.get(&pair) {
            Some(ContractState::Pair(state)) => (
                state.token0,
                state.token1,
                state.reserve0,
                state.reserve1,
                state.lp.total_supply(),
            ),
            _ => return Err(FixtureError::UnknownContract(pair)),
        };
        let balance0 = self.token_balance(token0, pair)?;
        let balance1 = self.token_balance(token1, pair)?;
        let amount0 = balance0 - reserve0;
        let amount1 = balance1 - reserve1;

        let overflow = || FixtureError::Revert {
            to: pair,
            reason: "liquidity computation overflowed".into(),
        };
        let liquidity = if total_supply.is_zero() {
            sqrt(amount0.checked_mul(amount1).ok_or_else(overflow)?)
                .checked_sub(MINIMUM_LIQUIDITY)
                .ok_or(FixtureError::Revert {
                    to: pair,
                    reason: "insufficient liquidity minted".into(),
                })?
        } else {
            let share0 = amount0.checked_mul(total_supply).ok_or_else(overflow)? / reserve0;
            let share1 = amount1.checked_mul(total_supply).ok_or_else(overflow)? / reserve1;
            share0.min(share1)
        };
        if liquidity.is_zero() {
            return Err(FixtureError::Revert {
                to: pair,
                reason: "insufficient liquidity minted".into(),
            });
        }

        let Some(ContractState::Pair(state)) = self.contracts.get_mut(&pair) else {
            return Err(FixtureError::UnknownContract(pair));
        };
        if total_supply.is_zero() {
            state.lp.mint(Address::ZERO, MINIMUM_LIQUIDITY);
        }
        state.lp.mint(to, liquidity);
        state.reserve0 = balance0;
        state.reserve1 = balance1;
        debug!(%pair, %to, %liquidity, "liquidity minted");

        let log = LogEntry {
            address: pair,
            topics: vec![
                keccak256("Mint(address,uint256,uint256)"),
                caller.into_word(),
            ],
            data: (amount0, amount1).abi_encode().into(),
        };
        Ok((liquidity.abi_encode().into(), vec![log]))
    }
}

fn transfer_log(token: Address, from: Address, to: Address, amount: U256) -> LogEntry {
    LogEntry {
        address: token,
        topics: vec![
            keccak256("Transfer(address,address,uint256)"),
            from.into_word(),
            to.into_word(),
        ],
        data: amount.abi_encode().into(),
    }
}
