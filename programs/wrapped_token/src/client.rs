//! Wrapped token deployed on the in-process runtime
//!
//! The ledger's storage is a borsh-encoded `LedgerState` in its account data
//! and its reserve is the account's lamport balance. Every mutating call runs
//! in its own runtime frame, so a failure leaves no partial state behind.

use std::collections::BTreeMap;
use std::rc::Rc;

use anchor_lang::prelude::*;

use crate::constants::{MAX_NAME_LEN, MAX_SYMBOL_LEN, TOKEN_DECIMALS};
use crate::error::WrappedTokenError;
use crate::events::TokenInitialized;
use crate::invariants::{assert_fully_backed, assert_supply_matches_holdings};
use crate::ledger::{self, LedgerHost};
use crate::math::sum_holdings;
use crate::runtime::{Receiver, Runtime};
use crate::state::LedgerSettings;

/// Storage layout of a runtime-hosted ledger
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct LedgerState {
  pub name: String,
  pub symbol: String,
  pub decimals: u8,
  pub total_supply: u64,
  pub balances: BTreeMap<Pubkey, u64>,
  pub allowances: BTreeMap<(Pubkey, Pubkey), u64>,
  pub settings: LedgerSettings,
  pub locked: bool,
}

/// Point-in-time view of a ledger, as reported by `WrappedTokenClient::summary`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenSummary {
  pub address: Pubkey,
  pub name: String,
  pub symbol: String,
  pub decimals: u8,
  pub total_supply: u64,
  pub reserve: u64,
  pub holders: usize,
}

/// Code of a ledger account: a bare lamport receipt wraps for the sender
struct LedgerProgram;

impl Receiver for LedgerProgram {
  fn receive(&self, rt: &mut Runtime, this: Pubkey, from: Pubkey, amount: u64) -> Result<()> {
    msg!("Bare receipt of {} from {} - wrapping", amount, from);
    ledger::wrap(&mut RuntimeLedger::new(rt, this), from, amount)
  }
}

/// `LedgerHost` over a ledger account in the runtime
///
/// Reads and writes go straight to account storage, so a nested call made
/// from a payout callback sees whatever has been written so far
pub struct RuntimeLedger<'a> {
  rt: &'a mut Runtime,
  address: Pubkey,
}

impl<'a> RuntimeLedger<'a> {
  pub fn new(rt: &'a mut Runtime, address: Pubkey) -> Self {
    Self { rt, address }
  }

  fn state(&self) -> Result<LedgerState> {
    self.rt.load(&self.address)
  }

  fn update<F>(&mut self, change: F) -> Result<()>
  where
    F: FnOnce(&mut LedgerState),
  {
    let mut state = self.state()?;
    change(&mut state);
    self.rt.store(&self.address, &state)
  }
}

impl LedgerHost for RuntimeLedger<'_> {
  fn ledger_address(&self) -> Pubkey {
    self.address
  }

  fn settings(&self) -> Result<LedgerSettings> {
    Ok(self.state()?.settings)
  }

  fn balance_of(&self, holder: Pubkey) -> Result<u64> {
    Ok(self.state()?.balances.get(&holder).copied().unwrap_or(0))
  }

  fn set_balance(&mut self, holder: Pubkey, amount: u64) -> Result<()> {
    self.update(|state| {
      state.balances.insert(holder, amount);
    })
  }

  fn total_supply(&self) -> Result<u64> {
    Ok(self.state()?.total_supply)
  }

  fn set_total_supply(&mut self, amount: u64) -> Result<()> {
    self.update(|state| state.total_supply = amount)
  }

  fn allowance(&self, owner: Pubkey, spender: Pubkey) -> Result<u64> {
    Ok(self.state()?.allowances.get(&(owner, spender)).copied().unwrap_or(0))
  }

  fn set_allowance(&mut self, owner: Pubkey, spender: Pubkey, amount: u64) -> Result<()> {
    self.update(|state| {
      state.allowances.insert((owner, spender), amount);
    })
  }

  fn is_locked(&self) -> Result<bool> {
    Ok(self.state()?.locked)
  }

  fn set_locked(&mut self, locked: bool) -> Result<()> {
    self.update(|state| state.locked = locked)
  }

  fn pay(&mut self, to: Pubkey, amount: u64) -> Result<()> {
    self.rt.transfer(self.address, to, amount)
  }
}

/// Handle to a ledger deployed on a `Runtime`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WrappedTokenClient {
  address: Pubkey,
}

impl WrappedTokenClient {
  /// Deploy a fresh ledger with zero supply
  pub fn deploy(rt: &mut Runtime, name: &str, symbol: &str, settings: LedgerSettings) -> Result<Self> {
    require!(
      name.len() <= MAX_NAME_LEN && symbol.len() <= MAX_SYMBOL_LEN,
      WrappedTokenError::InvalidMetadata
    );

    let state = LedgerState {
      name: name.to_string(),
      symbol: symbol.to_string(),
      decimals: TOKEN_DECIMALS,
      settings,
      ..LedgerState::default()
    };
    let data = borsh::to_vec(&state).map_err(|_| error!(WrappedTokenError::AccountDataCorrupt))?;
    let address = rt.deploy(Rc::new(LedgerProgram), data);

    msg!("Ledger {} deployed: {} ({})", address, name, symbol);
    msg!("Payout ordering: {:?}, reentrancy guard: {}", settings.payout_ordering, settings.reentrancy_guard);

    emit!(TokenInitialized {
      ledger: address,
      name: state.name,
      symbol: state.symbol,
      decimals: state.decimals,
      reentrancy_guard: settings.reentrancy_guard,
    });

    Ok(Self { address })
  }

  /// Attach to an existing ledger address
  pub fn at(address: Pubkey) -> Self {
    Self { address }
  }

  pub fn address(&self) -> Pubkey {
    self.address
  }

  /// Attach `amount` lamports and wrap them for `caller`
  pub fn wrap(&self, rt: &mut Runtime, caller: Pubkey, amount: u64) -> Result<()> {
    let address = self.address;
    rt.frame(|rt| {
      rt.move_lamports(caller, address, amount)?;
      ledger::wrap(&mut RuntimeLedger::new(rt, address), caller, amount)
    })
  }

  pub fn unwrap(&self, rt: &mut Runtime, caller: Pubkey, amount: u64) -> Result<()> {
    let address = self.address;
    rt.frame(|rt| ledger::unwrap(&mut RuntimeLedger::new(rt, address), caller, amount))
  }

  pub fn transfer(&self, rt: &mut Runtime, caller: Pubkey, to: Pubkey, amount: u64) -> Result<()> {
    let address = self.address;
    rt.frame(|rt| ledger::transfer(&mut RuntimeLedger::new(rt, address), caller, to, amount))
  }

  pub fn transfer_from(
    &self,
    rt: &mut Runtime,
    spender: Pubkey,
    owner: Pubkey,
    to: Pubkey,
    amount: u64,
  ) -> Result<()> {
    let address = self.address;
    rt.frame(|rt| {
      ledger::transfer_from(&mut RuntimeLedger::new(rt, address), spender, owner, to, amount)
    })
  }

  pub fn approve(&self, rt: &mut Runtime, owner: Pubkey, spender: Pubkey, amount: u64) -> Result<()> {
    let address = self.address;
    rt.frame(|rt| ledger::approve(&mut RuntimeLedger::new(rt, address), owner, spender, amount))
  }

  pub fn balance_of(&self, rt: &Runtime, holder: Pubkey) -> Result<u64> {
    Ok(self.state(rt)?.balances.get(&holder).copied().unwrap_or(0))
  }

  pub fn total_supply(&self, rt: &Runtime) -> Result<u64> {
    Ok(self.state(rt)?.total_supply)
  }

  pub fn allowance(&self, rt: &Runtime, owner: Pubkey, spender: Pubkey) -> Result<u64> {
    Ok(self.state(rt)?.allowances.get(&(owner, spender)).copied().unwrap_or(0))
  }

  /// Native units held by the ledger
  pub fn reserve(&self, rt: &Runtime) -> u64 {
    rt.lamports(&self.address)
  }

  pub fn state(&self, rt: &Runtime) -> Result<LedgerState> {
    rt.load(&self.address)
  }

  pub fn summary(&self, rt: &Runtime) -> Result<TokenSummary> {
    let state = self.state(rt)?;
    Ok(TokenSummary {
      address: self.address,
      holders: state.balances.values().filter(|balance| **balance > 0).count(),
      name: state.name,
      symbol: state.symbol,
      decimals: state.decimals,
      total_supply: state.total_supply,
      reserve: self.reserve(rt),
    })
  }

  /// Check `reserve == total_supply == sum(balances)`
  ///
  /// Only meaningful between top-level calls
  pub fn check_backing(&self, rt: &Runtime) -> Result<()> {
    let state = self.state(rt)?;
    let holdings = sum_holdings(state.balances.values().copied())
      .ok_or(WrappedTokenError::MathOverflow)?;

    assert_supply_matches_holdings(state.total_supply, holdings)?;
    assert_fully_backed(self.reserve(rt), state.total_supply)
  }
}
