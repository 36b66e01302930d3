//! `LedgerHost` over the accounts of a single instruction
//!
//! The TokenState PDA is the ledger address and holds the reserve as
//! lamports above its rent-exempt floor. Balances and allowances are
//! only reachable if the instruction passed their accounts in.

use anchor_lang::prelude::*;

use crate::error::WrappedTokenError;
use crate::invariants::assert_reserve_covers_supply;
use crate::ledger::LedgerHost;
use crate::math::{credit, debit, reserve_above_floor};
use crate::state::{Allowance, HolderBalance, LedgerSettings, TokenState};

pub struct AccountsLedger<'a, 'info> {
  address: Pubkey,
  state: &'a mut TokenState,
  reserve_info: AccountInfo<'info>,
  rent_floor: u64,
  balances: Vec<&'a mut HolderBalance>,
  allowance: Option<&'a mut Allowance>,
  payees: Vec<AccountInfo<'info>>,
}

impl<'a, 'info> AccountsLedger<'a, 'info> {
  pub fn new(
    address: Pubkey,
    state: &'a mut TokenState,
    reserve_info: AccountInfo<'info>,
  ) -> Result<Self> {
    let rent_floor = Rent::get()?.minimum_balance(reserve_info.data_len());
    Ok(Self::with_rent_floor(address, state, reserve_info, rent_floor))
  }

  /// Same as `new` with the rent-exempt floor supplied instead of read from the Rent sysvar
  pub fn with_rent_floor(
    address: Pubkey,
    state: &'a mut TokenState,
    reserve_info: AccountInfo<'info>,
    rent_floor: u64,
  ) -> Self {
    Self {
      address,
      state,
      reserve_info,
      rent_floor,
      balances: Vec::new(),
      allowance: None,
      payees: Vec::new(),
    }
  }

  pub fn with_balance(mut self, balance: &'a mut HolderBalance) -> Self {
    self.balances.push(balance);
    self
  }

  pub fn with_allowance(mut self, allowance: &'a mut Allowance) -> Self {
    self.allowance = Some(allowance);
    self
  }

  /// Account that may receive a payout
  pub fn with_payee(mut self, payee: AccountInfo<'info>) -> Self {
    self.payees.push(payee);
    self
  }

  /// Lamports above the rent floor
  pub fn reserve(&self) -> u64 {
    reserve_above_floor(self.reserve_info.lamports(), self.rent_floor)
  }

  /// Post-instruction check: reserve must still cover supply
  pub fn check_backing(&self) -> Result<()> {
    let reserve = self.reserve();
    msg!("Reserve: {} lamports, supply: {}", reserve, self.state.total_supply);
    assert_reserve_covers_supply(reserve, self.state.total_supply)
  }

  fn balance_entry(&self, holder: Pubkey) -> Result<&HolderBalance> {
    self
      .balances
      .iter()
      .find(|balance| balance.holder == holder)
      .map(|balance| &**balance)
      .ok_or_else(|| error!(WrappedTokenError::UnknownAccount))
  }

  fn allowance_entry(&mut self, owner: Pubkey, spender: Pubkey) -> Result<&mut Allowance> {
    match self.allowance.as_deref_mut() {
      Some(allowance) if allowance.owner == owner && allowance.spender == spender => Ok(allowance),
      _ => err!(WrappedTokenError::UnknownAccount),
    }
  }
}

impl LedgerHost for AccountsLedger<'_, '_> {
  fn ledger_address(&self) -> Pubkey {
    self.address
  }

  fn settings(&self) -> Result<LedgerSettings> {
    Ok(self.state.settings)
  }

  fn balance_of(&self, holder: Pubkey) -> Result<u64> {
    Ok(self.balance_entry(holder)?.amount)
  }

  fn set_balance(&mut self, holder: Pubkey, amount: u64) -> Result<()> {
    let entry = self
      .balances
      .iter_mut()
      .find(|balance| balance.holder == holder)
      .ok_or(WrappedTokenError::UnknownAccount)?;
    entry.amount = amount;
    Ok(())
  }

  fn total_supply(&self) -> Result<u64> {
    Ok(self.state.total_supply)
  }

  fn set_total_supply(&mut self, amount: u64) -> Result<()> {
    self.state.total_supply = amount;
    Ok(())
  }

  fn allowance(&self, owner: Pubkey, spender: Pubkey) -> Result<u64> {
    match self.allowance.as_deref() {
      Some(allowance) if allowance.owner == owner && allowance.spender == spender => {
        Ok(allowance.amount)
      }
      _ => err!(WrappedTokenError::UnknownAccount),
    }
  }

  fn set_allowance(&mut self, owner: Pubkey, spender: Pubkey, amount: u64) -> Result<()> {
    self.allowance_entry(owner, spender)?.amount = amount;
    Ok(())
  }

  fn is_locked(&self) -> Result<bool> {
    Ok(self.state.locked)
  }

  fn set_locked(&mut self, locked: bool) -> Result<()> {
    self.state.locked = locked;
    Ok(())
  }

  fn pay(&mut self, to: Pubkey, amount: u64) -> Result<()> {
    require!(self.reserve() >= amount, WrappedTokenError::InsufficientLamports);

    let payee = self
      .payees
      .iter()
      .find(|payee| payee.key() == to)
      .ok_or(WrappedTokenError::UnknownAccount)?;

    // TokenState is program-owned, so lamports can leave it directly
    let source_lamports = debit(self.reserve_info.lamports(), amount)
      .ok_or(WrappedTokenError::InsufficientLamports)?;
    let payee_lamports = credit(payee.lamports(), amount)
      .ok_or(WrappedTokenError::MathOverflow)?;

    **self.reserve_info.try_borrow_mut_lamports()? = source_lamports;
    **payee.try_borrow_mut_lamports()? = payee_lamports;

    msg!("Paid {} lamports to {}", amount, to);
    Ok(())
  }
}
