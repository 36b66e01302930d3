//! In-process account runtime
//!
//! Models the host the ledger runs on when it is driven off-chain: accounts
//! hold lamports and borsh-encoded storage, and an account may carry code
//! that runs synchronously whenever it receives lamports. That callback is
//! how a payout hands control to the recipient before the paying call
//! has returned.
//!
//! Every call executes inside a frame. A frame snapshots all accounts on
//! entry and restores the snapshot when the call returns an error, so a
//! failure unwinds exactly the frames it propagates through.

use std::collections::BTreeMap;
use std::rc::Rc;

use anchor_lang::prelude::*;

use crate::constants::MAX_CALL_DEPTH;
use crate::error::WrappedTokenError;

/// Code attached to an account. Storage lives in the account's data, not in `self`
pub trait Receiver {
  /// Runs after `amount` lamports from `from` have landed on `this`
  fn receive(&self, rt: &mut Runtime, this: Pubkey, from: Pubkey, amount: u64) -> Result<()>;
}

#[derive(Clone, Default)]
pub struct SimAccount {
  pub lamports: u64,
  pub data: Vec<u8>,
  code: Option<Rc<dyn Receiver>>,
}

impl SimAccount {
  pub fn has_code(&self) -> bool {
    self.code.is_some()
  }
}

pub struct Runtime {
  accounts: BTreeMap<Pubkey, SimAccount>,
  depth: usize,
  max_depth: usize,
  next_address: u64,
}

impl Default for Runtime {
  fn default() -> Self {
    Self::new()
  }
}

impl Runtime {
  pub fn new() -> Self {
    Self::with_max_call_depth(MAX_CALL_DEPTH)
  }

  pub fn with_max_call_depth(max_depth: usize) -> Self {
    Self {
      accounts: BTreeMap::new(),
      depth: 0,
      max_depth,
      next_address: 1,
    }
  }

  /// Create a plain account funded with `lamports`
  pub fn create_account(&mut self, lamports: u64) -> Pubkey {
    let address = self.allocate_address();
    self.accounts.insert(address, SimAccount {
      lamports,
      ..SimAccount::default()
    });
    address
  }

  /// Create an account carrying `code` and initial storage
  pub fn deploy(&mut self, code: Rc<dyn Receiver>, data: Vec<u8>) -> Pubkey {
    let address = self.allocate_address();
    self.accounts.insert(address, SimAccount {
      lamports: 0,
      data,
      code: Some(code),
    });
    address
  }

  pub fn account(&self, address: &Pubkey) -> Option<&SimAccount> {
    self.accounts.get(address)
  }

  /// Lamport balance of any address; unknown addresses hold nothing
  pub fn lamports(&self, address: &Pubkey) -> u64 {
    self.accounts.get(address).map(|account| account.lamports).unwrap_or(0)
  }

  pub fn depth(&self) -> usize {
    self.depth
  }

  pub fn max_depth(&self) -> usize {
    self.max_depth
  }

  /// Run `call` as one frame, restoring every account if it fails
  pub fn frame<T, F>(&mut self, call: F) -> Result<T>
  where
    F: FnOnce(&mut Self) -> Result<T>,
  {
    if self.depth >= self.max_depth {
      msg!("Call depth {} reached, refusing to enter another frame", self.depth);
      return err!(WrappedTokenError::CallDepthExceeded);
    }

    let checkpoint = self.accounts.clone();
    self.depth += 1;
    let result = call(self);
    self.depth -= 1;

    if result.is_err() {
      self.accounts = checkpoint;
    }
    result
  }

  /// Move lamports without running the recipient's code
  ///
  /// This is value attached to a call, as opposed to a bare transfer
  pub fn move_lamports(&mut self, from: Pubkey, to: Pubkey, amount: u64) -> Result<()> {
    let source = self
      .accounts
      .get_mut(&from)
      .ok_or(WrappedTokenError::AccountNotFound)?;
    source.lamports = source
      .lamports
      .checked_sub(amount)
      .ok_or(WrappedTokenError::InsufficientLamports)?;

    let destination = self.accounts.entry(to).or_default();
    destination.lamports = destination
      .lamports
      .checked_add(amount)
      .ok_or(WrappedTokenError::MathOverflow)?;
    Ok(())
  }

  /// Bare lamport transfer. Runs the recipient's code, if any, inside the same frame
  pub fn transfer(&mut self, from: Pubkey, to: Pubkey, amount: u64) -> Result<()> {
    self.frame(|rt| {
      rt.move_lamports(from, to, amount)?;

      let code = rt.accounts.get(&to).and_then(|account| account.code.clone());
      match code {
        Some(code) => code.receive(rt, to, from, amount),
        None => Ok(()),
      }
    })
  }

  /// Decode the storage of `address`
  pub fn load<T: AnchorDeserialize>(&self, address: &Pubkey) -> Result<T> {
    let account = self
      .accounts
      .get(address)
      .ok_or(WrappedTokenError::AccountNotFound)?;
    T::try_from_slice(&account.data).map_err(|_| error!(WrappedTokenError::AccountDataCorrupt))
  }

  /// Replace the storage of `address`
  pub fn store<T: AnchorSerialize>(&mut self, address: &Pubkey, value: &T) -> Result<()> {
    let data = borsh::to_vec(value).map_err(|_| error!(WrappedTokenError::AccountDataCorrupt))?;
    let account = self
      .accounts
      .get_mut(address)
      .ok_or(WrappedTokenError::AccountNotFound)?;
    account.data = data;
    Ok(())
  }

  fn allocate_address(&mut self) -> Pubkey {
    let mut bytes = [0u8; 32];
    bytes[..8].copy_from_slice(&self.next_address.to_le_bytes());
    bytes[31] = 0xa5;
    self.next_address += 1;
    Pubkey::new_from_array(bytes)
  }
}
