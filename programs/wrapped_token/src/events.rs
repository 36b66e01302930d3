use anchor_lang::prelude::*;

#[event]
pub struct TokenInitialized {
  pub ledger: Pubkey,
  pub name: String,
  pub symbol: String,
  pub decimals: u8,
  pub reentrancy_guard: bool,
}

#[event]
pub struct Wrapped {
  pub holder: Pubkey,
  pub amount: u64,
  pub new_balance: u64,
  pub new_total_supply: u64,
}

#[event]
pub struct Unwrapped {
  pub holder: Pubkey,
  pub amount: u64,
  pub new_balance: u64,
  pub new_total_supply: u64,
}

#[event]
pub struct Transferred {
  pub from: Pubkey,
  pub to: Pubkey,
  pub amount: u64,
}

#[event]
pub struct Approved {
  pub owner: Pubkey,
  pub spender: Pubkey,
  pub amount: u64,
}
