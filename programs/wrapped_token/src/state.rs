//! State accounts for the wrapped token ledger
//! TokenState is the ledger itself and holds the lamport reserve

use anchor_lang::prelude::*;

/// Order between the ledger's own bookkeeping and the outbound payout
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PayoutOrdering {
  /// Debit balance and supply, then pay
  #[default]
  EffectsFirst,
  /// Pay, then write back `observed - amount`. Exposed to reentrant drains
  PayoutFirst,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LedgerSettings {
  pub payout_ordering: PayoutOrdering,

  /// Hold a lock across every payout-performing operation
  pub reentrancy_guard: bool,
}

impl LedgerSettings {
  pub const LEN: usize = 1 + // payout_ordering
    1; // reentrancy_guard

  pub fn guarded(payout_ordering: PayoutOrdering) -> Self {
    Self { payout_ordering, reentrancy_guard: true }
  }

  pub fn unguarded(payout_ordering: PayoutOrdering) -> Self {
    Self { payout_ordering, reentrancy_guard: false }
  }
}

/// Ledger singleton - metadata, supply and reentrancy lock
/// Lamports above the rent floor are the reserve backing `total_supply`

#[account]
pub struct TokenState {
  /// Deployer
  pub authority: Pubkey,

  pub name: String,

  pub symbol: String,

  pub decimals: u8,

  pub total_supply: u64,

  pub settings: LedgerSettings,

  pub locked: bool,

  pub bump: u8,
}

impl TokenState {
  pub const LEN: usize = 8 + // discriminator
    32 + // authority
    4 + crate::constants::MAX_NAME_LEN + // name
    4 + crate::constants::MAX_SYMBOL_LEN + // symbol
    1 + // decimals
    8 + // total_supply
    LedgerSettings::LEN + // settings
    1 + // locked
    1; // bump
}

/// Token balance of a single holder

#[account]
pub struct HolderBalance {
  pub holder: Pubkey,

  pub amount: u64,

  pub bump: u8,
}

impl HolderBalance {
  pub const LEN: usize = 8 +
    32 +
    8 +
    1;

  /// Stamp a freshly created balance account with its holder
  pub fn bind(&mut self, holder: Pubkey, bump: u8) {
    if self.holder == Pubkey::default() {
      self.holder = holder;
      self.bump = bump;
    }
  }
}

/// Approved quantity a spender may move on the owner's behalf

#[account]
pub struct Allowance {
  pub owner: Pubkey,

  pub spender: Pubkey,

  pub amount: u64,

  pub bump: u8,
}

impl Allowance {
  pub const LEN: usize = 8 +
    32 +
    32 +
    8 +
    1;

  pub fn bind(&mut self, owner: Pubkey, spender: Pubkey, bump: u8) {
    if self.owner == Pubkey::default() {
      self.owner = owner;
      self.spender = spender;
      self.bump = bump;
    }
  }
}

pub const TOKEN_STATE_SEED: &[u8] = b"token_state";

pub const BALANCE_SEED: &[u8] = b"balance";

pub const ALLOWANCE_SEED: &[u8] = b"allowance";
