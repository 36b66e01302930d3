//! Initialize instruction - sets up the ledger
//! Creates the TokenState PDA that doubles as the reserve account

use anchor_lang::prelude::*;
use crate::constants::*;
use crate::error::WrappedTokenError;
use crate::events::TokenInitialized;
use crate::state::*;

pub fn handler(
  ctx: Context<Initialize>,
  name: String,
  symbol: String,
  reentrancy_guard: bool,
) -> Result<()> {
  require!(
    name.len() <= MAX_NAME_LEN && symbol.len() <= MAX_SYMBOL_LEN,
    WrappedTokenError::InvalidMetadata
  );

  let ledger = ctx.accounts.token_state.key();
  let token_state = &mut ctx.accounts.token_state;

  token_state.authority = ctx.accounts.authority.key();
  token_state.name = name;
  token_state.symbol = symbol;
  token_state.decimals = TOKEN_DECIMALS;
  token_state.total_supply = 0;

  // deployed ledgers always settle before paying out
  token_state.settings = LedgerSettings {
    payout_ordering: PayoutOrdering::EffectsFirst,
    reentrancy_guard,
  };
  token_state.locked = false;
  token_state.bump = ctx.bumps.token_state;

  msg!("Wrapped token initialized!");
  msg!("Name: {}", token_state.name);
  msg!("Symbol: {}", token_state.symbol);
  msg!("Reentrancy guard: {}", reentrancy_guard);

  emit!(TokenInitialized {
    ledger,
    name: token_state.name.clone(),
    symbol: token_state.symbol.clone(),
    decimals: TOKEN_DECIMALS,
    reentrancy_guard,
  });

  Ok(())
}

#[derive(Accounts)]
pub struct Initialize<'info> {
  #[account(mut)]
  pub authority: Signer<'info>,

  /// TokenState PDA - ledger metadata, supply and the lamport reserve
  #[account(
    init,
    payer = authority,
    space = TokenState::LEN,
    seeds = [TOKEN_STATE_SEED],
    bump
  )]
  pub token_state: Account<'info, TokenState>,

  pub system_program: Program<'info, System>,
}
