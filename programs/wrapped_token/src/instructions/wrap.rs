//! Wrap instruction - deposit lamports, receive the same number of token units
//! Lamports move into the TokenState reserve before the ledger credits the caller

use anchor_lang::prelude::*;
use anchor_lang::system_program;
use crate::accounts_ledger::AccountsLedger;
use crate::ledger;
use crate::state::*;

pub fn handler(
  ctx: Context<Wrap>,
  amount: u64,
) -> Result<()> {
  let user = ctx.accounts.user.key();
  let address = ctx.accounts.token_state.key();

  let deposit = system_program::Transfer {
    from: ctx.accounts.user.to_account_info(),
    to: ctx.accounts.token_state.to_account_info(),
  };
  system_program::transfer(
    CpiContext::new(ctx.accounts.system_program.to_account_info(), deposit),
    amount,
  )?;
  msg!("Deposited {} lamports into reserve", amount);

  ctx.accounts.user_balance.bind(user, ctx.bumps.user_balance);

  let reserve_info = ctx.accounts.token_state.to_account_info();
  let mut host = AccountsLedger::new(address, &mut ctx.accounts.token_state, reserve_info)?
    .with_balance(&mut ctx.accounts.user_balance);

  ledger::wrap(&mut host, user, amount)?;
  host.check_backing()?;

  Ok(())
}

#[derive(Accounts)]
pub struct Wrap<'info> {
  #[account(mut)]
  pub user: Signer<'info>,

  #[account(
    mut,
    seeds = [TOKEN_STATE_SEED],
    bump = token_state.bump,
  )]
  pub token_state: Account<'info, TokenState>,

  /// Caller's balance, created on first wrap
  #[account(
    init_if_needed,
    payer = user,
    space = HolderBalance::LEN,
    seeds = [BALANCE_SEED, user.key().as_ref()],
    bump
  )]
  pub user_balance: Account<'info, HolderBalance>,

  pub system_program: Program<'info, System>,
}
