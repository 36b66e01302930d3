//! Unwrap instruction - burn token units, receive the same number of lamports
//! Balance and supply are settled before lamports leave the reserve

use anchor_lang::prelude::*;
use crate::accounts_ledger::AccountsLedger;
use crate::ledger;
use crate::state::*;

pub fn handler(
  ctx: Context<Unwrap>,
  amount: u64,
) -> Result<()> {
  let user = ctx.accounts.user.key();
  let address = ctx.accounts.token_state.key();
  let reserve_info = ctx.accounts.token_state.to_account_info();
  let payee = ctx.accounts.user.to_account_info();

  msg!("Units to unwrap: {}", amount);

  let mut host = AccountsLedger::new(address, &mut ctx.accounts.token_state, reserve_info)?
    .with_balance(&mut ctx.accounts.user_balance)
    .with_payee(payee);

  ledger::unwrap(&mut host, user, amount)?;
  host.check_backing()?;

  Ok(())
}

#[derive(Accounts)]
pub struct Unwrap<'info> {
  #[account(mut)]
  pub user: Signer<'info>,

  #[account(
    mut,
    seeds = [TOKEN_STATE_SEED],
    bump = token_state.bump,
  )]
  pub token_state: Account<'info, TokenState>,

  #[account(
    mut,
    seeds = [BALANCE_SEED, user.key().as_ref()],
    bump = user_balance.bump,
  )]
  pub user_balance: Account<'info, HolderBalance>,
}
