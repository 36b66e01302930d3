//! Approve instruction - set how much a spender may move on the owner's behalf

use anchor_lang::prelude::*;
use crate::accounts_ledger::AccountsLedger;
use crate::ledger;
use crate::state::*;

pub fn handler(
  ctx: Context<Approve>,
  spender: Pubkey,
  amount: u64,
) -> Result<()> {
  let owner = ctx.accounts.owner.key();
  let address = ctx.accounts.token_state.key();
  let reserve_info = ctx.accounts.token_state.to_account_info();

  ctx.accounts.allowance.bind(owner, spender, ctx.bumps.allowance);

  let mut host = AccountsLedger::new(address, &mut ctx.accounts.token_state, reserve_info)?
    .with_allowance(&mut ctx.accounts.allowance);

  ledger::approve(&mut host, owner, spender, amount)
}

#[derive(Accounts)]
#[instruction(spender: Pubkey)]
pub struct Approve<'info> {
  #[account(mut)]
  pub owner: Signer<'info>,

  #[account(
    seeds = [TOKEN_STATE_SEED],
    bump = token_state.bump,
  )]
  pub token_state: Account<'info, TokenState>,

  #[account(
    init_if_needed,
    payer = owner,
    space = Allowance::LEN,
    seeds = [ALLOWANCE_SEED, owner.key().as_ref(), spender.as_ref()],
    bump
  )]
  pub allowance: Account<'info, Allowance>,

  pub system_program: Program<'info, System>,
}
