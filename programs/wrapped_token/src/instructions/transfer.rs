//! Transfer instruction - move token units between holders
//! A transfer addressed to the TokenState PDA burns and pays the sender

use anchor_lang::prelude::*;
use crate::accounts_ledger::AccountsLedger;
use crate::ledger;
use crate::state::*;

pub fn handler(
  ctx: Context<TransferTokens>,
  to: Pubkey,
  amount: u64,
) -> Result<()> {
  let from = ctx.accounts.from.key();
  let address = ctx.accounts.token_state.key();
  let reserve_info = ctx.accounts.token_state.to_account_info();
  let payee = ctx.accounts.from.to_account_info();

  ctx.accounts.to_balance.bind(to, ctx.bumps.to_balance);

  let mut host = AccountsLedger::new(address, &mut ctx.accounts.token_state, reserve_info)?
    .with_balance(&mut ctx.accounts.from_balance)
    .with_balance(&mut ctx.accounts.to_balance)
    .with_payee(payee);

  ledger::transfer(&mut host, from, to, amount)?;
  host.check_backing()?;

  Ok(())
}

#[derive(Accounts)]
#[instruction(to: Pubkey)]
pub struct TransferTokens<'info> {
  #[account(mut)]
  pub from: Signer<'info>,

  #[account(
    mut,
    seeds = [TOKEN_STATE_SEED],
    bump = token_state.bump,
  )]
  pub token_state: Account<'info, TokenState>,

  #[account(
    mut,
    seeds = [BALANCE_SEED, from.key().as_ref()],
    bump = from_balance.bump,
  )]
  pub from_balance: Account<'info, HolderBalance>,

  /// Recipient balance, created on first transfer-in
  /// Stays at zero when `to` is the ledger itself
  #[account(
    init_if_needed,
    payer = from,
    space = HolderBalance::LEN,
    seeds = [BALANCE_SEED, to.as_ref()],
    bump
  )]
  pub to_balance: Account<'info, HolderBalance>,

  pub system_program: Program<'info, System>,
}
