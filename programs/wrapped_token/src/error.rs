use anchor_lang::prelude::*;

#[error_code]
#[derive(PartialEq,Eq)]
pub enum WrappedTokenError {
  #[msg("Amount must be greater than 0")]
  InvalidAmount,

  #[msg("Insufficient token balance for this operation")]
  InsufficientBalance,

  #[msg("Insufficient allowance - approve the spender for at least this amount")]
  InsufficientAllowance,

  #[msg("Native payout to the recipient failed - operation rolled back")]
  PayoutFailed,

  #[msg("Reentrancy attack detected - operation blocked")]
  Reentrancy,

  #[msg("Math overflow occurred - values exceeded u64 bounds")]
  MathOverflow,

  #[msg("Invalid recipient - tokens cannot be sent to the zero address")]
  InvalidRecipient,

  #[msg("Invalid spender - the zero address cannot be approved")]
  InvalidSpender,

  #[msg("Token name or symbol exceeds the allowed length")]
  InvalidMetadata,

  #[msg("Balance or allowance account for this address was not supplied")]
  UnknownAccount,

  #[msg("Reserve no longer covers the outstanding token supply")]
  ReserveShortfall,

  #[msg("Reserve does not equal the outstanding token supply")]
  BackingMismatch,

  #[msg("Total supply does not equal the sum of holder balances")]
  SupplyMismatch,

  #[msg("Maximum call depth exceeded")]
  CallDepthExceeded,

  #[msg("Account does not hold enough lamports for this transfer")]
  InsufficientLamports,

  #[msg("Account does not exist")]
  AccountNotFound,

  #[msg("Account data could not be decoded")]
  AccountDataCorrupt,
}
