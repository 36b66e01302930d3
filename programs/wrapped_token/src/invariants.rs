//! Invariant assertions for the wrapped token ledger
//! Reserve must back supply, and supply must equal the sum of balances
//! Every mutating instruction checks backing before it commits

use anchor_lang::prelude::*;

use crate::error::WrappedTokenError;

/// Assert the reserve still covers every outstanding token
///
/// Lamports can be pushed into the ledger account without going through
/// `wrap`, so on-chain only a lower bound is enforced
///
/// # Arguments
/// * `reserve` - Lamports held above the rent floor
/// * `total_supply` - Outstanding token units
pub fn assert_reserve_covers_supply(reserve: u64, total_supply: u64) -> Result<()> {
  require!(
    reserve >= total_supply,
    WrappedTokenError::ReserveShortfall
  );
  Ok(())
}

/// Assert exact one-to-one backing: reserve == total supply
///
/// # Arguments
/// * `reserve` - Lamports held by the ledger
/// * `total_supply` - Outstanding token units
pub fn assert_fully_backed(reserve: u64, total_supply: u64) -> Result<()> {
  require!(
    reserve == total_supply,
    WrappedTokenError::BackingMismatch
  );
  Ok(())
}

/// Assert total supply equals the sum of all holder balances
///
/// # Arguments
/// * `total_supply` - Recorded supply
/// * `holdings` - Sum over every balance entry
pub fn assert_supply_matches_holdings(total_supply: u64, holdings: u64) -> Result<()> {
  require!(
    total_supply == holdings,
    WrappedTokenError::SupplyMismatch
  );
  Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserve_covers_supply_exact() {
        assert!(assert_reserve_covers_supply(4_000_000_000, 4_000_000_000).is_ok());
    }

    #[test]
    fn test_reserve_covers_supply_with_surplus() {
        // lamports sent directly to the ledger account
        assert!(assert_reserve_covers_supply(4_000_000_500, 4_000_000_000).is_ok());
    }

    #[test]
    fn test_reserve_shortfall() {
        let result = assert_reserve_covers_supply(0, 3_000_000_000);
        assert_eq!(result.unwrap_err(), WrappedTokenError::ReserveShortfall.into());
    }

    #[test]
    fn test_fully_backed() {
        assert!(assert_fully_backed(7, 7).is_ok());
        assert!(assert_fully_backed(8, 7).is_err());
        assert!(assert_fully_backed(6, 7).is_err());
    }

    #[test]
    fn test_supply_matches_holdings() {
        assert!(assert_supply_matches_holdings(12, 12).is_ok());
        let result = assert_supply_matches_holdings(12, 11);
        assert_eq!(result.unwrap_err(), WrappedTokenError::SupplyMismatch.into());
    }
}
