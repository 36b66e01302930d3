//! Pure arithmetic for the wrapped token ledger
//! All functions are deterministic and return None instead of wrapping
//! No external dependencies, fully testable in isolation

/// Credit `amount` to a balance or supply
/// Returns None on overflow
pub fn credit(current: u64, amount: u64) -> Option<u64> {
  current.checked_add(amount)
}

/// Debit `amount` from a balance or supply
/// Returns None when the debit would go below zero
pub fn debit(current: u64, amount: u64) -> Option<u64> {
  current.checked_sub(amount)
}

/// Lamports an account holds above its rent-exempt floor
///
/// # Arguments
/// * `lamports` - Current lamport balance of the account
/// * `rent_floor` - Minimum balance required for rent exemption
///
/// # Returns
/// The spendable reserve (0 if the account sits at or below its floor)
pub fn reserve_above_floor(lamports: u64, rent_floor: u64) -> u64 {
  lamports.saturating_sub(rent_floor)
}

/// Sum a set of holder balances
/// Returns None on overflow
pub fn sum_holdings<I>(balances: I) -> Option<u64>
where
  I: IntoIterator<Item = u64>,
{
  balances
    .into_iter()
    .try_fold(0u64, |acc, balance| acc.checked_add(balance))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_and_debit() {
        assert_eq!(credit(10, 5), Some(15));
        assert_eq!(debit(10, 5), Some(5));
        assert_eq!(debit(10, 10), Some(0));
    }

    #[test]
    fn test_credit_overflow() {
        assert_eq!(credit(u64::MAX, 1), None);
    }

    #[test]
    fn test_debit_underflow() {
        assert_eq!(debit(0, 1), None);
    }

    #[test]
    fn test_reserve_above_floor() {
        assert_eq!(reserve_above_floor(1_000_000, 890_880), 109_120);
        assert_eq!(reserve_above_floor(890_880, 890_880), 0);
        assert_eq!(reserve_above_floor(100, 890_880), 0);
    }

    #[test]
    fn test_sum_holdings() {
        assert_eq!(sum_holdings(vec![1, 2, 3]), Some(6));
        assert_eq!(sum_holdings(Vec::<u64>::new()), Some(0));
        assert_eq!(sum_holdings(vec![u64::MAX, 1]), None);
    }
}
