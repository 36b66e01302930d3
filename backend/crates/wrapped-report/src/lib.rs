//! Balance reports for the wrapped token ledger
//! Every amount is shown in raw base units and in decimal token units

use serde::{Deserialize, Serialize};
use std::fmt;

/// Render `raw` base units as a decimal string with `decimals` places.
///
/// Trailing zeros are trimmed but one fractional digit is always kept,
/// so `format_units(1_000_000_000, 9)` is `"1.0"`.
pub fn format_units(raw: u64, decimals: u8) -> String {
    let decimals = decimals as usize;
    let digits = format!("{:0>width$}", raw, width = decimals + 1);
    let (whole, fraction) = digits.split_at(digits.len() - decimals);

    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        format!("{whole}.0")
    } else {
        format!("{whole}.{fraction}")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub raw: u64,
    pub formatted: String,
}

impl Amount {
    pub fn new(raw: u64, decimals: u8) -> Self {
        Self {
            raw,
            formatted: format_units(raw, decimals),
        }
    }
}

/// Ledger-wide view: metadata, supply and the reserve behind it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenReport {
    pub address: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub holders: usize,
    pub total_supply: Amount,
    pub reserve: Amount,
}

impl TokenReport {
    pub fn new(
        address: String,
        name: String,
        symbol: String,
        decimals: u8,
        holders: usize,
        total_supply: u64,
        reserve: u64,
    ) -> Self {
        Self {
            address,
            name,
            symbol,
            decimals,
            holders,
            total_supply: Amount::new(total_supply, decimals),
            reserve: Amount::new(reserve, decimals),
        }
    }

    pub fn fully_backed(&self) -> bool {
        self.reserve.raw == self.total_supply.raw
    }
}

impl fmt::Display for TokenReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Token: {} ({})", self.name, self.symbol)?;
        writeln!(f, "   Address: {}", self.address)?;
        writeln!(f, "   Decimals: {}", self.decimals)?;
        writeln!(f, "   Holders: {}", self.holders)?;
        writeln!(
            f,
            "   Total supply: {} {} (raw {})",
            self.total_supply.formatted, self.symbol, self.total_supply.raw
        )?;
        write!(
            f,
            "   Reserve: {} SOL (raw {})",
            self.reserve.formatted, self.reserve.raw
        )
    }
}

/// One account's native and token balances
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountReport {
    pub label: String,
    pub address: String,
    pub symbol: String,
    pub native: Amount,
    pub token: Amount,
}

impl AccountReport {
    pub fn new(
        label: String,
        address: String,
        symbol: String,
        decimals: u8,
        native: u64,
        token: u64,
    ) -> Self {
        Self {
            label,
            address,
            symbol,
            native: Amount::new(native, decimals),
            token: Amount::new(token, decimals),
        }
    }
}

impl fmt::Display for AccountReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Account: {} ({})", self.label, self.address)?;
        writeln!(f, "   SOL: {} SOL", self.native.formatted)?;
        writeln!(f, "   Raw SOL: {}", self.native.raw)?;
        writeln!(f, "   Token: {} {}", self.token.formatted, self.symbol)?;
        write!(f, "   Raw Token: {}", self.token.raw)
    }
}
