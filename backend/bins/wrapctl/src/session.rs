use anchor_lang::prelude::Pubkey;
use anyhow::{anyhow, Result};
use tracing::debug;
use wrapped_config::Config;
use wrapped_report::{AccountReport, TokenReport};
use wrapped_token::client::WrappedTokenClient;
use wrapped_token::constants::{DEFAULT_TOKEN_NAME, DEFAULT_TOKEN_SYMBOL, MAX_CALL_DEPTH, TOKEN_DECIMALS};
use wrapped_token::runtime::Runtime;
use wrapped_token::state::LedgerSettings;

/// A fresh runtime with one deployed ledger and funded holder accounts
pub struct Session {
    pub rt: Runtime,
    pub token: WrappedTokenClient,
    pub holders: Vec<Pubkey>,
    symbol: String,
}

impl Session {
    pub fn new(config: &Config, settings: LedgerSettings, holders: usize) -> Result<Self> {
        let mut rt = Runtime::with_max_call_depth(config.max_call_depth.unwrap_or(MAX_CALL_DEPTH));
        let name = config.token_name.as_deref().unwrap_or(DEFAULT_TOKEN_NAME);
        let symbol = config.token_symbol.as_deref().unwrap_or(DEFAULT_TOKEN_SYMBOL);

        let token = WrappedTokenClient::deploy(&mut rt, name, symbol, settings)?;
        let holders = (0..holders)
            .map(|_| rt.create_account(config.holder_lamports))
            .collect::<Vec<_>>();
        debug!(ledger = %token.address(), holders = holders.len(), "session ready");

        Ok(Self {
            rt,
            token,
            holders,
            symbol: symbol.to_string(),
        })
    }

    pub fn token_report(&self) -> Result<TokenReport> {
        let summary = self.token.summary(&self.rt)?;
        Ok(TokenReport::new(
            summary.address.to_string(),
            summary.name,
            summary.symbol,
            summary.decimals,
            summary.holders,
            summary.total_supply,
            summary.reserve,
        ))
    }

    pub fn account_report(&self, label: &str, address: Pubkey) -> Result<AccountReport> {
        Ok(AccountReport::new(
            label.to_string(),
            address.to_string(),
            self.symbol.clone(),
            TOKEN_DECIMALS,
            self.rt.lamports(&address),
            self.token.balance_of(&self.rt, address)?,
        ))
    }

    /// Report a generated holder by index, or any address on the runtime
    pub fn lookup_report(&self, holder: Option<usize>, address: Option<Pubkey>) -> Result<AccountReport> {
        match (holder, address) {
            (_, Some(address)) if address == self.token.address() => {
                self.account_report("ledger", address)
            }
            (_, Some(address)) => self.account_report("account", address),
            (Some(index), None) => {
                let address = *self.holders.get(index).ok_or_else(|| {
                    anyhow!("holder {} out of range, the session has {}", index, self.holders.len())
                })?;
                self.account_report(&format!("holder {index}"), address)
            }
            (None, None) => Err(anyhow!("pass a holder index or an address")),
        }
    }

    pub fn holder_reports(&self) -> Result<Vec<AccountReport>> {
        self.holders
            .iter()
            .enumerate()
            .map(|(index, holder)| self.account_report(&format!("holder {index}"), *holder))
            .collect()
    }
}
